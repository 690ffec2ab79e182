//! 전체 배열 벡터화 실행 경로
//!
//! ndarray 표현으로 N개 요소를 융합 순회한다. 스칼라는 브로드캐스트
//! 접근자로 전달되어 N 길이 버퍼로 복제되지 않는다. 이 경로는 네이티브
//! 프리미티브가 해당 요소 타입에 충분할 때만 선택되므로 sqrt/rsqrt는
//! 항상 네이티브 전략이다.

use ndarray::{ArrayView1, ArrayViewMut1, Zip};

use crate::core::math::NativeRecipSqrt;
use crate::core::rules;
use crate::core::types::{Element, RealElement, Scalar};

pub fn gradient_descent<T: Element>(var: &mut [T], lr: Scalar<T>, grad: &[T]) {
    let mut var = ArrayViewMut1::from(var);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var).and(&grad).par_for_each(|i, v, &g| {
        *v = rules::gradient_descent_update(*v, lr.at(i), g);
    });
}

pub fn adagrad<T: Element>(
    var: &mut [T],
    accum: &mut [T],
    lr: Scalar<T>,
    grad: &[T],
    update_slots: bool,
) {
    let mut var = ArrayViewMut1::from(var);
    let mut accum = ArrayViewMut1::from(accum);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var).and(&mut accum).and(&grad).par_for_each(|i, v, a, &g| {
        let (nv, na) =
            rules::adagrad_update::<T, NativeRecipSqrt>(*v, *a, lr.at(i), g, update_slots);
        *v = nv;
        *a = na;
    });
}

pub fn adagrad_v2<T: Element>(
    var: &mut [T],
    accum: &mut [T],
    lr: Scalar<T>,
    epsilon: Scalar<T>,
    grad: &[T],
    update_slots: bool,
) {
    let mut var = ArrayViewMut1::from(var);
    let mut accum = ArrayViewMut1::from(accum);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var).and(&mut accum).and(&grad).par_for_each(|i, v, a, &g| {
        let (nv, na) = rules::adagrad_v2_update::<T, NativeRecipSqrt>(
            *v,
            *a,
            lr.at(i),
            epsilon.at(i),
            g,
            update_slots,
        );
        *v = nv;
        *a = na;
    });
}

pub fn adadelta<T: Element>(
    var: &mut [T],
    accum: &mut [T],
    accum_update: &mut [T],
    lr: Scalar<T>,
    rho: Scalar<T>,
    epsilon: Scalar<T>,
    grad: &[T],
) {
    let mut var = ArrayViewMut1::from(var);
    let mut accum = ArrayViewMut1::from(accum);
    let mut accum_update = ArrayViewMut1::from(accum_update);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var)
        .and(&mut accum)
        .and(&mut accum_update)
        .and(&grad)
        .par_for_each(|i, v, a, au, &g| {
            let (nv, na, nau) = rules::adadelta_update::<T, NativeRecipSqrt>(
                *v,
                *a,
                *au,
                lr.at(i),
                rho.at(i),
                epsilon.at(i),
                g,
            );
            *v = nv;
            *a = na;
            *au = nau;
        });
}

pub fn momentum<T: Element>(
    var: &mut [T],
    accum: &mut [T],
    lr: Scalar<T>,
    grad: &[T],
    momentum: Scalar<T>,
    use_nesterov: bool,
) {
    let mut var = ArrayViewMut1::from(var);
    let mut accum = ArrayViewMut1::from(accum);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var).and(&mut accum).and(&grad).par_for_each(|i, v, a, &g| {
        let (nv, na) =
            rules::momentum_update(*v, *a, lr.at(i), g, momentum.at(i), use_nesterov);
        *v = nv;
        *a = na;
    });
}

pub fn keras_momentum<T: Element>(
    var: &mut [T],
    accum: &mut [T],
    lr: Scalar<T>,
    grad: &[T],
    momentum: Scalar<T>,
    use_nesterov: bool,
) {
    let mut var = ArrayViewMut1::from(var);
    let mut accum = ArrayViewMut1::from(accum);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var).and(&mut accum).and(&grad).par_for_each(|i, v, a, &g| {
        let (nv, na) =
            rules::keras_momentum_update(*v, *a, lr.at(i), g, momentum.at(i), use_nesterov);
        *v = nv;
        *a = na;
    });
}

pub fn adam<T: Element>(
    var: &mut [T],
    m: &mut [T],
    v: &mut [T],
    beta1_power: Scalar<T>,
    beta2_power: Scalar<T>,
    lr: Scalar<T>,
    beta1: Scalar<T>,
    beta2: Scalar<T>,
    epsilon: Scalar<T>,
    grad: &[T],
    use_nesterov: bool,
) {
    let mut var = ArrayViewMut1::from(var);
    let mut m = ArrayViewMut1::from(m);
    let mut v = ArrayViewMut1::from(v);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var).and(&mut m).and(&mut v).and(&grad).par_for_each(
        |i, va, mm, vv, &g| {
            let (nva, nm, nv) = rules::adam_update::<T, NativeRecipSqrt>(
                *va,
                *mm,
                *vv,
                beta1_power.at(i),
                beta2_power.at(i),
                lr.at(i),
                beta1.at(i),
                beta2.at(i),
                epsilon.at(i),
                g,
                use_nesterov,
            );
            *va = nva;
            *mm = nm;
            *vv = nv;
        },
    );
}

pub fn adam_amsgrad<T: RealElement>(
    var: &mut [T],
    m: &mut [T],
    v: &mut [T],
    vhat: &mut [T],
    beta1_power: Scalar<T>,
    beta2_power: Scalar<T>,
    lr: Scalar<T>,
    beta1: Scalar<T>,
    beta2: Scalar<T>,
    epsilon: Scalar<T>,
    grad: &[T],
) {
    let mut var = ArrayViewMut1::from(var);
    let mut m = ArrayViewMut1::from(m);
    let mut v = ArrayViewMut1::from(v);
    let mut vhat = ArrayViewMut1::from(vhat);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var)
        .and(&mut m)
        .and(&mut v)
        .and(&mut vhat)
        .and(&grad)
        .par_for_each(|i, va, mm, vv, vh, &g| {
            let (nva, nm, nv, nvh) = rules::adam_amsgrad_update::<T, NativeRecipSqrt>(
                *va,
                *mm,
                *vv,
                *vh,
                beta1_power.at(i),
                beta2_power.at(i),
                lr.at(i),
                beta1.at(i),
                beta2.at(i),
                epsilon.at(i),
                g,
            );
            *va = nva;
            *mm = nm;
            *vv = nv;
            *vh = nvh;
        });
}

pub fn adamax<T: RealElement>(
    var: &mut [T],
    m: &mut [T],
    v: &mut [T],
    beta1_power: Scalar<T>,
    lr: Scalar<T>,
    beta1: Scalar<T>,
    beta2: Scalar<T>,
    epsilon: Scalar<T>,
    grad: &[T],
) {
    let mut var = ArrayViewMut1::from(var);
    let mut m = ArrayViewMut1::from(m);
    let mut v = ArrayViewMut1::from(v);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var).and(&mut m).and(&mut v).and(&grad).par_for_each(
        |i, va, mm, vv, &g| {
            let (nva, nm, nv) = rules::adamax_update(
                *va,
                *mm,
                *vv,
                beta1_power.at(i),
                lr.at(i),
                beta1.at(i),
                beta2.at(i),
                epsilon.at(i),
                g,
            );
            *va = nva;
            *mm = nm;
            *vv = nv;
        },
    );
}

pub fn rmsprop<T: Element>(
    var: &mut [T],
    ms: &mut [T],
    mom: &mut [T],
    lr: Scalar<T>,
    rho: Scalar<T>,
    momentum: Scalar<T>,
    epsilon: Scalar<T>,
    grad: &[T],
) {
    let mut var = ArrayViewMut1::from(var);
    let mut ms = ArrayViewMut1::from(ms);
    let mut mom = ArrayViewMut1::from(mom);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var).and(&mut ms).and(&mut mom).and(&grad).par_for_each(
        |i, v, s, mo, &g| {
            let (nv, ns, nmo) = rules::rmsprop_update::<T, NativeRecipSqrt>(
                *v,
                *s,
                *mo,
                lr.at(i),
                rho.at(i),
                momentum.at(i),
                epsilon.at(i),
                g,
            );
            *v = nv;
            *s = ns;
            *mo = nmo;
        },
    );
}

pub fn centered_rmsprop<T: Element>(
    var: &mut [T],
    mg: &mut [T],
    ms: &mut [T],
    mom: &mut [T],
    lr: Scalar<T>,
    rho: Scalar<T>,
    momentum: Scalar<T>,
    epsilon: Scalar<T>,
    grad: &[T],
) {
    let mut var = ArrayViewMut1::from(var);
    let mut mg = ArrayViewMut1::from(mg);
    let mut ms = ArrayViewMut1::from(ms);
    let mut mom = ArrayViewMut1::from(mom);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var)
        .and(&mut mg)
        .and(&mut ms)
        .and(&mut mom)
        .and(&grad)
        .par_for_each(|i, v, ga, s, mo, &g| {
            let (nv, nga, ns, nmo) = rules::centered_rmsprop_update::<T, NativeRecipSqrt>(
                *v,
                *ga,
                *s,
                *mo,
                lr.at(i),
                rho.at(i),
                momentum.at(i),
                epsilon.at(i),
                g,
            );
            *v = nv;
            *ga = nga;
            *s = ns;
            *mo = nmo;
        });
}

pub fn add_sign<T: RealElement>(
    var: &mut [T],
    m: &mut [T],
    lr: Scalar<T>,
    alpha: Scalar<T>,
    sign_decay: Scalar<T>,
    beta: Scalar<T>,
    grad: &[T],
) {
    let mut var = ArrayViewMut1::from(var);
    let mut m = ArrayViewMut1::from(m);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var).and(&mut m).and(&grad).par_for_each(|i, v, mm, &g| {
        let (nv, nm) = rules::add_sign_update(
            *v,
            *mm,
            lr.at(i),
            alpha.at(i),
            sign_decay.at(i),
            beta.at(i),
            g,
        );
        *v = nv;
        *mm = nm;
    });
}

pub fn power_sign<T: RealElement>(
    var: &mut [T],
    m: &mut [T],
    lr: Scalar<T>,
    logbase: Scalar<T>,
    sign_decay: Scalar<T>,
    beta: Scalar<T>,
    grad: &[T],
) {
    let mut var = ArrayViewMut1::from(var);
    let mut m = ArrayViewMut1::from(m);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var).and(&mut m).and(&grad).par_for_each(|i, v, mm, &g| {
        let (nv, nm) = rules::power_sign_update(
            *v,
            *mm,
            lr.at(i),
            logbase.at(i),
            sign_decay.at(i),
            beta.at(i),
            g,
        );
        *v = nv;
        *mm = nm;
    });
}

pub fn ftrl<T: RealElement>(
    var: &mut [T],
    accum: &mut [T],
    linear: &mut [T],
    lr: Scalar<T>,
    l1: Scalar<T>,
    l2: Scalar<T>,
    lr_power: Scalar<T>,
    grad: &[T],
) {
    let mut var = ArrayViewMut1::from(var);
    let mut accum = ArrayViewMut1::from(accum);
    let mut linear = ArrayViewMut1::from(linear);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var)
        .and(&mut accum)
        .and(&mut linear)
        .and(&grad)
        .par_for_each(|i, v, a, l, &g| {
            let (nv, na, nl) = rules::ftrl_update::<T, NativeRecipSqrt>(
                *v,
                *a,
                *l,
                lr.at(i),
                l1.at(i),
                l2.at(i),
                lr_power.at(i),
                g,
            );
            *v = nv;
            *a = na;
            *l = nl;
        });
}

pub fn ftrl_v2<T: RealElement>(
    var: &mut [T],
    accum: &mut [T],
    linear: &mut [T],
    lr: Scalar<T>,
    l1: Scalar<T>,
    l2: Scalar<T>,
    l2_shrinkage: Scalar<T>,
    lr_power: Scalar<T>,
    grad: &[T],
) {
    let mut var = ArrayViewMut1::from(var);
    let mut accum = ArrayViewMut1::from(accum);
    let mut linear = ArrayViewMut1::from(linear);
    let grad = ArrayView1::from(grad);
    Zip::indexed(&mut var)
        .and(&mut accum)
        .and(&mut linear)
        .and(&grad)
        .par_for_each(|i, v, a, l, &g| {
            let (nv, na, nl) = rules::ftrl_v2_update::<T, NativeRecipSqrt>(
                *v,
                *a,
                *l,
                lr.at(i),
                l1.at(i),
                l2.at(i),
                l2_shrinkage.at(i),
                lr_power.at(i),
                g,
            );
            *v = nv;
            *a = na;
            *l = nl;
        });
}
