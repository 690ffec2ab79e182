//! 명시적 병렬 루프 실행 경로
//!
//! 연속 인덱스 블록 하나당 하나의 작업으로 전 요소를 병렬 순회한다.
//! 요소 공식은 벡터화 경로와 동일한 규칙 함수를 그대로 쓰고, sqrt/rsqrt
//! 전략만 타입 파라미터로 주입된다. 복소 초월함수 코드 생성이 불안정한
//! 장치의 복소 계열은 반드시 이 경로로 실행된다.

use rayon::prelude::*;

use crate::core::error::KernelError;
use crate::core::math::RecipSqrt;
use crate::core::rules;
use crate::core::types::{Element, RealElement, Scalar};

/// 블록 크기 (한 작업이 처리하는 연속 인덱스 수)
pub const BLOCK_DIM: usize = 256;

/// 루프 커널 실행 구성
#[derive(Debug, Clone, Copy)]
pub struct LaunchConfig {
    pub len: usize,
    pub block: usize,
}

impl LaunchConfig {
    /// 길이 N에 대한 실행 구성. N = 0이면 실행할 수 없다
    pub fn for_len(len: usize) -> Result<Self, KernelError> {
        if len == 0 {
            return Err(KernelError::LaunchFailure("빈 실행 구성"));
        }
        log::trace!("루프 커널 실행 구성: len={}, block={}", len, BLOCK_DIM);
        Ok(LaunchConfig { len, block: BLOCK_DIM })
    }

    /// 블록 수
    pub fn block_count(&self) -> usize {
        (self.len + self.block - 1) / self.block
    }
}

pub fn gradient_descent<T: Element>(cfg: LaunchConfig, var: &mut [T], lr: Scalar<T>, grad: &[T]) {
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, (var_b, grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                var_b[j] = rules::gradient_descent_update(var_b[j], lr.at(base + j), grad_b[j]);
            }
        });
}

pub fn adagrad<T: Element, S: RecipSqrt>(
    cfg: LaunchConfig,
    var: &mut [T],
    accum: &mut [T],
    lr: Scalar<T>,
    grad: &[T],
    update_slots: bool,
) {
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(accum.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, ((var_b, accum_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let (v, a) = rules::adagrad_update::<T, S>(
                    var_b[j],
                    accum_b[j],
                    lr.at(base + j),
                    grad_b[j],
                    update_slots,
                );
                var_b[j] = v;
                accum_b[j] = a;
            }
        });
}

pub fn adagrad_v2<T: Element, S: RecipSqrt>(
    cfg: LaunchConfig,
    var: &mut [T],
    accum: &mut [T],
    lr: Scalar<T>,
    epsilon: Scalar<T>,
    grad: &[T],
    update_slots: bool,
) {
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(accum.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, ((var_b, accum_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let (v, a) = rules::adagrad_v2_update::<T, S>(
                    var_b[j],
                    accum_b[j],
                    lr.at(base + j),
                    epsilon.at(base + j),
                    grad_b[j],
                    update_slots,
                );
                var_b[j] = v;
                accum_b[j] = a;
            }
        });
}

pub fn adadelta<T: Element, S: RecipSqrt>(
    cfg: LaunchConfig,
    var: &mut [T],
    accum: &mut [T],
    accum_update: &mut [T],
    lr: Scalar<T>,
    rho: Scalar<T>,
    epsilon: Scalar<T>,
    grad: &[T],
) {
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(accum.par_chunks_mut(cfg.block))
        .zip(accum_update.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, (((var_b, accum_b), accum_update_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (v, a, au) = rules::adadelta_update::<T, S>(
                    var_b[j],
                    accum_b[j],
                    accum_update_b[j],
                    lr.at(i),
                    rho.at(i),
                    epsilon.at(i),
                    grad_b[j],
                );
                var_b[j] = v;
                accum_b[j] = a;
                accum_update_b[j] = au;
            }
        });
}

pub fn momentum<T: Element>(
    cfg: LaunchConfig,
    var: &mut [T],
    accum: &mut [T],
    lr: Scalar<T>,
    grad: &[T],
    momentum: Scalar<T>,
    use_nesterov: bool,
) {
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(accum.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, ((var_b, accum_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (v, a) = rules::momentum_update(
                    var_b[j],
                    accum_b[j],
                    lr.at(i),
                    grad_b[j],
                    momentum.at(i),
                    use_nesterov,
                );
                var_b[j] = v;
                accum_b[j] = a;
            }
        });
}

pub fn keras_momentum<T: Element>(
    cfg: LaunchConfig,
    var: &mut [T],
    accum: &mut [T],
    lr: Scalar<T>,
    grad: &[T],
    momentum: Scalar<T>,
    use_nesterov: bool,
) {
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(accum.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, ((var_b, accum_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (v, a) = rules::keras_momentum_update(
                    var_b[j],
                    accum_b[j],
                    lr.at(i),
                    grad_b[j],
                    momentum.at(i),
                    use_nesterov,
                );
                var_b[j] = v;
                accum_b[j] = a;
            }
        });
}

pub fn adam<T: Element, S: RecipSqrt>(
    cfg: LaunchConfig,
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
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(m.par_chunks_mut(cfg.block))
        .zip(v.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, (((var_b, m_b), v_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (nv, nm, nvv) = rules::adam_update::<T, S>(
                    var_b[j],
                    m_b[j],
                    v_b[j],
                    beta1_power.at(i),
                    beta2_power.at(i),
                    lr.at(i),
                    beta1.at(i),
                    beta2.at(i),
                    epsilon.at(i),
                    grad_b[j],
                    use_nesterov,
                );
                var_b[j] = nv;
                m_b[j] = nm;
                v_b[j] = nvv;
            }
        });
}

pub fn adam_amsgrad<T: RealElement, S: RecipSqrt>(
    cfg: LaunchConfig,
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
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(m.par_chunks_mut(cfg.block))
        .zip(v.par_chunks_mut(cfg.block))
        .zip(vhat.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, ((((var_b, m_b), v_b), vhat_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (nv, nm, nvv, nvh) = rules::adam_amsgrad_update::<T, S>(
                    var_b[j],
                    m_b[j],
                    v_b[j],
                    vhat_b[j],
                    beta1_power.at(i),
                    beta2_power.at(i),
                    lr.at(i),
                    beta1.at(i),
                    beta2.at(i),
                    epsilon.at(i),
                    grad_b[j],
                );
                var_b[j] = nv;
                m_b[j] = nm;
                v_b[j] = nvv;
                vhat_b[j] = nvh;
            }
        });
}

pub fn adamax<T: RealElement>(
    cfg: LaunchConfig,
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
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(m.par_chunks_mut(cfg.block))
        .zip(v.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, (((var_b, m_b), v_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (nv, nm, nvv) = rules::adamax_update(
                    var_b[j],
                    m_b[j],
                    v_b[j],
                    beta1_power.at(i),
                    lr.at(i),
                    beta1.at(i),
                    beta2.at(i),
                    epsilon.at(i),
                    grad_b[j],
                );
                var_b[j] = nv;
                m_b[j] = nm;
                v_b[j] = nvv;
            }
        });
}

pub fn rmsprop<T: Element, S: RecipSqrt>(
    cfg: LaunchConfig,
    var: &mut [T],
    ms: &mut [T],
    mom: &mut [T],
    lr: Scalar<T>,
    rho: Scalar<T>,
    momentum: Scalar<T>,
    epsilon: Scalar<T>,
    grad: &[T],
) {
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(ms.par_chunks_mut(cfg.block))
        .zip(mom.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, (((var_b, ms_b), mom_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (v, s, mo) = rules::rmsprop_update::<T, S>(
                    var_b[j],
                    ms_b[j],
                    mom_b[j],
                    lr.at(i),
                    rho.at(i),
                    momentum.at(i),
                    epsilon.at(i),
                    grad_b[j],
                );
                var_b[j] = v;
                ms_b[j] = s;
                mom_b[j] = mo;
            }
        });
}

pub fn centered_rmsprop<T: Element, S: RecipSqrt>(
    cfg: LaunchConfig,
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
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(mg.par_chunks_mut(cfg.block))
        .zip(ms.par_chunks_mut(cfg.block))
        .zip(mom.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, ((((var_b, mg_b), ms_b), mom_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (v, ga, s, mo) = rules::centered_rmsprop_update::<T, S>(
                    var_b[j],
                    mg_b[j],
                    ms_b[j],
                    mom_b[j],
                    lr.at(i),
                    rho.at(i),
                    momentum.at(i),
                    epsilon.at(i),
                    grad_b[j],
                );
                var_b[j] = v;
                mg_b[j] = ga;
                ms_b[j] = s;
                mom_b[j] = mo;
            }
        });
}

pub fn add_sign<T: RealElement>(
    cfg: LaunchConfig,
    var: &mut [T],
    m: &mut [T],
    lr: Scalar<T>,
    alpha: Scalar<T>,
    sign_decay: Scalar<T>,
    beta: Scalar<T>,
    grad: &[T],
) {
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(m.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, ((var_b, m_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (v, mm) = rules::add_sign_update(
                    var_b[j],
                    m_b[j],
                    lr.at(i),
                    alpha.at(i),
                    sign_decay.at(i),
                    beta.at(i),
                    grad_b[j],
                );
                var_b[j] = v;
                m_b[j] = mm;
            }
        });
}

pub fn power_sign<T: RealElement>(
    cfg: LaunchConfig,
    var: &mut [T],
    m: &mut [T],
    lr: Scalar<T>,
    logbase: Scalar<T>,
    sign_decay: Scalar<T>,
    beta: Scalar<T>,
    grad: &[T],
) {
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(m.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, ((var_b, m_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (v, mm) = rules::power_sign_update(
                    var_b[j],
                    m_b[j],
                    lr.at(i),
                    logbase.at(i),
                    sign_decay.at(i),
                    beta.at(i),
                    grad_b[j],
                );
                var_b[j] = v;
                m_b[j] = mm;
            }
        });
}

pub fn ftrl<T: RealElement, S: RecipSqrt>(
    cfg: LaunchConfig,
    var: &mut [T],
    accum: &mut [T],
    linear: &mut [T],
    lr: Scalar<T>,
    l1: Scalar<T>,
    l2: Scalar<T>,
    lr_power: Scalar<T>,
    grad: &[T],
) {
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(accum.par_chunks_mut(cfg.block))
        .zip(linear.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, (((var_b, accum_b), linear_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (v, a, l) = rules::ftrl_update::<T, S>(
                    var_b[j],
                    accum_b[j],
                    linear_b[j],
                    lr.at(i),
                    l1.at(i),
                    l2.at(i),
                    lr_power.at(i),
                    grad_b[j],
                );
                var_b[j] = v;
                accum_b[j] = a;
                linear_b[j] = l;
            }
        });
}

pub fn ftrl_v2<T: RealElement, S: RecipSqrt>(
    cfg: LaunchConfig,
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
    debug_assert_eq!(cfg.len, grad.len());
    var.par_chunks_mut(cfg.block)
        .zip(accum.par_chunks_mut(cfg.block))
        .zip(linear.par_chunks_mut(cfg.block))
        .zip(grad.par_chunks(cfg.block))
        .enumerate()
        .for_each(|(blk, (((var_b, accum_b), linear_b), grad_b))| {
            let base = blk * cfg.block;
            for j in 0..grad_b.len() {
                let i = base + j;
                let (v, a, l) = rules::ftrl_v2_update::<T, S>(
                    var_b[j],
                    accum_b[j],
                    linear_b[j],
                    lr.at(i),
                    l1.at(i),
                    l2.at(i),
                    l2_shrinkage.at(i),
                    lr_power.at(i),
                    grad_b[j],
                );
                var_b[j] = v;
                accum_b[j] = a;
                linear_b[j] = l;
            }
        });
}
