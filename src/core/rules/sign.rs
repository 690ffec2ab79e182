use crate::core::types::RealElement;

/// AddSign: 그래디언트와 이동 평균의 부호 일치 정도로 스텝을 가감한다
#[inline]
pub fn add_sign_update<T: RealElement>(
    var: T,
    m: T,
    lr: T,
    alpha: T,
    sign_decay: T,
    beta: T,
    grad: T,
) -> (T, T) {
    let one = T::one();
    let m = m * beta + grad * (one - beta);
    let sign_gm = grad.sign() * m.sign();
    let var = var - lr * (alpha + sign_decay * sign_gm) * grad;
    (var, m)
}

/// PowerSign: 부호 일치 정도를 지수 스케일 exp(logbase·sign_decay·sign_gm)로
/// 반영한다
#[inline]
pub fn power_sign_update<T: RealElement>(
    var: T,
    m: T,
    lr: T,
    logbase: T,
    sign_decay: T,
    beta: T,
    grad: T,
) -> (T, T) {
    let one = T::one();
    let m = m * beta + grad * (one - beta);
    let sign_gm = grad.sign() * m.sign();
    let scale = (logbase * sign_decay * sign_gm).exp();
    let var = var - lr * scale * grad;
    (var, m)
}
