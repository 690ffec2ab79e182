use crate::core::types::Element;

/// 모멘텀 업데이트
///
/// accum = accum*momentum + grad 뒤, Nesterov면 한 스텝 앞을 내다본
/// 위치의 그래디언트 보정을 더한다
#[inline]
pub fn momentum_update<T: Element>(
    var: T,
    accum: T,
    lr: T,
    grad: T,
    momentum: T,
    use_nesterov: bool,
) -> (T, T) {
    let accum = accum * momentum + grad;
    let var = if use_nesterov {
        var - (grad * lr + accum * momentum * lr)
    } else {
        var - lr * accum
    };
    (var, accum)
}

/// Keras 관례의 모멘텀: 속도 항에 학습률을 미리 곱해 둔다
#[inline]
pub fn keras_momentum_update<T: Element>(
    var: T,
    accum: T,
    lr: T,
    grad: T,
    momentum: T,
    use_nesterov: bool,
) -> (T, T) {
    let accum = accum * momentum - grad * lr;
    let var = if use_nesterov {
        var + (accum * momentum - grad * lr)
    } else {
        var + accum
    };
    (var, accum)
}
