use crate::core::rules::{keras_momentum_update, momentum_update};

// 2의 거듭제곱 값만 쓰면 이진 부동소수점에서 전부 정확해 비트 비교가 가능하다

#[test]
fn 모멘텀_기본() {
    let (var, accum) = momentum_update(1.0f32, 0.5, 0.25, 0.125, 0.5, false);
    // accum = 0.5*0.5 + 0.125 = 0.375, var = 1 - 0.25*0.375
    assert_eq!(accum, 0.375);
    assert_eq!(var, 0.90625);
}

#[test]
fn 모멘텀_nesterov() {
    let (var, accum) = momentum_update(1.0f32, 0.5, 0.25, 0.125, 0.5, true);
    // var = 1 - (0.125*0.25 + 0.375*0.5*0.25)
    assert_eq!(accum, 0.375);
    assert_eq!(var, 0.921875);
}

#[test]
fn keras_모멘텀_기본() {
    let (var, accum) = keras_momentum_update(1.0f32, 0.5, 0.25, 0.125, 0.5, false);
    // accum = 0.5*0.5 - 0.125*0.25 = 0.21875, var = 1 + accum
    assert_eq!(accum, 0.21875);
    assert_eq!(var, 1.21875);
}

#[test]
fn keras_모멘텀_nesterov() {
    let (var, accum) = keras_momentum_update(1.0f32, 0.5, 0.25, 0.125, 0.5, true);
    // var = 1 + (0.21875*0.5 - 0.03125)
    assert_eq!(accum, 0.21875);
    assert_eq!(var, 1.078125);
}
