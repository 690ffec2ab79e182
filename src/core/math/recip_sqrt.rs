//! 실수 프리미티브 기반 제곱근 / 역제곱근
//!
//! 일부 가속기 툴체인은 컴파일 단위에 네이티브 복소 초월함수가 하나라도
//! 들어가면 무관한 커널의 디바이스 코드까지 깨뜨린다. 그런 장치에서는
//! 네이티브 복소 sqrt/rsqrt를 아예 호출하지 않고, 실수 sqrt와 곱셈,
//! 비교만으로 유도한 이 구현을 쓴다.

use half::f16;
use num_complex::Complex;

use std::f32::consts::FRAC_1_SQRT_2 as ROOT2_INV_F32;
use std::f64::consts::FRAC_1_SQRT_2 as ROOT2_INV_F64;

#[inline]
pub fn sqrt_f32(x: f32) -> f32 {
    libm::sqrtf(x)
}

#[inline]
pub fn rsqrt_f32(x: f32) -> f32 {
    1.0 / libm::sqrtf(x)
}

#[inline]
pub fn sqrt_f64(x: f64) -> f64 {
    libm::sqrt(x)
}

#[inline]
pub fn rsqrt_f64(x: f64) -> f64 {
    1.0 / libm::sqrt(x)
}

/// 반정밀도는 f32로 올려 계산한 뒤 되돌린다
#[inline]
pub fn sqrt_f16(x: f16) -> f16 {
    f16::from_f32(libm::sqrtf(x.to_f32()))
}

#[inline]
pub fn rsqrt_f16(x: f16) -> f16 {
    f16::from_f32(1.0 / libm::sqrtf(x.to_f32()))
}

/// 1 - √(1-u)의 다항 근사 (u = im²·r²)
///
/// 단정밀도에서 re·r이 ±1에 가까우면 1 ∓ re·r이 근접 값의 뺄셈이 되어
/// 유효 자릿수를 잃는다. 그 구간에서는 이 근사로 대체한다.
#[inline]
fn rsqrt_cancel_guard(u: f32) -> f32 {
    0.5 * u + 0.125 * u * u + 0.0625 * u * u * u
}

/// 복소 제곱근 (주값)
///
/// 결과 허수부의 부호는 입력 허수부의 부호를 따른다
pub fn sqrt_c64(x: Complex<f32>) -> Complex<f32> {
    let re = x.re;
    let im = x.im;
    let mod_x = libm::sqrtf(re * re + im * im);
    let out_re = libm::sqrtf(mod_x + re) * ROOT2_INV_F32;
    let out_im = libm::sqrtf(mod_x - re) * ROOT2_INV_F32 * if im >= 0.0 { 1.0 } else { -1.0 };
    Complex::new(out_re, out_im)
}

pub fn sqrt_c128(x: Complex<f64>) -> Complex<f64> {
    let re = x.re;
    let im = x.im;
    let mod_x = libm::sqrt(re * re + im * im);
    let out_re = libm::sqrt(mod_x + re) * ROOT2_INV_F64;
    let out_im = libm::sqrt(mod_x - re) * ROOT2_INV_F64 * if im >= 0.0 { 1.0 } else { -1.0 };
    Complex::new(out_re, out_im)
}

/// 복소 역제곱근
///
/// rsqrt(x) = conj(sqrt(x)) / |x| 이므로 결과 허수부의 부호는 입력
/// 허수부와 반대가 된다. |re·r| > 0.98 구간의 단정밀도 상쇄 오차는
/// 다항 근사로 우회한다.
pub fn rsqrt_c64(x: Complex<f32>) -> Complex<f32> {
    let re = x.re;
    let im = x.im;
    let r = 1.0 / libm::sqrtf(re * re + im * im);
    let rr = re * r;
    let u = im * im * r * r;
    let re_term = if rr < -0.98 { rsqrt_cancel_guard(u) } else { 1.0 + rr };
    let im_term = if rr > 0.98 { rsqrt_cancel_guard(u) } else { 1.0 - rr };
    let out_re = libm::sqrtf(r * re_term) * ROOT2_INV_F32;
    let out_im = libm::sqrtf(r * im_term) * ROOT2_INV_F32 * if im >= 0.0 { -1.0 } else { 1.0 };
    Complex::new(out_re, out_im)
}

// 배정밀도는 직접 뺄셈 (상쇄 보정은 단정밀도 전용)
pub fn rsqrt_c128(x: Complex<f64>) -> Complex<f64> {
    let re = x.re;
    let im = x.im;
    let r = 1.0 / libm::sqrt(re * re + im * im);
    let rr = re * r;
    let out_re = libm::sqrt(r * (1.0 + rr)) * ROOT2_INV_F64;
    let out_im = libm::sqrt(r * (1.0 - rr)) * ROOT2_INV_F64 * if im >= 0.0 { -1.0 } else { 1.0 };
    Complex::new(out_re, out_im)
}
