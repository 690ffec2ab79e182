use std::fmt;

use crate::core::backend::Device;
use crate::core::rules::UpdateFamily;
use crate::core::types::DType;

/// 업데이트 호출의 경계에서 검출되는 오류
///
/// 모든 변형은 요소 처리가 시작되기 전에 검출된다. 요소 계산 도중의
/// inf/nan은 오류가 아니라 일반 부동소수점 값으로 전파된다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// 배열 길이가 서로 다르거나 빈 호출이다. 부분 변경 없이 거부된다
    ShapeMismatch {
        /// 문제가 된 배열 이름
        what: &'static str,
        /// 실제 길이
        got: usize,
        /// 기대 길이
        expected: usize,
    },
    /// (계열, 요소 타입, 장치) 조합에 등록된 커널이 없다
    UnsupportedTypeOnBackend {
        family: UpdateFamily,
        dtype: DType,
        device: Device,
    },
    /// 실행 구성이 유효하지 않다. 재시도나 부분 복구는 없다
    LaunchFailure(&'static str),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::ShapeMismatch { what, got, expected } => {
                write!(f, "길이 불일치: {what} 길이 {got}, 기대 {expected}")
            }
            KernelError::UnsupportedTypeOnBackend { family, dtype, device } => {
                write!(f, "미지원 조합: {family:?} / {dtype:?} / {device:?}")
            }
            KernelError::LaunchFailure(reason) => {
                write!(f, "커널 실행 실패: {reason}")
            }
        }
    }
}

impl std::error::Error for KernelError {}
