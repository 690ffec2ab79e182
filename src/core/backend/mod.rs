//! 백엔드 모델과 (계열, 타입, 장치) 능력 테이블

pub mod kernel_loop;
pub mod vectorized;


use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::core::rules::UpdateFamily;
use crate::core::types::DType;

/// 실행 대상 장치
///
/// Restricted는 복소 초월함수의 네이티브 코드 생성이 불안정한 장치다.
/// 컴파일 단위에 네이티브 복소 sqrt/rsqrt가 포함되는 것 자체를 피해야
/// 하므로, 해당 장치에서 sqrt를 쓰면서 복소수를 지원하는 계열은 전부
/// 실수 유도 프리미티브 기반의 명시적 루프 커널로 돌린다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// 모든 요소 타입에 네이티브 프리미티브가 충분한 장치
    Standard,
    /// 복소 초월함수 코드 생성이 불안정한 장치
    Restricted,
}

impl Device {
    pub const ALL: [Device; 2] = [Device::Standard, Device::Restricted];

    /// 장치별 sqrt/rsqrt 전략. 호출마다가 아니라 장치당 한 번 결정된다
    pub fn recip_sqrt_strategy(self) -> RecipSqrtStrategy {
        match self {
            Device::Standard => RecipSqrtStrategy::Native,
            Device::Restricted => RecipSqrtStrategy::DerivedFromReal,
        }
    }
}

/// sqrt / rsqrt 구현 선택
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipSqrtStrategy {
    Native,
    DerivedFromReal,
}

/// 실행 경로
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// 전체 배열 벡터화 평가
    Vectorized,
    /// 인덱스 블록 단위 병렬 루프 커널
    KernelLoop,
}

/// (계열, 요소 타입, 장치) → 실행 경로 능력 테이블
static CAPABILITY: Lazy<HashMap<(UpdateFamily, DType, Device), Route>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for device in Device::ALL {
        for family in UpdateFamily::ALL {
            for dtype in DType::ALL {
                if let Some(route) = resolve(family, dtype, device) {
                    table.insert((family, dtype, device), route);
                }
            }
        }
    }
    table
});

/// 호출 준비 시점의 경로 조회. 항목이 없으면 미지원 조합이다
pub fn route_for(family: UpdateFamily, dtype: DType, device: Device) -> Option<Route> {
    CAPABILITY.get(&(family, dtype, device)).copied()
}

fn resolve(family: UpdateFamily, dtype: DType, device: Device) -> Option<Route> {
    use UpdateFamily::*;

    // 부호, 절대값, 지수, 거듭제곱이 필요한 계열은 실수 전용
    if dtype.is_complex() && family.real_only() {
        return None;
    }
    match device {
        Device::Standard => Some(Route::Vectorized),
        Device::Restricted => {
            // 명시적 루프 커널이 없는 복소 조합은 등록하지 않는다
            if dtype.is_complex() && matches!(family, Momentum | KerasMomentum | Adam) {
                return None;
            }
            // sqrt를 쓰면서 복소수를 지원하는 계열은 모든 요소 타입에서
            // 루프 커널 하나로 통일한다
            if matches!(family, Adagrad | AdagradV2 | Adadelta | RmsProp | CenteredRmsProp) {
                Some(Route::KernelLoop)
            } else {
                Some(Route::Vectorized)
            }
        }
    }
}
