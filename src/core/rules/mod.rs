//! 계열별 요소 단위 업데이트 규칙
//!
//! 각 함수는 배열의 한 인덱스에 해당하는 현재 값들과 스칼라
//! 하이퍼파라미터를 받아 새 값을 돌려주는 순수 함수다. 벡터화 경로와
//! 명시적 루프 경로가 같은 함수를 그대로 공유하므로 두 경로의 공식은
//! 정의상 일치한다.

pub mod adadelta;
pub mod adagrad;
pub mod adam;
pub mod ftrl;
pub mod gradient_descent;
pub mod momentum;
pub mod rmsprop;
pub mod sign;

// 테스트 모듈
#[cfg(test)]
mod __tests__;

// 재수출
pub use adadelta::adadelta_update;
pub use adagrad::{adagrad_update, adagrad_v2_update};
pub use adam::{adam_amsgrad_update, adam_update, adamax_update};
pub use ftrl::{ftrl_update, ftrl_v2_update};
pub use gradient_descent::gradient_descent_update;
pub use momentum::{keras_momentum_update, momentum_update};
pub use rmsprop::{centered_rmsprop_update, rmsprop_update};
pub use sign::{add_sign_update, power_sign_update};

/// 업데이트 규칙 계열
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateFamily {
    GradientDescent,
    Adagrad,
    AdagradV2,
    Adadelta,
    Momentum,
    KerasMomentum,
    Adam,
    AdamAmsgrad,
    AdaMax,
    RmsProp,
    CenteredRmsProp,
    AddSign,
    PowerSign,
    Ftrl,
    FtrlV2,
}

impl UpdateFamily {
    pub const ALL: [UpdateFamily; 15] = [
        UpdateFamily::GradientDescent,
        UpdateFamily::Adagrad,
        UpdateFamily::AdagradV2,
        UpdateFamily::Adadelta,
        UpdateFamily::Momentum,
        UpdateFamily::KerasMomentum,
        UpdateFamily::Adam,
        UpdateFamily::AdamAmsgrad,
        UpdateFamily::AdaMax,
        UpdateFamily::RmsProp,
        UpdateFamily::CenteredRmsProp,
        UpdateFamily::AddSign,
        UpdateFamily::PowerSign,
        UpdateFamily::Ftrl,
        UpdateFamily::FtrlV2,
    ];

    /// 부호, 절대값, 지수, 거듭제곱이 필요한 실수 전용 계열
    pub fn real_only(self) -> bool {
        matches!(
            self,
            UpdateFamily::AdamAmsgrad
                | UpdateFamily::AdaMax
                | UpdateFamily::AddSign
                | UpdateFamily::PowerSign
                | UpdateFamily::Ftrl
                | UpdateFamily::FtrlV2
        )
    }
}
