//! # 커널 엔진 핵심 모듈
//!
//! 스칼라 수치 프리미티브, 계열별 요소 업데이트 규칙, 백엔드 디스패치 계층

pub mod apply;
pub mod backend;
pub mod error;
pub mod math;
pub mod rules;
pub mod types;

// 주요 타입들 재수출
pub use apply::UpdateEngine;
pub use backend::{Device, Route};
pub use error::KernelError;
pub use rules::UpdateFamily;
pub use types::{DType, Element, RealElement, Scalar};
