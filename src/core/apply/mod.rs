//! 호출 경계 디스패치 계층
//!
//! 계열별 진입점 하나가 검증, 능력 테이블 조회, 경로 선택을 순서대로
//! 수행한 뒤 해당 실행 경로에 배열을 넘긴다. 검증은 요소 처리가 시작되기
//! 전에만 일어나며, 실패 시 부분 변경 없이 거부된다.


use crate::core::backend::kernel_loop::{self, LaunchConfig};
use crate::core::backend::{route_for, vectorized, Device, RecipSqrtStrategy, Route};
use crate::core::error::KernelError;
use crate::core::math::{DerivedRecipSqrt, NativeRecipSqrt};
use crate::core::rules::UpdateFamily;
use crate::core::types::{DType, Element, RealElement, Scalar};

/// 업데이트 호출의 디스패치 엔진
///
/// 한 호출은 전 요소에 완전히 적용되거나 아예 실행되지 않는다. 같은
/// 배열을 겨냥한 동시 호출의 직렬화는 호출자 책임이며, 엔진 내부에는
/// 호출 간 상태가 없다.
#[derive(Debug, Clone, Copy)]
pub struct UpdateEngine {
    device: Device,
}

impl UpdateEngine {
    pub fn new(device: Device) -> Self {
        UpdateEngine { device }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// 호출 경계 검증: 빈 호출 거부, 길이 일치, 능력 테이블 조회
    fn prepare(
        &self,
        family: UpdateFamily,
        dtype: DType,
        n: usize,
        arrays: &[(&'static str, usize)],
    ) -> Result<Route, KernelError> {
        if n == 0 {
            return Err(KernelError::ShapeMismatch { what: "grad", got: 0, expected: 1 });
        }
        for &(what, len) in arrays {
            if len != n {
                return Err(KernelError::ShapeMismatch { what, got: len, expected: n });
            }
        }
        let route = route_for(family, dtype, self.device).ok_or(
            KernelError::UnsupportedTypeOnBackend { family, dtype, device: self.device },
        )?;
        log::debug!("{:?} 디스패치: dtype={:?}, n={}, route={:?}", family, dtype, n, route);
        Ok(route)
    }

    pub fn gradient_descent<T: Element>(
        &self,
        var: &mut [T],
        lr: Scalar<T>,
        grad: &[T],
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route =
            self.prepare(UpdateFamily::GradientDescent, T::DTYPE, n, &[("var", var.len())])?;
        match route {
            Route::Vectorized => vectorized::gradient_descent(var, lr, grad),
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                kernel_loop::gradient_descent(cfg, var, lr, grad);
            }
        }
        Ok(())
    }

    pub fn adagrad<T: Element>(
        &self,
        var: &mut [T],
        accum: &mut [T],
        lr: Scalar<T>,
        grad: &[T],
        update_slots: bool,
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::Adagrad,
            T::DTYPE,
            n,
            &[("var", var.len()), ("accum", accum.len())],
        )?;
        match route {
            Route::Vectorized => vectorized::adagrad(var, accum, lr, grad, update_slots),
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                match self.device.recip_sqrt_strategy() {
                    RecipSqrtStrategy::Native => kernel_loop::adagrad::<T, NativeRecipSqrt>(
                        cfg, var, accum, lr, grad, update_slots,
                    ),
                    RecipSqrtStrategy::DerivedFromReal => {
                        kernel_loop::adagrad::<T, DerivedRecipSqrt>(
                            cfg, var, accum, lr, grad, update_slots,
                        )
                    }
                }
            }
        }
        Ok(())
    }

    pub fn adagrad_v2<T: Element>(
        &self,
        var: &mut [T],
        accum: &mut [T],
        lr: Scalar<T>,
        epsilon: Scalar<T>,
        grad: &[T],
        update_slots: bool,
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::AdagradV2,
            T::DTYPE,
            n,
            &[("var", var.len()), ("accum", accum.len())],
        )?;
        match route {
            Route::Vectorized => {
                vectorized::adagrad_v2(var, accum, lr, epsilon, grad, update_slots)
            }
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                match self.device.recip_sqrt_strategy() {
                    RecipSqrtStrategy::Native => kernel_loop::adagrad_v2::<T, NativeRecipSqrt>(
                        cfg, var, accum, lr, epsilon, grad, update_slots,
                    ),
                    RecipSqrtStrategy::DerivedFromReal => {
                        kernel_loop::adagrad_v2::<T, DerivedRecipSqrt>(
                            cfg, var, accum, lr, epsilon, grad, update_slots,
                        )
                    }
                }
            }
        }
        Ok(())
    }

    pub fn adadelta<T: Element>(
        &self,
        var: &mut [T],
        accum: &mut [T],
        accum_update: &mut [T],
        lr: Scalar<T>,
        rho: Scalar<T>,
        epsilon: Scalar<T>,
        grad: &[T],
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::Adadelta,
            T::DTYPE,
            n,
            &[
                ("var", var.len()),
                ("accum", accum.len()),
                ("accum_update", accum_update.len()),
            ],
        )?;
        match route {
            Route::Vectorized => {
                vectorized::adadelta(var, accum, accum_update, lr, rho, epsilon, grad)
            }
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                match self.device.recip_sqrt_strategy() {
                    RecipSqrtStrategy::Native => kernel_loop::adadelta::<T, NativeRecipSqrt>(
                        cfg, var, accum, accum_update, lr, rho, epsilon, grad,
                    ),
                    RecipSqrtStrategy::DerivedFromReal => {
                        kernel_loop::adadelta::<T, DerivedRecipSqrt>(
                            cfg, var, accum, accum_update, lr, rho, epsilon, grad,
                        )
                    }
                }
            }
        }
        Ok(())
    }

    pub fn momentum<T: Element>(
        &self,
        var: &mut [T],
        accum: &mut [T],
        lr: Scalar<T>,
        grad: &[T],
        momentum: Scalar<T>,
        use_nesterov: bool,
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::Momentum,
            T::DTYPE,
            n,
            &[("var", var.len()), ("accum", accum.len())],
        )?;
        match route {
            Route::Vectorized => {
                vectorized::momentum(var, accum, lr, grad, momentum, use_nesterov)
            }
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                kernel_loop::momentum(cfg, var, accum, lr, grad, momentum, use_nesterov);
            }
        }
        Ok(())
    }

    pub fn keras_momentum<T: Element>(
        &self,
        var: &mut [T],
        accum: &mut [T],
        lr: Scalar<T>,
        grad: &[T],
        momentum: Scalar<T>,
        use_nesterov: bool,
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::KerasMomentum,
            T::DTYPE,
            n,
            &[("var", var.len()), ("accum", accum.len())],
        )?;
        match route {
            Route::Vectorized => {
                vectorized::keras_momentum(var, accum, lr, grad, momentum, use_nesterov)
            }
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                kernel_loop::keras_momentum(cfg, var, accum, lr, grad, momentum, use_nesterov);
            }
        }
        Ok(())
    }

    pub fn adam<T: Element>(
        &self,
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
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::Adam,
            T::DTYPE,
            n,
            &[("var", var.len()), ("m", m.len()), ("v", v.len())],
        )?;
        match route {
            Route::Vectorized => vectorized::adam(
                var, m, v, beta1_power, beta2_power, lr, beta1, beta2, epsilon, grad,
                use_nesterov,
            ),
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                match self.device.recip_sqrt_strategy() {
                    RecipSqrtStrategy::Native => kernel_loop::adam::<T, NativeRecipSqrt>(
                        cfg, var, m, v, beta1_power, beta2_power, lr, beta1, beta2, epsilon,
                        grad, use_nesterov,
                    ),
                    RecipSqrtStrategy::DerivedFromReal => {
                        kernel_loop::adam::<T, DerivedRecipSqrt>(
                            cfg, var, m, v, beta1_power, beta2_power, lr, beta1, beta2, epsilon,
                            grad, use_nesterov,
                        )
                    }
                }
            }
        }
        Ok(())
    }

    pub fn adam_amsgrad<T: RealElement>(
        &self,
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
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::AdamAmsgrad,
            T::DTYPE,
            n,
            &[
                ("var", var.len()),
                ("m", m.len()),
                ("v", v.len()),
                ("vhat", vhat.len()),
            ],
        )?;
        match route {
            Route::Vectorized => vectorized::adam_amsgrad(
                var, m, v, vhat, beta1_power, beta2_power, lr, beta1, beta2, epsilon, grad,
            ),
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                match self.device.recip_sqrt_strategy() {
                    RecipSqrtStrategy::Native => kernel_loop::adam_amsgrad::<T, NativeRecipSqrt>(
                        cfg, var, m, v, vhat, beta1_power, beta2_power, lr, beta1, beta2,
                        epsilon, grad,
                    ),
                    RecipSqrtStrategy::DerivedFromReal => {
                        kernel_loop::adam_amsgrad::<T, DerivedRecipSqrt>(
                            cfg, var, m, v, vhat, beta1_power, beta2_power, lr, beta1, beta2,
                            epsilon, grad,
                        )
                    }
                }
            }
        }
        Ok(())
    }

    pub fn adamax<T: RealElement>(
        &self,
        var: &mut [T],
        m: &mut [T],
        v: &mut [T],
        beta1_power: Scalar<T>,
        lr: Scalar<T>,
        beta1: Scalar<T>,
        beta2: Scalar<T>,
        epsilon: Scalar<T>,
        grad: &[T],
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::AdaMax,
            T::DTYPE,
            n,
            &[("var", var.len()), ("m", m.len()), ("v", v.len())],
        )?;
        match route {
            Route::Vectorized => {
                vectorized::adamax(var, m, v, beta1_power, lr, beta1, beta2, epsilon, grad)
            }
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                kernel_loop::adamax(cfg, var, m, v, beta1_power, lr, beta1, beta2, epsilon, grad);
            }
        }
        Ok(())
    }

    pub fn rmsprop<T: Element>(
        &self,
        var: &mut [T],
        ms: &mut [T],
        mom: &mut [T],
        lr: Scalar<T>,
        rho: Scalar<T>,
        momentum: Scalar<T>,
        epsilon: Scalar<T>,
        grad: &[T],
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::RmsProp,
            T::DTYPE,
            n,
            &[("var", var.len()), ("ms", ms.len()), ("mom", mom.len())],
        )?;
        match route {
            Route::Vectorized => {
                vectorized::rmsprop(var, ms, mom, lr, rho, momentum, epsilon, grad)
            }
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                match self.device.recip_sqrt_strategy() {
                    RecipSqrtStrategy::Native => kernel_loop::rmsprop::<T, NativeRecipSqrt>(
                        cfg, var, ms, mom, lr, rho, momentum, epsilon, grad,
                    ),
                    RecipSqrtStrategy::DerivedFromReal => {
                        kernel_loop::rmsprop::<T, DerivedRecipSqrt>(
                            cfg, var, ms, mom, lr, rho, momentum, epsilon, grad,
                        )
                    }
                }
            }
        }
        Ok(())
    }

    pub fn centered_rmsprop<T: Element>(
        &self,
        var: &mut [T],
        mg: &mut [T],
        ms: &mut [T],
        mom: &mut [T],
        lr: Scalar<T>,
        rho: Scalar<T>,
        momentum: Scalar<T>,
        epsilon: Scalar<T>,
        grad: &[T],
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::CenteredRmsProp,
            T::DTYPE,
            n,
            &[
                ("var", var.len()),
                ("mg", mg.len()),
                ("ms", ms.len()),
                ("mom", mom.len()),
            ],
        )?;
        match route {
            Route::Vectorized => {
                vectorized::centered_rmsprop(var, mg, ms, mom, lr, rho, momentum, epsilon, grad)
            }
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                match self.device.recip_sqrt_strategy() {
                    RecipSqrtStrategy::Native => {
                        kernel_loop::centered_rmsprop::<T, NativeRecipSqrt>(
                            cfg, var, mg, ms, mom, lr, rho, momentum, epsilon, grad,
                        )
                    }
                    RecipSqrtStrategy::DerivedFromReal => {
                        kernel_loop::centered_rmsprop::<T, DerivedRecipSqrt>(
                            cfg, var, mg, ms, mom, lr, rho, momentum, epsilon, grad,
                        )
                    }
                }
            }
        }
        Ok(())
    }

    pub fn add_sign<T: RealElement>(
        &self,
        var: &mut [T],
        m: &mut [T],
        lr: Scalar<T>,
        alpha: Scalar<T>,
        sign_decay: Scalar<T>,
        beta: Scalar<T>,
        grad: &[T],
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::AddSign,
            T::DTYPE,
            n,
            &[("var", var.len()), ("m", m.len())],
        )?;
        match route {
            Route::Vectorized => {
                vectorized::add_sign(var, m, lr, alpha, sign_decay, beta, grad)
            }
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                kernel_loop::add_sign(cfg, var, m, lr, alpha, sign_decay, beta, grad);
            }
        }
        Ok(())
    }

    pub fn power_sign<T: RealElement>(
        &self,
        var: &mut [T],
        m: &mut [T],
        lr: Scalar<T>,
        logbase: Scalar<T>,
        sign_decay: Scalar<T>,
        beta: Scalar<T>,
        grad: &[T],
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::PowerSign,
            T::DTYPE,
            n,
            &[("var", var.len()), ("m", m.len())],
        )?;
        match route {
            Route::Vectorized => {
                vectorized::power_sign(var, m, lr, logbase, sign_decay, beta, grad)
            }
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                kernel_loop::power_sign(cfg, var, m, lr, logbase, sign_decay, beta, grad);
            }
        }
        Ok(())
    }

    pub fn ftrl<T: RealElement>(
        &self,
        var: &mut [T],
        accum: &mut [T],
        linear: &mut [T],
        lr: Scalar<T>,
        l1: Scalar<T>,
        l2: Scalar<T>,
        lr_power: Scalar<T>,
        grad: &[T],
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::Ftrl,
            T::DTYPE,
            n,
            &[
                ("var", var.len()),
                ("accum", accum.len()),
                ("linear", linear.len()),
            ],
        )?;
        match route {
            Route::Vectorized => {
                vectorized::ftrl(var, accum, linear, lr, l1, l2, lr_power, grad)
            }
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                match self.device.recip_sqrt_strategy() {
                    RecipSqrtStrategy::Native => kernel_loop::ftrl::<T, NativeRecipSqrt>(
                        cfg, var, accum, linear, lr, l1, l2, lr_power, grad,
                    ),
                    RecipSqrtStrategy::DerivedFromReal => {
                        kernel_loop::ftrl::<T, DerivedRecipSqrt>(
                            cfg, var, accum, linear, lr, l1, l2, lr_power, grad,
                        )
                    }
                }
            }
        }
        Ok(())
    }

    pub fn ftrl_v2<T: RealElement>(
        &self,
        var: &mut [T],
        accum: &mut [T],
        linear: &mut [T],
        lr: Scalar<T>,
        l1: Scalar<T>,
        l2: Scalar<T>,
        l2_shrinkage: Scalar<T>,
        lr_power: Scalar<T>,
        grad: &[T],
    ) -> Result<(), KernelError> {
        let n = grad.len();
        let route = self.prepare(
            UpdateFamily::FtrlV2,
            T::DTYPE,
            n,
            &[
                ("var", var.len()),
                ("accum", accum.len()),
                ("linear", linear.len()),
            ],
        )?;
        match route {
            Route::Vectorized => {
                vectorized::ftrl_v2(var, accum, linear, lr, l1, l2, l2_shrinkage, lr_power, grad)
            }
            Route::KernelLoop => {
                let cfg = LaunchConfig::for_len(n)?;
                match self.device.recip_sqrt_strategy() {
                    RecipSqrtStrategy::Native => kernel_loop::ftrl_v2::<T, NativeRecipSqrt>(
                        cfg, var, accum, linear, lr, l1, l2, l2_shrinkage, lr_power, grad,
                    ),
                    RecipSqrtStrategy::DerivedFromReal => {
                        kernel_loop::ftrl_v2::<T, DerivedRecipSqrt>(
                            cfg, var, accum, linear, lr, l1, l2, l2_shrinkage, lr_power, grad,
                        )
                    }
                }
            }
        }
        Ok(())
    }
}
