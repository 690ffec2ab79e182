//! 엔진 호출 경계의 종단 시나리오 검증

use approx::assert_relative_eq;
use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use optim_kernels::{Device, Scalar, UpdateEngine};

#[test]
fn 경사하강_양쪽_장치_시나리오() {
    for device in [Device::Standard, Device::Restricted] {
        let engine = UpdateEngine::new(device);
        let mut var = vec![1.0f32, 2.0, 3.0];
        let grad = vec![1.0f32, 1.0, 1.0];

        engine.gradient_descent(&mut var, Scalar::new(0.1), &grad).unwrap();

        let expected = [0.9f32, 1.9, 2.9];
        for i in 0..3 {
            assert_relative_eq!(var[i], expected[i], max_relative = 1e-6);
        }
    }
}

#[test]
fn adagrad_양쪽_장치_시나리오() {
    // Standard는 벡터화, Restricted는 유도 sqrt 루프 커널을 탄다
    for device in [Device::Standard, Device::Restricted] {
        let engine = UpdateEngine::new(device);
        let mut var = vec![1.0f32];
        let mut accum = vec![0.0f32];
        let grad = vec![2.0f32];

        engine.adagrad(&mut var, &mut accum, Scalar::new(0.1), &grad, true).unwrap();

        assert_eq!(accum[0], 4.0);
        assert_relative_eq!(var[0], 0.9, max_relative = 1e-6);
    }
}

#[test]
fn adagrad_슬롯_미갱신은_누적기_보존() {
    let engine = UpdateEngine::new(Device::Standard);
    let mut var = vec![1.0f32, 1.0];
    let mut accum = vec![4.0f32, 16.0];
    let accum_before = accum.clone();
    let grad = vec![2.0f32, 2.0];

    engine.adagrad(&mut var, &mut accum, Scalar::new(0.1), &grad, false).unwrap();

    // 누적기는 비트 단위로 그대로, 파라미터는 이전 누적기로 갱신된다
    assert_eq!(accum, accum_before);
    assert_relative_eq!(var[0], 0.9, max_relative = 1e-6);
    assert_relative_eq!(var[1], 0.95, max_relative = 1e-6);
}

#[test]
fn adam_시나리오_참조값() {
    let engine = UpdateEngine::new(Device::Standard);
    let mut var = vec![1.0f32];
    let mut m = vec![0.0f32];
    let mut v = vec![0.0f32];
    let grad = vec![1.0f32];

    engine
        .adam(
            &mut var,
            &mut m,
            &mut v,
            Scalar::new(0.9),
            Scalar::new(0.999),
            Scalar::new(0.001),
            Scalar::new(0.9),
            Scalar::new(0.999),
            Scalar::new(1e-8),
            &grad,
            false,
        )
        .unwrap();

    let m_ref = (1.0 - 0.9f32 as f64) * 1.0;
    let v_ref = (1.0 - 0.999f32 as f64) * 1.0;
    let alpha = 0.001f32 as f64 * (1.0 - 0.999f32 as f64).sqrt() / (1.0 - 0.9f32 as f64);
    let var_ref = 1.0 - alpha * m_ref / (1e-8f32 as f64 + v_ref.sqrt());

    assert_relative_eq!(m[0], m_ref as f32, max_relative = 1e-6);
    assert_relative_eq!(v[0], v_ref as f32, max_relative = 1e-6);
    assert_relative_eq!(var[0], var_ref as f32, max_relative = 1e-6);
}

#[test]
fn 같은_입력은_같은_결과() {
    // 호출 간 숨은 상태가 없어야 한다
    let engine = UpdateEngine::new(Device::Standard);
    let mut rng = StdRng::seed_from_u64(77);
    let n = 513;
    let grad: Vec<f32> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let var0: Vec<f32> = (0..n).map(|_| rng.gen_range(-2.0..2.0)).collect();
    let m0: Vec<f32> = (0..n).map(|_| rng.gen_range(-0.5..0.5)).collect();
    let v0: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();

    let run = |engine: &UpdateEngine| {
        let mut var = var0.clone();
        let mut m = m0.clone();
        let mut v = v0.clone();
        engine
            .adam(
                &mut var,
                &mut m,
                &mut v,
                Scalar::new(0.9),
                Scalar::new(0.999),
                Scalar::new(0.001),
                Scalar::new(0.9),
                Scalar::new(0.999),
                Scalar::new(1e-8),
                &grad,
                true,
            )
            .unwrap();
        (var, m, v)
    };

    let (var_a, m_a, v_a) = run(&engine);
    let (var_b, m_b, v_b) = run(&engine);
    assert_eq!(var_a, var_b);
    assert_eq!(m_a, m_b);
    assert_eq!(v_a, v_b);
}

#[test]
fn 복소_adagrad_장치간_일치() {
    let mut rng = StdRng::seed_from_u64(99);
    let n = 800;
    let grad: Vec<Complex<f32>> = (0..n)
        .map(|_| Complex::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let var0: Vec<Complex<f32>> = (0..n)
        .map(|_| Complex::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let accum0: Vec<Complex<f32>> =
        (0..n).map(|_| Complex::new(rng.gen_range(0.5..1.0), 0.0)).collect();
    let lr = Scalar::new(Complex::new(0.05f32, 0.0));

    let run = |device: Device| {
        let engine = UpdateEngine::new(device);
        let mut var = var0.clone();
        let mut accum = accum0.clone();
        engine.adagrad(&mut var, &mut accum, lr, &grad, true).unwrap();
        (var, accum)
    };

    let (var_std, accum_std) = run(Device::Standard);
    let (var_res, accum_res) = run(Device::Restricted);

    // 누적기 갱신은 sqrt와 무관해 완전히 같다
    assert_eq!(accum_std, accum_res);
    // 파라미터는 네이티브/유도 sqrt 차이만큼만 다르다
    let mse: f32 = var_std
        .iter()
        .zip(&var_res)
        .map(|(a, b)| (a - b).norm_sqr())
        .sum::<f32>()
        / n as f32;
    assert!(mse.sqrt() < 5e-4, "RMSE = {:e}", mse.sqrt());
}

#[test]
fn 전_계열_한_스텝_유한성() {
    // 모든 계열을 실수 f32로 한 번씩 구동해 결과가 유한한지 확인한다
    let mut rng = StdRng::seed_from_u64(123);
    let n = 320;
    let grad: Vec<f32> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let pos: Vec<f32> = (0..n).map(|_| rng.gen_range(0.5..1.0)).collect();
    let small: Vec<f32> = (0..n).map(|_| rng.gen_range(-0.5..0.5)).collect();
    let vars: Vec<f32> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let finite = |v: &[f32]| v.iter().all(|x| x.is_finite());

    for device in [Device::Standard, Device::Restricted] {
        let engine = UpdateEngine::new(device);

        let mut var = vars.clone();
        engine.gradient_descent(&mut var, Scalar::new(0.01), &grad).unwrap();
        assert!(finite(&var));

        let (mut var, mut accum) = (vars.clone(), pos.clone());
        engine.adagrad(&mut var, &mut accum, Scalar::new(0.01), &grad, true).unwrap();
        assert!(finite(&var) && finite(&accum));

        let (mut var, mut accum) = (vars.clone(), pos.clone());
        engine
            .adagrad_v2(&mut var, &mut accum, Scalar::new(0.01), Scalar::new(1e-7), &grad, true)
            .unwrap();
        assert!(finite(&var));

        let (mut var, mut accum, mut au) = (vars.clone(), pos.clone(), pos.clone());
        engine
            .adadelta(
                &mut var,
                &mut accum,
                &mut au,
                Scalar::new(0.5),
                Scalar::new(0.95),
                Scalar::new(1e-6),
                &grad,
            )
            .unwrap();
        assert!(finite(&var) && finite(&au));

        let (mut var, mut accum) = (vars.clone(), small.clone());
        engine
            .momentum(&mut var, &mut accum, Scalar::new(0.01), &grad, Scalar::new(0.9), true)
            .unwrap();
        assert!(finite(&var));

        let (mut var, mut accum) = (vars.clone(), small.clone());
        engine
            .keras_momentum(&mut var, &mut accum, Scalar::new(0.01), &grad, Scalar::new(0.9), false)
            .unwrap();
        assert!(finite(&var));

        let (mut var, mut m, mut v) = (vars.clone(), small.clone(), pos.clone());
        engine
            .adam(
                &mut var,
                &mut m,
                &mut v,
                Scalar::new(0.9),
                Scalar::new(0.999),
                Scalar::new(0.001),
                Scalar::new(0.9),
                Scalar::new(0.999),
                Scalar::new(1e-8),
                &grad,
                false,
            )
            .unwrap();
        assert!(finite(&var) && finite(&m) && finite(&v));

        let (mut var, mut m, mut v, mut vh) =
            (vars.clone(), small.clone(), pos.clone(), pos.clone());
        engine
            .adam_amsgrad(
                &mut var,
                &mut m,
                &mut v,
                &mut vh,
                Scalar::new(0.9),
                Scalar::new(0.999),
                Scalar::new(0.001),
                Scalar::new(0.9),
                Scalar::new(0.999),
                Scalar::new(1e-8),
                &grad,
            )
            .unwrap();
        assert!(finite(&var) && finite(&vh));

        let (mut var, mut m, mut v) = (vars.clone(), small.clone(), pos.clone());
        engine
            .adamax(
                &mut var,
                &mut m,
                &mut v,
                Scalar::new(0.9),
                Scalar::new(0.001),
                Scalar::new(0.9),
                Scalar::new(0.999),
                Scalar::new(1e-8),
                &grad,
            )
            .unwrap();
        assert!(finite(&var) && finite(&v));

        let (mut var, mut ms, mut mom) = (vars.clone(), pos.clone(), small.clone());
        engine
            .rmsprop(
                &mut var,
                &mut ms,
                &mut mom,
                Scalar::new(0.01),
                Scalar::new(0.9),
                Scalar::new(0.5),
                Scalar::new(1e-6),
                &grad,
            )
            .unwrap();
        assert!(finite(&var) && finite(&mom));

        let (mut var, mut mg, mut ms, mut mom) =
            (vars.clone(), small.clone(), pos.clone(), small.clone());
        engine
            .centered_rmsprop(
                &mut var,
                &mut mg,
                &mut ms,
                &mut mom,
                Scalar::new(0.01),
                Scalar::new(0.9),
                Scalar::new(0.5),
                Scalar::new(1e-6),
                &grad,
            )
            .unwrap();
        assert!(finite(&var) && finite(&mg));

        let (mut var, mut m) = (vars.clone(), small.clone());
        engine
            .add_sign(
                &mut var,
                &mut m,
                Scalar::new(0.01),
                Scalar::new(1.0),
                Scalar::new(0.5),
                Scalar::new(0.9),
                &grad,
            )
            .unwrap();
        assert!(finite(&var));

        let (mut var, mut m) = (vars.clone(), small.clone());
        engine
            .power_sign(
                &mut var,
                &mut m,
                Scalar::new(0.01),
                Scalar::new(std::f32::consts::LN_2),
                Scalar::new(0.5),
                Scalar::new(0.9),
                &grad,
            )
            .unwrap();
        assert!(finite(&var));

        let (mut var, mut accum, mut lin) = (vars.clone(), pos.clone(), small.clone());
        engine
            .ftrl(
                &mut var,
                &mut accum,
                &mut lin,
                Scalar::new(0.1),
                Scalar::new(0.01),
                Scalar::new(0.01),
                Scalar::new(-0.5),
                &grad,
            )
            .unwrap();
        assert!(finite(&var) && finite(&lin));

        let (mut var, mut accum, mut lin) = (vars.clone(), pos.clone(), small.clone());
        engine
            .ftrl_v2(
                &mut var,
                &mut accum,
                &mut lin,
                Scalar::new(0.1),
                Scalar::new(0.01),
                Scalar::new(0.01),
                Scalar::new(0.1),
                Scalar::new(-0.5),
                &grad,
            )
            .unwrap();
        assert!(finite(&var));
    }
}
