use std::convert::Infallible;

use approx::assert_relative_eq;
use nalgebra::{DMatrix, dmatrix, dvector};

use zoh_solvers::transient::rk4;

use crate::{Error, ErrorKind, Operand};

use super::{discretize_a, discretize_ab, discretize_aq, discretize_r};

/// Integrates `∫₀^dt e^(Aτ) Q e^(Aᵀτ) dτ` with one RK4 step.
fn integrated_q(a: &DMatrix<f64>, q: &DMatrix<f64>, dt: f64) -> DMatrix<f64> {
    let n = a.nrows();
    rk4::step(
        |t, _x: &DMatrix<f64>| (a * t).exp() * q * (a.transpose() * t).exp(),
        0.0,
        &DMatrix::zeros(n, n),
        dt,
    )
}

/// Integrates the Lyapunov equation `dP/dt = AP + PAᵀ + Q` from `P(0) = 0`.
fn lyapunov_q(a: &DMatrix<f64>, q: &DMatrix<f64>, dt: f64, steps: usize) -> DMatrix<f64> {
    let n = a.nrows();

    #[allow(clippy::cast_precision_loss)]
    let h = dt / steps as f64;

    let solution = rk4::solve_unobserved(
        |_t, p: &DMatrix<f64>| Ok::<_, Infallible>(a * p + p * a.transpose() + q),
        0.0,
        DMatrix::zeros(n, n),
        h,
        steps,
    )
    .expect("infallible field");

    solution.last().expect("history is never empty").state.clone()
}

fn assert_positive_semidefinite(m: &DMatrix<f64>) {
    let eigenvalues = m.symmetric_eigenvalues();
    assert!(
        eigenvalues.iter().all(|&v| v >= 0.0),
        "expected nonnegative eigenvalues, got {eigenvalues}"
    );
}

#[test]
fn double_integrator_state_transition() {
    let a = dmatrix![0.0, 1.0; 0.0, 0.0];
    let x0 = dvector![1.0, 1.0];

    let a_d = discretize_a(&a, 1.0).expect("valid operands");
    let x1 = a_d * x0;

    // Position advances by velocity, velocity is unchanged.
    assert_relative_eq!(x1, dvector![2.0, 1.0], epsilon = 1e-12);
}

#[test]
fn double_integrator_with_input() {
    let a = dmatrix![0.0, 1.0; 0.0, 0.0];
    let b = dmatrix![0.0; 1.0];
    let x0 = dvector![1.0, 1.0];
    let u = dvector![1.0];

    let (a_d, b_d) = discretize_ab(&a, &b, 1.0).expect("valid operands");
    let x1 = a_d * x0 + b_d * u;

    // pos = vel = accel = 1.
    assert_relative_eq!(x1, dvector![1.0 + 1.0 + 0.5, 1.0 + 1.0], epsilon = 1e-12);
}

#[test]
fn first_order_lag_input_matrix() {
    // dx/dt = -2x + u  =>  A_d = e^(-2dt), B_d = (1 - e^(-2dt)) / 2
    let (a_d, b_d) = discretize_ab(&dmatrix![-2.0], &dmatrix![1.0], 0.5).expect("valid");

    assert_relative_eq!(a_d[(0, 0)], (-1.0_f64).exp(), epsilon = 1e-15);
    assert_relative_eq!(b_d[(0, 0)], -(-1.0_f64).exp_m1() / 2.0, epsilon = 1e-15);
}

#[test]
fn ab_handles_multiple_inputs() {
    let a = dmatrix![0.0, 1.0; 0.0, 0.0];
    let b = dmatrix![1.0, 0.0; 0.0, 1.0];

    let (a_d, b_d) = discretize_ab(&a, &b, 2.0).expect("valid operands");

    assert_relative_eq!(a_d, dmatrix![1.0, 2.0; 0.0, 1.0], epsilon = 1e-12);
    assert_relative_eq!(b_d, dmatrix![2.0, 2.0; 0.0, 2.0], epsilon = 1e-12);
}

#[test]
fn slow_model_q_matches_quadrature() {
    let a = dmatrix![0.0, 1.0; 0.0, 0.0];
    let q = dmatrix![1.0, 0.0; 0.0, 1.0];
    let dt = 1.0;

    let (_, q_d) = discretize_aq(&a, &q, dt).expect("valid operands");
    let q_integrated = integrated_q(&a, &q, dt);

    assert!(
        (&q_integrated - &q_d).norm() < 1e-10,
        "expected these to be nearly equal:\nq_d: {q_d}\nintegrated: {q_integrated}"
    );
}

#[test]
fn fast_model_q_matches_quadrature() {
    let a = dmatrix![0.0, 1.0; 0.0, -1406.29];
    let q = dmatrix![0.0025, 0.0; 0.0, 1.0];
    let dt = 0.005;

    let (_, q_d) = discretize_aq(&a, &q, dt).expect("valid operands");
    let q_integrated = integrated_q(&a, &q, dt);

    assert!(
        (&q_integrated - &q_d).norm() < 1e-3,
        "expected these to be nearly equal:\nq_d: {q_d}\nintegrated: {q_integrated}"
    );
}

#[test]
fn slow_model_is_consistent_and_positive_semidefinite() {
    let a = dmatrix![0.0, 1.0; 0.0, 0.0];
    let q = dmatrix![1.0, 0.0; 0.0, 1.0];
    let dt = 1.0;
    assert_positive_semidefinite(&q);

    let a_d = discretize_a(&a, dt).expect("valid operands");
    let (a_d_van_loan, q_d) = discretize_aq(&a, &q, dt).expect("valid operands");

    assert!((&a_d - &a_d_van_loan).norm() < 1e-10);
    assert!((integrated_q(&a, &q, dt) - &q_d).norm() < 1e-10);
    assert_relative_eq!(q_d, dmatrix![4.0 / 3.0, 0.5; 0.5, 1.0], epsilon = 1e-12);
    assert_positive_semidefinite(&q_d);
}

#[test]
fn fast_model_is_consistent_and_positive_semidefinite() {
    let a = dmatrix![0.0, 1.0; 0.0, -1500.0];
    let q = dmatrix![0.0025, 0.0; 0.0, 1.0];
    let dt = 0.005;
    assert_positive_semidefinite(&q);

    let a_d = discretize_a(&a, dt).expect("valid operands");
    let (a_d_van_loan, q_d) = discretize_aq(&a, &q, dt).expect("valid operands");

    assert!((&a_d - &a_d_van_loan).norm() < 1e-10);
    assert!((integrated_q(&a, &q, dt) - &q_d).norm() < 1e-3);
    assert_positive_semidefinite(&q_d);
}

#[test]
fn fast_model_with_long_period_is_non_convergence() {
    let a = dmatrix![0.0, 1.0; 0.0, -1406.29];
    let q = dmatrix![0.0025, 0.0; 0.0, 1.0];

    for dt in [0.035, 0.05] {
        let err = discretize_aq(&a, &q, dt).expect_err("cancellation leaves no digits");

        assert_eq!(err, Error::NonConvergence { size: 4 });
        assert_eq!(err.kind(), ErrorKind::NumericalNonConvergence);

        // The state transition alone is unaffected.
        let a_d = discretize_a(&a, dt).expect("valid operands");
        assert_relative_eq!(a_d[(1, 1)], (-1406.29 * dt).exp(), max_relative = 1e-12);
    }
}

#[test]
fn splitting_the_period_recovers_fast_model_covariance() {
    let a = dmatrix![0.0, 1.0; 0.0, -1406.29];
    let q = dmatrix![0.0025, 0.0; 0.0, 1.0];
    let (dt, parts) = (0.035, 7);

    #[allow(clippy::cast_precision_loss)]
    let h = dt / parts as f64;

    let (a_h, q_h) = discretize_aq(&a, &q, h).expect("short sub-step");
    let q_d = (0..parts).fold(DMatrix::zeros(2, 2), |p, _| {
        &a_h * p * a_h.transpose() + &q_h
    });
    let reference = lyapunov_q(&a, &q, dt, 35_000);

    assert!(
        (&q_d - &reference).norm() < 1e-6 * reference.norm(),
        "expected these to be nearly equal:\nq_d: {q_d}\nreference: {reference}"
    );
    assert!(q_d.symmetric_eigenvalues().min() > 0.0);
}

#[test]
fn q_d_is_exactly_symmetric_for_non_normal_dynamics() {
    let a = dmatrix![
        -0.3, 2.0, 0.0;
        0.0, -1.1, 5.0;
        0.7, 0.0, -4.0
    ];
    let q = dmatrix![
        2.0, 0.3, 0.1;
        0.3, 1.0, 0.2;
        0.1, 0.2, 0.5
    ];

    let (_, q_d) = discretize_aq(&a, &q, 0.37).expect("valid operands");

    assert_eq!(q_d, q_d.transpose());
}

#[test]
fn zero_process_noise_gives_zero_q_d() {
    let a = dmatrix![0.0, 1.0; -4.0, -0.5];

    let (_, q_d) = discretize_aq(&a, &DMatrix::zeros(2, 2), 0.1).expect("valid operands");

    assert_relative_eq!(q_d, DMatrix::zeros(2, 2), epsilon = 1e-15);
}

#[test]
fn measurement_noise_scales_inversely_with_period() {
    let r = dmatrix![2.0, 0.0; 0.0, 1.0];

    let r_d = discretize_r(&r, 0.5).expect("valid operands");

    assert!((dmatrix![4.0, 0.0; 0.0, 2.0] - &r_d).norm() < 1e-10);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let a = dmatrix![0.1, 1.0; -3.0, -0.7];
    let q = dmatrix![1.0, 0.2; 0.2, 0.5];

    assert_eq!(discretize_a(&a, 0.02), discretize_a(&a, 0.02));
    assert_eq!(discretize_aq(&a, &q, 0.02), discretize_aq(&a, &q, 0.02));
}

#[test]
fn operands_are_not_modified() {
    let a = dmatrix![0.0, 1.0; -2.0, -3.0];
    let b = dmatrix![0.0; 1.0];
    let q = dmatrix![1.0, 0.0; 0.0, 2.0];
    let r = dmatrix![0.5];
    let (a0, b0, q0, r0) = (a.clone(), b.clone(), q.clone(), r.clone());

    discretize_a(&a, 0.1).expect("valid");
    discretize_ab(&a, &b, 0.1).expect("valid");
    discretize_aq(&a, &q, 0.1).expect("valid");
    discretize_r(&r, 0.1).expect("valid");

    assert_eq!((a, b, q, r), (a0, b0, q0, r0));
}

#[test]
fn rejects_non_square_a() {
    let a = DMatrix::zeros(2, 3);

    let err = discretize_a(&a, 1.0).expect_err("A is 2x3");

    assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
    assert_eq!(
        err,
        Error::NotSquare {
            operand: Operand::A,
            rows: 2,
            cols: 3
        }
    );
    assert_eq!(
        discretize_aq(&a, &DMatrix::identity(2, 2), 1.0).map_err(|e| e.kind()),
        Err(ErrorKind::DimensionMismatch)
    );
}

#[test]
fn rejects_mismatched_b_and_q() {
    let a = DMatrix::identity(2, 2);

    let err = discretize_ab(&a, &dmatrix![1.0; 2.0; 3.0], 1.0).expect_err("B has 3 rows");
    assert_eq!(
        err,
        Error::ShapeMismatch {
            operand: Operand::B,
            expected: (2, 1),
            actual: (3, 1)
        }
    );

    let err = discretize_aq(&a, &DMatrix::identity(3, 3), 1.0).expect_err("Q is 3x3");
    assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
}

#[test]
fn rejects_non_square_r() {
    let err = discretize_r(&dmatrix![1.0, 2.0], 1.0).expect_err("R is 1x2");

    assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
}

#[test]
fn rejects_non_positive_sample_period() {
    let a = DMatrix::identity(2, 2);
    let q = DMatrix::identity(2, 2);

    for dt in [0.0, -0.01, f64::NAN, f64::INFINITY] {
        assert_eq!(
            discretize_a(&a, dt).map_err(|e| e.kind()),
            Err(ErrorKind::InvalidArgument)
        );
        assert_eq!(
            discretize_ab(&a, &q, dt).map_err(|e| e.kind()),
            Err(ErrorKind::InvalidArgument)
        );
        assert_eq!(
            discretize_aq(&a, &q, dt).map_err(|e| e.kind()),
            Err(ErrorKind::InvalidArgument)
        );
        assert_eq!(
            discretize_r(&q, dt).map_err(|e| e.kind()),
            Err(ErrorKind::InvalidArgument)
        );
    }
}

#[test]
fn rejects_non_finite_operands() {
    let a = dmatrix![0.0, f64::NAN; 0.0, 0.0];

    assert_eq!(
        discretize_a(&a, 1.0),
        Err(Error::NonFinite { operand: Operand::A })
    );
    assert_eq!(
        discretize_aq(&DMatrix::identity(2, 2), &(a.clone() * 0.0), 1.0),
        Err(Error::NonFinite { operand: Operand::Q })
    );
}

#[test]
fn overflowing_exponential_is_non_convergence() {
    let err = discretize_a(&dmatrix![1000.0], 1.0).expect_err("e^1000 overflows");

    assert_eq!(err, Error::NonConvergence { size: 1 });
    assert_eq!(err.kind(), ErrorKind::NumericalNonConvergence);
}
