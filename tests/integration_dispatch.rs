//! Integration tests for the uniform dispatch surface.
//!
//! Purpose
//! -------
//! - Drive every algorithm through its public `iter2_*` entry point (or the
//!   tag-based [`iter2`]) with real operators and proximal maps, the way a
//!   reconstruction pipeline would.
//! - Check the data-scale guard end to end: degenerate adjoint data skips
//!   the run and leaves the image buffer exactly as it was.
//! - Check the arity contracts: misplaced arguments panic, ignored ones do
//!   not change the result.
//!
//! Coverage
//! --------
//! - `iter::iter2`: conjugate gradient, IST, FISTA, ADMM, POCS and direct
//!   calls, plus dispatch by tag.
//! - `iter::conf`: algorithm names, per-tag defaults.
//! - `linops`: identity and sampling operators behind `NormalEq`.
//! - `prox`: soft thresholding and both projections.
//!
//! Exclusions
//! ----------
//! - Kernel internals such as the hogwild schedule, continuation or the ADMM
//!   history; those are covered by unit tests next to the kernels.
//! - Python bindings and CFL files.
use approx::assert_relative_eq;
use ndarray::{Array, IxDyn};
use num_complex::Complex64;
use recon_iter::{
    iter::{
        AdmmConf, AlgoTag, ConjGradConf, Degeneracy, FistaConf, IstConf, Iter2Args,
        IterCallConf, IterConf, IterReport, IterStatus, PocsConf, iter2, iter2_admm,
        iter2_call_iter, iter2_conjgrad, iter2_fista, iter2_ist, iter2_pocs,
    },
    linops::{IdentityOp, LinearOperator, NormalEq, Operator, SamplingOp, as_real},
    prox::{ProjData, ProjSupport, ProxOperator, SoftThresh},
};

/// Identity as a normal-equation operator on four interleaved values.
fn identity(dst: &mut [f64], src: &[f64]) {
    dst.copy_from_slice(src);
}

const ADJ: [f64; 4] = [3.0, -1.0, 0.5, 2.0];

fn thresh_conf(tag: AlgoTag) -> IterConf {
    match tag {
        AlgoTag::Ist => IterConf::Ist(IstConf::new(500, 0.5, 1.0, false, 1e-8).expect("valid")),
        AlgoTag::Fista => {
            IterConf::Fista(FistaConf::new(500, 0.5, 1.0, false, 1e-8).expect("valid"))
        }
        other => panic!("no thresholding configuration for {other}"),
    }
}

#[test]
// Purpose
// -------
// Every data-driven algorithm skips a run whose adjoint data is all zeros.
//
// Given
// -----
// - A zero adjoint and an image buffer holding a sentinel pattern.
// - Conjugate gradient, IST, FISTA and ADMM with their defaults.
//
// Expect
// ------
// - Status `Skipped(Empty)`, zero iterations, image unchanged.
fn zero_adjoint_skips_every_data_driven_algorithm() {
    // Arrange
    let zeros = [0.0; 4];
    let thresh = SoftThresh::new(0.1);
    let prox: [&dyn ProxOperator; 1] = [&thresh];
    let base = Iter2Args::new().with_normaleq_op(&identity).with_image_adj(&zeros);
    let runs: [(IterConf, Iter2Args<'_>); 4] = [
        (IterConf::ConjGrad(ConjGradConf::default()), base),
        (IterConf::Ist(IstConf::default()), base.with_prox_ops(&prox)),
        (IterConf::Fista(FistaConf::default()), base.with_prox_ops(&prox)),
        (IterConf::Admm(AdmmConf::default()), base),
    ];

    for (conf, args) in &runs {
        let mut image = [7.0, -7.0, 1.5, 0.25];

        // Act
        let report = iter2(conf, args, &mut image, None).expect("skips are not errors");

        // Assert
        assert_eq!(report, IterReport::skipped(Degeneracy::Empty), "{}", conf.tag());
        assert_eq!(image, [7.0, -7.0, 1.5, 0.25], "{}", conf.tag());
    }
}

#[test]
// Purpose
// -------
// A NaN in the adjoint data is reported as corrupted and nothing runs.
fn nan_adjoint_is_reported_as_corrupted() {
    let adj = [1.0, f64::NAN, 0.0, 0.0];
    let args = Iter2Args::new().with_normaleq_op(&identity).with_image_adj(&adj);
    let mut image = [0.0; 4];

    let report =
        iter2_conjgrad(&IterConf::ConjGrad(ConjGradConf::default()), &args, &mut image, None)
            .expect("skips are not errors");

    assert_eq!(report.status, IterStatus::Skipped(Degeneracy::Corrupted));
    assert!(!report.ran());
    assert_eq!(image, [0.0; 4]);
}

#[test]
// Purpose
// -------
// NaN and infinite adjoint data skip IST, FISTA and ADMM as corrupted,
// leaving the image buffer untouched.
//
// Given
// -----
// - Adjoints holding a NaN and an infinity.
// - IST and FISTA with one zero-weight threshold, ADMM without transforms.
//
// Expect
// ------
// - Status `Skipped(Corrupted)`, zero iterations, image unchanged.
fn non_finite_adjoint_skips_thresholding_and_admm() {
    // Arrange
    let thresh = SoftThresh::new(0.0);
    let prox: [&dyn ProxOperator; 1] = [&thresh];
    let nan_adj = [1.0, f64::NAN, 0.0, 0.0];
    let inf_adj = [f64::INFINITY, 0.0, 2.0, 0.0];

    for adj in [&nan_adj, &inf_adj] {
        let base = Iter2Args::new().with_normaleq_op(&identity).with_image_adj(adj);
        let runs: [(IterConf, Iter2Args<'_>); 3] = [
            (thresh_conf(AlgoTag::Ist), base.with_prox_ops(&prox)),
            (thresh_conf(AlgoTag::Fista), base.with_prox_ops(&prox)),
            (IterConf::Admm(AdmmConf::default()), base),
        ];

        for (conf, args) in &runs {
            let mut image = [0.5, 0.25, -1.0, 4.0];

            // Act
            let report = iter2(conf, args, &mut image, None).expect("skips are not errors");

            // Assert
            assert_eq!(report, IterReport::skipped(Degeneracy::Corrupted), "{}", conf.tag());
            assert_eq!(image, [0.5, 0.25, -1.0, 4.0], "{}", conf.tag());
        }
    }
}

#[test]
// Purpose
// -------
// Conjugate gradient with the identity solves `x = image_adj`.
//
// Given
// -----
// - Identity normal operator, zero tolerance, default iteration cap.
//
// Expect
// ------
// - Converged; image equals the adjoint data.
fn conjgrad_with_identity_recovers_adjoint() {
    // Arrange
    let args = Iter2Args::new().with_normaleq_op(&identity).with_image_adj(&ADJ);
    let mut image = [0.0; 4];

    // Act
    let report =
        iter2_conjgrad(&IterConf::ConjGrad(ConjGradConf::default()), &args, &mut image, None)
            .expect("conjugate gradient should succeed");

    // Assert
    assert_eq!(report.status, IterStatus::Converged);
    for (x, b) in image.iter().zip(&ADJ) {
        assert_relative_eq!(x, b, epsilon = 1e-10);
    }
}

#[test]
// Purpose
// -------
// Conjugate gradient on a rank-deficient sampling operator converges to the
// minimum-norm solution: sampled entries match the data, the rest stay zero.
//
// Given
// -----
// - Three complex elements, pattern sampling elements 0 and 2.
// - Adjoint data `P ⊙ y`, cold start, default configuration.
//
// Expect
// ------
// - Converged; sampled entries equal `y`, element 1 is exactly zero.
fn conjgrad_on_singular_sampling_recovers_sampled_entries() {
    // Arrange
    let pattern = Array::from_shape_vec(
        IxDyn(&[3]),
        vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
    )
    .expect("pattern shape");
    let sampling = SamplingOp::new(&[3], &[3], pattern).expect("valid sampling operator");
    let normal = NormalEq::new(sampling);
    let normal_op: &dyn Operator = &normal;
    let adj = [2.0, -1.0, 0.0, 0.0, 0.5, 3.0];
    let args = Iter2Args::new().with_normaleq_op(normal_op).with_image_adj(&adj);
    let mut image = [0.0; 6];

    // Act
    let report =
        iter2_conjgrad(&IterConf::ConjGrad(ConjGradConf::default()), &args, &mut image, None)
            .expect("conjugate gradient should succeed");

    // Assert
    assert_eq!(report.status, IterStatus::Converged);
    for k in [0, 1, 4, 5] {
        assert_relative_eq!(image[k], adj[k], epsilon = 1e-10);
    }
    assert_eq!(&image[2..4], &[0.0, 0.0]);
}

#[test]
// Purpose
// -------
// With a zero threshold both thresholding algorithms reduce to gradient
// descent on `½‖x − b‖²` and reach the adjoint data within tolerance.
//
// Given
// -----
// - Identity normal operator, `SoftThresh(0)`, step 0.5, tol 1e-8.
//
// Expect
// ------
// - Converged before the cap; image within 1e-6 of the adjoint data.
fn thresholding_without_penalty_recovers_adjoint() {
    let thresh = SoftThresh::new(0.0);
    let prox: [&dyn ProxOperator; 1] = [&thresh];
    let args =
        Iter2Args::new().with_normaleq_op(&identity).with_prox_ops(&prox).with_image_adj(&ADJ);

    for (tag, run) in [
        (AlgoTag::Ist, iter2_ist as recon_iter::iter::Iter2Fn),
        (AlgoTag::Fista, iter2_fista as recon_iter::iter::Iter2Fn),
    ] {
        let mut image = [0.0; 4];

        let report = run(&thresh_conf(tag), &args, &mut image, None).expect("run succeeds");

        assert_eq!(report.status, IterStatus::Converged, "{tag}");
        assert!(report.iterations < 500, "{tag}");
        for (x, b) in image.iter().zip(&ADJ) {
            assert_relative_eq!(x, b, epsilon = 1e-6);
        }
    }
}

#[test]
// Purpose
// -------
// IST and FISTA ignore a transform list supplied alongside their single
// proximal operator.
//
// Given
// -----
// - One identity transform, `SoftThresh(0)`, identity normal operator.
//
// Expect
// ------
// - Same outcome as without transforms: converged to the adjoint data.
fn thresholding_ignores_transform_operators() {
    let g = IdentityOp::new(&[2]);
    let thresh = SoftThresh::new(0.0);
    let ops: [&dyn LinearOperator; 1] = [&g];
    let prox: [&dyn ProxOperator; 1] = [&thresh];
    let args = Iter2Args::new()
        .with_normaleq_op(&identity)
        .with_prox_ops(&prox)
        .with_ops(&ops)
        .with_image_adj(&ADJ);

    for tag in [AlgoTag::Ist, AlgoTag::Fista] {
        let mut image = [0.0; 4];

        let report = iter2(&thresh_conf(tag), &args, &mut image, None).expect("run succeeds");

        assert_eq!(report.status, IterStatus::Converged, "{tag}");
        for (x, b) in image.iter().zip(&ADJ) {
            assert_relative_eq!(x, b, epsilon = 1e-6);
        }
    }
}

#[test]
// Purpose
// -------
// ADMM without regularization terms solves `A x = b` directly and stops
// once the x-update settles instead of running to the cap.
//
// Given
// -----
// - Identity normal operator, no transforms or proximal operators.
// - Default ADMM settings (50 iterations).
//
// Expect
// ------
// - `converged(2)`; image equals the adjoint data.
fn admm_without_regularizers_stops_early() {
    // Arrange
    let args = Iter2Args::new().with_normaleq_op(&identity).with_image_adj(&ADJ);
    let mut image = [0.0; 4];

    // Act
    let report = iter2_admm(&IterConf::Admm(AdmmConf::default()), &args, &mut image, None)
        .expect("admm succeeds");

    // Assert
    assert_eq!(report, IterReport::converged(2));
    for (x, b) in image.iter().zip(&ADJ) {
        assert_relative_eq!(x, b, epsilon = 1e-12);
    }
}

#[test]
// Purpose
// -------
// POCS alternates support and data-consistency projections.
//
// Given
// -----
// - Two complex elements; support keeps element 0 only; data fixes
//   element 0 to 2 − i.
// - Start image of ones.
//
// Expect
// ------
// - Element 0 equals the data, element 1 is zero; the run always reaches
//   the iteration cap.
fn pocs_projects_onto_support_and_data() {
    // Arrange
    let support = ProjSupport::new(vec![true, false]);
    let data = ProjData::new(
        vec![true, false],
        vec![Complex64::new(2.0, -1.0), Complex64::new(0.0, 0.0)],
    );
    let projections: [&dyn ProxOperator; 2] = [&support, &data];
    let args = Iter2Args::new().with_prox_ops(&projections);
    let mut image = [1.0; 4];

    // Act
    let conf = IterConf::Pocs(PocsConf::new(5).expect("valid"));
    let report = iter2_pocs(&conf, &args, &mut image, None).expect("pocs succeeds");

    // Assert
    assert_eq!(report, IterReport::max_iter_reached(5));
    assert_eq!(image, [2.0, -1.0, 0.0, 0.0]);
}

#[test]
#[should_panic(expected = "pocs takes no adjoint data")]
// Purpose
// -------
// POCS has no data term, so handing it adjoint data is a wiring defect.
fn pocs_rejects_adjoint_data() {
    let args = Iter2Args::new().with_image_adj(&ADJ);
    let mut image = [0.0; 4];
    let _ = iter2_pocs(&IterConf::Pocs(PocsConf::default()), &args, &mut image, None);
}

#[test]
#[should_panic(expected = "pocs takes no transform operators")]
// Purpose
// -------
// POCS works on projections alone; even an empty transform list is a
// wiring defect.
fn pocs_rejects_transform_operators() {
    let ops: [&dyn LinearOperator; 0] = [];
    let args = Iter2Args::new().with_ops(&ops);
    let mut image = [0.0; 4];
    let _ = iter2_pocs(&IterConf::Pocs(PocsConf::default()), &args, &mut image, None);
}

#[test]
// Purpose
// -------
// A direct call receives the single proximal operator and the adjoint data,
// and its report is returned unchanged.
//
// Given
// -----
// - A callback applying the forwarded prox with `mu = 1` to the adjoint.
// - `SoftThresh(1)` and adjoint `(3 + 4i, 0)`.
//
// Expect
// ------
// - Image `(2.4 + 3.2i, 0)`, report `converged(1)`.
fn direct_call_forwards_prox_and_data() {
    // Arrange
    let conf = IterConf::Call(IterCallConf::new(|call, image, _| {
        let adj = call.image_adj.expect("adjoint forwarded");
        match call.prox_op {
            Some(prox) => prox.apply(1.0, image, adj),
            None => image.copy_from_slice(adj),
        }
        Ok(IterReport::converged(1))
    }));
    let thresh = SoftThresh::new(1.0);
    let prox: [&dyn ProxOperator; 1] = [&thresh];
    let adj = [3.0, 4.0, 0.0, 0.0];
    let args = Iter2Args::new().with_prox_ops(&prox).with_image_adj(&adj);
    let mut image = [0.0; 4];

    // Act
    let report = iter2_call_iter(&conf, &args, &mut image, None).expect("callback succeeds");

    // Assert
    assert_eq!(report, IterReport::converged(1));
    assert_relative_eq!(image[0], 2.4, epsilon = 1e-12);
    assert_relative_eq!(image[1], 3.2, epsilon = 1e-12);
    assert_eq!(&image[2..], &[0.0, 0.0]);
}

#[test]
// Purpose
// -------
// Without regularization terms a direct call sees no proximal operator.
fn direct_call_without_regularizer_gets_none() {
    let conf = IterConf::Call(IterCallConf::new(|call, _, _| {
        assert!(call.prox_op.is_none());
        assert!(call.normaleq_op.is_some());
        Ok(IterReport::max_iter_reached(0))
    }));
    let args = Iter2Args::new().with_normaleq_op(&identity);
    let mut image = [0.0; 4];

    let report = iter2(&conf, &args, &mut image, None).expect("callback succeeds");

    assert_eq!(report, IterReport::max_iter_reached(0));
}

#[test]
// Purpose
// -------
// Names resolve to tags, tags to default configurations, and [`iter2`]
// routes each configuration to its own algorithm.
//
// Given
// -----
// - The name "CG" (alias, mixed case) and an unknown name.
//
// Expect
// ------
// - "CG" runs conjugate gradient to the adjoint data.
// - "call" has no default configuration; unknown names are errors.
fn names_resolve_to_defaults_and_dispatch() {
    // Arrange
    let tag: AlgoTag = "CG".parse().expect("alias accepted");
    let conf = IterConf::default_for(tag).expect("conjgrad has a default");
    let args = Iter2Args::new().with_normaleq_op(&identity).with_image_adj(&ADJ);
    let mut image = [0.0; 4];

    // Act
    let report = iter2(&conf, &args, &mut image, None).expect("dispatch succeeds");

    // Assert
    assert_eq!(conf.tag(), AlgoTag::ConjGrad);
    assert_eq!(report.status, IterStatus::Converged);
    assert_relative_eq!(image[0], ADJ[0], epsilon = 1e-10);

    let call: AlgoTag = "call".parse().expect("known name");
    assert!(IterConf::default_for(call).is_none());
    assert!("lsqr".parse::<AlgoTag>().is_err());
}

#[test]
// Purpose
// -------
// ADMM with a sampling operator and an identity transform recovers the
// sampled entries and leaves the unsampled ones at zero.
//
// Given
// -----
// - Six complex elements, pattern sampling elements 0, 2, 3 and 5.
// - Adjoint data `P ⊙ y` for a known `y`.
// - `SoftThresh(0)` on `I x`, default ADMM settings with 100 iterations.
//
// Expect
// ------
// - The run happens; sampled entries within 1e-3 of `y`, unsampled exactly
//   zero.
fn admm_sampling_reconstruction_matches_sampled_truth() {
    // Arrange
    let sampled = [true, false, true, true, false, true];
    let pattern = Array::from_shape_vec(
        IxDyn(&[6]),
        sampled.iter().map(|&s| Complex64::new(if s { 1.0 } else { 0.0 }, 0.0)).collect(),
    )
    .expect("pattern shape");
    let truth: Vec<Complex64> =
        (0..6).map(|k| Complex64::new(1.0 + k as f64, 0.5 - 0.25 * k as f64)).collect();
    let adj: Vec<Complex64> = truth
        .iter()
        .zip(&sampled)
        .map(|(&y, &s)| if s { y } else { Complex64::new(0.0, 0.0) })
        .collect();

    let sampling = SamplingOp::new(&[6], &[6], pattern).expect("valid sampling operator");
    let normal = NormalEq::new(sampling);
    let normal_op: &dyn Operator = &normal;
    let g = IdentityOp::new(&[6]);
    let thresh = SoftThresh::new(0.0);
    let ops: [&dyn LinearOperator; 1] = [&g];
    let prox: [&dyn ProxOperator; 1] = [&thresh];
    let args = Iter2Args::new()
        .with_normaleq_op(normal_op)
        .with_ops(&ops)
        .with_prox_ops(&prox)
        .with_image_adj(as_real(&adj));
    let conf = IterConf::Admm(AdmmConf { maxiter: 100, ..AdmmConf::default() });
    let mut image = vec![0.0; 12];

    // Act
    let report = iter2_admm(&conf, &args, &mut image, None).expect("admm succeeds");

    // Assert
    assert!(report.ran());
    for k in 0..6 {
        let (re, im) = (image[2 * k], image[2 * k + 1]);
        if sampled[k] {
            assert_relative_eq!(re, truth[k].re, epsilon = 1e-3);
            assert_relative_eq!(im, truth[k].im, epsilon = 1e-3);
        } else {
            assert_eq!((re, im), (0.0, 0.0));
        }
    }
}
