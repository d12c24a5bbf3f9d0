use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use qpgf_core::{GateKind, GateOp, GateSequence, Probability};
use qpgf_engine::{
    compose, compute_global, compute_per_qubit, direct_convolve, fft_convolve, EngineConfig,
    PgfEngine, Pgf,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

const TOL: f64 = 1e-9;

fn random_distribution(rng: &mut StdRng, len: usize) -> Vec<f64> {
    let raw: Vec<f64> = (0..len).map(|_| rng.gen::<f64>() + 1e-3).collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|x| x / sum).collect()
}

fn pgf_from(probs: &[f64]) -> Pgf {
    let config = EngineConfig::exact();
    probs
        .iter()
        .map(|&p| Pgf::elementary(Probability::new(p).unwrap(), [0]))
        .try_fold(Pgf::identity(), |acc, next| compose(&acc, &next, &config))
        .unwrap()
}

fn assert_pgf_close(a: &Pgf, b: &Pgf) {
    for k in 0..a.len().max(b.len()) {
        assert_abs_diff_eq!(a.probability(k), b.probability(k), epsilon = TOL);
    }
}

// ============================================================================
// Deterministic properties
// ============================================================================

#[test]
fn fft_matches_direct_at_required_sizes() {
    let mut rng = StdRng::seed_from_u64(7);
    for &n in &[2usize, 8, 64, 513] {
        let a = random_distribution(&mut rng, n);
        let b = random_distribution(&mut rng, n);
        let direct = direct_convolve(&a, &b);
        let fft = fft_convolve(&a, &b);
        assert_eq!(direct.len(), 2 * n - 1);
        assert_eq!(fft.len(), direct.len());
        for (x, y) in direct.iter().zip(&fft) {
            assert_abs_diff_eq!(x, y, epsilon = TOL);
        }
    }
}

#[test]
fn engine_paths_agree_on_large_sequence() {
    let mut rng = StdRng::seed_from_u64(11);
    let ops: Vec<GateOp> = (0..600)
        .map(|i| {
            let p = rng.gen_range(0.0..0.02);
            if i % 5 == 0 {
                GateOp::pair(GateKind::Cz, i % 7, (i + 1) % 7, p).unwrap()
            } else {
                GateOp::single(GateKind::Sx, i % 7, p).unwrap()
            }
        })
        .collect();
    let seq = GateSequence::from_ops(ops);

    let fast = PgfEngine::new(EngineConfig::fast()).unwrap().compute_global(&seq).unwrap();
    let exact = PgfEngine::new(EngineConfig::exact()).unwrap().compute_global(&seq).unwrap();
    assert_pgf_close(&fast, &exact);
    assert_abs_diff_eq!(fast.mean(), seq.expected_errors(), epsilon = 1e-9);
}

#[test]
fn scenario_two_single_qubit_gates() {
    let seq = GateSequence::from_ops(vec![
        GateOp::single(GateKind::X, 0, 0.1).unwrap(),
        GateOp::single(GateKind::Sx, 0, 0.2).unwrap(),
    ]);
    let global = compute_global(&seq).unwrap();
    assert_eq!(global.len(), 3);
    assert_abs_diff_eq!(global.probability(0), 0.72, epsilon = TOL);
    assert_abs_diff_eq!(global.probability(1), 0.26, epsilon = TOL);
    assert_abs_diff_eq!(global.probability(2), 0.02, epsilon = TOL);
}

#[test]
fn scenario_single_two_qubit_gate() {
    let seq = GateSequence::from_ops(vec![GateOp::pair(GateKind::Cz, 0, 1, 0.05).unwrap()]);
    let global = compute_global(&seq).unwrap();
    assert_eq!(global.len(), 2);
    assert_abs_diff_eq!(global.probability(0), 0.95, epsilon = TOL);
    assert_abs_diff_eq!(global.probability(1), 0.05, epsilon = TOL);

    let per_qubit = compute_per_qubit(&seq, &[0, 1].into()).unwrap();
    for q in [0, 1] {
        assert_pgf_close(&per_qubit[&q], &global);
    }
}

#[test]
fn two_qubit_gate_counted_once_globally_twice_locally() {
    let seq = GateSequence::from_ops(vec![
        GateOp::single(GateKind::X, 0, 0.1).unwrap(),
        GateOp::pair(GateKind::Cz, 0, 1, 0.3).unwrap(),
        GateOp::single(GateKind::X, 1, 0.2).unwrap(),
    ]);
    let global = compute_global(&seq).unwrap();
    assert_eq!(global.degree(), 3);
    assert_pgf_close(&global, &pgf_from(&[0.1, 0.3, 0.2]));

    let per_qubit = compute_per_qubit(&seq, &seq.used_qubits()).unwrap();
    assert_pgf_close(&per_qubit[&0], &pgf_from(&[0.1, 0.3]));
    assert_pgf_close(&per_qubit[&1], &pgf_from(&[0.3, 0.2]));
}

// ============================================================================
// Randomized properties
// ============================================================================

fn probability() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(1.0), 0.0f64..=1.0]
}

proptest! {
    #[test]
    fn elementary_sums_to_one(p in probability()) {
        let pgf = Pgf::bernoulli(p).unwrap();
        prop_assert_eq!(pgf.len(), 2);
        prop_assert!((pgf.total_mass() - 1.0).abs() < TOL);
        prop_assert!((pgf.probability(1) - p).abs() < 1e-15);
    }

    #[test]
    fn composition_bounds_degree_and_mass(
        a in prop::collection::vec(probability(), 0..40),
        b in prop::collection::vec(probability(), 0..40),
    ) {
        let (pa, pb) = (pgf_from(&a), pgf_from(&b));
        let product = compose(&pa, &pb, &EngineConfig::default()).unwrap();
        prop_assert!(product.degree() <= pa.degree() + pb.degree());
        prop_assert!((product.total_mass() - 1.0).abs() < TOL);
    }

    #[test]
    fn composition_commutes_and_associates(
        a in prop::collection::vec(probability(), 1..30),
        b in prop::collection::vec(probability(), 1..30),
        c in prop::collection::vec(probability(), 1..30),
    ) {
        let config = EngineConfig::default().with_fft_threshold(4);
        let (pa, pb, pc) = (pgf_from(&a), pgf_from(&b), pgf_from(&c));

        let left = compose(&compose(&pa, &pb, &config).unwrap(), &pc, &config).unwrap();
        let right = compose(&pa, &compose(&pb, &pc, &config).unwrap(), &config).unwrap();
        let swapped = compose(&pb, &compose(&pa, &pc, &config).unwrap(), &config).unwrap();

        for k in 0..left.len().max(right.len()).max(swapped.len()) {
            prop_assert!((left.probability(k) - right.probability(k)).abs() < TOL);
            prop_assert!((left.probability(k) - swapped.probability(k)).abs() < TOL);
        }
    }

    #[test]
    fn fft_equals_direct(
        a in prop::collection::vec(0.0f64..1.0, 1..300),
        b in prop::collection::vec(0.0f64..1.0, 1..300),
    ) {
        let norm = |v: Vec<f64>| {
            let s: f64 = v.iter().sum::<f64>() + 1e-12;
            v.into_iter().map(|x| x / s).collect::<Vec<_>>()
        };
        let (a, b) = (norm(a), norm(b));
        let direct = direct_convolve(&a, &b);
        let fft = fft_convolve(&a, &b);
        for (x, y) in direct.iter().zip(&fft) {
            prop_assert!((x - y).abs() < TOL);
        }
    }

    #[test]
    fn single_qubit_marginal_is_plain_product(
        rates in prop::collection::vec(probability(), 1..25),
    ) {
        let mut ops: Vec<GateOp> = rates
            .iter()
            .map(|&p| GateOp::single(GateKind::Sx, 0, p).unwrap())
            .collect();
        // Unrelated traffic on other qubits
        ops.push(GateOp::pair(GateKind::Cz, 1, 2, 0.4).unwrap());

        let seq = GateSequence::from_ops(ops);
        let per_qubit = compute_per_qubit(&seq, &BTreeSet::from([0])).unwrap();
        let expected = pgf_from(&rates);
        let actual = &per_qubit[&0];
        for k in 0..actual.len().max(expected.len()) {
            prop_assert!((actual.probability(k) - expected.probability(k)).abs() < TOL);
        }
    }

    #[test]
    fn fold_order_does_not_matter(
        rates in prop::collection::vec(probability(), 0..50),
        seed in any::<u64>(),
    ) {
        let ops: Vec<GateOp> = rates
            .iter()
            .enumerate()
            .map(|(i, &p)| GateOp::single(GateKind::X, i % 3, p).unwrap())
            .collect();
        let mut shuffled = ops.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        shuffled.shuffle(&mut rng);

        let a = compute_global(&GateSequence::from_ops(ops)).unwrap();
        let b = compute_global(&GateSequence::from_ops(shuffled)).unwrap();
        for k in 0..a.len().max(b.len()) {
            prop_assert!((a.probability(k) - b.probability(k)).abs() < TOL);
        }
    }
}
