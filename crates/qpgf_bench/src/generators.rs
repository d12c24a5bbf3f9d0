//! Circuit generators for benchmarking
//!
//! Gantree: L6_Benchmark → Generators
//!
//! Logical circuits of controllable size and gate mix, for exercising the
//! resolver and the PGF engine.

use qpgf_core::{Circuit, CircuitBuilder, GateKind};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::f64::consts::PI;

/// Gate kinds placed by [`CircuitGenerator::layered`] when no filter is given
pub const DEFAULT_LAYER_GATES: &[GateKind] = &[
    GateKind::H,
    GateKind::X,
    GateKind::Y,
    GateKind::Z,
    GateKind::S,
    GateKind::T,
    GateKind::Rx,
    GateKind::Ry,
    GateKind::Rz,
    GateKind::U,
    GateKind::Cx,
];

/// Circuit generator for benchmarks
/// Gantree: CircuitGenerator // 회로 생성기
pub struct CircuitGenerator {
    /// Random seed
    seed: Option<u64>,
}

impl CircuitGenerator {
    /// Create new generator
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Create generator with seed
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    // ========================================================================
    // Reference Circuits
    // ========================================================================

    /// Two-qubit variational ansatz for H2
    ///
    /// `RY RY CX RZ RY RZ RY` with the six angles in that order.
    pub fn vqe_h2_ansatz(&self, theta: [f64; 6]) -> Circuit {
        CircuitBuilder::with_name(2, "vqe_h2")
            .ry(0, theta[0])
            .ry(1, theta[1])
            .cx(0, 1)
            .rz(0, theta[2])
            .ry(0, theta[3])
            .rz(1, theta[4])
            .ry(1, theta[5])
            .build()
    }

    /// Three-qubit circuit touching every decomposable gate kind
    pub fn sample(&self) -> Circuit {
        CircuitBuilder::with_name(3, "sample")
            .h(0)
            .cx(0, 1)
            .x(1)
            .y(2)
            .z(0)
            .s(1)
            .t(2)
            .rx(0, 1.57)
            .ry(1, 1.57)
            .rz(2, 1.57)
            .u(0, 0.5, 0.5, 0.5)
            .cx(1, 2)
            .build()
    }

    /// Bell pair
    pub fn bell(&self) -> Circuit {
        CircuitBuilder::with_name(2, "bell").h(0).cx(0, 1).build()
    }

    /// GHZ preparation
    pub fn ghz(&self, num_qubits: usize) -> Circuit {
        CircuitBuilder::with_name(num_qubits, format!("ghz_{}", num_qubits))
            .h(0)
            .cx_chain()
            .build()
    }

    // ========================================================================
    // Scalable Circuits
    // ========================================================================

    /// Layered test circuit
    ///
    /// Each layer applies, per qubit, every selected single-qubit kind (H
    /// only on every fourth qubit; rotations at π/4; U at 0.5, 0.5, 0.5),
    /// then CX on pairs (0,1), (2,3), ... if CX is selected. Kinds outside
    /// that set are ignored.
    pub fn layered(&self, num_qubits: usize, num_layers: usize, include: &[GateKind]) -> Circuit {
        let has = |kind: GateKind| include.contains(&kind);
        let mut builder = CircuitBuilder::with_name(
            num_qubits,
            format!("layered_{}q_{}l", num_qubits, num_layers),
        );

        for _ in 0..num_layers {
            for q in 0..num_qubits {
                if has(GateKind::H) && q % 4 == 0 {
                    builder = builder.h(q);
                }
                if has(GateKind::X) {
                    builder = builder.x(q);
                }
                if has(GateKind::Y) {
                    builder = builder.y(q);
                }
                if has(GateKind::Z) {
                    builder = builder.z(q);
                }
                if has(GateKind::S) {
                    builder = builder.s(q);
                }
                if has(GateKind::T) {
                    builder = builder.t(q);
                }
                if has(GateKind::Rx) {
                    builder = builder.rx(q, PI / 4.0);
                }
                if has(GateKind::Ry) {
                    builder = builder.ry(q, PI / 4.0);
                }
                if has(GateKind::Rz) {
                    builder = builder.rz(q, PI / 4.0);
                }
                if has(GateKind::U) {
                    builder = builder.u(q, 0.5, 0.5, 0.5);
                }
            }

            if has(GateKind::Cx) {
                for q in (0..num_qubits.saturating_sub(1)).step_by(2) {
                    builder = builder.cx(q, q + 1);
                }
            }
        }

        builder.build()
    }

    /// Layered test circuit with every default kind
    pub fn large_test(&self, num_qubits: usize, num_layers: usize) -> Circuit {
        self.layered(num_qubits, num_layers, DEFAULT_LAYER_GATES)
    }

    /// Random circuit: per layer one random single-qubit gate on each qubit,
    /// then CX between neighbours with probability 1/2
    ///
    /// Only kinds that both targets can express are drawn.
    pub fn random(&self, num_qubits: usize, depth: usize) -> Circuit {
        let mut builder =
            CircuitBuilder::with_name(num_qubits, format!("random_{}q_{}d", num_qubits, depth));
        let mut rng = self.get_rng();

        for _ in 0..depth {
            for q in 0..num_qubits {
                builder = match rng.gen_range(0..8) {
                    0 => builder.h(q),
                    1 => builder.x(q),
                    2 => builder.sx(q),
                    3 => builder.s(q),
                    4 => builder.t(q),
                    5 => builder.y(q),
                    6 => builder.ry(q, rng.gen::<f64>() * 2.0 * PI),
                    _ => builder.rz(q, rng.gen::<f64>() * 2.0 * PI),
                };
            }

            for q in 0..num_qubits.saturating_sub(1) {
                if rng.gen::<f64>() < 0.5 {
                    builder = builder.cx(q, q + 1);
                }
            }
        }

        builder.build()
    }

    // ========================================================================
    // Scaling Series
    // ========================================================================

    /// Layered circuits of growing depth
    pub fn layer_scaling(&self, num_qubits: usize, layers: &[usize]) -> Vec<Circuit> {
        layers.iter().map(|&l| self.large_test(num_qubits, l)).collect()
    }

    /// Layered circuits of growing width
    pub fn qubit_scaling(&self, widths: &[usize], num_layers: usize) -> Vec<Circuit> {
        widths.iter().map(|&n| self.large_test(n, num_layers)).collect()
    }

    // ========================================================================
    // Utility
    // ========================================================================

    /// Get RNG with optional seed
    fn get_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for CircuitGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
