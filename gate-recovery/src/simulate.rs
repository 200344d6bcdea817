//! Random simulation driver: the library's other public entry point alongside
//! [`crate::scanner::scan_gates`].
//!
//! Grounded on `include/gatekit/random_simulation.h`'s `random_simulation`/`randomize`/
//! `randomize_all`: every variable gets an unbiased initial assignment (so variables outside the
//! recovered structure don't show up as spurious backbones), then each bit-parallel round
//! alternates between re-randomizing the primary inputs at a slowly rotating bias and
//! complementing them outright, propagating the result through the structure and folding it into
//! the signature partitioner.
use gate_recovery_formula::{ClauseAccess, Literal};

use crate::bitvector::{BitVectorMap, Randomizer, WORDS};
use crate::gate::GateStructure;
use crate::partition::{Partitioner, Partitions};
use crate::structure_eval::propagate_structure;

/// Bits simulated per bit-parallel round (one bit per logical simulation round).
const BITS_PER_ROUND: u64 = (WORDS * 64) as u64;

/// Configuration for [`random_simulation`].
#[derive(Clone, Copy, Debug)]
pub struct SimulationConfig {
    /// Total number of logical (single-bit) simulation rounds to run. Internally rounded up to
    /// the next multiple of the bit-parallel width.
    pub max_rounds: u64,
    /// Seed for the primary-input randomizer. Two runs with the same seed and structure produce
    /// identical partitions.
    pub seed: u64,
    /// Period, in bit-parallel rounds, over which the even-step randomization bias cycles through
    /// `1..=bias_rotation_period` before repeating.
    pub bias_rotation_period: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            max_rounds: 10_000,
            seed: 0xe735_26b9,
            bias_rotation_period: 7,
        }
    }
}

fn randomize_step(
    assignments: &mut BitVectorMap,
    randomizer: &mut Randomizer,
    input_vars: &[usize],
    step: u64,
    bias_rotation_period: u64,
) {
    if step % 2 == 0 {
        let bias = (((step / 2) % bias_rotation_period) + 1) as u32;
        for &var in input_vars {
            randomizer.randomize(&mut assignments[var], bias);
        }
    } else {
        for &var in input_vars {
            assignments[var] = !assignments[var];
        }
    }
}

/// Runs a bit-parallel random simulation over `structure` and returns the conjectured backbone
/// and equivalence partitioning.
///
/// Every variable (not only primary inputs) is seeded with an unbiased initial assignment before
/// the round loop starts, so gate outputs have a defined value on round zero and variables that
/// do not occur in `structure` at all don't masquerade as backbones.
pub fn random_simulation<L, C, A>(
    access: &A,
    structure: &GateStructure<L, C>,
    config: SimulationConfig,
) -> Partitions<L>
where
    L: Literal,
    C: Copy,
    A: ClauseAccess<L, Handle = C>,
{
    let max_var = structure.max_var_index();
    let inputs = structure.input_var_indices();

    let mut assignments = BitVectorMap::new(max_var + 1);
    let mut partitioner = Partitioner::new(max_var + 1);
    let mut randomizer = Randomizer::new(config.seed);

    for idx in 0..assignments.len() {
        randomizer.randomize(&mut assignments[idx], 1);
    }

    let rounds = if config.max_rounds % BITS_PER_ROUND == 0 {
        (config.max_rounds / BITS_PER_ROUND).max(1)
    } else {
        config.max_rounds / BITS_PER_ROUND + 1
    };
    log::debug!(
        "random_simulation: {} bit-parallel round(s), {} primary input(s)",
        rounds,
        inputs.len()
    );

    for step in 0..rounds {
        randomize_step(
            &mut assignments,
            &mut randomizer,
            &inputs,
            step,
            config.bias_rotation_period,
        );
        propagate_structure(access, &mut assignments, structure);
        partitioner.add(&assignments);
        log::trace!("random_simulation: round {step} folded into partitioner");
    }

    partitioner.get_partitions()
}
