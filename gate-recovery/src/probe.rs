//! Single-literal gate probe.
//!
//! Grounded on the top-level candidate test in the reference implementation's scanner
//! (`scanner_impl.h`/`scanner_single.h`), which combines blockedness with pattern recognition
//! behind one boolean query; kept as its own module here so [`crate::scanner`] stays focused on
//! BFS bookkeeping.
use std::hash::Hash;

use gate_recovery_formula::{ClauseAccess, Literal};

use crate::block::is_blocked;
use crate::occurrence::OccurrenceList;
use crate::pattern::{input_var_indices, matcher_a, matcher_b};

/// Whether `candidate` is the output of some gate encoding in the clauses tracked by `occs`.
///
/// `mono` disables the encoding-pattern check: a candidate that is blocked and has at least one
/// forward clause is accepted outright, with backward clauses allowed to be absent. This is
/// correct only when the caller has established that `candidate`'s variable occurs nested
/// monotonically so far in the structure under construction (see [`crate::scanner`]).
pub fn is_gate_output<L, C, A>(
    access: &A,
    occs: &mut OccurrenceList<L, C>,
    candidate: L,
    mono: bool,
) -> bool
where
    L: Literal,
    C: Copy + Eq + Hash,
    A: ClauseAccess<L, Handle = C>,
{
    if occs.clauses(candidate.negate()).is_empty() {
        return false;
    }

    if !is_blocked(access, occs, candidate) {
        return false;
    }

    if mono {
        return true;
    }

    let forward = occs.clauses(candidate.negate()).to_vec();
    let backward = occs.clauses(candidate).to_vec();

    match input_var_indices(access, candidate, &forward, &backward) {
        Some(inputs) => {
            let n = inputs.len();
            matcher_a(access, &forward, &backward, n) || matcher_b(access, &forward, &backward, n)
        }
        None => false,
    }
}
