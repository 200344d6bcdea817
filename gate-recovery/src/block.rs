//! Blockedness checking.
//!
//! Grounded on `include/gatekit/detail/blocked_set.h` (`is_blocked`/`is_resolvent_tautologic`)
//! from the reference implementation, re-expressed against [`ClauseAccess`]/[`Literal`] and
//! [`OccurrenceList`] rather than the original's free-standing `iterate`/`negate` ADL functions.
use gate_recovery_formula::{ClauseAccess, Literal};

use crate::occurrence::OccurrenceList;

/// Whether the resolvent of `lhs` and `rhs` on `resolution_lit`'s variable is a tautology, i.e.
/// whether some other variable appears with opposite polarity in each clause.
fn is_resolvent_tautologic<L, C, A>(access: &A, lhs: C, rhs: C, resolution_lit: L) -> bool
where
    L: Literal,
    C: Copy,
    A: ClauseAccess<L, Handle = C>,
{
    let resolution_var = resolution_lit.to_var_index();

    for &lhs_lit in access.iterate(lhs) {
        if lhs_lit.to_var_index() == resolution_var {
            continue;
        }
        for &rhs_lit in access.iterate(rhs) {
            if lhs_lit == rhs_lit.negate() {
                return true;
            }
        }
    }

    false
}

/// Whether `lit` is blocked under the clauses currently tracked by `occs`: every resolvent
/// between a clause containing `negate(lit)` and a clause containing `lit` is tautological.
///
/// Short-circuits on the first non-tautological pair. Cost is bounded by
/// `|clauses(negate(lit))| * |clauses(lit)| * average clause length`.
pub fn is_blocked<L, C, A>(access: &A, occs: &mut OccurrenceList<L, C>, lit: L) -> bool
where
    L: Literal,
    C: Copy + Eq + std::hash::Hash,
    A: ClauseAccess<L, Handle = C>,
{
    let fwd_clauses = occs.clauses(lit.negate()).to_vec();
    let bwd_clauses = occs.clauses(lit).to_vec();

    for &fwd in &fwd_clauses {
        for &bwd in &bwd_clauses {
            if !is_resolvent_tautologic(access, fwd, bwd, lit) {
                return false;
            }
        }
    }

    true
}
