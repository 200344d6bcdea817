//! Single-gate evaluation under a bit-vector assignment.
//!
//! Grounded on `include/gatekit/detail/bitvector_prop.h` (`prop_clauses`/`propagate_gate`) from
//! the reference implementation. That header selects the side to propagate from by clause count
//! (`num_bwd <= num_fwd` ties to forward), except monotonically nested gates which always use the
//! forward side; this module keeps that rule instead of any size-based heuristic, since it is the
//! decision this crate settled on where the C++ comment's phrasing could be read either way.
use gate_recovery_formula::{ClauseAccess, Literal};

use crate::bitvector::{BitVector, BitVectorMap};
use crate::gate::Gate;

/// Which side of a gate's clauses determines its output column.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Side {
    Forward,
    Backward,
}

fn propagating_side<L, C>(gate: &Gate<L, C>) -> Side {
    if gate.is_nested_monotonically {
        return Side::Forward;
    }
    let num_bwd = gate.clauses.len() - gate.num_fwd_clauses;
    if gate.num_fwd_clauses <= num_bwd {
        Side::Forward
    } else {
        Side::Backward
    }
}

/// Assigns `gate`'s output column in `assignment` from its input columns, which must already be
/// settled.
///
/// For the propagating side `S`, a clause in `S` is satisfied (under the current input columns,
/// ignoring the output literal) wherever some non-output literal's column indicates it is true.
/// The output is forced false (as a literal of `S`'s polarity) exactly where every clause in `S`
/// is satisfied without it; `forced` below holds that per-round verdict.
pub fn propagate_gate<L, C, A>(access: &A, assignment: &mut BitVectorMap, gate: &Gate<L, C>)
where
    L: Literal,
    C: Copy,
    A: ClauseAccess<L, Handle = C>,
{
    let out_var = gate.output.to_var_index();
    let side = propagating_side(gate);
    let clauses: &[C] = match side {
        Side::Forward => gate.forward_clauses(),
        Side::Backward => gate.backward_clauses(),
    };

    let mut forced = BitVector::ones();

    for &clause in clauses {
        let mut clause_satisfied = BitVector::zeros();
        for &lit in access.iterate(clause) {
            let lit_var = lit.to_var_index();
            if lit_var == out_var {
                continue;
            }
            let column = assignment[lit_var];
            clause_satisfied |= if lit.is_positive() { column } else { !column };
        }
        forced &= clause_satisfied;
    }

    // `forced`'s n'th bit holds iff the propagating side's defining literal (negate(output) for
    // forward, output for backward) is forced true without the output variable's help, i.e. the
    // output *literal* of that side's polarity is forced false.
    let fwd_forces_output = side == Side::Backward;
    let assign_forced_directly = if fwd_forces_output {
        !gate.output.is_positive()
    } else {
        gate.output.is_positive()
    };

    assignment[out_var] = if assign_forced_directly {
        forced
    } else {
        !forced
    };
}
