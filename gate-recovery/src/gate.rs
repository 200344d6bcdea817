//! Gate and gate-structure data types.
//!
//! Grounded on `include/gatekit/gate.h` (`gate`/`gate_structure`) from the reference
//! implementation this library's behavior was distilled from, re-expressed with the teacher's
//! (`varisat`) conventions for small, `Copy`-friendly handle-bearing value types.
use gate_recovery_formula::Literal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A recovered functional definition `output <-> F(inputs...)`, encoded by a contiguous run of
/// clauses.
///
/// `clauses` is partitioned into a prefix of `num_fwd_clauses` *forward* clauses (each containing
/// `negate(output)`, encoding `F -> output`) followed by *backward* clauses (each containing
/// `output`, encoding `output -> F`). If [`Gate::is_nested_monotonically`] is set, the backward
/// clauses may be entirely absent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct Gate<L, C> {
    /// The literal whose variable this gate defines.
    pub output: L,
    /// Distinct literals appearing in forward clauses other than `negate(output)`, in order of
    /// first appearance.
    pub inputs: Vec<L>,
    /// All clauses constituting the encoding; forward clauses precede backward clauses.
    pub clauses: Vec<C>,
    /// Number of forward clauses at the front of `clauses`.
    pub num_fwd_clauses: usize,
    /// When `true`, `clauses` may omit backward clauses; the gate is only ever used in a context
    /// where its output polarity is fixed.
    pub is_nested_monotonically: bool,
}

impl<L: Literal, C: Copy> Gate<L, C> {
    /// Forward clauses: those containing `negate(output)`.
    pub fn forward_clauses(&self) -> &[C] {
        &self.clauses[..self.num_fwd_clauses]
    }

    /// Backward clauses: those containing `output`. May be empty for a monotonically nested gate.
    pub fn backward_clauses(&self) -> &[C] {
        &self.clauses[self.num_fwd_clauses..]
    }

    /// The maximum variable index occurring in this gate (output or input), or 0 if both are
    /// empty (which cannot happen for a validly constructed gate, since `output` is always set).
    pub fn max_var_index(&self) -> usize {
        self.inputs
            .iter()
            .map(|l| l.to_var_index())
            .chain(std::iter::once(self.output.to_var_index()))
            .max()
            .unwrap_or(0)
    }
}

/// A collection of gates, forming a DAG with the gates (and root constraints) as nodes.
///
/// An edge `X -> Y` exists iff the output of `X` (or its negation) is an input of `Y`. Root
/// constraints have no outgoing edges.
///
/// `gates` is listed in reverse topological order of discovery: for `0 <= n < gates.len()`, the
/// output variable of `gates[n]` never appears in the inputs of `gates[m]` for any `m > n`. This
/// is a contractual postcondition of [`crate::scanner::scan_gates`], relied upon by
/// [`crate::structure_eval::propagate_structure`].
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct GateStructure<L, C> {
    pub gates: Vec<Gate<L, C>>,
    /// Root constraints (one group per originating unit clause). May be empty.
    pub roots: Vec<Vec<L>>,
}

impl<L, C> GateStructure<L, C> {
    /// An empty gate structure, with no gates and no roots.
    pub fn new() -> Self {
        GateStructure {
            gates: Vec::new(),
            roots: Vec::new(),
        }
    }
}

impl<L: Literal, C: Copy> GateStructure<L, C> {
    /// The maximum variable index occurring anywhere in the structure, or 0 if it is empty.
    pub fn max_var_index(&self) -> usize {
        self.gates
            .iter()
            .map(Gate::max_var_index)
            .max()
            .unwrap_or(0)
    }

    /// Sorted, ascending, deduplicated variable indices that occur as an input of some gate but
    /// never as the output of any gate in this structure.
    pub fn input_var_indices(&self) -> Vec<usize> {
        let mut outputs = std::collections::HashSet::new();
        for gate in &self.gates {
            outputs.insert(gate.output.to_var_index());
        }

        let mut inputs: Vec<usize> = self
            .gates
            .iter()
            .flat_map(|gate| gate.inputs.iter().map(|l| l.to_var_index()))
            .filter(|v| !outputs.contains(v))
            .collect();

        inputs.sort_unstable();
        inputs.dedup();
        inputs
    }
}
