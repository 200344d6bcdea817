//! Breadth-first gate structure recovery.
//!
//! Grounded on the scanning driver in `include/gatekit/scanner.h`/`scanner_impl.h` from the
//! reference implementation (BFS from unit-clause roots, "seen at both polarities" monotone
//! tracking, cost-sorted candidate order), re-expressed with the teacher's logging idiom:
//! `log::debug!` at accept points and `log::trace!` at loop-transition granularity, as
//! `varisat`'s `cdcl.rs`/`decision.rs` log restart and decision events.
use std::hash::Hash;

use gate_recovery_formula::{ClauseAccess, Literal};

use crate::gate::{Gate, GateStructure};
use crate::occurrence::OccurrenceList;
use crate::probe::is_gate_output;

/// A sparse set of literals, indexed by [`Literal::to_index`], sized lazily up to the largest
/// index inserted so far.
struct LiteralSet {
    seen: Vec<bool>,
}

impl LiteralSet {
    fn with_capacity(size: usize) -> Self {
        LiteralSet {
            seen: vec![false; size],
        }
    }

    fn contains<L: Literal>(&self, lit: L) -> bool {
        self.seen.get(lit.to_index()).copied().unwrap_or(false)
    }

    fn insert<L: Literal>(&mut self, lit: L) {
        let idx = lit.to_index();
        if idx >= self.seen.len() {
            self.seen.resize(idx + 1, false);
        }
        self.seen[idx] = true;
    }
}

/// Recovers a gate structure by breadth-first search from every unit-clause root in the clauses
/// reachable through `access` via `handles`.
///
/// Preconditions: each clause has distinct literals and no duplicate literals across its own
/// span (an empty clause is a contract violation of the supplied accessor, not handled here).
/// Postconditions: `structure.gates` is in reverse topological order — no gate's output variable
/// appears in the inputs of any gate appended before it.
pub fn scan_gates<L, C, A, I>(access: &A, handles: I) -> GateStructure<L, C>
where
    L: Literal,
    C: Copy + Eq + Hash,
    A: ClauseAccess<L, Handle = C>,
    I: IntoIterator<Item = C>,
    I::IntoIter: Clone,
{
    let mut occs = OccurrenceList::new(access, handles);
    let mut structure = GateStructure::new();

    let roots: Vec<L> = occs.unaries().to_vec();
    log::debug!("scan_gates: {} unit-clause root(s)", roots.len());

    for root in roots {
        occs.remove_unary(access, root);
        if extend(access, &mut occs, root, &mut structure.gates) {
            structure.roots.push(vec![root]);
        }
    }

    structure
}

/// Runs BFS gate discovery starting from `root`, appending accepted gates to `gates`. Returns
/// whether any gate was discovered.
fn extend<L, C, A>(
    access: &A,
    occs: &mut OccurrenceList<L, C>,
    root: L,
    gates: &mut Vec<Gate<L, C>>,
) -> bool
where
    L: Literal,
    C: Copy + Eq + Hash,
    A: ClauseAccess<L, Handle = C>,
{
    let set_size = occs.max_lit_index() + 1;
    let mut current = vec![root];
    let mut seen_inputs = LiteralSet::with_capacity(set_size);
    let mut found_any = false;

    while !current.is_empty() {
        current.sort_unstable_by_key(|&lit| occs.get_estimated_lookup_cost(lit));

        let mut next = Vec::new();
        let mut next_seen = LiteralSet::with_capacity(set_size);

        for candidate in current.drain(..) {
            let is_nonmono =
                seen_inputs.contains(candidate) && seen_inputs.contains(candidate.negate());
            let mono = !is_nonmono;

            if !is_gate_output(access, occs, candidate, mono) {
                continue;
            }

            let forward: Vec<C> = occs.clauses(candidate.negate()).to_vec();
            let backward: Vec<C> = occs.clauses(candidate).to_vec();
            let num_fwd_clauses = forward.len();

            let mut inputs = Vec::new();
            let mut inputs_seen = LiteralSet::with_capacity(set_size);
            for &clause in &forward {
                for &lit in access.iterate(clause) {
                    if lit == candidate || lit == candidate.negate() {
                        continue;
                    }
                    if !inputs_seen.contains(lit) {
                        inputs_seen.insert(lit);
                        inputs.push(lit);
                    }
                }
            }

            let mut clauses = forward;
            clauses.extend_from_slice(&backward);
            let is_nested_monotonically = mono;

            occs.remove_gate_root(access, candidate);

            for &input in &inputs {
                if !next_seen.contains(input) {
                    next_seen.insert(input);
                    next.push(input);
                }
                seen_inputs.insert(input);
            }
            if !is_nested_monotonically {
                for &input in &inputs {
                    seen_inputs.insert(input.negate());
                }
            }

            log::debug!(
                "accepted gate: output={:?} inputs={} monotone={}",
                candidate,
                inputs.len(),
                is_nested_monotonically,
            );

            gates.push(Gate {
                output: candidate,
                inputs,
                clauses,
                num_fwd_clauses,
                is_nested_monotonically,
            });
            found_any = true;
        }

        log::trace!("BFS frontier transition: {} candidate(s) next", next.len());
        current = next;
    }

    found_any
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_recovery_formula::{cnf_formula, Lit};

    #[test]
    fn single_and_gate_is_recovered() {
        // o <-> (a & b), with o asserted as a root unit clause.
        let formula = cnf_formula![
            1;
            -1, 2;
            -1, 3;
            1, -2, -3;
        ];
        let handles: Vec<_> = formula.handles().collect();
        let structure = scan_gates(&formula, handles);

        assert_eq!(structure.gates.len(), 1);
        let gate = &structure.gates[0];
        assert_eq!(gate.output, Lit::from_dimacs(1));
        assert_eq!(gate.inputs.len(), 2);
        assert!(gate.inputs.contains(&Lit::from_dimacs(2)));
        assert!(gate.inputs.contains(&Lit::from_dimacs(3)));
        assert_eq!(structure.roots, vec![vec![Lit::from_dimacs(1)]]);
    }

    #[test]
    fn lone_unit_clause_without_support_extends_to_nothing() {
        let formula = cnf_formula![
            1;
        ];
        let handles: Vec<_> = formula.handles().collect();
        let structure = scan_gates(&formula, handles);

        assert!(structure.gates.is_empty());
        assert!(structure.roots.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_structure() {
        let formula = gate_recovery_formula::CnfFormula::new();
        let handles: Vec<_> = formula.handles().collect();
        let structure = scan_gates(&formula, handles);

        assert!(structure.gates.is_empty());
        assert!(structure.roots.is_empty());
    }

    #[test]
    fn nested_and_of_xor_is_recovered_in_reverse_topological_order() {
        // 1 <-> (10 & 3), 10 <-> (4 xor 5), with 1 asserted as the only root. Variable 10 is
        // used positively only (as input to the outer AND), so its gate is nested
        // monotonically even though the XOR itself mixes polarities of 4 and 5.
        let formula = cnf_formula![
            1;

            -1, 10;
            -1, 3;
            1, -10, -3;

            -10, 4, 5;
            -10, -4, -5;
            10, 4, -5;
            10, -4, 5;
        ];
        let handles: Vec<_> = formula.handles().collect();
        let structure = scan_gates(&formula, handles);

        assert_eq!(structure.gates.len(), 2);
        assert_eq!(structure.roots, vec![vec![Lit::from_dimacs(1)]]);

        assert_eq!(structure.gates[0].output, Lit::from_dimacs(1));
        assert_eq!(structure.gates[0].inputs.len(), 2);
        assert!(structure.gates[0].inputs.contains(&Lit::from_dimacs(10)));
        assert!(structure.gates[0].inputs.contains(&Lit::from_dimacs(3)));
        assert!(structure.gates[0].is_nested_monotonically);

        assert_eq!(structure.gates[1].output, Lit::from_dimacs(10));
        assert_eq!(structure.gates[1].inputs.len(), 4);
        for lit in [
            Lit::from_dimacs(4),
            Lit::from_dimacs(-4),
            Lit::from_dimacs(5),
            Lit::from_dimacs(-5),
        ] {
            assert!(structure.gates[1].inputs.contains(&lit));
        }
        assert!(structure.gates[1].is_nested_monotonically);

        // Reverse topological order: no gate's output variable occurs among the inputs of any
        // gate appended before it.
        for (i, earlier) in structure.gates.iter().enumerate() {
            let earlier_var = earlier.output.to_var_index();
            for later in &structure.gates[i + 1..] {
                assert!(
                    !later
                        .inputs
                        .iter()
                        .any(|input| input.to_var_index() == earlier_var),
                    "gate for {:?} (discovered earlier) is used as an input of {:?} (discovered later)",
                    earlier.output,
                    later.output
                );
            }
        }
    }

    /// Builds the full-adder formula shared by the nested-structure scanner test and the
    /// structure-evaluator propagation test: sum `1 <-> (10 xor 103)`, carry-out
    /// `2 <-> (11 or 12)`, `11 <-> (10 and 103)`, `12 <-> (101 and 102)`,
    /// `10 <-> (101 xor 102)`, with `1` and `2` asserted as unit clauses.
    fn full_adder_formula() -> gate_recovery_formula::CnfFormula {
        cnf_formula![
            1;
            2;

            -1, 10, 103;
            -1, -10, -103;
            1, 10, -103;
            1, -10, 103;

            -2, 11, 12;
            2, -11;
            2, -12;

            -11, 10;
            -11, 103;
            11, -10, -103;

            -12, 101;
            -12, 102;
            12, -101, -102;

            -10, 101, 102;
            -10, -101, -102;
            10, 101, -102;
            10, -101, 102;
        ]
    }

    #[test]
    fn full_adder_is_recovered_as_five_gates_in_reverse_topological_order() {
        // Root {1}'s search discovers only gate(1): its XOR mixes the polarity of inputs 10 and
        // 103, so both literals of each become BFS candidates next round, but probing variable
        // 10 or 103 at that point mixes gate(11)'s or gate(1)'s own already-removed clauses with
        // the other gate still using that variable, failing blockedness or the input-set check,
        // so the search for root {1} terminates there. Root {2}'s independent search (fresh
        // monotone tracking) then discovers gate(2), gate(11), gate(12), and gate(10) in turn,
        // since within that search 10, 101, and 102 are each used only in one polarity until
        // gate(10) is reached.
        let formula = full_adder_formula();
        let handles: Vec<_> = formula.handles().collect();
        let structure = scan_gates(&formula, handles);

        assert_eq!(structure.roots, vec![vec![Lit::from_dimacs(1)], vec![Lit::from_dimacs(2)]]);
        assert_eq!(structure.gates.len(), 5);

        let outputs: Vec<_> = structure.gates.iter().map(|g| g.output).collect();
        assert_eq!(
            outputs,
            vec![
                Lit::from_dimacs(1),
                Lit::from_dimacs(2),
                Lit::from_dimacs(11),
                Lit::from_dimacs(12),
                Lit::from_dimacs(10),
            ]
        );

        let gate1 = &structure.gates[0];
        assert_eq!(gate1.inputs.len(), 4);
        for lit in [
            Lit::from_dimacs(10),
            Lit::from_dimacs(-10),
            Lit::from_dimacs(103),
            Lit::from_dimacs(-103),
        ] {
            assert!(gate1.inputs.contains(&lit));
        }
        assert!(gate1.is_nested_monotonically);

        let gate2 = &structure.gates[1];
        assert_eq!(gate2.inputs, vec![Lit::from_dimacs(11), Lit::from_dimacs(12)]);
        assert!(gate2.is_nested_monotonically);

        let gate11 = &structure.gates[2];
        assert_eq!(gate11.inputs, vec![Lit::from_dimacs(10), Lit::from_dimacs(103)]);
        assert!(gate11.is_nested_monotonically);

        let gate12 = &structure.gates[3];
        assert_eq!(gate12.inputs, vec![Lit::from_dimacs(101), Lit::from_dimacs(102)]);
        assert!(gate12.is_nested_monotonically);

        let gate10 = &structure.gates[4];
        assert_eq!(gate10.inputs.len(), 4);
        for lit in [
            Lit::from_dimacs(101),
            Lit::from_dimacs(-101),
            Lit::from_dimacs(102),
            Lit::from_dimacs(-102),
        ] {
            assert!(gate10.inputs.contains(&lit));
        }
        assert!(gate10.is_nested_monotonically);

        for (i, earlier) in structure.gates.iter().enumerate() {
            let earlier_var = earlier.output.to_var_index();
            for later in &structure.gates[i + 1..] {
                assert!(
                    !later
                        .inputs
                        .iter()
                        .any(|input| input.to_var_index() == earlier_var),
                    "gate for {:?} (discovered earlier) is used as an input of {:?} (discovered later)",
                    earlier.output,
                    later.output
                );
            }
        }
    }

    #[test]
    fn scan_is_deterministic_across_runs() {
        let formula = cnf_formula![
            1;
            -1, 2;
            -1, 3;
            1, -2, -3;
        ];
        let handles: Vec<_> = formula.handles().collect();

        let first = scan_gates(&formula, handles.clone());
        let second = scan_gates(&formula, handles);

        assert_eq!(first, second);
    }
}
