//! Occurrence lists with lazy bulk deletion.
//!
//! Grounded on `include/gatekit/detail/occurrence_list.h` from the reference implementation, but
//! reworked per this crate's redesigned lazy-deletion contract: the reference implementation
//! erases eagerly (`unstable_erase_first`, O(|clause|) per removed literal occurrence), which
//! dominates scan time on large instances. This module instead buffers removals per literal and
//! reconciles them with a single hash-sorted linear pass on the next read, via `Vec::retain`
//! over the sorted pending band.
use std::hash::{Hash, Hasher};

use gate_recovery_formula::{ClauseAccess, Literal};
use rustc_hash::FxHasher;

fn fx_hash<H: Hash>(value: &H) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Removes the first element equal to `value`, in O(1) amortized time by swapping with the last
/// element. Order among the remaining elements is not preserved.
fn unstable_erase_first<T: PartialEq>(container: &mut Vec<T>, value: &T) {
    if let Some(pos) = container.iter().position(|item| item == value) {
        container.swap_remove(pos);
    }
}

/// Per-literal slot: a live clause list, a pending-removal buffer, and whether `clauses` is
/// currently sorted by clause-handle hash.
struct LitSlot<H> {
    clauses: Vec<H>,
    clauses_to_remove: Vec<H>,
    is_sorted: bool,
}

impl<H> Default for LitSlot<H> {
    fn default() -> Self {
        LitSlot {
            clauses: Vec::new(),
            clauses_to_remove: Vec::new(),
            is_sorted: false,
        }
    }
}

/// Maps each literal to the clauses that currently contain it, with lazy bulk deletion.
///
/// Built once from an input clause stream and mutated only by the [structure
/// scanner](crate::scanner::scan_gates) over the course of a single scan.
pub struct OccurrenceList<L, H> {
    by_lit: Vec<LitSlot<H>>,
    unaries: Vec<L>,
}

impl<L: Literal, H: Copy + Eq + Hash> OccurrenceList<L, H> {
    /// Builds an occurrence list from a clause stream, given as an iterator of clause handles
    /// accessible through `access`.
    ///
    /// Two-pass construction: the first pass counts per-literal occurrences so the second pass
    /// can push into pre-reserved buffers without incremental reallocation.
    pub fn new<A, I>(access: &A, handles: I) -> Self
    where
        A: ClauseAccess<L, Handle = H>,
        I: IntoIterator<Item = H>,
        I::IntoIter: Clone,
    {
        let iter = handles.into_iter();

        let mut counts: Vec<usize> = Vec::new();
        for handle in iter.clone() {
            for &lit in access.iterate(handle) {
                let idx = lit.to_index();
                if idx >= counts.len() {
                    counts.resize(idx + 1, 0);
                }
                counts[idx] += 1;
            }
        }

        let mut by_lit: Vec<LitSlot<H>> = counts
            .into_iter()
            .map(|count| LitSlot {
                clauses: Vec::with_capacity(count),
                ..LitSlot::default()
            })
            .collect();

        let mut unaries = Vec::new();

        for handle in iter {
            let lits = access.iterate(handle);
            for &lit in lits {
                by_lit[lit.to_index()].clauses.push(handle);
            }
            if lits.len() == 1 {
                unaries.push(lits[0]);
            }
        }

        OccurrenceList { by_lit, unaries }
    }

    /// Upper bound of the literal index space seen so far (the highest index plus one has a
    /// slot, possibly empty).
    pub fn max_lit_index(&self) -> usize {
        self.by_lit.len().saturating_sub(1)
    }

    /// The literals of current unit clauses.
    pub fn unaries(&self) -> &[L] {
        &self.unaries
    }

    /// Cheap proxy for the cost of the next `clauses(l)` call: the size of `l`'s and
    /// `negate(l)`'s pending-removal buffers. Used by the scanner to visit cheap candidates
    /// first, reconciling small buffers before expensive ones.
    pub fn get_estimated_lookup_cost(&self, lit: L) -> usize {
        self.pending_len(lit.to_index()) + self.pending_len(lit.negate().to_index())
    }

    fn pending_len(&self, idx: usize) -> usize {
        self.by_lit
            .get(idx)
            .map(|slot| slot.clauses_to_remove.len())
            .unwrap_or(0)
    }

    /// The clauses currently containing `l`, with all scheduled removals reconciled.
    ///
    /// Returns an empty slice if `l` was never seen by the occurrence list.
    pub fn clauses(&mut self, lit: L) -> &[H] {
        let idx = lit.to_index();
        if idx >= self.by_lit.len() {
            return &[];
        }
        self.reconcile(idx);
        &self.by_lit[idx].clauses
    }

    /// Schedules `clause` for removal from every literal's list it occurs in. Eagerly drops it
    /// from [`Self::unaries`] if it is a unit clause.
    pub fn remove<A: ClauseAccess<L, Handle = H>>(&mut self, access: &A, clause: H) {
        let lits = access.iterate(clause);
        for &lit in lits {
            let idx = lit.to_index();
            if idx < self.by_lit.len() {
                self.by_lit[idx].clauses_to_remove.push(clause);
            }
        }
        if lits.len() == 1 {
            unstable_erase_first(&mut self.unaries, &lits[0]);
        }
    }

    /// Batch form of [`Self::remove`].
    pub fn remove_all<A: ClauseAccess<L, Handle = H>>(
        &mut self,
        access: &A,
        clauses: impl IntoIterator<Item = H>,
    ) {
        for clause in clauses {
            self.remove(access, clause);
        }
    }

    /// Atomically purges every clause referenced by `clauses(output) ∪ clauses(negate(output))`
    /// from every literal's list. Leaves both `output`'s and `negate(output)`'s buffers empty.
    pub fn remove_gate_root<A: ClauseAccess<L, Handle = H>>(&mut self, access: &A, output: L) {
        let mut to_remove: Vec<H> = Vec::new();
        to_remove.extend_from_slice(self.clauses(output));
        to_remove.extend_from_slice(self.clauses(output.negate()));
        self.remove_all(access, to_remove);

        // `to_remove`'s clauses contain `output`/`negate(output)` themselves, so `remove_all`
        // just re-buffered entries into these two literals' own pending lists. Reconcile them
        // away immediately so both buffers are actually left empty.
        self.reconcile(output.to_index());
        self.reconcile(output.negate().to_index());
    }

    /// Removes the specific unit clause with literal `unary` (and drops `unary` from
    /// [`Self::unaries`]).
    pub fn remove_unary<A: ClauseAccess<L, Handle = H>>(&mut self, access: &A, unary: L) {
        let idx = unary.to_index();
        if idx < self.by_lit.len() {
            self.reconcile(idx);
            let slot = &mut self.by_lit[idx];
            if let Some(pos) = slot
                .clauses
                .iter()
                .position(|&handle| access.size(handle) == 1)
            {
                slot.clauses.swap_remove(pos);
                slot.is_sorted = false;
            }
        }
        unstable_erase_first(&mut self.unaries, &unary);
    }

    /// Reconciles the pending-removal buffer of literal index `idx` against its live clause
    /// list, if there is anything pending.
    ///
    /// Both lists are sorted by clause-handle hash (the live list only on first need, thereafter
    /// tracked by `is_sorted`), then merged in a single linear pass: each live element is kept
    /// unless some pending element both shares its hash and is equal to it. Equal hashes that
    /// are not equal values (a collision) form a "band" that is scanned in full, so collisions
    /// cost extra comparisons but never cause an incorrect removal.
    fn reconcile(&mut self, idx: usize) {
        let slot = &mut self.by_lit[idx];
        if slot.clauses_to_remove.is_empty() {
            return;
        }

        if !slot.is_sorted {
            slot.clauses.sort_unstable_by_key(fx_hash);
            slot.is_sorted = true;
        }

        let mut to_remove = std::mem::take(&mut slot.clauses_to_remove);
        to_remove.sort_unstable_by_key(fx_hash);

        let mut band_start = 0;
        slot.clauses.retain(|item| {
            let hash = fx_hash(item);

            while band_start < to_remove.len() && fx_hash(&to_remove[band_start]) < hash {
                band_start += 1;
            }

            let mut band = band_start;
            let mut matched = false;
            while band < to_remove.len() && fx_hash(&to_remove[band]) == hash {
                if to_remove[band] == *item {
                    matched = true;
                    break;
                }
                band += 1;
            }

            !matched
        });
    }
}
