//! Signature partitioning: backbones and equivalence classes from simulated columns.
//!
//! Grounded on `include/gatekit/detail/bitvector_partition.h`'s `bitvector_sequence_partition`:
//! a rolling hash per variable of its column and its column's complement across every simulation
//! round, plus running AND-reductions tracking whether a variable's column has ever been anything
//! but all-ones or all-zeros. `compress()` discards entries whose positive hash is unique (no
//! other variable, negated or not, has behaved identically so far), so the live set shrinks as
//! the simulation progresses. Uses `rustc_hash::FxHashMap` for the hash-occurrence and
//! equivalence-class maps, consistent with its use elsewhere in this crate for non-adversarial
//! internal hashing.
use rustc_hash::FxHashMap;

use gate_recovery_formula::Literal;

use crate::bitvector::{bitvector_hash, xorshift_star, BitVectorMap};

struct HashEntry {
    index: usize,
    pos_hash: u64,
    neg_hash: u64,
    stuck_positive: bool,
    stuck_negative: bool,
}

impl HashEntry {
    fn new(index: usize) -> Self {
        HashEntry {
            index,
            pos_hash: 0,
            neg_hash: 0,
            stuck_positive: true,
            stuck_negative: true,
        }
    }
}

/// The result of a signature partitioner's analysis: backbone literals forced to a fixed value
/// in every observed assignment, and classes of literals observed to always agree with each
/// other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partitions<L> {
    pub backbones: Vec<L>,
    pub equivalences: Vec<Vec<L>>,
}

/// Accumulates per-variable signatures across simulation rounds and, on request, compresses them
/// into a conjectured backbone/equivalence partitioning.
///
/// The partitioning is a conjecture, not a proof: two variables sharing a signature after `N`
/// rounds may still diverge on round `N+1`. More rounds tighten the conjecture but never
/// guarantee it; callers establish confidence by their choice of round count.
///
/// Every entry starts both `stuck_positive` and `stuck_negative`, so reading partitions from a
/// freshly constructed instance with no [`Self::add`] calls yields every variable as a (degenerate,
/// positive) backbone. [`random_simulation`](crate::random_simulation) always folds in at least
/// one round before this is ever observed publicly; direct callers in tests should be aware of it.
pub struct Partitioner {
    entries: Vec<HashEntry>,
}

impl Partitioner {
    /// Creates a partitioner tracking `size` variables (variable indices `0..size`).
    pub fn new(size: usize) -> Self {
        Partitioner {
            entries: (0..size).map(HashEntry::new).collect(),
        }
    }

    /// Folds one simulation round's columns into every tracked variable's running signature.
    pub fn add(&mut self, columns: &BitVectorMap) {
        debug_assert_eq!(columns.len(), self.entries.len());

        for entry in &mut self.entries {
            let bv = columns[entry.index];
            entry.pos_hash = xorshift_star(entry.pos_hash ^ bitvector_hash(&bv));
            entry.neg_hash = xorshift_star(entry.neg_hash ^ bitvector_hash(&!bv));
            entry.stuck_positive &= bv.is_all_one();
            entry.stuck_negative &= bv.is_all_zero();
        }
    }

    /// Discards entries that can no longer belong to any backbone or equivalence class: a
    /// non-stuck entry whose positive hash occurs exactly once among all tracked entries' hashes
    /// (positive and negative alike) has no partner and will never form a class.
    fn compress(&mut self) {
        let mut counts: FxHashMap<u64, usize> = FxHashMap::default();
        for entry in &self.entries {
            *counts.entry(entry.pos_hash).or_insert(0) += 1;
            *counts.entry(entry.neg_hash).or_insert(0) += 1;
        }

        self.entries.retain(|entry| {
            if entry.stuck_positive || entry.stuck_negative {
                return true;
            }
            counts[&entry.pos_hash] != 1
        });
    }

    /// Compresses the tracked entries and reads off the current backbone/equivalence
    /// conjecture.
    pub fn get_partitions<L: Literal>(&mut self) -> Partitions<L> {
        self.compress();

        let mut backbones = Vec::new();
        let mut classes: FxHashMap<u64, Vec<L>> = FxHashMap::default();

        for entry in &self.entries {
            if entry.stuck_positive || entry.stuck_negative {
                backbones.push(L::to_lit(entry.index, entry.stuck_positive));
                continue;
            }

            let lit_pos = L::to_lit(entry.index, true);
            let lit_neg = L::to_lit(entry.index, false);

            if let Some(class) = classes.get_mut(&entry.pos_hash) {
                class.push(lit_pos);
            } else if let Some(class) = classes.get_mut(&entry.neg_hash) {
                class.push(lit_neg);
            } else {
                classes.entry(entry.pos_hash).or_default().push(lit_pos);
            }
        }

        let mut equivalences = Vec::new();
        for entry in &self.entries {
            if let Some(class) = classes.remove(&entry.pos_hash) {
                equivalences.push(class);
            }
        }

        Partitions {
            backbones,
            equivalences,
        }
    }
}
