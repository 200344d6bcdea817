//! Gate structure recovery and random-simulation based equivalence/backbone conjecturing for CNF
//! formulas.
//!
//! The two entry points are [`scan_gates`], which recovers a [`GateStructure`] from a CNF formula
//! by breadth-first search from its unit-clause roots, and [`random_simulation`], which evaluates
//! a recovered structure under bit-parallel random simulation to conjecture backbones and
//! equivalence classes among its literals.

pub mod bitvector;
pub mod block;
pub mod eval;
pub mod gate;
pub mod occurrence;
pub mod partition;
pub mod pattern;
pub mod probe;
pub mod scanner;
pub mod simulate;
pub mod structure_eval;

pub use bitvector::{BitVector, BitVectorMap, Randomizer};
pub use gate::{Gate, GateStructure};
pub use partition::{Partitioner, Partitions};
pub use scanner::scan_gates;
pub use simulate::{random_simulation, SimulationConfig};

pub use gate_recovery_formula::{ClauseAccess, CnfFormula, Lit, Literal, Var};
