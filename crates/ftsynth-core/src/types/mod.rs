//! Data model shared by the routing engine: chip topology, the program's
//! gate records, logical qubit roles, the dependency graph, and the
//! mutable logical/physical mapping.

pub mod chip;
pub mod dag;
pub mod gate;
pub mod mapping;
pub mod role;

pub use chip::{Chip, ChipDimension, DistanceMatrix};
pub use dag::{Dag, NodeId};
pub use gate::{GateId, GateKind, GateRecord, MoveTarget};
pub use mapping::{QubitMapping, QubitStatus};
pub use role::Role;
