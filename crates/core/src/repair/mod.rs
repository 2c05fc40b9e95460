pub mod hook;

pub use hook::{Propagation, RepairFailure, RepairHook, RepairReport};
