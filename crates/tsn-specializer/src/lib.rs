//! Generic monomorphisation.
//!
//! Every generic declaration used with concrete type arguments is replaced by
//! a specialised, non-generic copy whose name is a deterministic function of
//! the instantiation: `Box<int>` becomes `Box__int`, `Pair<string, int[]>`
//! becomes `Pair__string__Arr_int`. Requests found inside generic bodies are
//! deferred until that body is itself specialised, giving the transitive
//! closure; iteration runs to a fixed point with a depth bound.

pub mod engine;
pub mod substitute;

pub use engine::{MAX_SPECIALIZATION_DEPTH, specialize};
pub use substitute::{GenericTargets, SpecializationRequest, Substituter, specialized_name};
