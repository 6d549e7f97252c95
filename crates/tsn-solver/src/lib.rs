//! Type resolution and inference.
//!
//! Turns surface-level IR types into canonical types suitable for emission:
//! alias resolution, nullish stripping, union flattening, contextual
//! inference for lambdas and object literals, and the numeric-width
//! discipline. Inference is bidirectional but bounded: it flows outside-in
//! only, with no unification; where it cannot conclude, the caller gets a
//! signal to diagnose rather than an invented type.

pub mod infer;
pub mod nullish;
pub mod resolve;
pub mod subst;
pub mod unions;
pub mod widen;

pub use infer::{infer_lambda_param_types, infer_object_literal};
pub use nullish::{Nullishness, nullishness, strip_nullish};
pub use resolve::{DYNAMIC_ANY, ResolveError, contains_dynamic_any, resolve_alias};
pub use subst::TypeEnv;
pub use unions::{flatten_union, union_of};
pub use widen::{NumericWidth, literal_fits, widen_literal, width_of};
