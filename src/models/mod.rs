//! Curve family implementations.
//!
//! Families are implemented as small, pure functions so that fitting and
//! reporting code can stay generic over `ModelKind`.

pub mod equation;
pub mod model;

pub use equation::*;
pub use model::*;
