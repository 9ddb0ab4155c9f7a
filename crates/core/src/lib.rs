//! `redeploy-core` -- compose step model and shell command execution.
//!
//! Pure domain logic with no console or configuration concerns: the
//! [`compose`] module renders the fixed rebuild sequence into shell text,
//! [`executor`] defines the narrow [`CommandRunner`](executor::CommandRunner)
//! seam, and [`subprocess`] is the real `sh -c` implementation.

pub mod compose;
pub mod error;
pub mod executor;
pub mod subprocess;
