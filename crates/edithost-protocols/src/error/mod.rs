//! Error types for the edithost protocol layer.

mod bootstrap;
mod expr;
mod feedback;
mod registry;

pub use bootstrap::*;
pub use expr::*;
pub use feedback::*;
pub use registry::*;
