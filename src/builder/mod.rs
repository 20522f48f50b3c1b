//! Builder API for tables, entry/exit machines and control loops.
//!
//! Fluent builders validate their required pieces at `build()` and report
//! what is missing through `BuildError`.

pub mod control;
pub mod error;
pub mod hsm;
pub mod macros;
pub mod table;

pub use control::ControlLoopBuilder;
pub use error::BuildError;
pub use hsm::HsmBuilder;
pub use table::TableBuilder;
