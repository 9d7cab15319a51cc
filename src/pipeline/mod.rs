//! Pipeline entry points for monitor operations.
//!
//! - `run_monitor`: one full fetch/detect/persist/notify cycle
//! - `run_export`: aggregate run logs into summary reports

pub mod detect;
pub mod export;
pub mod monitor;
pub mod snapshot;

pub use detect::detect;
pub use export::run_export;
pub use monitor::run_monitor;
pub use snapshot::build_snapshot;
