//! Visual-row measurement and per-line height reconciliation.

pub mod fragment;
pub mod heights;
pub mod monospace;

pub use fragment::{MeasurementService, VisualFragment, WrapWidth};
pub use heights::{compute_heights, LineHeights};
pub use monospace::MonospaceMeasurement;
