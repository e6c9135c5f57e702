//! Dimmer Core - Platform-agnostic Control Loop and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie enthält die Regelschleife des Phasenanschnitt-Dimmers
//! (Line Sensor, Cycle Estimator, Trigger Scheduler, Helligkeit),
//! Traits für die Hardware und Pure Functions.

#![no_std]

pub mod estimator;
pub mod logic;
pub mod scheduler;
pub mod sensor;
pub mod state;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use estimator::CycleEstimator;
pub use logic::{is_dead_zone, parse_brightness, trigger_delay, zero_crossing_offset};
pub use scheduler::TriggerScheduler;
pub use sensor::LineSensor;
pub use state::{BrightnessStore, DimmerParts, DimmerShared, WakeSignal};
pub use traits::{DimmerError, OneShotTimer, TriggerOutput};
pub use types::{
    Brightness, DimmerSnapshot, EdgeOutcome, ExpiryOutcome, Micros, PulsePolicy, Recompute,
};
