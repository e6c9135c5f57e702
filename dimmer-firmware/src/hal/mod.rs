// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Hardware-Traits aus dimmer-core für den ESP32-C6
// und bindet die Regelschleife an GPIO- und Timer-Interrupts.

pub mod interrupts;
pub mod trigger_output;
pub mod trigger_timer;

pub use trigger_output::TriacGate;
pub use trigger_timer::TriacTimer;
