// TRIAC-Gate Ausgang
//
// Verbindet den `TriggerOutput` Trait aus dimmer-core mit einem
// esp-hal GPIO-Ausgang.

use dimmer_core::{DimmerError, TriggerOutput};
use esp_hal::gpio::{Level, Output, OutputConfig};

/// GPIO-Ausgang zum Optokoppler/TRIAC-Gate (aktiv high)
pub struct TriacGate {
    pin: Output<'static>,
}

impl TriacGate {
    /// Konfiguriert den Pin als Push-Pull-Ausgang, initial low
    pub fn new(pin: impl esp_hal::gpio::OutputPin + 'static) -> Self {
        Self {
            pin: Output::new(pin, Level::Low, OutputConfig::default()),
        }
    }
}

impl TriggerOutput for TriacGate {
    // GPIO-Schreibzugriffe auf dem ESP32-C6 können nicht fehlschlagen
    fn assert_trigger(&mut self) -> Result<(), DimmerError> {
        self.pin.set_high();
        Ok(())
    }

    fn release_trigger(&mut self) -> Result<(), DimmerError> {
        self.pin.set_low();
        Ok(())
    }
}
