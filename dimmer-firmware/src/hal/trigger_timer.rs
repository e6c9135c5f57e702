// One-Shot Timer für den Zündzeitpunkt
//
// Verbindet den `OneShotTimer` Trait aus dimmer-core mit einem esp-hal
// Hardware-Timer (TIMG1). TIMG0 gehört dem esp-rtos Scheduler.

use dimmer_core::{DimmerError, Micros, OneShotTimer};
use esp_hal::Blocking;
use esp_hal::interrupt::InterruptHandler;
use esp_hal::time::Duration;
use esp_hal::timer::{OneShotTimer as HalOneShotTimer, Timer};

/// Hardware-Timer, dessen Ablauf-Interrupt den Zündausgang schaltet
pub struct TriacTimer {
    timer: HalOneShotTimer<'static, Blocking>,
}

impl TriacTimer {
    /// Erstellt den Timer und registriert den Ablauf-Handler
    ///
    /// Der Handler muss `clear_interrupt()` aufrufen (über `TriacTimer::acknowledge`).
    pub fn new(timer: impl Timer + 'static, handler: InterruptHandler) -> Self {
        let mut timer = HalOneShotTimer::new(timer);
        timer.set_interrupt_handler(handler);
        Self { timer }
    }

    /// Quittiert den Ablauf-Interrupt
    pub fn acknowledge(&mut self) {
        self.timer.clear_interrupt();
    }
}

impl OneShotTimer for TriacTimer {
    fn arm(&mut self, delay_us: Micros) -> Result<(), DimmerError> {
        self.timer
            .schedule(Duration::from_micros(u64::from(delay_us)))
            .map_err(|_| DimmerError::TimerFailed)?;
        self.timer.listen();
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), DimmerError> {
        self.timer.stop();
        self.timer.unlisten();
        self.timer.clear_interrupt();
        Ok(())
    }
}
