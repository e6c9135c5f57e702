//! Line Sensor - Flanken-Verarbeitung im GPIO-Interrupt
//!
//! Einziger Erzeuger von Flanken-Zeitstempeln. Läuft in begrenzter Zeit
//! und blockiert nie.

use core::sync::atomic::Ordering;

use crate::scheduler::TriggerScheduler;
use crate::state::{Counters, DimmerShared};
use crate::traits::{DimmerError, OneShotTimer, TriggerOutput};
use crate::types::{EdgeOutcome, Micros};

/// Schreib-Handle des GPIO-Interrupts
pub struct LineSensor<'a> {
    shared: &'a DimmerShared,
    scheduler: TriggerScheduler<'a>,
}

impl<'a> LineSensor<'a> {
    pub(crate) fn new(shared: &'a DimmerShared, scheduler: TriggerScheduler<'a>) -> Self {
        Self { shared, scheduler }
    }

    /// Verarbeitet eine Flanke des Nulldurchgangs-Signals
    ///
    /// # Steigende Flanke (vorher low)
    /// 1. Zündausgang sofort abschalten
    /// 2. Timer mit der im letzten Zyklus berechneten Verzögerung starten,
    ///    falls nichts aussteht und `trigger_delay < period` (alte Periode)
    /// 3. Periode seit der letzten steigenden Flanke messen, Zeitstempel merken
    ///
    /// # Fallende Flanke (vorher high)
    /// Nur den Zeitstempel merken.
    ///
    /// Danach immer den Pegel übernehmen und den Recompute-Task wecken.
    /// Hardware-Fehler werden erst nach dieser Buchführung zurückgegeben.
    pub fn on_edge<O: TriggerOutput, T: OneShotTimer>(
        &mut self,
        now: Micros,
        level: bool,
        output: &mut O,
        timer: &mut T,
    ) -> Result<EdgeOutcome, DimmerError> {
        let shared = self.shared;
        let was_high = shared.is_crossing_zero.load(Ordering::Relaxed);
        let mut error = None;

        Counters::bump(&shared.counters.edges);

        let outcome = if level && !was_high {
            if let Err(e) = self.scheduler.release(output, timer) {
                error = Some(e);
            }

            let period = shared.period.load(Ordering::Relaxed);
            let trigger_delay = shared.trigger_delay.load(Ordering::Acquire);
            let armed = match self.scheduler.arm_if_idle(trigger_delay, period, timer) {
                Ok(armed) => armed,
                Err(e) => {
                    error = error.or(Some(e));
                    None
                }
            };

            if shared.has_rising.load(Ordering::Relaxed) {
                let last_rising = shared.rising_time.load(Ordering::Relaxed);
                shared
                    .period
                    .store(now.wrapping_sub(last_rising), Ordering::Relaxed);
            }
            shared.rising_time.store(now, Ordering::Relaxed);
            shared.has_rising.store(true, Ordering::Relaxed);

            EdgeOutcome::Rising { armed }
        } else if !level && was_high {
            shared.falling_time.store(now, Ordering::Relaxed);
            shared.has_falling.store(true, Ordering::Relaxed);

            EdgeOutcome::Falling
        } else {
            EdgeOutcome::Ignored
        };

        // Release: Zeitstempel sind für den Task sichtbar, sobald er den Pegel sieht
        shared.is_crossing_zero.store(level, Ordering::Release);
        shared.wake.signal(());

        match error {
            Some(e) => Err(e),
            None => Ok(outcome),
        }
    }
}
