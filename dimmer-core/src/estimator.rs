//! Cycle Estimator - Rechenarbeit des Recompute-Tasks
//!
//! Läuft mit normaler Task-Priorität, wartet auf das Wake-Signal des
//! Line Sensors und berechnet dann Offset bzw. Zündverzögerung.

use core::sync::atomic::Ordering;

use crate::logic::{trigger_delay, zero_crossing_offset};
use crate::state::DimmerShared;
use crate::types::{Micros, Recompute};

/// Schreib-Handle des Recompute-Tasks
pub struct CycleEstimator<'a> {
    shared: &'a DimmerShared,
    /// Zeitstempel der zuletzt verarbeiteten steigenden Flanke
    last_rising: Option<Micros>,
}

impl<'a> CycleEstimator<'a> {
    pub(crate) fn new(shared: &'a DimmerShared) -> Self {
        Self {
            shared,
            last_rising: None,
        }
    }

    /// Wartet auf die nächste Flanke
    ///
    /// Mehrere Flanken vor dem Aufwachen ergeben nur ein Aufwachen.
    pub async fn wait(&self) {
        self.shared.wake.wait().await;
    }

    /// Ein Rechendurchlauf für die seit dem letzten Durchlauf gesehenen Flanken
    ///
    /// - neue steigende Flanke (oder Pegel high): neue Zündverzögerung aus
    ///   Helligkeit, eben gemessener Periode und aktuellem Offset
    /// - Pegel low nach steigender und fallender Flanke: Offset = halbe
    ///   Impulsbreite
    ///
    /// Kommt der Task erst nach der fallenden Flanke dran, werden beide
    /// Werte in diesem Durchlauf berechnet.
    pub fn recompute(&mut self) -> Recompute {
        let shared = self.shared;

        // Acquire zuerst: danach sind die Zeitstempel der Flanke sichtbar
        let is_high = shared.is_crossing_zero.load(Ordering::Acquire);
        let has_rising = shared.has_rising.load(Ordering::Relaxed);
        let rising_time = shared.rising_time.load(Ordering::Relaxed);
        let new_rising = has_rising && self.last_rising != Some(rising_time);

        let delay = if is_high || new_rising {
            self.last_rising = Some(rising_time);
            let delay = trigger_delay(
                shared.brightness.get(),
                shared.period.load(Ordering::Relaxed),
                shared.zero_crossing_offset.load(Ordering::Relaxed),
            );
            shared.trigger_delay.store(delay, Ordering::Release);
            Some(delay)
        } else {
            None
        };

        let offset = if !is_high && has_rising && shared.has_falling.load(Ordering::Relaxed) {
            let offset = zero_crossing_offset(
                rising_time,
                shared.falling_time.load(Ordering::Relaxed),
            );
            shared.zero_crossing_offset.store(offset, Ordering::Relaxed);
            Some(offset)
        } else {
            None
        };

        match (delay, offset) {
            (Some(trigger_delay), Some(zero_crossing_offset)) => Recompute::DelayAndOffset {
                trigger_delay,
                zero_crossing_offset,
            },
            (Some(delay), None) => Recompute::TriggerDelay(delay),
            (None, Some(offset)) => Recompute::ZeroCrossingOffset(offset),
            (None, None) => Recompute::Idle,
        }
    }

    /// Endlosschleife des Recompute-Tasks: warten, rechnen, melden
    pub async fn run<F: FnMut(Recompute)>(&mut self, mut on_result: F) -> ! {
        loop {
            self.wait().await;
            on_result(self.recompute());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::state::DimmerShared;
    use crate::traits::{DimmerError, OneShotTimer, TriggerOutput};
    use crate::types::{Brightness, Micros, PulsePolicy, Recompute};

    struct NoOutput;

    impl TriggerOutput for NoOutput {
        fn assert_trigger(&mut self) -> Result<(), DimmerError> {
            Ok(())
        }

        fn release_trigger(&mut self) -> Result<(), DimmerError> {
            Ok(())
        }
    }

    struct NoTimer;

    impl OneShotTimer for NoTimer {
        fn arm(&mut self, _delay_us: Micros) -> Result<(), DimmerError> {
            Ok(())
        }

        fn cancel(&mut self) -> Result<(), DimmerError> {
            Ok(())
        }
    }

    #[test]
    fn test_recompute_idle_before_edges() {
        let shared = DimmerShared::new();
        let mut parts = shared.split(PulsePolicy::default()).unwrap();
        assert_eq!(parts.estimator.recompute(), Recompute::Idle);
    }

    #[test]
    fn test_recompute_after_coalesced_edges() {
        let shared = DimmerShared::new();
        let mut parts = shared.split(PulsePolicy::default()).unwrap();
        let mut output = NoOutput;
        let mut timer = NoTimer;
        shared.brightness().set(Brightness::clamped(50));

        // Erster Zyklus normal: Offset 100 us
        parts.sensor.on_edge(1_000, true, &mut output, &mut timer).unwrap();
        parts.estimator.recompute();
        parts.sensor.on_edge(1_200, false, &mut output, &mut timer).unwrap();
        parts.estimator.recompute();

        // Zweiter Zyklus: beide Flanken vor dem Aufwachen
        parts.sensor.on_edge(11_000, true, &mut output, &mut timer).unwrap();
        parts.sensor.on_edge(11_300, false, &mut output, &mut timer).unwrap();

        assert_eq!(
            parts.estimator.recompute(),
            Recompute::DelayAndOffset {
                trigger_delay: 5_100,
                zero_crossing_offset: 150,
            }
        );
        assert_eq!(shared.trigger_delay(), 5_100);

        // Gleiche Flanken nochmal: nur der Offset wird neu berechnet
        assert_eq!(
            parts.estimator.recompute(),
            Recompute::ZeroCrossingOffset(150)
        );
    }

    #[test]
    fn test_wait_returns_after_wake() {
        let shared = DimmerShared::new();
        let parts = shared.split(PulsePolicy::default()).unwrap();

        shared.wake.signal(());
        shared.wake.signal(());
        embassy_futures::block_on(parts.estimator.wait());

        // Zweites Signal wurde nicht eingereiht
        assert!(!shared.wake.signaled());
    }
}
