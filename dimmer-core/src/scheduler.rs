//! Trigger Scheduler
//!
//! Besitzt die Zündphase und steuert One-Shot-Timer und Zündausgang.
//! Wird aus zwei Interrupt-Kontexten benutzt (GPIO und Timer), daher werden
//! Phasenwechsel nur per Compare-and-Swap durchgeführt.

use core::sync::atomic::Ordering;

use crate::logic::is_dead_zone;
use crate::state::{Counters, DimmerShared};
use crate::traits::{DimmerError, OneShotTimer, TriggerOutput};
use crate::types::{ExpiryOutcome, Micros, PulsePolicy};

/// Zündphase, atomar als `u8` gespeichert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum TriggerPhase {
    /// Kein Timer aktiv
    Idle = 0,
    /// Timer läuft bis zum Zündzeitpunkt (`is_triggering`)
    Pending = 1,
    /// Gezündet, Timer läuft bis zum Ende der festen Pulsbreite
    Holding = 2,
}

/// Handle auf die Zündsteuerung
///
/// `Copy`, damit GPIO-Interrupt und Timer-Callback je eine Kopie halten.
#[derive(Clone, Copy)]
pub struct TriggerScheduler<'a> {
    shared: &'a DimmerShared,
    policy: PulsePolicy,
}

impl<'a> TriggerScheduler<'a> {
    pub(crate) fn new(shared: &'a DimmerShared, policy: PulsePolicy) -> Self {
        Self { shared, policy }
    }

    pub fn policy(&self) -> PulsePolicy {
        self.policy
    }

    fn transition(&self, from: TriggerPhase, to: TriggerPhase) -> bool {
        self.shared
            .phase
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Schaltet den Zündausgang ab (steigende Flanke)
    ///
    /// Ein noch laufender Timer für das Ende einer festen Pulsbreite wird
    /// gestoppt, damit danach wieder neu gestartet werden darf.
    pub fn release<O: TriggerOutput, T: OneShotTimer>(
        &self,
        output: &mut O,
        timer: &mut T,
    ) -> Result<(), DimmerError> {
        let released = output.release_trigger();
        if self.transition(TriggerPhase::Holding, TriggerPhase::Idle) {
            timer.cancel()?;
        }
        released
    }

    /// Startet den Timer, falls nichts aussteht und die Verzögerung
    /// außerhalb der Totzone liegt
    ///
    /// Gibt die gestartete Verzögerung zurück, oder `None` wenn nicht
    /// gezündet wird. Schlägt der Timer-Start fehl, bleibt die Phase `Idle`.
    pub fn arm_if_idle<T: OneShotTimer>(
        &self,
        trigger_delay: Micros,
        period: Micros,
        timer: &mut T,
    ) -> Result<Option<Micros>, DimmerError> {
        if self.shared.phase.load(Ordering::Acquire) != TriggerPhase::Idle as u8 {
            return Ok(None);
        }

        if is_dead_zone(trigger_delay, period) {
            Counters::bump(&self.shared.counters.suppressed);
            return Ok(None);
        }

        // Phase vor dem Start setzen: auch ein sofortiger Ablauf sieht Pending
        if !self.transition(TriggerPhase::Idle, TriggerPhase::Pending) {
            return Ok(None);
        }

        match timer.arm(trigger_delay) {
            Ok(()) => {
                Counters::bump(&self.shared.counters.armed);
                Ok(Some(trigger_delay))
            }
            Err(e) => {
                self.shared
                    .phase
                    .store(TriggerPhase::Idle as u8, Ordering::Release);
                Err(e)
            }
        }
    }

    /// Timer-Ablauf-Callback
    ///
    /// - `Pending`: Zündausgang aktivieren, `is_triggering` löschen, bei
    ///   fester Pulsbreite den Timer für das Abschalten neu starten
    /// - `Holding`: feste Pulsbreite abgelaufen, Ausgang abschalten
    /// - `Idle`: verspäteter Ablauf nach Abbruch, nichts tun
    pub fn on_expiry<O: TriggerOutput, T: OneShotTimer>(
        &self,
        output: &mut O,
        timer: &mut T,
    ) -> Result<ExpiryOutcome, DimmerError> {
        match self.policy {
            PulsePolicy::HoldUntilNextRisingEdge => {
                if self.transition(TriggerPhase::Pending, TriggerPhase::Idle) {
                    Counters::bump(&self.shared.counters.fired);
                    output.assert_trigger()?;
                    return Ok(ExpiryOutcome::Fired);
                }
            }
            PulsePolicy::Fixed { width_us } => {
                if self.transition(TriggerPhase::Pending, TriggerPhase::Holding) {
                    Counters::bump(&self.shared.counters.fired);
                    let asserted = output.assert_trigger();
                    if let Err(e) = timer.arm(width_us) {
                        // Ohne Timer kein Abschalten: sofort wieder freigeben
                        self.shared
                            .phase
                            .store(TriggerPhase::Idle as u8, Ordering::Release);
                        let _ = output.release_trigger();
                        return Err(e);
                    }
                    asserted?;
                    return Ok(ExpiryOutcome::Fired);
                }
            }
        }

        if self.transition(TriggerPhase::Holding, TriggerPhase::Idle) {
            output.release_trigger()?;
            return Ok(ExpiryOutcome::Released);
        }

        Ok(ExpiryOutcome::Spurious)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pin {
        high: bool,
    }

    impl TriggerOutput for Pin {
        fn assert_trigger(&mut self) -> Result<(), DimmerError> {
            self.high = true;
            Ok(())
        }

        fn release_trigger(&mut self) -> Result<(), DimmerError> {
            self.high = false;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Timer {
        armed: Option<Micros>,
        fail_next_arm: bool,
    }

    impl OneShotTimer for Timer {
        fn arm(&mut self, delay_us: Micros) -> Result<(), DimmerError> {
            if self.fail_next_arm {
                self.fail_next_arm = false;
                return Err(DimmerError::TimerFailed);
            }
            self.armed = Some(delay_us);
            Ok(())
        }

        fn cancel(&mut self) -> Result<(), DimmerError> {
            self.armed = None;
            Ok(())
        }
    }

    #[test]
    fn test_arm_then_fire_holds_output() {
        let shared = DimmerShared::new();
        let scheduler = TriggerScheduler::new(&shared, PulsePolicy::HoldUntilNextRisingEdge);
        let (mut pin, mut timer) = (Pin::default(), Timer::default());

        assert_eq!(scheduler.arm_if_idle(5_100, 10_000, &mut timer), Ok(Some(5_100)));
        assert!(shared.is_triggering());

        assert_eq!(scheduler.on_expiry(&mut pin, &mut timer), Ok(ExpiryOutcome::Fired));
        assert!(pin.high);
        assert!(!shared.is_triggering());
    }

    #[test]
    fn test_no_double_arm_while_pending() {
        let shared = DimmerShared::new();
        let scheduler = TriggerScheduler::new(&shared, PulsePolicy::default());
        let mut timer = Timer::default();

        assert_eq!(scheduler.arm_if_idle(1_000, 10_000, &mut timer), Ok(Some(1_000)));
        assert_eq!(scheduler.arm_if_idle(2_000, 10_000, &mut timer), Ok(None));
        assert_eq!(timer.armed, Some(1_000));
    }

    #[test]
    fn test_dead_zone_counts_suppression() {
        let shared = DimmerShared::new();
        let scheduler = TriggerScheduler::new(&shared, PulsePolicy::default());
        let mut timer = Timer::default();

        assert_eq!(scheduler.arm_if_idle(10_100, 10_000, &mut timer), Ok(None));
        assert_eq!(timer.armed, None);
        assert_eq!(shared.snapshot().triggers_suppressed, 1);
    }

    #[test]
    fn test_failed_arm_stays_idle() {
        let shared = DimmerShared::new();
        let scheduler = TriggerScheduler::new(&shared, PulsePolicy::default());
        let mut timer = Timer {
            fail_next_arm: true,
            ..Default::default()
        };

        assert_eq!(
            scheduler.arm_if_idle(1_000, 10_000, &mut timer),
            Err(DimmerError::TimerFailed)
        );
        assert!(!shared.is_triggering());
        assert_eq!(scheduler.arm_if_idle(1_000, 10_000, &mut timer), Ok(Some(1_000)));
    }

    #[test]
    fn test_fixed_width_releases_on_second_expiry() {
        let shared = DimmerShared::new();
        let scheduler = TriggerScheduler::new(&shared, PulsePolicy::Fixed { width_us: 300 });
        let (mut pin, mut timer) = (Pin::default(), Timer::default());

        scheduler.arm_if_idle(2_000, 10_000, &mut timer).unwrap();
        assert_eq!(scheduler.on_expiry(&mut pin, &mut timer), Ok(ExpiryOutcome::Fired));
        assert!(pin.high);
        assert_eq!(timer.armed, Some(300));

        assert_eq!(scheduler.on_expiry(&mut pin, &mut timer), Ok(ExpiryOutcome::Released));
        assert!(!pin.high);
    }

    #[test]
    fn test_release_cancels_pending_pulse_end() {
        let shared = DimmerShared::new();
        let scheduler = TriggerScheduler::new(&shared, PulsePolicy::Fixed { width_us: 300 });
        let (mut pin, mut timer) = (Pin::default(), Timer::default());

        scheduler.arm_if_idle(2_000, 10_000, &mut timer).unwrap();
        scheduler.on_expiry(&mut pin, &mut timer).unwrap();
        scheduler.release(&mut pin, &mut timer).unwrap();

        assert!(!pin.high);
        assert_eq!(timer.armed, None);
        assert_eq!(scheduler.arm_if_idle(2_000, 10_000, &mut timer), Ok(Some(2_000)));
    }

    #[test]
    fn test_spurious_expiry_is_ignored() {
        let shared = DimmerShared::new();
        let scheduler = TriggerScheduler::new(&shared, PulsePolicy::default());
        let (mut pin, mut timer) = (Pin::default(), Timer::default());

        assert_eq!(scheduler.on_expiry(&mut pin, &mut timer), Ok(ExpiryOutcome::Spurious));
        assert!(!pin.high);
    }
}
