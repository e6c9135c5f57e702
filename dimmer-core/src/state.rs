//! Gemeinsamer Zustand der Regelschleife
//!
//! Alle Felder sind atomare Skalare ohne Locks. Jedes Feld hat genau einen
//! schreibenden Kontext; das wird über `DimmerShared::split()` erzwungen,
//! das die Schreib-Handles nur ein einziges Mal herausgibt:
//!
//! | Kontext | Handle | schreibt |
//! |---|---|---|
//! | GPIO-Interrupt | `LineSensor` | Zeitstempel, Periode, `is_crossing_zero` |
//! | Recompute-Task | `CycleEstimator` | Offset, Zündverzögerung |
//! | Interrupt + Timer-Callback | `TriggerScheduler` | Zündphase (nur per CAS) |
//! | HTTP | `BrightnessStore` | Helligkeit |

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::estimator::CycleEstimator;
use crate::scheduler::{TriggerPhase, TriggerScheduler};
use crate::sensor::LineSensor;
use crate::types::{Brightness, DimmerSnapshot, Micros, PulsePolicy};

/// Wake-Signal für den Recompute-Task
///
/// Single-Slot: ein erneutes `signal()` vor dem Abholen ist ein No-op,
/// es wird nie doppelt eingereiht.
pub type WakeSignal = Signal<CriticalSectionRawMutex, ()>;

/// Extern beschreibbare Helligkeit (last write wins)
pub struct BrightnessStore {
    percent: AtomicU8,
}

impl BrightnessStore {
    pub const fn new() -> Self {
        Self {
            percent: AtomicU8::new(0),
        }
    }

    /// Speichert eine (bereits begrenzte) Helligkeit
    pub fn set(&self, brightness: Brightness) {
        self.percent.store(brightness.percent(), Ordering::Relaxed);
    }

    /// Liest die aktuelle Helligkeit
    pub fn get(&self) -> Brightness {
        Brightness::clamped(i32::from(self.percent.load(Ordering::Relaxed)))
    }
}

impl Default for BrightnessStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Diagnose-Zähler (laufen bei Überlauf über)
pub(crate) struct Counters {
    pub(crate) edges: AtomicU32,
    pub(crate) armed: AtomicU32,
    pub(crate) suppressed: AtomicU32,
    pub(crate) fired: AtomicU32,
}

impl Counters {
    const fn new() -> Self {
        Self {
            edges: AtomicU32::new(0),
            armed: AtomicU32::new(0),
            suppressed: AtomicU32::new(0),
            fired: AtomicU32::new(0),
        }
    }

    pub(crate) fn bump(counter: &AtomicU32) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Schreib-Handles der Regelschleife, genau einmal vergeben
pub struct DimmerParts<'a> {
    pub sensor: LineSensor<'a>,
    pub estimator: CycleEstimator<'a>,
    pub scheduler: TriggerScheduler<'a>,
}

/// Prozessweiter Zustand eines Dimmer-Kanals
///
/// Kann als `static` angelegt werden (`const fn new()`).
pub struct DimmerShared {
    // Line Sensor (Interrupt)
    pub(crate) rising_time: AtomicU32,
    pub(crate) falling_time: AtomicU32,
    pub(crate) has_rising: AtomicBool,
    pub(crate) has_falling: AtomicBool,
    pub(crate) period: AtomicU32,
    pub(crate) is_crossing_zero: AtomicBool,

    // Cycle Estimator (Task)
    pub(crate) zero_crossing_offset: AtomicU32,
    pub(crate) trigger_delay: AtomicU32,

    // Trigger Scheduler (Interrupt + Timer-Callback)
    pub(crate) phase: AtomicU8,

    pub(crate) brightness: BrightnessStore,
    pub(crate) wake: WakeSignal,
    pub(crate) counters: Counters,
    split_taken: AtomicBool,
}

impl DimmerShared {
    pub const fn new() -> Self {
        Self {
            rising_time: AtomicU32::new(0),
            falling_time: AtomicU32::new(0),
            has_rising: AtomicBool::new(false),
            has_falling: AtomicBool::new(false),
            period: AtomicU32::new(0),
            is_crossing_zero: AtomicBool::new(false),
            zero_crossing_offset: AtomicU32::new(0),
            // Totzone bis zur ersten Berechnung: ohne Verzögerung keine Zündung
            trigger_delay: AtomicU32::new(Micros::MAX),
            phase: AtomicU8::new(TriggerPhase::Idle as u8),
            brightness: BrightnessStore::new(),
            wake: Signal::new(),
            counters: Counters::new(),
            split_taken: AtomicBool::new(false),
        }
    }

    /// Gibt die Schreib-Handles heraus
    ///
    /// Nur der erste Aufruf liefert `Some`, damit jedes Feld genau einen
    /// schreibenden Kontext behält.
    pub fn split(&self, policy: PulsePolicy) -> Option<DimmerParts<'_>> {
        if self.split_taken.swap(true, Ordering::AcqRel) {
            return None;
        }

        let scheduler = TriggerScheduler::new(self, policy);
        Some(DimmerParts {
            sensor: LineSensor::new(self, scheduler),
            estimator: CycleEstimator::new(self),
            scheduler,
        })
    }

    /// Helligkeits-Speicher für den externen Schreiber (HTTP)
    pub fn brightness(&self) -> &BrightnessStore {
        &self.brightness
    }

    pub fn period(&self) -> Micros {
        self.period.load(Ordering::Relaxed)
    }

    pub fn zero_crossing_offset(&self) -> Micros {
        self.zero_crossing_offset.load(Ordering::Relaxed)
    }

    pub fn trigger_delay(&self) -> Micros {
        self.trigger_delay.load(Ordering::Relaxed)
    }

    pub fn is_crossing_zero(&self) -> bool {
        self.is_crossing_zero.load(Ordering::Relaxed)
    }

    /// `true` zwischen Timer-Start und Ablauf-Callback
    pub fn is_triggering(&self) -> bool {
        self.phase.load(Ordering::Acquire) == TriggerPhase::Pending as u8
    }

    /// Momentaufnahme aller Werte (einzeln gelesen, kann leicht veraltet sein)
    pub fn snapshot(&self) -> DimmerSnapshot {
        DimmerSnapshot {
            brightness: self.brightness.get(),
            period_us: self.period(),
            zero_crossing_offset_us: self.zero_crossing_offset(),
            trigger_delay_us: self.trigger_delay(),
            is_crossing_zero: self.is_crossing_zero(),
            is_triggering: self.is_triggering(),
            edges: self.counters.edges.load(Ordering::Relaxed),
            triggers_armed: self.counters.armed.load(Ordering::Relaxed),
            triggers_suppressed: self.counters.suppressed.load(Ordering::Relaxed),
            triggers_fired: self.counters.fired.load(Ordering::Relaxed),
        }
    }
}

impl Default for DimmerShared {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_only_once() {
        let shared = DimmerShared::new();
        assert!(shared.split(PulsePolicy::default()).is_some());
        assert!(shared.split(PulsePolicy::default()).is_none());
    }

    #[test]
    fn test_initial_delay_is_dead_zone() {
        let shared = DimmerShared::new();
        assert!(crate::logic::is_dead_zone(shared.trigger_delay(), 20_000));
    }

    #[test]
    fn test_brightness_store_defaults_to_off() {
        let store = BrightnessStore::new();
        assert_eq!(store.get(), Brightness::OFF);
    }

    #[test]
    fn test_brightness_store_last_write_wins() {
        let store = BrightnessStore::new();
        store.set(Brightness::clamped(30));
        store.set(Brightness::clamped(70));
        assert_eq!(store.get().percent(), 70);
    }

    #[test]
    fn test_snapshot_initial_state() {
        let shared = DimmerShared::new();
        let snapshot = shared.snapshot();
        assert_eq!(snapshot.period_us, 0);
        assert_eq!(snapshot.trigger_delay_us, Micros::MAX);
        assert!(!snapshot.is_crossing_zero);
        assert!(!snapshot.is_triggering);
        assert_eq!(snapshot.edges, 0);
    }
}
