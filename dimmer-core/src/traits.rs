//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use crate::types::Micros;

/// Fehler-Typ für Hardware-Operationen der Regelschleife
///
/// Im laufenden Betrieb nie fatal: der Fehler wird geloggt und der
/// nächste Netzzyklus synchronisiert den Zustand neu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimmerError {
    /// Zündausgang konnte nicht gesetzt werden
    OutputFailed,
    /// One-Shot-Timer konnte nicht gestartet oder gestoppt werden
    TimerFailed,
}

/// Trait für den Zündausgang (TRIAC-Gate, active-high)
///
/// # Implementierungen
/// - **Production:** TriacGate (ESP32 GPIO)
/// - **Testing:** MockTriggerOutput (in-memory Mock)
pub trait TriggerOutput: Send {
    /// Aktiviert den Zündausgang (Pegel high)
    fn assert_trigger(&mut self) -> Result<(), DimmerError>;

    /// Deaktiviert den Zündausgang (Pegel low)
    fn release_trigger(&mut self) -> Result<(), DimmerError>;
}

/// Trait für den Hardware-One-Shot-Timer
///
/// Der Ablauf-Callback selbst gehört nicht zum Trait: die Plattform ruft
/// bei Ablauf `TriggerScheduler::on_expiry()` auf.
///
/// # Implementierungen
/// - **Production:** TriacTimer (ESP32 TIMG1)
/// - **Testing:** MockOneShotTimer (simulierte Zeit)
pub trait OneShotTimer: Send {
    /// Startet den Timer einmalig mit `delay_us` Mikrosekunden
    ///
    /// Ein zweiter Aufruf vor dem Ablauf ist nicht definiert und wird vom
    /// `TriggerScheduler` verhindert.
    fn arm(&mut self, delay_us: Micros) -> Result<(), DimmerError>;

    /// Stoppt einen laufenden Timer
    fn cancel(&mut self) -> Result<(), DimmerError>;
}

#[cfg(feature = "defmt")]
impl defmt::Format for DimmerError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DimmerError::OutputFailed => defmt::write!(fmt, "Output failed"),
            DimmerError::TimerFailed => defmt::write!(fmt, "Timer failed"),
        }
    }
}
