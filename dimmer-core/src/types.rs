//! Core Types für die Phasenanschnitt-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

/// Monotone Zeit in Mikrosekunden
///
/// 32 Bit reichen: Differenzen werden immer mit `wrapping_sub` gebildet,
/// der Überlauf nach ~71 Minuten ist damit harmlos.
pub type Micros = u32;

/// Helligkeit in Prozent (0-100)
///
/// Kann per Konstruktion nur Werte im Bereich `0..=100` enthalten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Brightness(u8);

impl Brightness {
    /// Lampe aus (Totzone)
    pub const OFF: Self = Self(0);
    /// Volle Leistung
    pub const FULL: Self = Self(100);

    /// Erstellt eine Helligkeit und begrenzt den Wert auf `0..=100`
    ///
    /// # Beispiele
    ///
    /// ```
    /// # use dimmer_core::Brightness;
    /// assert_eq!(Brightness::clamped(250).percent(), 100);
    /// assert_eq!(Brightness::clamped(-7).percent(), 0);
    /// assert_eq!(Brightness::clamped(42).percent(), 42);
    /// ```
    pub const fn clamped(value: i32) -> Self {
        if value > 100 {
            Self::FULL
        } else if value < 0 {
            Self::OFF
        } else {
            Self(value as u8)
        }
    }

    /// Helligkeit als Prozentwert
    pub const fn percent(self) -> u8 {
        self.0
    }
}

impl core::convert::TryFrom<u8> for Brightness {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 100 { Ok(Self(value)) } else { Err(()) }
    }
}

impl core::fmt::Display for Brightness {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pulsbreiten-Strategie für den Zündausgang
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PulsePolicy {
    /// Ausgang bleibt vom Zündzeitpunkt bis zur nächsten steigenden Flanke
    /// des Nulldurchgangs-Signals aktiv
    #[default]
    HoldUntilNextRisingEdge,
    /// Ausgang wird nach `width_us` Mikrosekunden wieder abgeschaltet
    Fixed { width_us: Micros },
}

/// Ergebnis einer Flanken-Verarbeitung im Line Sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// Steigende Flanke; `armed` enthält die Verzögerung, falls der Timer
    /// gestartet wurde
    Rising { armed: Option<Micros> },
    /// Fallende Flanke, Zeitstempel gespeichert
    Falling,
    /// Pegel unverändert (Störimpuls), keine Zeitstempel geändert
    Ignored,
}

/// Ergebnis eines Durchlaufs des Recompute-Tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recompute {
    /// Neue Zündverzögerung für den nächsten Zyklus
    TriggerDelay(Micros),
    /// Neuer Offset zwischen steigender Flanke und echtem Nulldurchgang
    ZeroCrossingOffset(Micros),
    /// Steigende und fallende Flanke mit einem einzigen Aufwachen
    DelayAndOffset {
        trigger_delay: Micros,
        zero_crossing_offset: Micros,
    },
    /// Noch nicht genug Flanken gesehen
    Idle,
}

/// Ergebnis eines Timer-Ablaufs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryOutcome {
    /// Zündausgang aktiviert
    Fired,
    /// Feste Pulsbreite abgelaufen, Zündausgang deaktiviert
    Released,
    /// Kein Zündvorgang ausstehend (z.B. nach Abbruch)
    Spurious,
}

/// Momentaufnahme des Regler-Zustands für Status-Abfragen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DimmerSnapshot {
    pub brightness: Brightness,
    pub period_us: Micros,
    pub zero_crossing_offset_us: Micros,
    pub trigger_delay_us: Micros,
    pub is_crossing_zero: bool,
    pub is_triggering: bool,
    pub edges: u32,
    pub triggers_armed: u32,
    pub triggers_suppressed: u32,
    pub triggers_fired: u32,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Brightness {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}%", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PulsePolicy {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PulsePolicy::HoldUntilNextRisingEdge => defmt::write!(fmt, "HoldUntilNextRisingEdge"),
            PulsePolicy::Fixed { width_us } => defmt::write!(fmt, "Fixed {{ {}us }}", width_us),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EdgeOutcome {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            EdgeOutcome::Rising { armed: Some(delay) } => {
                defmt::write!(fmt, "Rising {{ armed: {}us }}", delay)
            }
            EdgeOutcome::Rising { armed: None } => defmt::write!(fmt, "Rising {{ not armed }}"),
            EdgeOutcome::Falling => defmt::write!(fmt, "Falling"),
            EdgeOutcome::Ignored => defmt::write!(fmt, "Ignored"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Recompute {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Recompute::TriggerDelay(delay) => defmt::write!(fmt, "TriggerDelay({}us)", delay),
            Recompute::ZeroCrossingOffset(offset) => {
                defmt::write!(fmt, "ZeroCrossingOffset({}us)", offset)
            }
            Recompute::DelayAndOffset {
                trigger_delay,
                zero_crossing_offset,
            } => defmt::write!(
                fmt,
                "DelayAndOffset({}us, {}us)",
                trigger_delay,
                zero_crossing_offset
            ),
            Recompute::Idle => defmt::write!(fmt, "Idle"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DimmerSnapshot {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "DimmerSnapshot {{ brightness: {}, period: {}us, offset: {}us, delay: {}us, fired: {} }}",
            self.brightness,
            self.period_us,
            self.zero_crossing_offset_us,
            self.trigger_delay_us,
            self.triggers_fired
        )
    }
}
