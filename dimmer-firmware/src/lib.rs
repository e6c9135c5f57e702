// Library-Root: Firmware-Module des Phasenanschnitt-Dimmers
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Heap (WiFi-Konfiguration und HTTP-Antworten)
extern crate alloc;

// Module
pub mod config;
pub mod hal;
pub mod tasks;

use dimmer_core::DimmerShared;

// Re-export von dimmer-core
pub use dimmer_core::Brightness;

/// Zustand des (einzigen) Dimmer-Kanals
///
/// Wird in main.rs einmal per `DIMMER.split()` in die Schreib-Handles
/// für Interrupts und Recompute-Task aufgeteilt. Die Helligkeit schreibt
/// der HTTP-Server über `DIMMER.brightness()`.
pub static DIMMER: DimmerShared = DimmerShared::new();
