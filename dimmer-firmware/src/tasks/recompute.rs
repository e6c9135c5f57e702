// Recompute Task - Berechnet Offset und Zündverzögerung nach jeder Flanke
use defmt::{info, trace};
use dimmer_core::CycleEstimator;
use embassy_time::{Duration, Timer};

use crate::DIMMER;
use crate::config::STATUS_LOG_INTERVAL_SECS;

/// Recompute Task
///
/// Wird vom GPIO-Interrupt über das Wake-Signal geweckt. Mehrere Flanken
/// vor dem Aufwachen ergeben einen einzigen Durchlauf, der immer den
/// neuesten Stand der Zeitstempel liest.
#[embassy_executor::task]
pub async fn recompute_task(mut estimator: CycleEstimator<'static>) -> ! {
    info!("DIMMER: Recompute task started");

    estimator
        .run(|result| trace!("DIMMER: {}", result))
        .await
}

/// Status Task
///
/// Loggt periodisch eine Momentaufnahme des Reglers (Periode, Offset,
/// Verzögerung, Zähler). Rein diagnostisch.
#[embassy_executor::task]
pub async fn status_task() -> ! {
    loop {
        Timer::after(Duration::from_secs(STATUS_LOG_INTERVAL_SECS)).await;
        info!("DIMMER: {}", DIMMER.snapshot());
    }
}
