// Interrupt-Anbindung der Regelschleife
//
// Zwei Interrupt-Quellen teilen sich Zündausgang und Timer:
// - GPIO (beide Flanken des Nulldurchgangs-Signals) → `LineSensor::on_edge`
// - TIMG1 Ablauf → `TriggerScheduler::on_expiry`
//
// Die Hardware-Objekte liegen in einem `critical_section::Mutex`, beide
// Handler laufen daher nie gleichzeitig auf den Ressourcen.

use core::cell::RefCell;

use critical_section::Mutex;
use defmt::{error, info};
use dimmer_core::{CycleEstimator, DimmerParts, LineSensor, Micros, TriggerScheduler};
use esp_hal::gpio::{Event, Input, InputConfig, InputPin, Io, OutputPin, Pull};
use esp_hal::interrupt::Priority;
use esp_hal::peripherals::IO_MUX;
use esp_hal::time::Instant;
use esp_hal::timer::Timer;
use esp_hal::{handler, ram};

use crate::hal::{TriacGate, TriacTimer};

/// Alles, was die Interrupt-Handler brauchen
struct IsrResources {
    zero_cross: Input<'static>,
    sensor: LineSensor<'static>,
    scheduler: TriggerScheduler<'static>,
    gate: TriacGate,
    timer: TriacTimer,
}

static RESOURCES: Mutex<RefCell<Option<IsrResources>>> = Mutex::new(RefCell::new(None));

/// Monotone Zeit in Mikrosekunden (läuft nach ~71 Minuten über)
#[inline(always)]
fn now_micros() -> Micros {
    Instant::now().duration_since_epoch().as_micros() as Micros
}

/// Richtet Eingang, Ausgang, Timer und beide Interrupt-Handler ein
///
/// Übernimmt Line Sensor und Trigger Scheduler aus `parts`, der
/// Cycle Estimator wird für den Recompute-Task zurückgegeben.
///
/// # Parameter
/// - `parts`: Schreib-Handles aus `DimmerShared::split()`
/// - `io_mux`: IO_MUX Peripheral (für den GPIO-Interrupt-Handler)
/// - `zero_cross_pin`: Eingang vom Nulldurchgangs-Detektor
/// - `trigger_pin`: Ausgang zum TRIAC-Gate
/// - `timer`: Hardware-Timer für den Zündzeitpunkt
pub fn install(
    parts: DimmerParts<'static>,
    io_mux: IO_MUX<'static>,
    zero_cross_pin: impl InputPin + 'static,
    trigger_pin: impl OutputPin + 'static,
    timer: impl Timer + 'static,
) -> CycleEstimator<'static> {
    let DimmerParts {
        sensor,
        estimator,
        scheduler,
    } = parts;

    let gate = TriacGate::new(trigger_pin);
    let timer = TriacTimer::new(timer, trigger_timer_expired);

    let mut io = Io::new(io_mux);
    io.set_interrupt_handler(zero_cross_edge);

    let mut zero_cross = Input::new(zero_cross_pin, InputConfig::default().with_pull(Pull::None));

    critical_section::with(|cs| {
        zero_cross.listen(Event::AnyEdge);
        RESOURCES.borrow_ref_mut(cs).replace(IsrResources {
            zero_cross,
            sensor,
            scheduler,
            gate,
            timer,
        });
    });

    info!("DIMMER: Interrupts installed ({})", scheduler.policy());

    estimator
}

/// GPIO-Interrupt: eine Flanke des Nulldurchgangs-Signals
///
/// Höchste Priorität im System, damit der Zeitstempel nicht verzögert wird.
#[handler(priority = Priority::Priority3)]
#[ram]
fn zero_cross_edge() {
    // Zeitstempel so früh wie möglich nehmen
    let now = now_micros();

    critical_section::with(|cs| {
        let mut resources = RESOURCES.borrow_ref_mut(cs);
        let Some(r) = resources.as_mut() else {
            return;
        };

        if !r.zero_cross.is_interrupt_set() {
            return;
        }
        r.zero_cross.clear_interrupt();

        let level = r.zero_cross.is_high();
        if let Err(e) = r.sensor.on_edge(now, level, &mut r.gate, &mut r.timer) {
            error!("DIMMER: Edge at {}us failed: {}", now, e);
        }
    });
}

/// Timer-Interrupt: Zündzeitpunkt oder Ende der festen Pulsbreite
///
/// Eine Stufe unter dem GPIO-Interrupt.
#[handler(priority = Priority::Priority2)]
#[ram]
fn trigger_timer_expired() {
    critical_section::with(|cs| {
        let mut resources = RESOURCES.borrow_ref_mut(cs);
        let Some(r) = resources.as_mut() else {
            return;
        };

        r.timer.acknowledge();
        if let Err(e) = r.scheduler.on_expiry(&mut r.gate, &mut r.timer) {
            error!("DIMMER: Trigger expiry failed: {}", e);
        }
    });
}
