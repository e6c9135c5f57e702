// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use defmt::info;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Ipv4Cidr, StackResources, StaticConfigV4};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_dimmer::config::{
    AP_IP, AP_PREFIX_LEN, DEFAULT_BRIGHTNESS, EXTRA_HEAP_SIZE, HTTP_SERVER_TASKS, NET_SOCKETS,
    PULSE_POLICY, TRIGGER_GPIO_PIN, WIFI_HEAP_SIZE, ZERO_CROSS_GPIO_PIN,
};
use esp_dimmer::hal::interrupts;
use esp_dimmer::tasks::{
    access_point_task, dhcp_server_task, http_server_task, net_task, recompute_task, status_task,
};
use esp_dimmer::{Brightness, DIMMER};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, Dimmer-Interrupts, WiFi Access Point, startet
/// die Embassy Runtime und spawnt Tasks. Danach schläft main() - die
/// Regelschleife läuft in Interrupts und im Recompute-Task.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Regelschleife erst nach der (blockierenden) Radio-Initialisierung
    // scharf schalten, damit der Recompute-Task sofort laufen kann
    DIMMER
        .brightness()
        .set(Brightness::clamped(DEFAULT_BRIGHTNESS));
    let parts = DIMMER
        .split(PULSE_POLICY)
        .expect("Dimmer state already split");

    // TIMG1 für den Zündzeitpunkt (TIMG0 gehört esp-rtos)
    let timg1 = TimerGroup::new(peripherals.TIMG1);
    let estimator = interrupts::install(
        parts,
        peripherals.IO_MUX,
        peripherals.GPIO4,
        peripherals.GPIO5,
        timg1.timer0,
    );
    info!(
        "DIMMER: Zero-crossing on GPIO{}, trigger on GPIO{}",
        ZERO_CROSS_GPIO_PIN, TRIGGER_GPIO_PIN
    );

    spawner.spawn(recompute_task(estimator)).unwrap();
    spawner.spawn(status_task()).unwrap();

    // Netzwerk-Stack erstellen
    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Statische IPv4-Konfiguration: der AP ist selbst Gateway
    let net_config = NetConfig::ipv4_static(StaticConfigV4 {
        address: Ipv4Cidr::new(AP_IP, AP_PREFIX_LEN),
        gateway: Some(AP_IP),
        dns_servers: Default::default(),
    });

    // Static resources für embassy-net
    static RESOURCES: static_cell::StaticCell<StackResources<NET_SOCKETS>> =
        static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt AP interface)
    let (stack, runner) = embassy_net::new(wifi_interface.ap, net_config, resources, seed);

    // Spawn WiFi Tasks
    spawner.spawn(access_point_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_server_task(stack)).unwrap();

    // Spawn HTTP Server Tasks (mehrere Instanzen für concurrent connections)
    for task_id in 0..HTTP_SERVER_TASKS {
        spawner.spawn(http_server_task(task_id, stack)).unwrap();
    }

    // Main-Loop: schläft (alle Arbeit läuft in Interrupts und Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
