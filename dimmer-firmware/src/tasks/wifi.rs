// WiFi Task - Betreibt den Access Point für die Dimmer-Steuerung
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{
    AccessPointConfig, AuthMethod, ModeConfig, WifiApState, WifiController, WifiDevice, WifiEvent,
    ap_state,
};

use crate::config::{AP_CHANNEL, AP_MAX_CONNECTIONS, AP_PASSWORD, AP_RETRY_DELAY_SECS, AP_SSID};

/// Access Point Task
///
/// Managed den Access Point:
/// - Konfiguriert SSID, WPA2-Passwort, Kanal und Stationslimit
/// - Startet den AP und wartet auf ein Stop-Event
/// - Startet den AP nach einem Stop bzw. Fehler neu
#[embassy_executor::task]
pub async fn access_point_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting access point task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring access point '{}'...", AP_SSID);

            let ap_config = ModeConfig::AccessPoint(
                AccessPointConfig::default()
                    .with_ssid(AP_SSID.into())
                    .with_password(AP_PASSWORD.into())
                    .with_auth_method(AuthMethod::Wpa2Personal)
                    .with_channel(AP_CHANNEL)
                    .with_max_connections(AP_MAX_CONNECTIONS),
            );

            if let Err(e) = controller.set_config(&ap_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(AP_RETRY_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(AP_RETRY_DELAY_SECS)).await;
                continue;
            }
        }

        // Warten, bis der Treiber den AP als gestartet meldet
        while ap_state() != WifiApState::Started {
            Timer::after(Duration::from_millis(100)).await;
        }
        info!(
            "WiFi: Access point '{}' running on channel {}",
            AP_SSID, AP_CHANNEL
        );

        // AP läuft: auf Stop warten, danach Controller stoppen und neu starten
        controller.wait_for_event(WifiEvent::ApStop).await;
        warn!("WiFi: Access point stopped, restarting...");
        if let Err(e) = controller.stop_async().await {
            warn!("WiFi: Failed to stop controller: {}", Debug2Format(&e));
        }
        Timer::after(Duration::from_secs(AP_RETRY_DELAY_SECS)).await;
    }
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Wartet bis der AP-Link steht und die statische IPv4-Konfiguration aktiv ist
///
/// Gemeinsam genutzt von DHCP- und HTTP-Tasks.
pub async fn wait_for_network(stack: Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}
