// HTTP Server Task - Helligkeit setzen und Status abfragen
use alloc::string::String;

use defmt::info;
use dimmer_core::parse_brightness;
use embassy_net::Stack;
use embassy_time::Duration;
use picoserve::extract::Query;
use picoserve::response::{IntoResponse, Json};
use picoserve::routing::get;
use serde::Deserialize;

use crate::DIMMER;
use crate::config::{HTTP_BUFFER_SIZE, HTTP_PORT, TCP_RX_BUFFER_SIZE, TCP_TX_BUFFER_SIZE};
use crate::tasks::wifi::wait_for_network;

/// Query-Parameter von `GET /?brightness=<n>`
#[derive(Deserialize)]
struct BrightnessQuery {
    /// Roh-Text, wird wie `atoi()` gelesen
    brightness: Option<String>,
}

/// HTTP Server Task - läuft parallel zu anderen Tasks
///
/// Dieser Task stellt den HTTP-Server bereit:
/// - `GET /?brightness=<n>` setzt die Helligkeit (auf 0-100 begrenzt) und
///   antwortet mit dem aktuell gespeicherten Wert als Text
/// - `GET /` ohne Parameter liefert nur den aktuellen Wert
/// - `GET /status` liefert eine JSON-Momentaufnahme des Reglers
///
/// **Task Pool:** Diese Task wird mehrfach gespawnt (HTTP_SERVER_TASKS),
/// jede Instanz bedient eine Connection gleichzeitig.
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Server-Instanz
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
#[embassy_executor::task(pool_size = 2)]
pub async fn http_server_task(task_id: usize, stack: Stack<'static>) {
    wait_for_network(stack).await;
    info!("HTTP: Server task {} starting on port {}...", task_id, HTTP_PORT);

    let app = picoserve::Router::new()
        .route("/", get(set_brightness))
        .route("/status", get(status));

    // Server-Konfiguration
    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    // HTTP-Buffer für Requests/Responses
    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];

    // TCP-Buffers für Socket
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    let _ = server
        .listen_and_serve(task_id, stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}

/// `GET /?brightness=<n>`
///
/// Nicht-numerische Werte lassen die gespeicherte Helligkeit unverändert,
/// die Antwort enthält in jedem Fall den aktuell gespeicherten Wert.
async fn set_brightness(Query(query): Query<BrightnessQuery>) -> impl IntoResponse {
    let store = DIMMER.brightness();

    if let Some(raw) = query.brightness.as_deref() {
        match parse_brightness(raw) {
            Some(brightness) => {
                store.set(brightness);
                info!("HTTP: Brightness set to {}", brightness);
            }
            None => info!("HTTP: Ignoring non-numeric brightness"),
        }
    }

    alloc::format!("{}", store.get())
}

/// `GET /status`
async fn status() -> impl IntoResponse {
    Json(DIMMER.snapshot())
}
