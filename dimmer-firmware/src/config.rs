// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

use core::net::Ipv4Addr;

use dimmer_core::PulsePolicy;

// ============================================================================
// Dimmer Konfiguration
// ============================================================================

/// GPIO-Pin des Nulldurchgangs-Detektors (Eingang, beide Flanken)
///
/// Hinweis: Die Pins werden in main.rs direkt über `peripherals.GPIO4`
/// bzw. `peripherals.GPIO5` angesprochen, diese Konstanten dienen der
/// Dokumentation und dem Boot-Log.
pub const ZERO_CROSS_GPIO_PIN: u8 = 4;

/// GPIO-Pin für das TRIAC-Gate (Ausgang, aktiv high)
pub const TRIGGER_GPIO_PIN: u8 = 5;

/// Pulsbreite des Zündausgangs
///
/// Default: Ausgang bleibt bis zur nächsten steigenden Flanke aktiv.
/// Für Optokoppler mit begrenztem Strom z.B. `PulsePolicy::Fixed { width_us: 200 }`.
pub const PULSE_POLICY: PulsePolicy = PulsePolicy::HoldUntilNextRisingEdge;

/// Helligkeit nach dem Boot (Prozent)
pub const DEFAULT_BRIGHTNESS: i32 = 0;

/// Intervall für das periodische Status-Log in Sekunden
pub const STATUS_LOG_INTERVAL_SECS: u64 = 30;

// ============================================================================
// WiFi Access Point Konfiguration
// ============================================================================

/// SSID des Access Points
///
/// Wird zur Build-Zeit aus der Environment Variable DIMMER_AP_SSID geladen
/// (siehe .env), ohne Angabe gilt "DIMMER".
pub const AP_SSID: &str = match option_env!("DIMMER_AP_SSID") {
    Some(ssid) => ssid,
    None => "DIMMER",
};

/// WPA2-Passwort des Access Points
///
/// Wird zur Build-Zeit aus der Environment Variable DIMMER_AP_PASSWORD geladen,
/// ohne Angabe gilt "password".
pub const AP_PASSWORD: &str = match option_env!("DIMMER_AP_PASSWORD") {
    Some(password) => password,
    None => "password",
};

/// WiFi-Kanal des Access Points
pub const AP_CHANNEL: u8 = 1;

/// Maximale Anzahl gleichzeitig verbundener Stationen
pub const AP_MAX_CONNECTIONS: u16 = 1;

/// Wartezeit nach einem Fehler beim Starten des Access Points
pub const AP_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// Netzwerk Konfiguration
// ============================================================================

/// Statische IP-Adresse des Access Points (gleichzeitig Gateway)
pub const AP_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 1);

/// Präfixlänge des AP-Netzes (255.255.255.0)
pub const AP_PREFIX_LEN: u8 = 24;

/// Anzahl der Sockets im embassy-net Stack
/// HTTP-Listener (HTTP_SERVER_TASKS) + DHCP (1)
pub const NET_SOCKETS: usize = 4;

// ============================================================================
// DHCP Server Konfiguration
// ============================================================================

/// Maximale Anzahl gleichzeitiger DHCP-Leases
pub const DHCP_MAX_LEASES: usize = 4;

/// DHCP Packet Buffer-Größe in Bytes
pub const DHCP_PACKET_BUFFER_SIZE: usize = 1500;

/// UDP Buffer-Größen für den DHCP-Socket (TX, RX in Bytes)
pub const DHCP_UDP_BUFFER_SIZE: usize = 1024;

/// Wartezeit nach einem DHCP-Fehler vor Neustart des Servers
pub const DHCP_RESTART_DELAY_MS: u64 = 500;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// HTTP Port
pub const HTTP_PORT: u16 = 80;

/// Anzahl paralleler HTTP-Server-Tasks
/// Muss zu `pool_size` von `http_server_task` passen
pub const HTTP_SERVER_TASKS: usize = 2;

/// HTTP Buffer-Größe in Bytes
/// Für HTTP Request/Response Headers und Body
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
/// Für eingehende TCP-Daten vom Client
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
/// Für ausgehende TCP-Daten zum Client
pub const TCP_TX_BUFFER_SIZE: usize = 1024;
