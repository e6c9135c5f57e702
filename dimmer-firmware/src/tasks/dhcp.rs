// DHCP Server Task - Vergibt Adressen an Stationen im AP-Netz
//
// Die Steuer-App erwartet den Dimmer unter der festen Adresse AP_IP,
// verbundene Geräte bekommen ihre Adresse von diesem Server.
//
// Technische Details:
// - Library: edge-dhcp 0.6 (no_std)
// - Adapter: edge-nal-embassy 0.7 (embassy-net Integration)
// - Socket: UDP 0.0.0.0:67

use core::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use defmt::{Debug2Format, error, info, warn};
use edge_dhcp::io::{self as dhcp_io, DEFAULT_SERVER_PORT};
use edge_dhcp::server::{Server, ServerOptions};
use edge_nal::UdpBind;
use edge_nal_embassy::{Udp, UdpBuffers};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};

use crate::config::{
    AP_IP, DHCP_MAX_LEASES, DHCP_PACKET_BUFFER_SIZE, DHCP_RESTART_DELAY_MS, DHCP_UDP_BUFFER_SIZE,
};
use crate::tasks::wifi::wait_for_network;

/// DHCP Server Task
///
/// Bindet einmalig den UDP-Socket und betreibt den Server. Bricht der
/// Server mit einem Fehler ab, wird er nach DHCP_RESTART_DELAY_MS mit
/// frischer Lease-Tabelle neu gestartet.
#[embassy_executor::task]
pub async fn dhcp_server_task(stack: Stack<'static>) {
    info!("DHCP: Task started, waiting for network...");
    wait_for_network(stack).await;

    let buffers = UdpBuffers::<1, DHCP_UDP_BUFFER_SIZE, DHCP_UDP_BUFFER_SIZE>::new();
    let udp = Udp::new(stack, &buffers);

    let mut socket = match udp
        .bind(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::UNSPECIFIED,
            DEFAULT_SERVER_PORT,
        )))
        .await
    {
        Ok(socket) => socket,
        Err(e) => {
            error!("DHCP: {}: {}", DhcpError::SocketBindFailed, Debug2Format(&e));
            return;
        }
    };

    info!("DHCP: Server running on port {}", DEFAULT_SERVER_PORT);

    let mut packet_buf = [0u8; DHCP_PACKET_BUFFER_SIZE];
    // Gateway-Option: der AP selbst
    let mut gateways = [AP_IP];

    loop {
        let mut server = Server::<_, DHCP_MAX_LEASES>::new_with_et(AP_IP);
        let options = ServerOptions::new(AP_IP, Some(&mut gateways));

        if let Err(e) = dhcp_io::server::run(&mut server, &options, &mut socket, &mut packet_buf).await {
            warn!("DHCP: {}: {}", DhcpError::ServerFailed, Debug2Format(&e));
        }

        Timer::after(Duration::from_millis(DHCP_RESTART_DELAY_MS)).await;
    }
}

/// DHCP Fehler-Typen
#[derive(Debug)]
enum DhcpError {
    /// UDP Socket konnte nicht auf Port 67 gebunden werden
    SocketBindFailed,
    /// Server-Loop ist mit einem I/O- oder Protokollfehler beendet worden
    ServerFailed,
}

impl defmt::Format for DhcpError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DhcpError::SocketBindFailed => defmt::write!(fmt, "Socket bind failed"),
            DhcpError::ServerFailed => defmt::write!(fmt, "Server failed"),
        }
    }
}
