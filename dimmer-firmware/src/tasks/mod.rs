// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig. Der Recompute-Task wird vom
// GPIO-Interrupt geweckt, alle anderen Tasks lesen bzw. schreiben den
// Regler-Zustand nur über `DIMMER`.

pub mod dhcp;
pub mod http;
pub mod recompute;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use dhcp::dhcp_server_task;
pub use http::http_server_task;
pub use recompute::{recompute_task, status_task};
pub use wifi::{access_point_task, net_task};
