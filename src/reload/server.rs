//! WebSocket listener for live reload.
//!
//! Accepted connections are handed to the [`WsActor`] for the handshake.

use std::net::{IpAddr, TcpListener};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use super::notifier::ReloadHandle;
use super::ws::{WsActor, WsMsg};

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Channel capacity between the orchestrator and the actor
const CHANNEL_CAPACITY: usize = 64;

/// A running live-reload endpoint.
pub struct ReloadServer {
    pub handle: ReloadHandle,
    pub port: u16,
}

impl ReloadServer {
    /// Bind on `interface:base_port` (or the next free port) and start the
    /// acceptor thread and the actor's runtime thread.
    pub fn start(interface: IpAddr, base_port: u16) -> Result<Self> {
        let (listener, port) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
        listener.set_nonblocking(true)?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        std::thread::spawn(move || runtime.block_on(WsActor::new(rx).run()));

        let acceptor_tx = tx.clone();
        std::thread::spawn(move || accept_loop(&listener, &acceptor_tx));

        crate::debug!("reload"; "listening on ws://{}:{}", interface, port);
        Ok(Self {
            handle: ReloadHandle::new(tx),
            port,
        })
    }
}

fn accept_loop(listener: &TcpListener, tx: &mpsc::Sender<WsMsg>) {
    loop {
        match listener.accept() {
            Ok((stream, addr)) => {
                crate::debug!("reload"; "client connected: {}", addr);
                let _ = stream.set_nonblocking(false);
                if tx.blocking_send(WsMsg::AddClient(stream)).is_err() {
                    crate::debug!("reload"; "actor stopped, closing listener");
                    break;
                }
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => {
                crate::log!("reload"; "accept error: {}", e);
                std::thread::sleep(Duration::from_millis(100));
            }
        }
    }
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind((interface, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind WebSocket server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use tungstenite::WebSocket;

    use super::*;
    use crate::reload::ReloadNotifier;
    use crate::reload::message::ReloadMessage;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_try_bind_port_skips_taken_port() {
        let taken = TcpListener::bind((LOCALHOST, 0)).unwrap();
        let port = taken.local_addr().unwrap().port();

        let (_listener, actual) = try_bind_port(LOCALHOST, port, 10).unwrap();
        assert_ne!(actual, port);
    }

    fn read_message(ws: &mut WebSocket<impl std::io::Read + std::io::Write>) -> ReloadMessage {
        loop {
            if let tungstenite::Message::Text(text) = ws.read().unwrap() {
                return ReloadMessage::from_json(&text).unwrap();
            }
        }
    }

    #[test]
    fn test_client_receives_connected_then_full_reload() {
        let server = ReloadServer::start(LOCALHOST, 0).unwrap();
        let (mut ws, _) = tungstenite::connect(format!("ws://127.0.0.1:{}", server.port)).unwrap();

        assert!(matches!(read_message(&mut ws), ReloadMessage::Connected { .. }));

        server.handle.full_reload();
        assert_eq!(read_message(&mut ws), ReloadMessage::full_reload());

        server.handle.shutdown();
    }
}
