//! WebSocket actor.
//!
//! ```text
//! acceptor thread --[AddClient]--> WsActor --[broadcast]--> clients
//! orchestrator    --[Reload]-----^
//! ```

use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::message::ReloadMessage;

/// Messages handled by [`WsActor`].
#[derive(Debug)]
pub enum WsMsg {
    /// Raw connection awaiting the WebSocket handshake
    AddClient(TcpStream),
    /// Broadcast a full reload
    Reload,
    Shutdown,
}

type Clients = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// Owns every client connection and broadcasts reload messages.
pub struct WsActor {
    rx: mpsc::Receiver<WsMsg>,
    clients: Clients,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Run the actor event loop until shutdown or channel close.
    pub async fn run(mut self) {
        let clients_for_reader = Arc::clone(&self.clients);
        std::thread::spawn(move || Self::client_reader_loop(clients_for_reader));

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::AddClient(stream) => self.add_client(stream),
                WsMsg::Reload => {
                    crate::debug!("reload"; "sending full reload");
                    self.broadcast(Message::Text(ReloadMessage::full_reload().to_json().into()));
                }
                WsMsg::Shutdown => {
                    crate::debug!("reload"; "shutting down");
                    for mut client in self.clients.lock().drain(..) {
                        let _ = client.close(None);
                    }
                    break;
                }
            }
        }
    }

    fn add_client(&self, stream: TcpStream) {
        // Handshake in blocking mode, poll reads afterwards
        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                let _ = ws.get_ref().set_nonblocking(true);

                let connected = ReloadMessage::connected().to_json();
                if let Err(e) = ws.send(Message::Text(connected.into())) {
                    crate::log!("reload"; "failed to send connected message: {}", e);
                    return;
                }

                let mut clients = self.clients.lock();
                crate::debug!("reload"; "client connected (total: {})", clients.len() + 1);
                clients.push(ws);
            }
            Err(e) => crate::log!("reload"; "handshake failed: {}", e),
        }
    }

    /// Drops clients that closed their side.
    fn client_reader_loop(clients: Clients) {
        loop {
            std::thread::sleep(Duration::from_millis(100));

            clients.lock().retain_mut(|ws| match ws.read() {
                Ok(Message::Close(_)) => false,
                Ok(_) => true,
                Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => true,
                Err(_) => false,
            });
        }
    }

    fn broadcast(&self, msg: Message) {
        let mut clients = self.clients.lock();
        let count = clients.len();

        if count == 0 {
            crate::debug!("reload"; "no clients connected");
            return;
        }

        clients.retain_mut(|ws| match ws.send(msg.clone()) {
            Ok(()) => true,
            Err(e) => {
                crate::debug!("reload"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("reload"; "broadcast to {} clients", count);
    }
}
