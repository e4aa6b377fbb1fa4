//! Development HTTP server.
//!
//! Serves the project root, where the renderer writes its output, and
//! injects the live-reload client into HTML responses.
//!
//! # Modules
//!
//! - `path` - URL to file resolution with traversal protection and deny list
//! - `inject` - reload client injection
//! - `response` - response helpers

mod inject;
mod path;
mod response;

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use crate::log;

pub use path::DenyList;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Request handler threads.
const WORKERS: usize = 4;

/// What every request handler needs to know about the served tree.
struct Site {
    root: PathBuf,
    deny: DenyList,
    ws_port: Option<u16>,
}

/// Bound server ready to accept requests.
pub struct DevServer {
    server: Server,
    addr: SocketAddr,
    site: Site,
}

impl DevServer {
    /// Bind on `interface:port`, moving to the next port while it is taken.
    pub fn bind(
        interface: IpAddr,
        port: u16,
        root: &Path,
        deny: DenyList,
        ws_port: Option<u16>,
    ) -> Result<Self> {
        let (server, addr) = bind_with_retry(interface, port)?;
        Ok(Self {
            server,
            addr,
            site: Site {
                root: root.to_path_buf(),
                deny,
                ws_port,
            },
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve requests until the server is unblocked (blocking).
    pub fn run(self) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(WORKERS)
            .thread_name(|i| format!("http-{i}"))
            .build()
            .context("failed to create request thread pool")?;

        log!("serve"; "http://{}", self.addr);
        let site = Arc::new(self.site);
        for request in self.server.incoming_requests() {
            let site = Arc::clone(&site);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &site) {
                    crate::debug!("serve"; "request error: {e}");
                }
            });
        }
        Ok(())
    }
}

fn handle_request(request: Request, site: &Site) -> Result<()> {
    if !response::is_read_request(&request) {
        return response::respond_method_not_allowed(request);
    }

    match path::resolve_path(request.url(), &site.root, &site.deny) {
        Some(file) => response::respond_file(request, &file, site.ws_port),
        None => response::respond_not_found(request, &site.root, site.ws_port),
    }
}

/// Bind to the specified interface and port, with automatic port retry.
fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        match Server::http(SocketAddr::new(interface, port)) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                let addr = server
                    .server_addr()
                    .to_ip()
                    .unwrap_or_else(|| SocketAddr::new(interface, port));
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{Ipv4Addr, TcpStream};
    use tempfile::TempDir;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(stream, "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn test_serves_html_with_reload_client_and_404() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("index.html"), "<body>home</body>").unwrap();

        std::fs::write(temp.path().join(".env"), "TOKEN=secret").unwrap();
        let deny = DenyList::new(&crate::config::ServeConfig::default().deny);

        let server = DevServer::bind(LOCALHOST, 0, temp.path(), deny, Some(24678)).unwrap();
        let addr = server.addr();
        std::thread::spawn(move || server.run());

        let home = get(addr, "/");
        assert!(home.starts_with("HTTP/1.1 200"));
        assert!(home.contains("home<script>"));

        let missing = get(addr, "/missing.css");
        assert!(missing.starts_with("HTTP/1.1 404"));

        let secret = get(addr, "/.env");
        assert!(secret.starts_with("HTTP/1.1 404"));
        assert!(!secret.contains("TOKEN=secret"));
    }

    #[test]
    fn test_bind_with_retry_moves_past_taken_port() {
        let (first, addr) = bind_with_retry(LOCALHOST, 0).unwrap();
        let (_second, next) = bind_with_retry(LOCALHOST, addr.port()).unwrap();
        assert_ne!(addr.port(), next.port());
        drop(first);
    }
}
