//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 5173                 # HTTP port number
//! watch = true                # Rebuild on file changes
//! ws_port = 24678             # Live-reload WebSocket port
//! deny = [".env*", "*.pem"]   # Never served, even though they live under the root
//! ```
//!
//! `deny` patterns are matched against every path segment and against the
//! whole root-relative path. Segments starting with `.` are always refused.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Enable file watcher and live reload.
    pub watch: bool,

    /// First port tried for the live-reload WebSocket.
    pub ws_port: u16,

    /// Glob patterns the HTTP server answers with 404.
    pub deny: Vec<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5173,
            watch: true,
            ws_port: 24678,
            deny: [
                ".env*",
                "*.pem",
                "*.crt",
                "*.key",
                "conductor.toml",
                "config.yaml",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use crate::config::test_parse_config;

    #[test]
    fn test_serve_config() {
        let config =
            test_parse_config("[serve]\ninterface = \"0.0.0.0\"\nport = 8080\nwatch = false");

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
        );
        assert_eq!(config.serve.port, 8080);
        assert!(!config.serve.watch);
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.serve.port, 5173);
        assert_eq!(config.serve.ws_port, 24678);
        assert!(config.serve.watch);
    }

    #[test]
    fn test_serve_config_partial_override() {
        let config = test_parse_config("[serve]\nport = 3000");

        assert_eq!(config.serve.port, 3000);
        assert!(config.serve.watch);
    }

    #[test]
    fn test_serve_deny_defaults_and_override() {
        let config = test_parse_config("");
        assert!(config.serve.deny.iter().any(|p| p == ".env*"));
        assert!(config.serve.deny.iter().any(|p| p == "conductor.toml"));

        let config = test_parse_config("[serve]\ndeny = [\"secrets/**\"]");
        assert_eq!(config.serve.deny, vec!["secrets/**".to_string()]);
    }
}
