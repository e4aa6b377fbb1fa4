//! Live reload message protocol.
//!
//! JSON over WebSocket, server to client only:
//!
//! - `connected`: handshake acknowledgement
//! - `full-reload`: reload every page (`path` is always `*`)

use serde::{Deserialize, Serialize};

/// Message sent to browser clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReloadMessage {
    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
    },

    /// Reload everything
    FullReload { path: String },
}

impl ReloadMessage {
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn full_reload() -> Self {
        Self::FullReload { path: "*".into() }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"type":"full-reload","path":"*"}"#.to_string())
    }

    /// Parse from JSON string
    #[cfg(test)]
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_reload_wire_format() {
        assert_eq!(
            ReloadMessage::full_reload().to_json(),
            r#"{"type":"full-reload","path":"*"}"#
        );
    }

    #[test]
    fn test_connected_carries_version() {
        let json = ReloadMessage::connected().to_json();
        assert!(json.starts_with(r#"{"type":"connected""#));
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_from_json_rejects_unknown_type() {
        assert!(ReloadMessage::from_json(r#"{"type":"patch"}"#).is_none());
        assert_eq!(
            ReloadMessage::from_json(r#"{"type":"full-reload","path":"*"}"#),
            Some(ReloadMessage::full_reload())
        );
    }
}
