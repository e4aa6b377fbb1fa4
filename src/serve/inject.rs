//! Live reload client injection.

/// Client script; `__WS_PORT__` is replaced with the live-reload port.
const RELOAD_CLIENT: &str = r#"<script>
(function () {
    var ws = new WebSocket("ws://" + location.hostname + ":__WS_PORT__");
    ws.onmessage = function (e) {
        var msg = JSON.parse(e.data);
        if (msg.type === "full-reload") location.reload();
    };
    ws.onclose = function () { console.log("[conductor] live reload disconnected"); };
})();
</script>"#;

/// Byte pattern for `</body>`
const BODY_CLOSE: &[u8] = b"</body>";

fn client_script(ws_port: u16) -> String {
    RELOAD_CLIENT.replace("__WS_PORT__", &ws_port.to_string())
}

/// Inject the reload client if the body is HTML and a port is known.
pub fn maybe_inject_reload(body: Vec<u8>, content_type: &str, ws_port: Option<u16>) -> Vec<u8> {
    match (crate::utils::mime::is_html(content_type), ws_port) {
        (true, Some(port)) => inject_before_body_close(&body, client_script(port).as_bytes()),
        _ => body,
    }
}

/// Insert `script` before the last `</body>`, or append it when there is none.
fn inject_before_body_close(content: &[u8], script: &[u8]) -> Vec<u8> {
    let pos = content
        .windows(BODY_CLOSE.len())
        .rposition(|w| w.eq_ignore_ascii_case(BODY_CLOSE))
        .unwrap_or(content.len());

    let mut result = Vec::with_capacity(content.len() + script.len());
    result.extend_from_slice(&content[..pos]);
    result.extend_from_slice(script);
    result.extend_from_slice(&content[pos..]);
    result
}
