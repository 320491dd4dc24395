//! TwiML documents returned to Twilio's voice webhook.

/// Path Twilio opens the media stream WebSocket on.
pub const MEDIA_STREAM_PATH: &str = "/media-stream";

/// Build the media stream URL for a public host (`host` or `host:port`).
pub fn media_stream_url(host: &str) -> String {
    format!("wss://{host}{MEDIA_STREAM_PATH}")
}

/// TwiML instructing Twilio to connect the call audio to the media stream.
pub fn connect_stream(host: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
  <Connect>
    <Stream url="{}" />
  </Connect>
</Response>"#,
        escape_attribute(&media_stream_url(host))
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
