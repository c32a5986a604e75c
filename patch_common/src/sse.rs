//! Server-Sent-Events decoding.
//!
//! `SseParser` is a small line-oriented parser following the SSE framing rules:
//! fields are `name: value` lines, lines starting with `:` are comments, and a
//! blank line dispatches the frame collected so far. Lines end in `\n`, `\r\n`
//! or a bare `\r`. Input may arrive in arbitrary chunks; incomplete lines are
//! buffered until their terminator shows up. A `\r` that ends a chunk is held
//! back until the next chunk tells whether a `\n` follows.
//!
//! A decoded `SseFrame` converts back into a `PatchEvent` via `TryFrom`, which
//! is what the terminal client uses to print what the server pushed.

use serde_json::Value;

use crate::error::PatchError;
use crate::event::{ELEMENTS_EVENT, ElementsPatch, PatchEvent, PatchMode, SIGNALS_EVENT, SignalsPatch};
use crate::wire::{ELEMENTS_KEY, MODE_KEY, ONLY_IF_MISSING_KEY, SELECTOR_KEY, SIGNALS_KEY};

/// One dispatched SSE frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseFrame {
    /// Value of the `event:` field, if any.
    pub event: Option<String>,
    /// Every `data:` line in arrival order.
    pub data: Vec<String>,
    /// Value of the `id:` field, if any.
    pub id: Option<String>,
    /// Reconnection delay from the `retry:` field, in milliseconds.
    pub retry: Option<u64>,
}

impl SseFrame {
    /// Data lines joined with `\n`, as an `EventSource` would expose them.
    pub fn data(&self) -> String {
        self.data.join("\n")
    }
}

/// Incremental SSE parser.
#[derive(Debug, Default)]
pub struct SseParser {
    pending: String,
    current: SseFrame,
}

impl SseParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line without its terminator. Returns a frame when `line` is the
    /// blank line closing a frame that carried data.
    pub fn push_line(&mut self, line: &str) -> Option<SseFrame> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            let frame = std::mem::take(&mut self.current);
            return if frame.data.is_empty() { None } else { Some(frame) };
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.current.event = Some(value.to_string()),
            "data" => self.current.data.push(value.to_string()),
            "id" => self.current.id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.parse() {
                    self.current.retry = Some(ms);
                }
            }
            _ => {}
        }
        None
    }

    /// Feed an arbitrary chunk of the stream and collect every completed frame.
    pub fn feed(&mut self, chunk: &str) -> Vec<SseFrame> {
        self.pending.push_str(chunk);
        let mut frames = Vec::new();
        while let Some(pos) = self.pending.find(['\r', '\n']) {
            let bytes = self.pending.as_bytes();
            let terminator = match (bytes[pos], bytes.get(pos + 1).copied()) {
                (b'\r', Some(b'\n')) => 2,
                (b'\r', None) => break,
                _ => 1,
            };
            let line = self.pending[..pos].to_string();
            self.pending.drain(..pos + terminator);
            if let Some(frame) = self.push_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }
}

/// Parse a whole stream body into frames.
pub fn parse_frames(body: &str) -> Vec<SseFrame> {
    let mut parser = SseParser::new();
    parser.feed(body)
}

/// Split a Datastar data line into its key and the rest of the line.
fn split_data_line(line: &str) -> (&str, &str) {
    line.split_once(' ').unwrap_or((line, ""))
}

impl TryFrom<SseFrame> for PatchEvent {
    type Error = PatchError;

    fn try_from(frame: SseFrame) -> Result<Self, Self::Error> {
        match frame.event.as_deref() {
            Some(ELEMENTS_EVENT) => decode_elements(&frame),
            Some(SIGNALS_EVENT) => decode_signals(&frame),
            Some(other) => Err(PatchError::UnknownEvent(other.to_string())),
            None => Err(PatchError::UnknownEvent("message".to_string())),
        }
    }
}

fn decode_elements(frame: &SseFrame) -> Result<PatchEvent, PatchError> {
    let mut patch = ElementsPatch {
        html: String::new(),
        selector: None,
        mode: PatchMode::Outer,
    };
    let mut html_lines = Vec::new();
    for line in &frame.data {
        match split_data_line(line) {
            (SELECTOR_KEY, selector) => patch.selector = Some(selector.to_string()),
            (MODE_KEY, mode) => {
                patch.mode = mode
                    .parse()
                    .map_err(|_| PatchError::Format(format!("invalid patch mode: {}", mode)))?;
            }
            (ELEMENTS_KEY, html) => html_lines.push(html),
            _ => {}
        }
    }
    patch.html = html_lines.join("\n");
    Ok(PatchEvent::Elements(patch))
}

fn decode_signals(frame: &SseFrame) -> Result<PatchEvent, PatchError> {
    let mut json_lines = Vec::new();
    let mut only_if_missing = false;
    for line in &frame.data {
        match split_data_line(line) {
            (SIGNALS_KEY, json) => json_lines.push(json),
            (ONLY_IF_MISSING_KEY, flag) => only_if_missing = flag == "true",
            _ => {}
        }
    }
    if json_lines.is_empty() {
        return Err(PatchError::MissingField(SIGNALS_KEY));
    }
    match serde_json::from_str(&json_lines.join("\n"))? {
        Value::Object(values) => Ok(PatchEvent::Signals(SignalsPatch {
            values,
            only_if_missing,
        })),
        other => Err(PatchError::Format(format!("signals payload is not an object: {}", other))),
    }
}
