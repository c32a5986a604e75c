//! Patch encoder.
//!
//! Turns a `PatchEvent` into one Server-Sent-Events frame in the format the
//! Datastar client consumes:
//!
//! ```text
//! event: datastar-patch-elements
//! data: selector #feed
//! data: mode append
//! data: elements <li>first line</li>
//! data: elements <li>second line</li>
//!
//! event: datastar-patch-signals
//! data: signals {"x":1}
//!
//! ```
//!
//! HTML is framed verbatim, one `data:` line per source line. Empty HTML still
//! gets one empty `elements` line so the frame is not dropped by SSE parsers.
//! Signal values are written as compact JSON on a single line.

use std::fmt::Write;

use bytes::Bytes;

use crate::event::{ElementsPatch, PatchEvent, PatchMode, SignalsPatch};
use crate::result::Result;

/// `data:` key carrying the target selector.
pub const SELECTOR_KEY: &str = "selector";
/// `data:` key carrying the patch mode.
pub const MODE_KEY: &str = "mode";
/// `data:` key carrying one line of fragment markup.
pub const ELEMENTS_KEY: &str = "elements";
/// `data:` key carrying the signal JSON.
pub const SIGNALS_KEY: &str = "signals";
/// `data:` key carrying the only-if-missing flag.
pub const ONLY_IF_MISSING_KEY: &str = "onlyIfMissing";

/// Encode `event` into a complete SSE frame, blank-line terminator included.
///
/// The only failure is JSON serialization of signal values.
pub fn encode(event: &PatchEvent) -> Result<Bytes> {
    encode_to_string(event).map(Bytes::from)
}

/// Same as [`encode`], returning the frame as text.
pub fn encode_to_string(event: &PatchEvent) -> Result<String> {
    let mut out = String::new();
    let _ = writeln!(out, "event: {}", event.event_name());
    match event {
        PatchEvent::Elements(patch) => write_elements(&mut out, patch),
        PatchEvent::Signals(patch) => write_signals(&mut out, patch)?,
    }
    out.push('\n');
    Ok(out)
}

fn write_elements(out: &mut String, patch: &ElementsPatch) {
    if let Some(selector) = &patch.selector {
        let _ = writeln!(out, "data: {} {}", SELECTOR_KEY, selector);
    }
    if patch.mode != PatchMode::Outer {
        let _ = writeln!(out, "data: {} {}", MODE_KEY, patch.mode);
    }
    if patch.html.is_empty() {
        let _ = writeln!(out, "data: {} ", ELEMENTS_KEY);
    }
    for line in patch.html.lines() {
        let _ = writeln!(out, "data: {} {}", ELEMENTS_KEY, line);
    }
}

fn write_signals(out: &mut String, patch: &SignalsPatch) -> Result<()> {
    let json = serde_json::to_string(&patch.values)?;
    let _ = writeln!(out, "data: {} {}", SIGNALS_KEY, json);
    if patch.only_if_missing {
        let _ = writeln!(out, "data: {} true", ONLY_IF_MISSING_KEY);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn signals_frame() {
        let frame = encode_to_string(&PatchEvent::signal("x", 1)).unwrap();
        assert_eq!(frame, "event: datastar-patch-signals\ndata: signals {\"x\":1}\n\n");
    }

    #[test]
    fn signals_with_newline_stay_on_one_data_line() {
        let frame = encode_to_string(&PatchEvent::signal("content", "a\nb")).unwrap();
        assert_eq!(frame.matches("data:").count(), 1);
        assert!(frame.contains(r#"{"content":"a\nb"}"#));
    }

    #[test]
    fn only_if_missing_flag() {
        let mut values = serde_json::Map::new();
        values.insert("stocks".into(), json!([]));
        let event = PatchEvent::Signals(SignalsPatch {
            values,
            only_if_missing: true,
        });
        let frame = encode_to_string(&event).unwrap();
        assert!(frame.ends_with("data: onlyIfMissing true\n\n"));
    }

    #[test]
    fn elements_frame_default_mode_has_no_mode_line() {
        let frame = encode_to_string(&PatchEvent::elements("<div id=\"stage-shell\">hi</div>")).unwrap();
        assert_eq!(
            frame,
            "event: datastar-patch-elements\ndata: elements <div id=\"stage-shell\">hi</div>\n\n"
        );
    }

    #[test]
    fn multi_line_html_is_split_into_data_lines() {
        let event = PatchEvent::elements_at("#feed", PatchMode::Append, "<li>a</li>\n<li>b</li>");
        let frame = encode_to_string(&event).unwrap();
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(
            lines,
            vec![
                "event: datastar-patch-elements",
                "data: selector #feed",
                "data: mode append",
                "data: elements <li>a</li>",
                "data: elements <li>b</li>",
                "",
            ]
        );
    }

    #[test]
    fn html_is_not_escaped() {
        let frame = encode_to_string(&PatchEvent::elements("<b>&amp; \"q\"</b>")).unwrap();
        assert!(frame.contains("<b>&amp; \"q\"</b>"));
    }

    #[test]
    fn bytes_match_text() {
        let event = PatchEvent::signal("tick", 3);
        let bytes = encode(&event).unwrap();
        assert_eq!(&bytes[..], encode_to_string(&event).unwrap().as_bytes());
    }

    #[test]
    fn empty_html_still_carries_a_data_line() {
        let frame = encode_to_string(&PatchEvent::elements_at("#toast", PatchMode::Inner, "")).unwrap();
        assert_eq!(
            frame,
            "event: datastar-patch-elements\ndata: selector #toast\ndata: mode inner\ndata: elements \n\n"
        );
    }
}
