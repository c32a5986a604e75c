//! Reading Datastar events off a streaming HTTP body.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};
use patch_common::sse::SseParser;
use patch_common::{PatchError, PatchEvent, Result};

/// Why reading stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The server closed the stream.
    EndOfStream,
    /// `--max-events` was reached.
    Limit,
    /// Ctrl-C.
    Shutdown,
}

/// Parse frames from `reader` line by line and hand each decoded event to
/// `on_event`. Frames that are not Datastar directives are logged and skipped.
///
/// `shutdown` is checked between lines, so a quiet stream only notices it when
/// the next line arrives.
pub fn read_events<R, F>(
    reader: R,
    max_events: Option<usize>,
    shutdown: &Arc<AtomicBool>,
    mut on_event: F,
) -> Result<(StopReason, usize)>
where
    R: BufRead,
    F: FnMut(&PatchEvent),
{
    let mut parser = SseParser::new();
    let mut received = 0;
    if max_events == Some(0) {
        return Ok((StopReason::Limit, received));
    }

    for line in reader.lines() {
        if shutdown.load(Ordering::Relaxed) {
            return Ok((StopReason::Shutdown, received));
        }
        let line = line?;
        let Some(frame) = parser.push_line(&line) else {
            continue;
        };
        match PatchEvent::try_from(frame) {
            Ok(event) => {
                received += 1;
                on_event(&event);
                if max_events.is_some_and(|max| received >= max) {
                    return Ok((StopReason::Limit, received));
                }
            }
            Err(PatchError::UnknownEvent(name)) => debug!("Skipping non-Datastar event: {}", name),
            Err(e) => warn!("Dropping malformed frame: {}", e),
        }
    }
    Ok((StopReason::EndOfStream, received))
}

/// One-line, human-readable summary of an event.
pub fn describe(event: &PatchEvent) -> String {
    match event {
        PatchEvent::Elements(patch) => {
            let target = patch.selector.as_deref().unwrap_or("(by id)");
            let first_line = patch.html.lines().next().unwrap_or("");
            format!("ELEMENTS {} mode={} {}", target, patch.mode, first_line)
        }
        PatchEvent::Signals(patch) => {
            let body = serde_json::Value::Object(patch.values.clone());
            if patch.only_if_missing {
                format!("SIGNALS {} (only if missing)", body)
            } else {
                format!("SIGNALS {}", body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patch_common::event::PatchMode;
    use serde_json::json;
    use std::io::Cursor;

    const STREAM: &str = "event: datastar-patch-signals\n\
        data: signals {\"content\":\"a\"}\n\
        \n\
        : keep-alive\n\
        \n\
        event: something-else\n\
        data: ignored\n\
        \n\
        event: datastar-patch-elements\n\
        data: elements <div id=\"x\">1</div>\n\
        \n\
        event: datastar-patch-signals\n\
        data: signals {\"content\":\"ab\"}\n\
        \n";

    fn running() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    #[test]
    fn reads_until_end_of_stream() {
        let mut seen = Vec::new();
        let (reason, count) =
            read_events(Cursor::new(STREAM), None, &running(), |e| seen.push(e.clone())).unwrap();

        assert_eq!(reason, StopReason::EndOfStream);
        assert_eq!(count, 3);
        assert_eq!(seen[0].signal_value("content"), Some(&json!("a")));
        assert_eq!(seen[1].html(), Some("<div id=\"x\">1</div>"));
        assert_eq!(seen[2].signal_value("content"), Some(&json!("ab")));
    }

    #[test]
    fn stops_at_the_limit() {
        let (reason, count) = read_events(Cursor::new(STREAM), Some(2), &running(), |_| {}).unwrap();
        assert_eq!(reason, StopReason::Limit);
        assert_eq!(count, 2);
    }

    #[test]
    fn zero_limit_reads_nothing() {
        let (reason, count) = read_events(Cursor::new(STREAM), Some(0), &running(), |_| {}).unwrap();
        assert_eq!(reason, StopReason::Limit);
        assert_eq!(count, 0);
    }

    #[test]
    fn shutdown_flag_stops_reading() {
        let shutdown = Arc::new(AtomicBool::new(true));
        let (reason, count) = read_events(Cursor::new(STREAM), None, &shutdown, |_| {}).unwrap();
        assert_eq!(reason, StopReason::Shutdown);
        assert_eq!(count, 0);
    }

    #[test]
    fn malformed_frames_are_skipped() {
        let body = "event: datastar-patch-signals\ndata: signals [1]\n\n\
            event: datastar-patch-signals\ndata: signals {\"ok\":true}\n\n";
        let (_, count) = read_events(Cursor::new(body), None, &running(), |_| {}).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn describes_events() {
        let elements = PatchEvent::elements_at("#feed", PatchMode::Append, "<li>one</li>\n<li>two</li>");
        assert_eq!(describe(&elements), "ELEMENTS #feed mode=append <li>one</li>");

        let signals = PatchEvent::signal("tick", 3);
        assert_eq!(describe(&signals), "SIGNALS {\"tick\":3}");
    }
}
