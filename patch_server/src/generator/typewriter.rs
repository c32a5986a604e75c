//! Typewriter generator.
//!
//! Reveals a fixed text a few characters at a time. Every tick sends the whole
//! accumulated prefix in the `content` signal, so a client that misses a frame
//! still ends up with the right text. The first tick is immediate; later ticks
//! wait the configured delay. The generator completes after the full text was
//! sent once; it does not loop.

use std::sync::Arc;
use std::time::Duration;

use patch_common::PatchEvent;

use crate::generator::{EventGenerator, GeneratorState, Lifecycle};

/// Signal carrying the accumulated text.
pub const CONTENT_SIGNAL: &str = "content";

/// Text typed out by the `/stream-typewriter` route.
pub const BANNER: &str = r#"
+-----------------------------------------------------------+
|                                                           |
|   D A T A S T A R                                         |
|   patches over server-sent events                         |
|                                                           |
+-----------------------------------------------------------+
|                                                           |
|  > opening event stream...                                |
|  > loading reactive signals...                            |
|  > typing content one character at a time...              |
|                                                           |
|  Every character on this page arrived as its own          |
|  datastar-patch-signals event.                            |
|                                                           |
+-----------------------------------------------------------+

                 ~ typewriter effect complete ~
"#;

/// Streams a growing prefix of `source`.
pub struct TypewriterGenerator {
    source: Arc<str>,
    cursor: usize,
    chunk: usize,
    delay: Duration,
    lifecycle: Lifecycle,
}

impl TypewriterGenerator {
    /// Type `source` out `chunk` characters per tick, `delay` apart.
    /// A chunk of zero is treated as one.
    pub fn new(source: Arc<str>, chunk: usize, delay: Duration) -> Self {
        Self {
            source,
            cursor: 0,
            chunk: chunk.max(1),
            delay,
            lifecycle: Lifecycle::default(),
        }
    }

    /// Text revealed so far.
    pub fn accumulated(&self) -> &str {
        &self.source[..self.cursor]
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.source.len()
    }
}

impl EventGenerator for TypewriterGenerator {
    fn name(&self) -> &'static str {
        "typewriter"
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn next_delay(&self) -> Duration {
        if self.state() == GeneratorState::Created || self.is_exhausted() {
            Duration::ZERO
        } else {
            self.delay
        }
    }

    fn step(&mut self) -> Option<PatchEvent> {
        if self.is_exhausted() {
            return None;
        }
        let rest = &self.source[self.cursor..];
        let advance = rest
            .char_indices()
            .nth(self.chunk)
            .map(|(offset, _)| offset)
            .unwrap_or(rest.len());
        self.cursor += advance;
        Some(PatchEvent::signal(CONTENT_SIGNAL, self.accumulated()))
    }
}
