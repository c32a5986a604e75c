//! Cascade stages for the progressive loading demo.
//!
//! The page starts with a single placeholder, `#stage-shell`. Each stage's
//! markup replaces the placeholder carrying its own id and ends with the
//! placeholder of the following stage. When the cascade is driven by the
//! client, that next placeholder also carries the auto-fetch trigger for
//! `/load/<next>`; when the server pushes every stage on one connection it is a
//! bare placeholder.

use patch_common::{PatchError, Result};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Stages of the standard cascade, in reveal order.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Shell,
    Navigation,
    Content,
    Widgets,
    Footer,
}

impl Stage {
    fn title(self) -> &'static str {
        match self {
            Stage::Shell => "Shell",
            Stage::Navigation => "Navigation",
            Stage::Content => "Content",
            Stage::Widgets => "Widgets",
            Stage::Footer => "Footer",
        }
    }

    fn body(self) -> &'static str {
        match self {
            Stage::Shell => "<p>The page frame arrived first. Everything below is streamed in.</p>",
            Stage::Navigation => {
                "<nav><a href=\"/\">Cascade</a> <a href=\"/typewriter\">Typewriter</a> <a href=\"/ticker\">Ticker</a></nav>"
            }
            Stage::Content => {
                "<article><p>Each stage is an element patch sent over Server-Sent Events.</p>\n<p>The fragment replaces the placeholder with the same id.</p></article>"
            }
            Stage::Widgets => {
                "<ul class=\"widgets\">\n<li>Signals: <span data-text=\"$current_stage\"></span></li>\n<li>Patches: elements + signals</li>\n</ul>"
            }
            Stage::Footer => "<footer><small>All stages loaded.</small></footer>",
        }
    }
}

/// How the next stage gets requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// The next placeholder asks the client to fetch `/load/<next>` when it appears.
    ClientFetch,
    /// The server keeps pushing stages on the same connection.
    ServerPush,
}

/// One stage of a cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSpec {
    /// Name used in the placeholder id and the `/load/<name>` path.
    pub name: String,
    /// Heading shown above the body.
    pub title: String,
    /// Inner markup.
    pub body: String,
}

impl StageSpec {
    /// Build a stage.
    pub fn new(name: &str, title: &str, body: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

/// Ordered, immutable list of stages. Shared read-only across sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePlan {
    stages: Vec<StageSpec>,
}

impl CascadePlan {
    /// Plan over the given stages, in order.
    pub fn new(stages: Vec<StageSpec>) -> Self {
        Self { stages }
    }

    /// The five-stage plan behind `/` and `/load/{stage}`.
    pub fn standard() -> Self {
        Self::new(
            Stage::iter()
                .map(|stage| StageSpec::new(&stage.to_string(), stage.title(), stage.body()))
                .collect(),
        )
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the plan has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage at `index`.
    pub fn get(&self, index: usize) -> Option<&StageSpec> {
        self.stages.get(index)
    }

    /// Index of the stage called `name`.
    pub fn position(&self, name: &str) -> Result<usize> {
        self.stages
            .iter()
            .position(|stage| stage.name == name)
            .ok_or_else(|| PatchError::UnknownStage(name.to_string()))
    }

    /// Render the markup of stage `index`.
    pub fn render(&self, index: usize, continuation: Continuation) -> Option<String> {
        let stage = self.stages.get(index)?;
        let next = match (self.stages.get(index + 1), continuation) {
            (Some(next), Continuation::ClientFetch) => format!(
                "\n  <div id=\"{}\" data-init=\"@get('/load/{}')\"></div>",
                placeholder_id(&next.name),
                next.name
            ),
            (Some(next), Continuation::ServerPush) => {
                format!("\n  <div id=\"{}\"></div>", placeholder_id(&next.name))
            }
            (None, _) => String::new(),
        };
        Some(format!(
            "<section id=\"{}\" class=\"stage\">\n  <h2>{}</h2>\n  {}{}\n</section>",
            placeholder_id(&stage.name),
            stage.title,
            stage.body,
            next
        ))
    }
}

/// DOM id of a stage's placeholder.
pub fn placeholder_id(name: &str) -> String {
    format!("stage-{}", name)
}
