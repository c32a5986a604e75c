//! Patch event model.
//!
//! A `PatchEvent` is one unit of server-pushed update. It is either an element
//! patch (an HTML fragment morphed into the DOM) or a signal patch (new values
//! for client-side reactive state). Exactly one variant is active per event.

use serde::Serialize;
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};

use crate::error::PatchError;

/// SSE event name for element patches.
pub const ELEMENTS_EVENT: &str = "datastar-patch-elements";
/// SSE event name for signal patches.
pub const SIGNALS_EVENT: &str = "datastar-patch-signals";

/// How the client applies an element patch to the matched DOM node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PatchMode {
    /// Morph the element with the same id (outer HTML). Wire default.
    #[default]
    Outer,
    /// Morph the children of the target.
    Inner,
    /// Replace the target without morphing.
    Replace,
    /// Insert before the first child of the target.
    Prepend,
    /// Insert after the last child of the target.
    Append,
    /// Insert before the target.
    Before,
    /// Insert after the target.
    After,
    /// Remove the target.
    Remove,
}

/// HTML fragment patch. The HTML is sent verbatim and must already be well formed.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementsPatch {
    /// Fragment markup.
    pub html: String,
    /// CSS selector of the target; `None` lets the client match by element id.
    pub selector: Option<String>,
    /// Merge strategy.
    pub mode: PatchMode,
}

/// Reactive state patch: a JSON object merged into the client's signals.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalsPatch {
    /// Signal values keyed by signal name.
    pub values: Map<String, Value>,
    /// Only set signals the client does not have yet.
    pub only_if_missing: bool,
}

/// One server-pushed update.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchEvent {
    /// DOM fragment replacement or merge.
    Elements(ElementsPatch),
    /// Reactive state update.
    Signals(SignalsPatch),
}

impl PatchEvent {
    /// Element patch morphed by element id.
    pub fn elements(html: impl Into<String>) -> Self {
        PatchEvent::Elements(ElementsPatch {
            html: html.into(),
            selector: None,
            mode: PatchMode::Outer,
        })
    }

    /// Element patch applied to `selector` with the given `mode`.
    pub fn elements_at(selector: impl Into<String>, mode: PatchMode, html: impl Into<String>) -> Self {
        PatchEvent::Elements(ElementsPatch {
            html: html.into(),
            selector: Some(selector.into()),
            mode,
        })
    }

    /// Signal patch from an already built JSON object.
    pub fn signals(values: Map<String, Value>) -> Self {
        PatchEvent::Signals(SignalsPatch {
            values,
            only_if_missing: false,
        })
    }

    /// Signal patch setting a single key.
    pub fn signal(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut values = Map::new();
        values.insert(key.into(), value.into());
        Self::signals(values)
    }

    /// Signal patch from any serializable value that maps to a JSON object.
    ///
    /// Fails if serialization fails or the value is not an object.
    pub fn signals_from<T: Serialize>(value: &T) -> Result<Self, PatchError> {
        match serde_json::to_value(value)? {
            Value::Object(values) => Ok(Self::signals(values)),
            other => Err(PatchError::Format(format!(
                "signals must serialize to a JSON object, got {}",
                other
            ))),
        }
    }

    /// SSE event name carried on the `event:` line.
    pub fn event_name(&self) -> &'static str {
        match self {
            PatchEvent::Elements(_) => ELEMENTS_EVENT,
            PatchEvent::Signals(_) => SIGNALS_EVENT,
        }
    }

    /// Value of one signal if this is a signal patch that sets `key`.
    pub fn signal_value(&self, key: &str) -> Option<&Value> {
        match self {
            PatchEvent::Signals(patch) => patch.values.get(key),
            PatchEvent::Elements(_) => None,
        }
    }

    /// Fragment markup if this is an element patch.
    pub fn html(&self) -> Option<&str> {
        match self {
            PatchEvent::Elements(patch) => Some(&patch.html),
            PatchEvent::Signals(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mode_string_forms() {
        assert_eq!(PatchMode::Outer.to_string(), "outer");
        assert_eq!(PatchMode::Prepend.to_string(), "prepend");
        assert_eq!("inner".parse::<PatchMode>().unwrap(), PatchMode::Inner);
        assert!("sideways".parse::<PatchMode>().is_err());
    }

    #[test]
    fn single_signal() {
        let event = PatchEvent::signal("content", "abc");
        assert_eq!(event.event_name(), SIGNALS_EVENT);
        assert_eq!(event.signal_value("content"), Some(&json!("abc")));
        assert!(event.html().is_none());
    }

    #[test]
    fn signals_from_struct() {
        #[derive(Serialize)]
        struct Stage {
            current_stage: &'static str,
        }
        let event = PatchEvent::signals_from(&Stage { current_stage: "shell" }).unwrap();
        assert_eq!(event.signal_value("current_stage"), Some(&json!("shell")));
    }

    #[test]
    fn signals_from_rejects_non_object() {
        let err = PatchEvent::signals_from(&vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, PatchError::Format(_)));
    }

    #[test]
    fn elements_defaults_to_outer_without_selector() {
        match PatchEvent::elements("<div id=\"a\"></div>") {
            PatchEvent::Elements(patch) => {
                assert_eq!(patch.mode, PatchMode::Outer);
                assert!(patch.selector.is_none());
            }
            PatchEvent::Signals(_) => panic!("expected elements patch"),
        }
    }
}
