//! Common controller interface

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::events::{EventResponse, FieldEvent};

/// The kinds of field Forma provides controllers for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Number,
    Search,
    Password,
    Slider,
}

impl FieldKind {
    /// Whether a controller of this kind reacts to the event at all
    pub fn accepts(&self, event: &FieldEvent) -> bool {
        use FieldEvent::*;
        match self {
            FieldKind::Number => matches!(
                event,
                Focus | Blur | TextInput { .. } | Wheel { .. } | StepUp | StepDown
            ),
            FieldKind::Search => matches!(
                event,
                Focus | Blur | TextInput { .. } | Key { .. } | Clear | Submit
            ),
            FieldKind::Password => matches!(event, Toggle),
            FieldKind::Slider => matches!(event, Key { .. } | StepUp | StepDown),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::Search => "search",
            FieldKind::Password => "password",
            FieldKind::Slider => "slider",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A headless field controller driven by [`FieldEvent`]s
pub trait FieldController {
    fn kind(&self) -> FieldKind;

    /// Handle one input event to completion
    fn handle_event(&mut self, event: &FieldEvent) -> EventResponse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::KeyCode;

    #[test]
    fn test_accepts() {
        assert!(FieldKind::Number.accepts(&FieldEvent::StepUp));
        assert!(!FieldKind::Number.accepts(&FieldEvent::Toggle));
        assert!(FieldKind::Search.accepts(&FieldEvent::key(KeyCode::ESCAPE)));
        assert!(!FieldKind::Search.accepts(&FieldEvent::StepDown));
        assert!(FieldKind::Password.accepts(&FieldEvent::Toggle));
        assert!(!FieldKind::Password.accepts(&FieldEvent::Submit));
        assert!(FieldKind::Slider.accepts(&FieldEvent::key(KeyCode::UP)));
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldKind::Search.to_string(), "search");
    }
}
