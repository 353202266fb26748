//! Input events delivered to field controllers
//!
//! Controllers never talk to a DOM, a window system or an event loop. The
//! surface that renders a field translates whatever it receives into a
//! [`FieldEvent`] and hands it to the controller, which answers with an
//! [`EventResponse`] describing what the surface should do next.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-neutral key code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const BACKSPACE: KeyCode = KeyCode(8);
    pub const TAB: KeyCode = KeyCode(9);
    pub const ENTER: KeyCode = KeyCode(13);
    pub const ESCAPE: KeyCode = KeyCode(27);
    pub const SPACE: KeyCode = KeyCode(32);
    pub const PAGE_UP: KeyCode = KeyCode(33);
    pub const PAGE_DOWN: KeyCode = KeyCode(34);
    pub const END: KeyCode = KeyCode(35);
    pub const HOME: KeyCode = KeyCode(36);
    pub const LEFT: KeyCode = KeyCode(37);
    pub const UP: KeyCode = KeyCode(38);
    pub const RIGHT: KeyCode = KeyCode(39);
    pub const DOWN: KeyCode = KeyCode(40);
    pub const DELETE: KeyCode = KeyCode(46);

    const NAMED: [(&'static str, KeyCode); 14] = [
        ("backspace", KeyCode::BACKSPACE),
        ("tab", KeyCode::TAB),
        ("enter", KeyCode::ENTER),
        ("escape", KeyCode::ESCAPE),
        ("space", KeyCode::SPACE),
        ("page_up", KeyCode::PAGE_UP),
        ("page_down", KeyCode::PAGE_DOWN),
        ("end", KeyCode::END),
        ("home", KeyCode::HOME),
        ("left", KeyCode::LEFT),
        ("up", KeyCode::UP),
        ("right", KeyCode::RIGHT),
        ("down", KeyCode::DOWN),
        ("delete", KeyCode::DELETE),
    ];

    /// Look up a key by name (`"enter"`, `"escape"`, ...), case-insensitive.
    ///
    /// Single printable characters map to their uppercase code point.
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let lower = name.trim().to_ascii_lowercase();
        if let Some((_, code)) = Self::NAMED.iter().find(|(n, _)| *n == lower) {
            return Some(*code);
        }
        match (lower.as_str(), lower.chars().count()) {
            ("esc", _) => Some(KeyCode::ESCAPE),
            ("return", _) => Some(KeyCode::ENTER),
            (_, 1) => lower
                .chars()
                .next()
                .map(|c| KeyCode(c.to_ascii_uppercase() as u32)),
            _ => None,
        }
    }

    /// Name of a named key, if it has one
    pub fn name(&self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, code)| code == self)
            .map(|(n, _)| *n)
    }
}

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held
    pub shift: bool,
    /// Control key is held
    pub ctrl: bool,
    /// Alt key is held (Option on macOS)
    pub alt: bool,
    /// Meta key is held (Command on macOS)
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }
}

impl fmt::Display for Modifiers {
    /// Held modifiers joined with `+`, e.g. `shift+ctrl`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held = [
            (self.shift, "shift"),
            (self.ctrl, "ctrl"),
            (self.alt, "alt"),
            (self.meta, "meta"),
        ];
        let mut first = true;
        for (_, name) in held.iter().filter(|(on, _)| *on) {
            if !first {
                f.write_str("+")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

/// A named input event for a field controller
#[derive(Clone, Debug, PartialEq)]
pub enum FieldEvent {
    /// The edit surface gained input focus
    Focus,
    /// The edit surface lost input focus
    Blur,
    /// The edit surface's full text changed (as typed, unvalidated)
    TextInput { text: String },
    /// A key went down while the edit surface had focus
    Key { key: KeyCode, modifiers: Modifiers },
    /// A scroll-wheel gesture over the edit surface
    Wheel { delta_y: f32 },
    /// The increment button was pressed
    StepUp,
    /// The decrement button was pressed
    StepDown,
    /// The visibility toggle was pressed
    Toggle,
    /// The clear button was pressed
    Clear,
    /// The submit button was pressed
    Submit,
}

impl FieldEvent {
    /// Key press without modifiers
    pub fn key(key: KeyCode) -> Self {
        FieldEvent::Key {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        FieldEvent::TextInput { text: text.into() }
    }

    /// Short stable name, used in logs and story files
    pub fn name(&self) -> &'static str {
        match self {
            FieldEvent::Focus => "focus",
            FieldEvent::Blur => "blur",
            FieldEvent::TextInput { .. } => "text_input",
            FieldEvent::Key { .. } => "key",
            FieldEvent::Wheel { .. } => "wheel",
            FieldEvent::StepUp => "step_up",
            FieldEvent::StepDown => "step_down",
            FieldEvent::Toggle => "toggle",
            FieldEvent::Clear => "clear",
            FieldEvent::Submit => "submit",
        }
    }
}

/// What the rendering surface should do after an event was handled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EventResponse {
    /// The controller acted on the event
    pub handled: bool,
    /// The surface should suppress its default handling of the event
    pub prevent_default: bool,
    /// The surface should drop input focus from the edit surface
    pub release_focus: bool,
}

impl EventResponse {
    /// The event was not meaningful to the controller
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }

    /// Handled, with the surface's default action suppressed
    pub fn consumed() -> Self {
        Self {
            handled: true,
            prevent_default: true,
            release_focus: false,
        }
    }

    /// Handled, asking the surface to drop focus
    pub fn blur() -> Self {
        Self {
            handled: true,
            prevent_default: false,
            release_focus: true,
        }
    }
}
