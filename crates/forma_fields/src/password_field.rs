//! Password visibility controller
//!
//! A local show/hide toggle. It is never controlled by an owner and knows
//! nothing about the password value itself, which the surface keeps with
//! whatever value handling it already uses.

use forma_core::{EventResponse, FieldController, FieldEvent, FieldKind};
use serde::Serialize;

/// How the edit surface presents its text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Obscuring {
    /// One bullet per character
    Masked,
    /// Text shown as typed
    Plain,
}

/// Text for the toggle button and the screen-reader status
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordLabels {
    pub show_password: String,
    pub hide_password: String,
    pub password_is_hidden: String,
    pub password_is_shown: String,
}

impl Default for PasswordLabels {
    fn default() -> Self {
        Self {
            show_password: "Show password".to_string(),
            hide_password: "Hide password".to_string(),
            password_is_hidden: "Password is hidden".to_string(),
            password_is_shown: "Password is shown".to_string(),
        }
    }
}

/// PasswordVisibility configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasswordConfig {
    pub labels: PasswordLabels,
    pub disabled: bool,
}

impl PasswordConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(mut self, labels: PasswordLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Serializable view of a PasswordVisibility's state
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PasswordSnapshot {
    pub visible: bool,
    pub obscuring: Obscuring,
    pub toggle_label: String,
    pub status_label: String,
}

/// Password visibility controller
#[derive(Clone, Debug, Default)]
pub struct PasswordVisibility {
    visible: bool,
    disabled: bool,
    labels: PasswordLabels,
}

impl PasswordVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PasswordConfig) -> Self {
        Self {
            visible: false,
            disabled: config.disabled,
            labels: config.labels,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        tracing::trace!(visible = self.visible, "password visibility toggled");
    }

    pub fn obscuring(&self) -> Obscuring {
        if self.visible {
            Obscuring::Plain
        } else {
            Obscuring::Masked
        }
    }

    /// Label for the toggle button: what pressing it will do
    pub fn toggle_label(&self) -> &str {
        if self.visible {
            &self.labels.hide_password
        } else {
            &self.labels.show_password
        }
    }

    /// Screen-reader label for the input: what is currently the case
    pub fn status_label(&self) -> &str {
        if self.visible {
            &self.labels.password_is_shown
        } else {
            &self.labels.password_is_hidden
        }
    }

    /// Text as the surface should draw it
    pub fn masked_text(&self, value: &str) -> String {
        match self.obscuring() {
            Obscuring::Plain => value.to_string(),
            Obscuring::Masked => "•".repeat(value.chars().count()),
        }
    }

    pub fn snapshot(&self) -> PasswordSnapshot {
        PasswordSnapshot {
            visible: self.visible,
            obscuring: self.obscuring(),
            toggle_label: self.toggle_label().to_string(),
            status_label: self.status_label().to_string(),
        }
    }
}

impl FieldController for PasswordVisibility {
    fn kind(&self) -> FieldKind {
        FieldKind::Password
    }

    fn handle_event(&mut self, event: &FieldEvent) -> EventResponse {
        match event {
            FieldEvent::Toggle if !self.disabled => {
                self.toggle();
                EventResponse::handled()
            }
            _ => EventResponse::ignored(),
        }
    }
}
