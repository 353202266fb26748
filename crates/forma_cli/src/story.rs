//! Story files
//!
//! A story scripts one field: its configuration plus a list of events to
//! replay against it.
//!
//! ```toml
//! name = "Clamp on blur"
//! field = "number"
//!
//! [number]
//! min = 0
//! max = 10
//! step = 3
//!
//! [[events]]
//! kind = "text_input"
//! text = "11"
//!
//! [[events]]
//! kind = "blur"
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use forma_core::{FieldEvent, FieldKind, KeyCode, Modifiers};
use forma_fields::stepping::{MAX_SAFE_INTEGER, MIN_SAFE_INTEGER};
use forma_fields::{
    NumberFieldConfig, PasswordConfig, PasswordLabels, SearchFieldConfig, SliderFieldConfig,
};
use serde::Deserialize;
use thiserror::Error;

/// Errors for stories that cannot be replayed
#[derive(Error, Debug)]
pub enum StoryError {
    /// The file is not a well-formed story
    #[error("story parsing error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The field's configuration section is required but absent
    #[error("a {field} story needs a [{field}] section")]
    MissingSection { field: FieldKind },

    #[error("event {index}: unknown key `{key}`")]
    UnknownKey { index: usize, key: String },

    /// The event means nothing to the story's field
    #[error("event {index}: `{kind}` does not apply to a {field} field")]
    UnsupportedEvent {
        index: usize,
        kind: &'static str,
        field: FieldKind,
    },

    #[error("event {index}: a {field} field takes {expected} external values")]
    ExternalType {
        index: usize,
        field: FieldKind,
        expected: &'static str,
    },
}

/// A scripted field interaction
#[derive(Debug, Deserialize)]
pub struct Story {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub field: FieldKind,
    #[serde(default)]
    pub number: Option<NumberSection>,
    #[serde(default)]
    pub search: Option<SearchSection>,
    #[serde(default)]
    pub password: Option<PasswordSection>,
    #[serde(default)]
    pub slider: Option<SliderSection>,
    #[serde(default)]
    pub events: Vec<StoryEvent>,
}

/// `[number]` section
#[derive(Clone, Debug, Deserialize)]
pub struct NumberSection {
    #[serde(default = "default_number_min")]
    pub min: f64,
    #[serde(default = "default_number_max")]
    pub max: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default)]
    pub default_value: f64,
    /// Present => the field is controlled
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub read_only: bool,
}

fn default_number_min() -> f64 {
    MIN_SAFE_INTEGER
}

fn default_number_max() -> f64 {
    MAX_SAFE_INTEGER
}

fn default_step() -> f64 {
    1.0
}

impl NumberSection {
    pub fn config(&self) -> NumberFieldConfig {
        NumberFieldConfig {
            min: self.min,
            max: self.max,
            step: self.step,
            default_value: self.default_value,
            value: self.value,
            disabled: self.disabled,
            read_only: self.read_only,
        }
    }
}

/// `[search]` section
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchSection {
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub search_button: bool,
}

impl SearchSection {
    pub fn config(&self) -> SearchFieldConfig {
        SearchFieldConfig {
            default_value: self.default_value.clone(),
            value: self.value.clone(),
            disabled: self.disabled,
            has_search_button: self.search_button,
        }
    }
}

/// `[password]` section
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PasswordSection {
    /// Sample text, shown masked or plain in each step's state
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub labels: LabelsSection,
}

impl PasswordSection {
    pub fn config(&self) -> PasswordConfig {
        PasswordConfig::new()
            .labels(self.labels.to_labels())
            .disabled(self.disabled)
    }
}

/// `[password.labels]` section, each entry falling back to the English text
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LabelsSection {
    #[serde(default)]
    pub show_password: Option<String>,
    #[serde(default)]
    pub hide_password: Option<String>,
    #[serde(default)]
    pub password_is_hidden: Option<String>,
    #[serde(default)]
    pub password_is_shown: Option<String>,
}

impl LabelsSection {
    fn to_labels(&self) -> PasswordLabels {
        let defaults = PasswordLabels::default();
        PasswordLabels {
            show_password: self.show_password.clone().unwrap_or(defaults.show_password),
            hide_password: self.hide_password.clone().unwrap_or(defaults.hide_password),
            password_is_hidden: self
                .password_is_hidden
                .clone()
                .unwrap_or(defaults.password_is_hidden),
            password_is_shown: self
                .password_is_shown
                .clone()
                .unwrap_or(defaults.password_is_shown),
        }
    }
}

/// `[slider]` section
#[derive(Clone, Debug, Deserialize)]
pub struct SliderSection {
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_slider_max")]
    pub max: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default)]
    pub default_value: f64,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub value_hidden: bool,
    /// Readout template such as `"{value}%"`
    #[serde(default)]
    pub format: Option<String>,
}

fn default_slider_max() -> f64 {
    100.0
}

impl Default for SliderSection {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: default_slider_max(),
            step: default_step(),
            default_value: 0.0,
            value: None,
            disabled: false,
            value_hidden: false,
            format: None,
        }
    }
}

impl SliderSection {
    pub fn config(&self) -> SliderFieldConfig {
        SliderFieldConfig {
            min: self.min,
            max: self.max,
            step: self.step,
            default_value: self.default_value,
            value: self.value,
            disabled: self.disabled,
            value_hidden: self.value_hidden,
            format: self.format.clone(),
        }
    }
}

/// Owner-supplied value: a number for numeric fields, text for search
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExternalValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for ExternalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalValue::Number(n) => f.write_str(&forma_fields::format_number(*n)),
            ExternalValue::Text(text) => write!(f, "{:?}", text),
        }
    }
}

/// One `[[events]]` entry
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoryEvent {
    Focus,
    Blur,
    TextInput {
        text: String,
    },
    Wheel {
        #[serde(default = "default_wheel_delta")]
        delta: f32,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    StepUp,
    StepDown,
    Toggle,
    Clear,
    Submit,
    /// The owner pushes a new value or query
    External {
        value: ExternalValue,
    },
    /// Direct slider move
    Change {
        value: f64,
    },
}

fn default_wheel_delta() -> f32 {
    -120.0
}

/// What replaying a story event does to a field
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Deliver an input event
    Input(FieldEvent),
    External(ExternalValue),
    Change(f64),
}

impl StoryEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            StoryEvent::Focus => "focus",
            StoryEvent::Blur => "blur",
            StoryEvent::TextInput { .. } => "text_input",
            StoryEvent::Wheel { .. } => "wheel",
            StoryEvent::Key { .. } => "key",
            StoryEvent::StepUp => "step_up",
            StoryEvent::StepDown => "step_down",
            StoryEvent::Toggle => "toggle",
            StoryEvent::Clear => "clear",
            StoryEvent::Submit => "submit",
            StoryEvent::External { .. } => "external",
            StoryEvent::Change { .. } => "change",
        }
    }

    /// Resolve the event; `index` is its 1-based position, for errors
    pub fn action(&self, index: usize) -> Result<Action, StoryError> {
        let event = match self {
            StoryEvent::Focus => FieldEvent::Focus,
            StoryEvent::Blur => FieldEvent::Blur,
            StoryEvent::TextInput { text } => FieldEvent::text(text.clone()),
            StoryEvent::Wheel { delta } => FieldEvent::Wheel { delta_y: *delta },
            StoryEvent::Key { key, modifiers } => {
                let code = KeyCode::from_name(key).ok_or_else(|| StoryError::UnknownKey {
                    index,
                    key: key.clone(),
                })?;
                FieldEvent::Key {
                    key: code,
                    modifiers: *modifiers,
                }
            }
            StoryEvent::StepUp => FieldEvent::StepUp,
            StoryEvent::StepDown => FieldEvent::StepDown,
            StoryEvent::Toggle => FieldEvent::Toggle,
            StoryEvent::Clear => FieldEvent::Clear,
            StoryEvent::Submit => FieldEvent::Submit,
            StoryEvent::External { value } => return Ok(Action::External(value.clone())),
            StoryEvent::Change { value } => return Ok(Action::Change(*value)),
        };
        Ok(Action::Input(event))
    }
}

impl fmt::Display for StoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoryEvent::TextInput { text } => write!(f, "text_input {:?}", text),
            StoryEvent::Wheel { delta } => write!(f, "wheel {}", delta),
            StoryEvent::Key { key, modifiers } if modifiers.is_empty() => {
                write!(f, "key {}", key)
            }
            StoryEvent::Key { key, modifiers } => write!(f, "key {}+{}", modifiers, key),
            StoryEvent::External { value } => write!(f, "external {}", value),
            StoryEvent::Change { value } => {
                write!(f, "change {}", forma_fields::format_number(*value))
            }
            other => f.write_str(other.kind()),
        }
    }
}

impl Story {
    /// Parse and validate a story
    pub fn parse(text: &str) -> Result<Self, StoryError> {
        let story: Story = toml::from_str(text)?;
        story.validate()?;
        Ok(story)
    }

    /// Check that every event applies to the story's field
    pub fn validate(&self) -> Result<(), StoryError> {
        if self.field == FieldKind::Number && self.number.is_none() {
            return Err(StoryError::MissingSection { field: self.field });
        }

        for (position, event) in self.events.iter().enumerate() {
            let index = position + 1;
            let supported = match event.action(index)? {
                Action::Input(input) => self.field.accepts(&input),
                Action::External(value) => {
                    self.check_external(index, &value)?;
                    true
                }
                Action::Change(_) => self.field == FieldKind::Slider,
            };
            if !supported {
                return Err(StoryError::UnsupportedEvent {
                    index,
                    kind: event.kind(),
                    field: self.field,
                });
            }
        }
        Ok(())
    }

    fn check_external(&self, index: usize, value: &ExternalValue) -> Result<(), StoryError> {
        let expected = match self.field {
            FieldKind::Number | FieldKind::Slider => "number",
            FieldKind::Search => "text",
            FieldKind::Password => {
                return Err(StoryError::UnsupportedEvent {
                    index,
                    kind: "external",
                    field: self.field,
                })
            }
        };
        let matches = matches!(
            (expected, value),
            ("number", ExternalValue::Number(_)) | ("text", ExternalValue::Text(_))
        );
        if matches {
            Ok(())
        } else {
            Err(StoryError::ExternalType {
                index,
                field: self.field,
                expected,
            })
        }
    }
}

/// Read, parse and validate a story file
pub fn load(path: &Path) -> anyhow::Result<Story> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let story = Story::parse(&content)
        .with_context(|| format!("Invalid story {}", path.display()))?;
    tracing::debug!(name = %story.name, events = story.events.len(), "story loaded");
    Ok(story)
}
