//! Story replay
//!
//! Builds the story's controller, wires every notification into a channel,
//! and records the controller's response, notifications and state after each
//! event.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use forma_core::{EventResponse, FieldController, FieldKind};
use forma_fields::{
    format_number, NumberField, NumberFieldSnapshot, PasswordSnapshot, PasswordVisibility,
    SearchField, SearchFieldSnapshot, SliderField, SliderFieldSnapshot,
};
use serde::Serialize;
use smallvec::SmallVec;

use crate::story::{Action, ExternalValue, Story, StoryError, StoryEvent};

/// An outbound notification fired by a controller
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Notification {
    /// Raw text change
    Change(String),
    StepChange(f64),
    Increase,
    Decrease,
    Clear,
    Submit(String),
    SliderChange(f64),
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Change(text) => write!(f, "change({:?})", text),
            Notification::StepChange(v) => write!(f, "step_change({})", format_number(*v)),
            Notification::Increase => f.write_str("increase"),
            Notification::Decrease => f.write_str("decrease"),
            Notification::Clear => f.write_str("clear"),
            Notification::Submit(query) => write!(f, "submit({:?})", query),
            Notification::SliderChange(v) => write!(f, "change({})", format_number(*v)),
        }
    }
}

/// Password state plus the sample text as the surface would draw it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PasswordView {
    #[serde(flatten)]
    pub state: PasswordSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Field state after a step
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Snapshot {
    Number(NumberFieldSnapshot),
    Search(SearchFieldSnapshot),
    Password(PasswordView),
    Slider(SliderFieldSnapshot),
}

impl Snapshot {
    /// One-line rendering for the text table
    pub fn summary(&self) -> String {
        match self {
            Snapshot::Number(s) => format!(
                "value={} display={:?} focused={} inc={} dec={}",
                format_number(s.value),
                s.display,
                s.focused,
                s.can_increase,
                s.can_decrease
            ),
            Snapshot::Search(s) => format!(
                "query={:?} focused={} clear_button={} can_submit={}",
                s.query, s.focused, s.shows_clear_button, s.can_submit
            ),
            Snapshot::Password(p) => {
                let mut line = format!(
                    "visible={} toggle={:?} status={:?}",
                    p.state.visible, p.state.toggle_label, p.state.status_label
                );
                if let Some(text) = &p.text {
                    line.push_str(&format!(" text={:?}", text));
                }
                line
            }
            Snapshot::Slider(s) => format!(
                "value={} readout={}",
                format_number(s.value),
                s.formatted.as_deref().unwrap_or("-")
            ),
        }
    }
}

/// Outcome of one replayed step
#[derive(Clone, Debug, Serialize)]
pub struct StepRecord {
    /// 0 for the initial state, then the 1-based event position
    pub step: usize,
    pub event: String,
    pub response: EventResponse,
    pub notifications: SmallVec<[Notification; 4]>,
    pub state: Snapshot,
}

enum Subject {
    Number(NumberField),
    Search(SearchField),
    Password {
        toggle: PasswordVisibility,
        text: Option<String>,
    },
    Slider(SliderField),
}

impl Subject {
    fn controller(&mut self) -> &mut dyn FieldController {
        match self {
            Subject::Number(field) => field,
            Subject::Search(field) => field,
            Subject::Password { toggle, .. } => toggle,
            Subject::Slider(field) => field,
        }
    }

    fn snapshot(&self) -> Snapshot {
        match self {
            Subject::Number(field) => Snapshot::Number(field.snapshot()),
            Subject::Search(field) => Snapshot::Search(field.snapshot()),
            Subject::Password { toggle, text } => Snapshot::Password(PasswordView {
                state: toggle.snapshot(),
                text: text.as_deref().map(|t| toggle.masked_text(t)),
            }),
            Subject::Slider(field) => Snapshot::Slider(field.snapshot()),
        }
    }

    fn external(&mut self, value: &ExternalValue) -> bool {
        match (self, value) {
            (Subject::Number(field), ExternalValue::Number(v)) => field.set_value(*v),
            (Subject::Slider(field), ExternalValue::Number(v)) => field.set_value(*v),
            (Subject::Search(field), ExternalValue::Text(q)) => field.set_query(q.clone()),
            _ => false,
        }
    }

    fn change(&mut self, value: f64) -> bool {
        match self {
            Subject::Slider(field) => field.change(value),
            _ => false,
        }
    }
}

/// Replays story events against one controller
pub struct Player {
    subject: Subject,
    notes: Receiver<Notification>,
}

impl Player {
    /// Build the story's controller with every notification recorded
    pub fn new(story: &Story) -> Self {
        let (tx, notes) = mpsc::channel();
        let subject = match story.field {
            FieldKind::Number => {
                let config = story
                    .number
                    .as_ref()
                    .map(|section| section.config())
                    .unwrap_or_default();
                Subject::Number(wire_number(NumberField::with_config(config), &tx))
            }
            FieldKind::Search => {
                let config = story
                    .search
                    .as_ref()
                    .map(|section| section.config())
                    .unwrap_or_default();
                Subject::Search(wire_search(SearchField::with_config(config), &tx))
            }
            FieldKind::Password => {
                let section = story.password.clone().unwrap_or_default();
                Subject::Password {
                    toggle: PasswordVisibility::with_config(section.config()),
                    text: section.text,
                }
            }
            FieldKind::Slider => {
                let config = story
                    .slider
                    .as_ref()
                    .map(|section| section.config())
                    .unwrap_or_default();
                let sink = tx.clone();
                Subject::Slider(SliderField::with_config(config).on_change(move |v| {
                    let _ = sink.send(Notification::SliderChange(v));
                }))
            }
        };
        Self { subject, notes }
    }

    /// Record the state before any event
    pub fn initial(&mut self) -> StepRecord {
        StepRecord {
            step: 0,
            event: "initial".to_string(),
            response: EventResponse::ignored(),
            notifications: self.drain(),
            state: self.subject.snapshot(),
        }
    }

    /// Replay one event; `index` is its 1-based position
    pub fn apply(&mut self, index: usize, event: &StoryEvent) -> Result<StepRecord, StoryError> {
        let response = match event.action(index)? {
            Action::Input(input) => self.subject.controller().handle_event(&input),
            Action::External(value) => applied(self.subject.external(&value)),
            Action::Change(value) => applied(self.subject.change(value)),
        };
        tracing::debug!(step = index, event = %event, handled = response.handled, "story step");

        Ok(StepRecord {
            step: index,
            event: event.to_string(),
            response,
            notifications: self.drain(),
            state: self.subject.snapshot(),
        })
    }

    /// Replay a whole story, starting with its initial state
    pub fn replay(story: &Story) -> Result<Vec<StepRecord>, StoryError> {
        let mut player = Player::new(story);
        let mut records = Vec::with_capacity(story.events.len() + 1);
        records.push(player.initial());
        for (position, event) in story.events.iter().enumerate() {
            records.push(player.apply(position + 1, event)?);
        }
        Ok(records)
    }

    fn drain(&self) -> SmallVec<[Notification; 4]> {
        self.notes.try_iter().collect()
    }
}

fn applied(changed: bool) -> EventResponse {
    if changed {
        EventResponse::handled()
    } else {
        EventResponse::ignored()
    }
}

fn wire_number(field: NumberField, tx: &Sender<Notification>) -> NumberField {
    let (change, step, up, down) = (tx.clone(), tx.clone(), tx.clone(), tx.clone());
    field
        .on_change(move |text| {
            let _ = change.send(Notification::Change(text));
        })
        .on_step_change(move |v| {
            let _ = step.send(Notification::StepChange(v));
        })
        .on_increase(move |_| {
            let _ = up.send(Notification::Increase);
        })
        .on_decrease(move |_| {
            let _ = down.send(Notification::Decrease);
        })
}

fn wire_search(field: SearchField, tx: &Sender<Notification>) -> SearchField {
    let (change, clear, submit) = (tx.clone(), tx.clone(), tx.clone());
    field
        .on_change(move |text| {
            let _ = change.send(Notification::Change(text));
        })
        .on_clear(move |_| {
            let _ = clear.send(Notification::Clear);
        })
        .on_submit(move |query| {
            let _ = submit.send(Notification::Submit(query));
        })
}
