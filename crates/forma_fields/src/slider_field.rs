//! Slider field controller

use forma_core::{
    EventResponse, FieldController, FieldEvent, FieldKind, KeyCode, Mirrored, Notifier, Ownership,
};
use serde::Serialize;

use crate::stepping::{format_number, StepConstraints};

/// Steps moved by PageUp/PageDown
const PAGE_STEPS: f64 = 10.0;

/// SliderField configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SliderFieldConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default_value: f64,
    /// Owner-supplied value; `Some` makes the slider controlled
    pub value: Option<f64>,
    pub disabled: bool,
    /// Hide the value readout
    pub value_hidden: bool,
    /// Readout template, `{value}` is replaced with the value
    pub format: Option<String>,
}

impl Default for SliderFieldConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
            default_value: 0.0,
            value: None,
            disabled: false,
            value_hidden: false,
            format: None,
        }
    }
}

impl SliderFieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn default_value(mut self, value: f64) -> Self {
        self.default_value = value;
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn value_hidden(mut self, hidden: bool) -> Self {
        self.value_hidden = hidden;
        self
    }

    pub fn format(mut self, template: impl Into<String>) -> Self {
        self.format = Some(template.into());
        self
    }
}

/// Serializable view of a SliderField's state
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SliderFieldSnapshot {
    pub ownership: Ownership,
    pub value: f64,
    pub formatted: Option<String>,
}

/// Slider field controller
pub struct SliderField {
    constraints: StepConstraints,
    value: Mirrored<f64>,
    disabled: bool,
    value_hidden: bool,
    format: Option<String>,
    on_change: Notifier<f64>,
}

impl Default for SliderField {
    fn default() -> Self {
        Self::new()
    }
}

impl SliderField {
    pub fn new() -> Self {
        Self::with_config(SliderFieldConfig::default())
    }

    pub fn with_config(config: SliderFieldConfig) -> Self {
        let constraints = StepConstraints::new(config.min, config.max, config.step);
        let external = config.value.map(|v| constraints.align(v));
        Self {
            value: Mirrored::new(external, constraints.align(config.default_value)),
            constraints,
            disabled: config.disabled,
            value_hidden: config.value_hidden,
            format: config.format,
            on_change: Notifier::new(),
        }
    }

    pub fn on_change<F: FnMut(f64) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_change.set(callback);
        self
    }

    pub fn value(&self) -> f64 {
        *self.value.get()
    }

    pub fn ownership(&self) -> Ownership {
        self.value.mode()
    }

    pub fn constraints(&self) -> &StepConstraints {
        &self.constraints
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Move the thumb to `value`
    ///
    /// Returns whether the aligned value differed from the current one.
    pub fn change(&mut self, value: f64) -> bool {
        let aligned = self.constraints.align(value);
        if aligned == self.value() {
            return false;
        }
        self.value.propose(aligned);
        tracing::trace!(value, aligned, "slider changed");
        self.on_change.emit(aligned);
        true
    }

    /// Receive a value from the owner (controlled sliders only)
    pub fn set_value(&mut self, value: f64) -> bool {
        self.value.sync(self.constraints.align(value))
    }

    /// Value readout, `None` when hidden
    pub fn formatted_value(&self) -> Option<String> {
        if self.value_hidden {
            return None;
        }
        let value = format_number(self.value());
        Some(match &self.format {
            Some(template) => template.replace("{value}", &value),
            None => value,
        })
    }

    pub fn snapshot(&self) -> SliderFieldSnapshot {
        SliderFieldSnapshot {
            ownership: self.ownership(),
            value: self.value(),
            formatted: self.formatted_value(),
        }
    }

    fn key_target(&self, key: KeyCode) -> Option<f64> {
        let step = self.constraints.step();
        let current = self.value();
        match key {
            KeyCode::UP | KeyCode::RIGHT => Some(current + step),
            KeyCode::DOWN | KeyCode::LEFT => Some(current - step),
            KeyCode::PAGE_UP => Some(current + step * PAGE_STEPS),
            KeyCode::PAGE_DOWN => Some(current - step * PAGE_STEPS),
            KeyCode::HOME => Some(self.constraints.min()),
            KeyCode::END => Some(self.constraints.max()),
            _ => None,
        }
    }
}

impl FieldController for SliderField {
    fn kind(&self) -> FieldKind {
        FieldKind::Slider
    }

    fn handle_event(&mut self, event: &FieldEvent) -> EventResponse {
        if self.disabled {
            tracing::debug!(event = event.name(), "event ignored by disabled slider");
            return EventResponse::ignored();
        }

        match event {
            FieldEvent::Key { key, .. } => match self.key_target(*key) {
                Some(target) => {
                    self.change(target);
                    EventResponse::consumed()
                }
                None => EventResponse::ignored(),
            },
            FieldEvent::StepUp => {
                self.change(self.value() + self.constraints.step());
                EventResponse::handled()
            }
            FieldEvent::StepDown => {
                self.change(self.value() - self.constraints.step());
                EventResponse::handled()
            }
            _ => EventResponse::ignored(),
        }
    }
}
