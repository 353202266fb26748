//! Constrained numeric value controller
//!
//! Owns the value of a stepper-style number input:
//! - A committed value that is always step-aligned and inside the bounds
//! - Free-form display text while the user is typing
//! - Commit on focus loss, with unparsable text reverting to the last good value
//! - Increment/decrement with derived enablement flags
//! - Controlled (owner supplies the value) or uncontrolled (field owns it)
//!   operation, decided once at construction
//! - Scroll-wheel input rejected by dropping focus

use std::fmt;

use forma_core::{
    EventResponse, FieldController, FieldEvent, FieldKind, Mirrored, Notifier, Ownership,
};
use serde::Serialize;

use crate::stepping::{
    format_number, parse_number, StepConstraints, MAX_SAFE_INTEGER, MIN_SAFE_INTEGER,
};

/// What the edit surface currently shows
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayValue {
    /// A committed (or candidate) number
    Number(f64),
    /// Raw text typed since the last commit
    Text(String),
}

impl DisplayValue {
    /// Numeric reading of the display, if it parses
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DisplayValue::Number(n) => Some(*n),
            DisplayValue::Text(text) => parse_number(text),
        }
    }

    /// Whether the display holds uncommitted text
    pub fn is_editing(&self) -> bool {
        matches!(self, DisplayValue::Text(_))
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Number(n) => f.write_str(&format_number(*n)),
            DisplayValue::Text(text) => f.write_str(text),
        }
    }
}

/// NumberField configuration
#[derive(Clone, Debug, PartialEq)]
pub struct NumberFieldConfig {
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound (raised to `min` if below it)
    pub max: f64,
    /// Step granularity (must be positive; otherwise `1` is used)
    pub step: f64,
    /// Initial value for an uncontrolled field
    pub default_value: f64,
    /// Owner-supplied value; `Some` makes the field controlled
    pub value: Option<f64>,
    pub disabled: bool,
    pub read_only: bool,
}

impl Default for NumberFieldConfig {
    fn default() -> Self {
        Self {
            min: MIN_SAFE_INTEGER,
            max: MAX_SAFE_INTEGER,
            step: 1.0,
            default_value: 0.0,
            value: None,
            disabled: false,
            read_only: false,
        }
    }
}

impl NumberFieldConfig {
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

    /// Set the initial value (uncontrolled fields)
    pub fn default_value(mut self, value: f64) -> Self {
        self.default_value = value;
        self
    }

    /// Supply the value from the owner, making the field controlled
    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// Serializable view of a NumberField's state
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NumberFieldSnapshot {
    pub ownership: Ownership,
    pub value: f64,
    pub display: String,
    pub focused: bool,
    pub can_increase: bool,
    pub can_decrease: bool,
}

/// Constrained numeric value controller
pub struct NumberField {
    constraints: StepConstraints,
    committed: Mirrored<f64>,
    display: DisplayValue,
    /// Last raw value supplied by the owner
    last_external: Option<f64>,
    disabled: bool,
    read_only: bool,
    focused: bool,
    on_change: Notifier<String>,
    on_step_change: Notifier<f64>,
    on_increase: Notifier<()>,
    on_decrease: Notifier<()>,
}

impl Default for NumberField {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberField {
    /// Create an uncontrolled field with default configuration
    pub fn new() -> Self {
        Self::with_config(NumberFieldConfig::default())
    }

    /// Create a field from a configuration
    ///
    /// The default (or owner-supplied) value is aligned before it is stored.
    pub fn with_config(config: NumberFieldConfig) -> Self {
        let constraints = StepConstraints::new(config.min, config.max, config.step);
        let external = config.value.map(|v| constraints.align(v));
        let committed = Mirrored::new(external, constraints.align(config.default_value));
        let display = DisplayValue::Number(*committed.get());

        tracing::trace!(
            mode = ?committed.mode(),
            value = *committed.get(),
            "number field created"
        );

        Self {
            constraints,
            committed,
            display,
            last_external: config.value,
            disabled: config.disabled,
            read_only: config.read_only,
            focused: false,
            on_change: Notifier::new(),
            on_step_change: Notifier::new(),
            on_increase: Notifier::new(),
            on_decrease: Notifier::new(),
        }
    }

    /// Raw text change callback
    pub fn on_change<F: FnMut(String) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_change.set(callback);
        self
    }

    /// Committed/stepped value callback
    pub fn on_step_change<F: FnMut(f64) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_step_change.set(callback);
        self
    }

    pub fn on_increase<F: FnMut(()) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_increase.set(callback);
        self
    }

    pub fn on_decrease<F: FnMut(()) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_decrease.set(callback);
        self
    }

    /// The committed value
    pub fn value(&self) -> f64 {
        *self.committed.get()
    }

    pub fn display_value(&self) -> &DisplayValue {
        &self.display
    }

    pub fn ownership(&self) -> Ownership {
        self.committed.mode()
    }

    pub fn constraints(&self) -> &StepConstraints {
        &self.constraints
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether the increment control is enabled
    pub fn can_increase(&self) -> bool {
        !self.disabled && !self.read_only && self.constraints.can_step_up(self.value())
    }

    /// Whether the decrement control is enabled
    pub fn can_decrease(&self) -> bool {
        !self.disabled && !self.read_only && self.constraints.can_step_down(self.value())
    }

    /// Receive a value from the owner (controlled fields only)
    ///
    /// A value equal to the last one supplied is not new and changes nothing.
    /// A new value is aligned, committed, and replaces any text being typed.
    /// Returns whether the value was applied.
    pub fn set_value(&mut self, value: f64) -> bool {
        if !self.committed.is_controlled() {
            tracing::debug!(value, "owner value ignored by uncontrolled number field");
            return false;
        }
        if self.last_external == Some(value) {
            return false;
        }
        self.last_external = Some(value);
        if !self.constraints.contains(value) {
            tracing::debug!(value, "owner value outside bounds clamped");
        }

        let aligned = self.constraints.align(value);
        self.committed.sync(aligned);
        self.display = DisplayValue::Number(aligned);
        tracing::trace!(value, aligned, "number field synced from owner");
        true
    }

    /// Replace the display text verbatim and report it
    ///
    /// The committed value is not touched and the text is not validated.
    pub fn edit(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        self.display = DisplayValue::Text(raw.clone());
        self.on_change.emit(raw);
    }

    /// Commit the display text
    ///
    /// Unparsable text (including empty text) reverts the display to the
    /// committed value without notifying. Otherwise the parsed number is
    /// aligned, committed (uncontrolled fields), shown, and reported.
    pub fn commit_edit(&mut self) {
        let Some(parsed) = self.display.as_number() else {
            tracing::trace!(display = %self.display, "unparsable input reverted");
            self.display = DisplayValue::Number(self.value());
            return;
        };

        let aligned = self.constraints.align(parsed);
        self.committed.propose(aligned);
        self.display = DisplayValue::Number(aligned);
        tracing::trace!(parsed, aligned, "number field committed");
        self.on_step_change.emit(aligned);
    }

    /// Add one step to the committed value
    ///
    /// The candidate is not re-aligned or clamped; callers gate this on
    /// [`NumberField::can_increase`].
    pub fn increase(&mut self) {
        let candidate = self.value() + self.constraints.step();
        self.apply_step(candidate);
        self.on_increase.emit(());
    }

    /// Subtract one step from the committed value
    ///
    /// The candidate is not re-aligned or clamped; callers gate this on
    /// [`NumberField::can_decrease`].
    pub fn decrease(&mut self) {
        let candidate = self.value() - self.constraints.step();
        self.apply_step(candidate);
        self.on_decrease.emit(());
    }

    fn apply_step(&mut self, candidate: f64) {
        self.committed.propose(candidate);
        self.display = DisplayValue::Number(candidate);
        tracing::trace!(candidate, "number field stepped");
        self.on_step_change.emit(candidate);
    }

    pub fn snapshot(&self) -> NumberFieldSnapshot {
        NumberFieldSnapshot {
            ownership: self.ownership(),
            value: self.value(),
            display: self.display.to_string(),
            focused: self.focused,
            can_increase: self.can_increase(),
            can_decrease: self.can_decrease(),
        }
    }
}

impl FieldController for NumberField {
    fn kind(&self) -> FieldKind {
        FieldKind::Number
    }

    fn handle_event(&mut self, event: &FieldEvent) -> EventResponse {
        if self.disabled {
            tracing::debug!(event = event.name(), "event ignored by disabled number field");
            return EventResponse::ignored();
        }

        match event {
            FieldEvent::Focus => {
                self.focused = true;
                EventResponse::handled()
            }
            // A blur without a prior focus only commits text still being typed.
            FieldEvent::Blur if self.focused || self.display.is_editing() => {
                self.focused = false;
                self.commit_edit();
                EventResponse::handled()
            }
            FieldEvent::TextInput { text } if !self.read_only => {
                self.edit(text.clone());
                EventResponse::handled()
            }
            // Wheel never changes the value; it only drops focus so a scroll
            // over a focused input cannot drag the number around.
            FieldEvent::Wheel { .. } if self.focused => {
                self.focused = false;
                EventResponse::blur()
            }
            FieldEvent::StepUp if self.can_increase() => {
                self.increase();
                EventResponse::handled()
            }
            FieldEvent::StepDown if self.can_decrease() => {
                self.decrease();
                EventResponse::handled()
            }
            _ => EventResponse::ignored(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, PartialEq)]
    enum Note {
        Change(String),
        Step(f64),
        Increase,
        Decrease,
    }

    fn recorded(field: NumberField) -> (NumberField, Arc<Mutex<Vec<Note>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (a, b, c, d) = (log.clone(), log.clone(), log.clone(), log.clone());
        let field = field
            .on_change(move |text| a.lock().unwrap().push(Note::Change(text)))
            .on_step_change(move |v| b.lock().unwrap().push(Note::Step(v)))
            .on_increase(move |_| c.lock().unwrap().push(Note::Increase))
            .on_decrease(move |_| d.lock().unwrap().push(Note::Decrease));
        (field, log)
    }

    fn zero_to_ten_by_three() -> NumberFieldConfig {
        NumberFieldConfig::new().min(0.0).max(10.0).step(3.0)
    }

    #[test]
    fn test_default_is_aligned() {
        let field = NumberField::with_config(zero_to_ten_by_three().default_value(7.0));
        assert_eq!(field.value(), 6.0);
        assert_eq!(field.display_value(), &DisplayValue::Number(6.0));
        assert_eq!(field.ownership(), Ownership::Uncontrolled);
    }

    #[test]
    fn test_controlled_value_is_aligned() {
        let field = NumberField::with_config(zero_to_ten_by_three().value(11.0));
        assert_eq!(field.value(), 9.0);
        assert_eq!(field.ownership(), Ownership::Controlled);
        assert!(!field.can_increase());
        assert!(field.can_decrease());
    }

    #[test]
    fn test_defaults() {
        let field = NumberField::new();
        assert_eq!(field.value(), 0.0);
        assert_eq!(field.constraints().step(), 1.0);
        assert!(field.can_increase());
        assert!(field.can_decrease());
    }

    #[test]
    fn test_edit_does_not_commit() {
        let (mut field, log) = recorded(NumberField::with_config(zero_to_ten_by_three()));
        field.edit("4");
        assert_eq!(field.value(), 0.0);
        assert_eq!(field.display_value(), &DisplayValue::Text("4".into()));
        assert_eq!(*log.lock().unwrap(), vec![Note::Change("4".into())]);
    }

    #[test]
    fn test_commit_aligns_and_notifies() {
        let (mut field, log) = recorded(NumberField::with_config(zero_to_ten_by_three()));
        field.edit("11");
        field.commit_edit();
        assert_eq!(field.value(), 9.0);
        assert_eq!(field.display_value().to_string(), "9");
        assert_eq!(
            *log.lock().unwrap(),
            vec![Note::Change("11".into()), Note::Step(9.0)]
        );
    }

    #[test]
    fn test_commit_unparsable_reverts_silently() {
        let (mut field, log) =
            recorded(NumberField::with_config(zero_to_ten_by_three().default_value(6.0)));
        field.display = DisplayValue::Text("notanumber".into());
        field.commit_edit();
        assert_eq!(field.value(), 6.0);
        assert_eq!(field.display_value(), &DisplayValue::Number(6.0));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_commit_empty_reverts() {
        let mut field = NumberField::with_config(zero_to_ten_by_three().default_value(3.0));
        field.edit("");
        field.commit_edit();
        assert_eq!(field.display_value().to_string(), "3");
    }

    #[test]
    fn test_commit_unchanged_text_still_notifies() {
        let (mut field, log) =
            recorded(NumberField::with_config(zero_to_ten_by_three().default_value(3.0)));
        field.commit_edit();
        assert_eq!(*log.lock().unwrap(), vec![Note::Step(3.0)]);
    }

    #[test]
    fn test_increase_order_of_notifications() {
        let (mut field, log) = recorded(NumberField::with_config(zero_to_ten_by_three()));
        field.increase();
        field.decrease();
        assert_eq!(field.value(), 0.0);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Note::Step(3.0),
                Note::Increase,
                Note::Step(0.0),
                Note::Decrease
            ]
        );
    }

    #[test]
    fn test_increase_is_not_clamped() {
        let mut field = NumberField::with_config(zero_to_ten_by_three().default_value(9.0));
        assert!(!field.can_increase());
        // Direct calls bypass the enablement gate.
        field.increase();
        assert_eq!(field.value(), 12.0);
    }

    #[test]
    fn test_enablement_flags() {
        let field = NumberField::with_config(zero_to_ten_by_three().default_value(9.0));
        assert!(!field.can_increase());
        assert!(field.can_decrease());

        let field = NumberField::with_config(zero_to_ten_by_three());
        assert!(field.can_increase());
        assert!(!field.can_decrease());

        let field =
            NumberField::with_config(zero_to_ten_by_three().default_value(3.0).read_only(true));
        assert!(!field.can_increase());
        assert!(!field.can_decrease());

        let field =
            NumberField::with_config(zero_to_ten_by_three().default_value(3.0).disabled(true));
        assert!(!field.can_increase());
        assert!(!field.can_decrease());
    }

    #[test]
    fn test_controlled_steps_defer_to_owner() {
        let (mut field, log) =
            recorded(NumberField::with_config(zero_to_ten_by_three().value(3.0)));
        field.increase();
        assert_eq!(field.value(), 3.0);
        assert_eq!(field.display_value(), &DisplayValue::Number(6.0));
        assert_eq!(*log.lock().unwrap(), vec![Note::Step(6.0), Note::Increase]);

        assert!(field.set_value(6.0));
        assert_eq!(field.value(), 6.0);
    }

    #[test]
    fn test_controlled_commit_defers_to_owner() {
        let mut field = NumberField::with_config(zero_to_ten_by_three().value(3.0));
        field.edit("8");
        field.commit_edit();
        assert_eq!(field.value(), 3.0);
        assert_eq!(field.display_value(), &DisplayValue::Number(9.0));
    }

    #[test]
    fn test_owner_value_discards_typing() {
        let mut field = NumberField::with_config(zero_to_ten_by_three().value(3.0));
        field.edit("7");
        assert!(field.set_value(5.0));
        assert_eq!(field.value(), 6.0);
        assert_eq!(field.display_value(), &DisplayValue::Number(6.0));
    }

    #[test]
    fn test_repeated_owner_value_is_not_new() {
        let mut field = NumberField::with_config(zero_to_ten_by_three().value(3.0));
        field.edit("7");
        assert!(!field.set_value(3.0));
        assert_eq!(field.display_value(), &DisplayValue::Text("7".into()));
    }

    #[test]
    fn test_uncontrolled_ignores_owner_value() {
        let mut field = NumberField::with_config(zero_to_ten_by_three().default_value(3.0));
        assert!(!field.set_value(9.0));
        assert_eq!(field.value(), 3.0);
    }

    #[test]
    fn test_blur_event_commits() {
        let mut field = NumberField::with_config(zero_to_ten_by_three());
        field.handle_event(&FieldEvent::Focus);
        field.handle_event(&FieldEvent::text("5"));
        let response = field.handle_event(&FieldEvent::Blur);
        assert!(response.handled);
        assert!(!field.is_focused());
        assert_eq!(field.value(), 6.0);
    }

    #[test]
    fn test_blur_without_focus_does_not_commit() {
        let (mut field, log) = recorded(NumberField::with_config(zero_to_ten_by_three()));
        field.handle_event(&FieldEvent::StepUp);
        assert_eq!(*log.lock().unwrap(), vec![Note::Step(3.0), Note::Increase]);

        let response = field.handle_event(&FieldEvent::Blur);
        assert!(!response.handled);
        assert_eq!(field.value(), 3.0);
        assert_eq!(log.lock().unwrap().len(), 2);

        // Typed text is still committed when focus is lost.
        field.handle_event(&FieldEvent::text("7"));
        assert!(field.handle_event(&FieldEvent::Blur).handled);
        assert_eq!(field.value(), 6.0);
        assert_eq!(log.lock().unwrap().last(), Some(&Note::Step(6.0)));
    }

    #[test]
    fn test_wheel_drops_focus_without_change() {
        let (mut field, log) = recorded(NumberField::with_config(zero_to_ten_by_three()));
        field.handle_event(&FieldEvent::Focus);
        field.handle_event(&FieldEvent::text("4"));

        let response = field.handle_event(&FieldEvent::Wheel { delta_y: -120.0 });
        assert_eq!(response, EventResponse::blur());
        assert!(!field.is_focused());
        assert_eq!(field.value(), 0.0);
        assert_eq!(*log.lock().unwrap(), vec![Note::Change("4".into())]);

        // Unfocused wheel input is not ours to handle.
        let response = field.handle_event(&FieldEvent::Wheel { delta_y: -120.0 });
        assert!(!response.handled);
    }

    #[test]
    fn test_step_events_respect_enablement() {
        let (mut field, log) =
            recorded(NumberField::with_config(zero_to_ten_by_three().default_value(9.0)));
        assert!(!field.handle_event(&FieldEvent::StepUp).handled);
        assert_eq!(field.value(), 9.0);
        assert!(log.lock().unwrap().is_empty());

        assert!(field.handle_event(&FieldEvent::StepDown).handled);
        assert_eq!(field.value(), 6.0);
    }

    #[test]
    fn test_disabled_ignores_events() {
        let mut field = NumberField::with_config(zero_to_ten_by_three().disabled(true));
        assert!(!field.handle_event(&FieldEvent::Focus).handled);
        assert!(!field.handle_event(&FieldEvent::text("3")).handled);
        assert_eq!(field.display_value(), &DisplayValue::Number(0.0));
    }

    #[test]
    fn test_read_only_rejects_typing() {
        let mut field = NumberField::with_config(zero_to_ten_by_three().read_only(true));
        assert!(!field.handle_event(&FieldEvent::text("3")).handled);
        assert_eq!(field.display_value(), &DisplayValue::Number(0.0));
    }

    #[test]
    fn test_snapshot() {
        let mut field = NumberField::with_config(zero_to_ten_by_three().default_value(9.0));
        field.edit("4.");
        let snapshot = field.snapshot();
        assert_eq!(snapshot.value, 9.0);
        assert_eq!(snapshot.display, "4.");
        assert!(!snapshot.can_increase);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["ownership"], "uncontrolled");
    }
}
