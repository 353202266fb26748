//! Search field controller
//!
//! Mirrors a query string under a fixed ownership mode and interprets two
//! reserved keys: Enter submits the query, Escape clears it. Both suppress
//! the surface's default key handling; every other key passes through.

use forma_core::{
    EventResponse, FieldController, FieldEvent, FieldKind, KeyCode, Mirrored, Notifier, Ownership,
};
use serde::Serialize;

/// SearchField configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFieldConfig {
    /// Initial query for an uncontrolled field
    pub default_value: String,
    /// Owner-supplied query; `Some` makes the field controlled
    pub value: Option<String>,
    pub disabled: bool,
    /// The field renders a dedicated search button instead of a clear button
    pub has_search_button: bool,
}

impl SearchFieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Supply the query from the owner, making the field controlled
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn search_button(mut self, has_search_button: bool) -> Self {
        self.has_search_button = has_search_button;
        self
    }
}

/// Serializable view of a SearchField's state
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchFieldSnapshot {
    pub ownership: Ownership,
    pub query: String,
    pub focused: bool,
    pub shows_clear_button: bool,
    pub can_submit: bool,
}

/// Search field controller
pub struct SearchField {
    query: Mirrored<String>,
    disabled: bool,
    has_search_button: bool,
    focused: bool,
    on_change: Notifier<String>,
    on_clear: Notifier<()>,
    on_submit: Notifier<String>,
}

impl Default for SearchField {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchField {
    pub fn new() -> Self {
        Self::with_config(SearchFieldConfig::default())
    }

    pub fn with_config(config: SearchFieldConfig) -> Self {
        Self {
            query: Mirrored::new(config.value, config.default_value),
            disabled: config.disabled,
            has_search_button: config.has_search_button,
            focused: false,
            on_change: Notifier::new(),
            on_clear: Notifier::new(),
            on_submit: Notifier::new(),
        }
    }

    /// Query change callback (text as typed)
    pub fn on_change<F: FnMut(String) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_change.set(callback);
        self
    }

    pub fn on_clear<F: FnMut(()) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_clear.set(callback);
        self
    }

    /// Submit callback, receiving the query at submit time
    pub fn on_submit<F: FnMut(String) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_submit.set(callback);
        self
    }

    pub fn query(&self) -> &str {
        self.query.get()
    }

    pub fn ownership(&self) -> Ownership {
        self.query.mode()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The inline clear button is only offered when there is something to
    /// clear and no search button takes its place.
    pub fn shows_clear_button(&self) -> bool {
        !self.has_search_button && !self.query().is_empty() && !self.disabled
    }

    /// Whether the search button is enabled
    pub fn can_submit(&self) -> bool {
        !self.disabled
    }

    /// Receive a query from the owner (controlled fields only)
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        self.query.sync(query.into())
    }

    /// Typed text changed
    pub fn edit(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.query.propose(text.clone());
        self.on_change.emit(text);
    }

    pub fn clear(&mut self) {
        self.query.propose(String::new());
        tracing::trace!("search cleared");
        self.on_clear.emit(());
    }

    pub fn submit(&mut self) {
        let query = self.query().to_string();
        tracing::trace!(query = %query, "search submitted");
        self.on_submit.emit(query);
    }

    /// Interpret a key press
    pub fn handle_key(&mut self, key: KeyCode) -> EventResponse {
        match key {
            KeyCode::ENTER => {
                self.submit();
                EventResponse::consumed()
            }
            KeyCode::ESCAPE => {
                self.clear();
                EventResponse::consumed()
            }
            _ => EventResponse::ignored(),
        }
    }

    pub fn snapshot(&self) -> SearchFieldSnapshot {
        SearchFieldSnapshot {
            ownership: self.ownership(),
            query: self.query().to_string(),
            focused: self.focused,
            shows_clear_button: self.shows_clear_button(),
            can_submit: self.can_submit(),
        }
    }
}

impl FieldController for SearchField {
    fn kind(&self) -> FieldKind {
        FieldKind::Search
    }

    fn handle_event(&mut self, event: &FieldEvent) -> EventResponse {
        if self.disabled {
            tracing::debug!(event = event.name(), "event ignored by disabled search field");
            return EventResponse::ignored();
        }

        match event {
            FieldEvent::Focus => {
                self.focused = true;
                EventResponse::handled()
            }
            FieldEvent::Blur => {
                self.focused = false;
                EventResponse::handled()
            }
            FieldEvent::TextInput { text } => {
                self.edit(text.clone());
                EventResponse::handled()
            }
            FieldEvent::Key { key, .. } => self.handle_key(*key),
            FieldEvent::Clear if self.shows_clear_button() => {
                self.clear();
                EventResponse::handled()
            }
            FieldEvent::Submit if self.has_search_button => {
                self.submit();
                EventResponse::handled()
            }
            _ => EventResponse::ignored(),
        }
    }
}
