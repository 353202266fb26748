//! Outbound notifications
//!
//! Each controller owns one [`Notifier`] per notification it can fire.
//! Notifications run synchronously, inside the handling of the event that
//! caused them.

/// A single optional callback slot
pub struct Notifier<T> {
    handler: Option<Box<dyn FnMut(T) + Send>>,
}

impl<T> Notifier<T> {
    pub fn new() -> Self {
        Self { handler: None }
    }

    /// Install the callback, replacing any previous one
    pub fn set<F: FnMut(T) + Send + 'static>(&mut self, callback: F) {
        self.handler = Some(Box::new(callback));
    }

    pub fn is_set(&self) -> bool {
        self.handler.is_some()
    }

    /// Fire the callback if one is installed
    pub fn emit(&mut self, payload: T) {
        if let Some(ref mut handler) = self.handler {
            handler(payload);
        }
    }
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("set", &self.is_set())
            .finish()
    }
}
