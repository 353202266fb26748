//! Controlled/uncontrolled ownership of a field value
//!
//! A field is either *controlled* (an external owner holds the authoritative
//! value and must supply every new one) or *uncontrolled* (the field holds the
//! value itself, seeded from a default). The mode is fixed when the field is
//! created and never re-derived afterwards, so an owner that stops supplying
//! values does not silently flip the field into the other mode.

use serde::{Deserialize, Serialize};

/// Who is the source of truth for a field's value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    /// The external owner supplies the value
    Controlled,
    /// The field owns its value
    #[default]
    Uncontrolled,
}

impl Ownership {
    /// Controlled when an external value is supplied at creation
    pub fn from_source<T>(external: &Option<T>) -> Self {
        if external.is_some() {
            Ownership::Controlled
        } else {
            Ownership::Uncontrolled
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Ownership::Controlled)
    }
}

/// A value mirrored under a fixed ownership mode
///
/// Local writes go through [`Mirrored::propose`] and only land when the field
/// is uncontrolled. Owner-supplied values go through [`Mirrored::sync`] and
/// only land when the field is controlled.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Mirrored<T> {
    mode: Ownership,
    value: T,
}

impl<T> Mirrored<T> {
    /// Create a mirrored value
    ///
    /// `external` decides the mode: `Some` makes the value controlled and
    /// seeds it from the owner, `None` makes it uncontrolled and seeds it from
    /// `default`.
    pub fn new(external: Option<T>, default: T) -> Self {
        let mode = Ownership::from_source(&external);
        Self {
            mode,
            value: external.unwrap_or(default),
        }
    }

    /// Create a controlled value seeded from the owner
    pub fn controlled(value: T) -> Self {
        Self {
            mode: Ownership::Controlled,
            value,
        }
    }

    /// Create an uncontrolled value seeded from a default
    pub fn uncontrolled(default: T) -> Self {
        Self {
            mode: Ownership::Uncontrolled,
            value: default,
        }
    }

    /// Current value
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn mode(&self) -> Ownership {
        self.mode
    }

    pub fn is_controlled(&self) -> bool {
        self.mode.is_controlled()
    }

    /// Apply a local write. Returns `false` (and keeps the value) when the
    /// field is controlled.
    pub fn propose(&mut self, next: T) -> bool {
        match self.mode {
            Ownership::Uncontrolled => {
                self.value = next;
                true
            }
            Ownership::Controlled => {
                tracing::trace!("local write deferred to owner");
                false
            }
        }
    }

    /// Apply an owner-supplied value. Returns `false` (and keeps the value)
    /// when the field is uncontrolled.
    pub fn sync(&mut self, external: T) -> bool {
        match self.mode {
            Ownership::Controlled => {
                self.value = external;
                true
            }
            Ownership::Uncontrolled => {
                tracing::debug!("external value ignored: field owns its value");
                false
            }
        }
    }
}

impl<T: Default> Default for Mirrored<T> {
    fn default() -> Self {
        Self::uncontrolled(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_source() {
        assert_eq!(Ownership::from_source(&Some(3)), Ownership::Controlled);
        assert_eq!(Ownership::from_source::<i32>(&None), Ownership::Uncontrolled);
    }

    #[test]
    fn test_uncontrolled_accepts_local_writes() {
        let mut value = Mirrored::new(None, 1);
        assert!(!value.is_controlled());

        assert!(value.propose(5));
        assert_eq!(*value.get(), 5);

        assert!(!value.sync(9));
        assert_eq!(*value.get(), 5);
    }

    #[test]
    fn test_controlled_defers_to_owner() {
        let mut value = Mirrored::new(Some(2), 1);
        assert!(value.is_controlled());
        assert_eq!(*value.get(), 2);

        assert!(!value.propose(5));
        assert_eq!(*value.get(), 2);

        assert!(value.sync(7));
        assert_eq!(*value.get(), 7);
    }

    #[test]
    fn test_mode_is_fixed() {
        let mut value = Mirrored::controlled(String::from("a"));
        // An owner that keeps syncing never turns the value uncontrolled.
        for next in ["b", "c", ""] {
            value.sync(next.to_string());
            assert_eq!(value.mode(), Ownership::Controlled);
        }
    }

    #[test]
    fn test_serialize_snapshot() {
        let value = Mirrored::controlled(4.5);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"mode":"controlled","value":4.5}"#);
    }
}
