//! Forma Field Controllers
//!
//! Headless controllers for form inputs. Each controller owns the state and
//! rules of one field and is driven by [`FieldEvent`](forma_core::FieldEvent)s
//! from whatever surface renders it.
//!
//! # Controllers
//!
//! 1. **[`NumberField`]**: a numeric value kept inside inclusive bounds and on
//!    a step grid. Typing is free-form; the text is parsed, aligned and
//!    committed when the field loses focus.
//!
//! 2. **[`SearchField`]**: a query string with Enter-to-submit and
//!    Escape-to-clear.
//!
//! 3. **[`PasswordVisibility`]**: the show/hide toggle of a password input.
//!
//! 4. **[`SliderField`]**: a stepped numeric value moved by keys.
//!
//! Value-carrying controllers are either controlled (the owner supplies the
//! value and local edits only produce notifications) or uncontrolled (the
//! controller stores its own value). The mode is fixed at construction.
//!
//! # Example
//!
//! ```rust
//! use forma_core::{FieldController, FieldEvent};
//! use forma_fields::prelude::*;
//!
//! let mut field = NumberField::with_config(
//!     NumberFieldConfig::new().min(0.0).max(10.0).step(3.0),
//! );
//!
//! field.handle_event(&FieldEvent::Focus);
//! field.handle_event(&FieldEvent::text("11"));
//! field.handle_event(&FieldEvent::Blur);
//!
//! assert_eq!(field.value(), 9.0);
//! assert!(!field.can_increase());
//! ```

pub mod number_field;
pub mod password_field;
pub mod search_field;
pub mod slider_field;
pub mod stepping;

pub use number_field::{DisplayValue, NumberField, NumberFieldConfig, NumberFieldSnapshot};
pub use password_field::{
    Obscuring, PasswordConfig, PasswordLabels, PasswordSnapshot, PasswordVisibility,
};
pub use search_field::{SearchField, SearchFieldConfig, SearchFieldSnapshot};
pub use slider_field::{SliderField, SliderFieldConfig, SliderFieldSnapshot};
pub use stepping::{align, format_number, parse_number, StepConstraints};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::number_field::{DisplayValue, NumberField, NumberFieldConfig};
    pub use crate::password_field::{PasswordConfig, PasswordLabels, PasswordVisibility};
    pub use crate::search_field::{SearchField, SearchFieldConfig};
    pub use crate::slider_field::{SliderField, SliderFieldConfig};
    pub use crate::stepping::{align, StepConstraints};
}
