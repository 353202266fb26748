//! Forma Core
//!
//! Field-agnostic building blocks shared by every Forma field controller:
//!
//! - **Ownership**: who is the source of truth for a field's value, decided
//!   once when the field is created
//! - **Mirrored values**: a value paired with its ownership mode, with separate
//!   write paths for local edits and owner-supplied updates
//! - **Input events**: named events delivered to a controller by whatever
//!   surface renders it (focus, blur, typed text, keys, wheel, button presses)
//! - **Notifiers**: synchronous outbound callbacks
//!
//! # Example
//!
//! ```rust
//! use forma_core::{Mirrored, Ownership};
//!
//! // No external value supplied: the field owns its value.
//! let mut query = Mirrored::new(None, String::from("rust"));
//! assert_eq!(query.mode(), Ownership::Uncontrolled);
//!
//! assert!(query.propose(String::from("rustacean")));
//! assert_eq!(query.get(), "rustacean");
//!
//! // Owner updates are ignored by an uncontrolled field.
//! assert!(!query.sync(String::from("ferris")));
//! assert_eq!(query.get(), "rustacean");
//! ```

pub mod events;
pub mod field;
pub mod notify;
pub mod ownership;

pub use events::{EventResponse, FieldEvent, KeyCode, Modifiers};
pub use field::{FieldController, FieldKind};
pub use notify::Notifier;
pub use ownership::{Mirrored, Ownership};
