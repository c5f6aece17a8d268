//! View models
//!
//! Presentation-layer adapters between decoded resources and the list UI.
//!
//! - [`resource`] - `ResourceViewModel`, one per displayed resource
//! - [`transition`] - `TransitionViewModel`, the input form for a transition
//! - [`title`] - display title inference shared by both

pub mod resource;
pub mod title;
pub mod transition;

pub use resource::{ResourceViewModel, ResourceViewModelResult};
pub use title::{infer_title, TITLE_KEYS};
pub use transition::{FieldKind, TransitionField, TransitionViewModel};
