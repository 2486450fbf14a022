//! Ports (trait boundaries) for external collaborators.
//!
//! The learning core owns these traits; progress reporting, file export and
//! game front-ends implement them.

pub mod observer;
pub mod selector;

pub use observer::Observer;
pub use selector::MoveSelector;
