//! Foundation types for the shintab new-tab dashboard.
//!
//! Everything persisted by shintab flows through the types in this crate:
//!
//! - [`ImageId`] -- opaque unique key assigned to an uploaded image blob
//! - [`ImageSource`] -- tagged reference to either a bundled default image
//!   or a user-uploaded blob
//! - [`Settings`] -- the dashboard configuration record
//! - [`QuickLink`], [`TodoItem`], [`WebApp`] -- widget records stored in
//!   the configuration store
//!
//! This crate has no storage dependencies; it only defines the vocabulary
//! the store crates share.

pub mod error;
pub mod id;
pub mod settings;
pub mod source;
pub mod widgets;

pub use error::TypeError;
pub use id::ImageId;
pub use settings::{Settings, SettingsPatch, TimeFormat};
pub use source::ImageSource;
pub use widgets::{default_quick_links, QuickLink, TodoItem, WebApp};
