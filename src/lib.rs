//! This crate provides the core of a study to-do list.
//!
//! Tasks (a title, a due date and a completion flag) live in a remote collection, that is abstracted by the
//! [`TaskStore`](traits::TaskStore) trait. The [`store`] module provides a Firestore implementation, and an in-memory
//! one that is handy offline and in tests. Stores can be watched through a live [`Subscription`].
//!
//! The due date of a task is picked with a [`DueDateTimeSelector`], that chains a date picker and a time picker
//! without ever losing the half that is not being edited.
//!
//! The [`screens`] module binds all of this together the way an app would, and the [`quote`] module fetches
//! motivational quotes from a chat-completion API.

pub mod traits;

mod task;
pub use task::{Task, TaskFields, TaskId, TaskPatch};
pub use task::{parse_iso_string, to_iso_string};
pub mod selector;
pub use selector::DueDateTimeSelector;
pub mod subscription;
pub use subscription::Subscription;

pub mod store;
pub mod quote;
pub mod screens;
pub mod theme;

pub mod config;
pub mod mock_behaviour;
pub mod utils;
