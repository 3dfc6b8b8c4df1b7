//! Screen controllers
//!
//! These hold the state of each screen and bind it to a [`TaskStore`](crate::traits::TaskStore) or a
//! [`QuoteProvider`](crate::traits::QuoteProvider). They draw nothing: whatever UI toolkit hosts them reads their
//! state, and forwards user actions to their methods.
//!
//! Failures are reported to the screen that caused them, as a [`Notice`]. Nothing is ever retried.

mod task_list;
mod task_detail;
mod quote_panel;

pub use task_list::{TaskListScreen, TaskRow};
pub use task_detail::TaskDetailScreen;
pub use quote_panel::QuotePanel;

use std::fmt::{Display, Formatter};

use crate::task::{Task, TaskId};

/// Something the user should be told about
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// A message the user has to acknowledge before going on (an alert)
    Blocking(String),
    /// A message that does not interrupt the user (e.g. a toast)
    Error(String),
}

impl Notice {
    pub fn is_blocking(&self) -> bool {
        matches!(self, Notice::Blocking(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Blocking(msg) => msg,
            Notice::Error(msg) => msg,
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for Notice {}


/// The choices of a [`ConfirmPrompt`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmChoice {
    Cancel,
    Delete,
}

impl ConfirmChoice {
    pub fn label(&self) -> &'static str {
        match self {
            ConfirmChoice::Cancel => "Cancel",
            ConfirmChoice::Delete => "Delete",
        }
    }
}

/// A question that must be answered before a destructive action is performed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmPrompt {
    title: &'static str,
    message: String,
    task_id: TaskId,
}

impl ConfirmPrompt {
    pub(crate) fn delete_task(task: &Task) -> Self {
        Self {
            title: "Delete Task",
            message: format!("Are you sure you want to delete \"{}\"?", task.title()),
            task_id: task.id().clone(),
        }
    }

    pub fn title(&self) -> &str      { self.title }
    pub fn message(&self) -> &str    { &self.message }
    pub fn task_id(&self) -> &TaskId { &self.task_id }

    pub fn choices(&self) -> [ConfirmChoice; 2] {
        [ConfirmChoice::Cancel, ConfirmChoice::Delete]
    }
}
