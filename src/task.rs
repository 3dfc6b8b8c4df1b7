//! Study tasks, as stored in the `tasks` collection

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};


/// The identifier a store assigned to a task when it was created.
///
/// It is opaque, and stable for the whole lifetime of the task.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    /// Generate a random TaskId, for stores that do not assign IDs themselves
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_simple().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}


/// Format a timestamp the way it is stored in the `due` field, e.g. `2024-03-05T14:30:00.000Z`
pub fn to_iso_string(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored `due` field
pub fn parse_iso_string(text: &str) -> Result<DateTime<Utc>, Box<dyn Error>> {
    let parsed = DateTime::parse_from_rfc3339(text.trim())
        .map_err(|err| format!("Invalid due date {:?}: {}", text, err))?;
    Ok(parsed.with_timezone(&Utc))
}


/// A to-do task, as read back from a store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    /// Always a full point in time (date and time of day).
    due: DateTime<Utc>,
    completed: bool,
}

impl Task {
    /// Build a task from a store document
    pub fn new(id: TaskId, fields: TaskFields) -> Self {
        Self {
            id,
            title: fields.title,
            due: fields.due,
            completed: fields.completed,
        }
    }

    pub fn id(&self) -> &TaskId         { &self.id }
    pub fn title(&self) -> &str         { &self.title }
    pub fn due(&self) -> &DateTime<Utc> { &self.due }
    pub fn completed(&self) -> bool     { self.completed }

    /// The `due` field, in its stored form
    pub fn due_iso(&self) -> String {
        to_iso_string(&self.due)
    }

    /// The document fields of this task
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            due: self.due,
            completed: self.completed,
        }
    }

    /// Apply a partial update, the way a store would
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(due) = patch.due {
            self.due = due;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}


/// The fields of a task document: `{title, due, completed}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskFields {
    pub title: String,
    pub due: DateTime<Utc>,
    pub completed: bool,
}

impl TaskFields {
    /// The fields of a brand new task. New tasks are never completed.
    ///
    /// `due` is truncated to milliseconds, which is the precision of the stored form.
    pub fn new(title: String, due: DateTime<Utc>) -> Self {
        Self {
            title,
            due: due.trunc_subsecs(3),
            completed: false,
        }
    }
}


/// A partial update of a task. Only the fields that are `Some` are written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub due: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Only change the completion flag
    pub fn completed(completed: bool) -> Self {
        Self { completed: Some(completed), ..Self::default() }
    }

    /// Change both the title and the due date, as the edit screen does
    pub fn title_and_due(title: String, due: DateTime<Utc>) -> Self {
        Self {
            title: Some(title),
            due: Some(due.trunc_subsecs(3)),
            completed: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.due.is_none() && self.completed.is_none()
    }

    /// Names of the document fields this patch writes
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.title.is_some()     { paths.push("title"); }
        if self.due.is_some()       { paths.push("due"); }
        if self.completed.is_some() { paths.push("completed"); }
        paths
    }
}
