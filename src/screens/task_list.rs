use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::screens::{ConfirmChoice, ConfirmPrompt, Notice, TaskDetailScreen};
use crate::selector::{DueDateTimeSelector, PickerEvent};
use crate::theme::{Palette, ThemeContext};
use crate::subscription::FeedState;
use crate::task::{Task, TaskFields, TaskId, TaskPatch};
use crate::traits::TaskStore;


/// A line of the task list, ready to be displayed
#[derive(Clone, Debug, PartialEq)]
pub struct TaskRow {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    /// e.g. `Due: 3/5/2024, 2:30:00 PM`
    pub due_label: String,
}


/// The main screen: a form to add a task, and the list of every task.
///
/// The list only changes when the store reports a change (see [`Self::apply_feed`]): actions never update it locally.
pub struct TaskListScreen<S, Tz: TimeZone> {
    store: Arc<S>,
    title: String,
    due: DateTime<Tz>,
    selector: DueDateTimeSelector<Tz>,
    feed: FeedState,
}

impl<S: TaskStore, Tz: TimeZone> TaskListScreen<S, Tz> {
    /// `now` is the initial due date of new tasks. It also sets the time zone dates are picked and shown in.
    pub fn new(store: Arc<S>, now: DateTime<Tz>) -> Self {
        Self {
            store,
            title: String::new(),
            due: now.clone(),
            selector: DueDateTimeSelector::new(now),
            feed: FeedState::Loading,
        }
    }

    pub fn title(&self) -> &str                         { &self.title }
    pub fn due(&self) -> &DateTime<Tz>                  { &self.due }
    pub fn selector(&self) -> &DueDateTimeSelector<Tz>  { &self.selector }
    pub fn feed(&self) -> &FeedState                    { &self.feed }

    pub fn set_title<T: Into<String>>(&mut self, title: T) {
        self.title = title.into();
    }

    /// The colors the title input and the due label are drawn with
    pub fn palette(&self, theme: &ThemeContext) -> Palette {
        self.selector.label_palette(theme.effective())
    }

    /// Forward a user action to the due date selector
    pub fn on_picker_event(&mut self, event: PickerEvent) {
        let due = &mut self.due;
        self.selector.handle(event, |timestamp| *due = timestamp);
    }

    /// Replace the displayed tasks with the latest state of the collection
    pub fn apply_feed(&mut self, state: FeedState) {
        if let FeedState::Failed(err) = &state {
            log::warn!("Task list could not be refreshed: {}", err);
        }
        self.feed = state;
    }

    /// Create a task out of the form.
    ///
    /// This does nothing (and returns `Ok(None)`) when the title is blank.
    /// On success, the title is cleared, but the due date is kept for the next task.
    pub async fn add_task(&mut self) -> Result<Option<TaskId>, Notice> {
        if self.title.trim().is_empty() {
            log::debug!("Not adding a task without a title");
            return Ok(None);
        }

        let fields = TaskFields::new(self.title.clone(), self.due.with_timezone(&Utc));
        match self.store.create(fields).await {
            Ok(id) => {
                self.title.clear();
                Ok(Some(id))
            },
            Err(err) => {
                log::error!("Unable to add task {:?}: {}", self.title, err);
                Err(Notice::Error(format!("Unable to add the task: {}", err)))
            },
        }
    }

    /// Flip the completion of a task. Nothing else is written.
    pub async fn toggle_completed(&self, task: &Task) -> Result<(), Notice> {
        let patch = TaskPatch::completed(task.completed() == false);
        self.store.update(task.id(), patch).await.map_err(|err| {
            log::error!("Unable to toggle task {}: {}", task.id(), err);
            Notice::Error(format!("Unable to update the task: {}", err))
        })
    }

    /// Deleting a task cannot be undone, so it has to be confirmed first
    pub fn request_delete(&self, task: &Task) -> ConfirmPrompt {
        ConfirmPrompt::delete_task(task)
    }

    /// Delete the task `prompt` is about, if the user chose to.
    ///
    /// Returns whether the task has been deleted
    pub async fn resolve_delete(&self, prompt: ConfirmPrompt, choice: ConfirmChoice) -> Result<bool, Notice> {
        if choice != ConfirmChoice::Delete {
            return Ok(false);
        }

        match self.store.delete(prompt.task_id()).await {
            Ok(()) => Ok(true),
            Err(err) => {
                log::error!("Unable to delete task {}: {}", prompt.task_id(), err);
                Err(Notice::Error(format!("Unable to delete the task: {}", err)))
            },
        }
    }

    /// Navigate to the edit screen of a task
    pub fn open_detail(&self, task: &Task) -> TaskDetailScreen<S, Tz> {
        TaskDetailScreen::new(Arc::clone(&self.store), task.clone(), &self.due.timezone())
    }
}

impl<S: TaskStore, Tz: TimeZone> TaskListScreen<S, Tz>
where
    Tz::Offset: Display,
{
    /// The rows to display. Empty while loading, or if the collection could not be read.
    pub fn rows(&self) -> Vec<TaskRow> {
        let snapshot = match &self.feed {
            FeedState::Ready(snapshot) => snapshot,
            _ => return Vec::new(),
        };

        let tz = self.due.timezone();
        snapshot.tasks()
            .iter()
            .map(|task| TaskRow {
                id: task.id().clone(),
                title: task.title().to_string(),
                completed: task.completed(),
                due_label: format!("Due: {}", task.due().with_timezone(&tz).format("%-m/%-d/%Y, %-I:%M:%S %p")),
            })
            .collect()
    }
}
