use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::screens::Notice;
use crate::selector::{DueDateTimeSelector, PickerEvent};
use crate::theme::{Palette, ThemeContext};
use crate::task::{Task, TaskPatch};
use crate::traits::TaskStore;

/// The edit screen of a single task
pub struct TaskDetailScreen<S, Tz: TimeZone> {
    store: Arc<S>,
    task: Task,
    title: String,
    due: DateTime<Tz>,
    selector: DueDateTimeSelector<Tz>,
}

impl<S: TaskStore, Tz: TimeZone> TaskDetailScreen<S, Tz> {
    /// Start editing `task`. Its due date is shown and picked in `tz`.
    pub fn new(store: Arc<S>, task: Task, tz: &Tz) -> Self {
        let due = task.due().with_timezone(tz);
        Self {
            store,
            title: task.title().to_string(),
            selector: DueDateTimeSelector::new(due.clone()),
            due,
            task,
        }
    }

    /// The task, as it was when this screen was opened
    pub fn task(&self) -> &Task                        { &self.task }
    pub fn title(&self) -> &str                        { &self.title }
    pub fn due(&self) -> &DateTime<Tz>                 { &self.due }
    pub fn selector(&self) -> &DueDateTimeSelector<Tz> { &self.selector }

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

    /// Write the title and the due date.
    ///
    /// A blank title is refused with a blocking notice, and nothing is written.
    /// `Ok(())` means the edit is over, and the caller should go back to the list.
    pub async fn save(&mut self) -> Result<(), Notice> {
        if self.title.trim().is_empty() {
            return Err(Notice::Blocking("Title cannot be empty".to_string()));
        }

        let patch = TaskPatch::title_and_due(self.title.clone(), self.due.with_timezone(&Utc));
        match self.store.update(self.task.id(), patch).await {
            Ok(()) => {
                log::info!("Saved task {}", self.task.id());
                Ok(())
            },
            Err(err) => {
                log::error!("Unable to save task {}: {}", self.task.id(), err);
                Err(Notice::Error(format!("Unable to save the task: {}", err)))
            },
        }
    }
}
