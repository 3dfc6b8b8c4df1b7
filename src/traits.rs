use std::error::Error;

use async_trait::async_trait;

use crate::task::{Task, TaskFields, TaskId, TaskPatch};
use crate::subscription::Subscription;

/// A collection of tasks, usually hosted remotely
///
/// Writes are last-write-wins at the field level. This trait adds no consistency guarantee of its own.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// The name of the collection this store reads and writes
    fn collection(&self) -> &str;

    /// Returns every task of the collection, in no particular order
    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>>;

    /// Returns a single task, or `None` if it does not exist
    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>, Box<dyn Error>> {
        let tasks = self.get_tasks().await?;
        Ok(tasks.into_iter().find(|task| task.id() == id))
    }

    /// Add a new document to the collection, and return the ID the store assigned to it
    async fn create(&self, fields: TaskFields) -> Result<TaskId, Box<dyn Error>>;

    /// Write the fields `patch` contains, leaving the other ones untouched.
    /// This fails if the task does not exist.
    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<(), Box<dyn Error>>;

    /// Irreversibly remove a task
    async fn delete(&self, id: &TaskId) -> Result<(), Box<dyn Error>>;

    /// Start a live query on the whole collection.
    ///
    /// The subscription is updated every time the store observes a change, until it is dropped.
    async fn subscribe(&self) -> Subscription;
}

/// Something that writes motivational quotes
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Ask for a quote, using `prompt`
    async fn fetch_quote(&self, prompt: &str) -> Result<String, Box<dyn Error>>;
}
