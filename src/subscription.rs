//! Live views of a task collection
//!
//! A [`Subscription`] always holds the latest known state of a collection, as a [`FeedState`].
//! Stores push new states into it whenever the collection changes.

use std::fmt::{Display, Error, Formatter};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::task::{Task, TaskId};


/// The whole content of a collection at one point in time.
///
/// Tasks are in no particular order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    tasks: Vec<Task>,
}

impl Snapshot {
    pub fn new(mut tasks: Vec<Task>) -> Self {
        // Only used so that equal collections compare equal
        tasks.sort_by(|a, b| a.id().cmp(b.id()));
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] { &self.tasks }
    pub fn len(&self) -> usize     { self.tasks.len() }
    pub fn is_empty(&self) -> bool { self.tasks.is_empty() }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}


/// The state of a live query
#[derive(Clone, Debug, PartialEq)]
pub enum FeedState {
    /// Nothing has been received yet
    Loading,
    /// The latest content of the collection
    Ready(Snapshot),
    /// The collection could not be read. The next successful read replaces this.
    Failed(String),
}

impl Display for FeedState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            FeedState::Loading => write!(f, "Loading..."),
            FeedState::Ready(snapshot) => write!(f, "{} task(s)", snapshot.len()),
            FeedState::Failed(err) => write!(f, "Error: {}", err),
        }
    }
}

impl FeedState {
    /// The state that results from reading the whole collection
    pub fn from_read(read: Result<Vec<Task>, Box<dyn std::error::Error>>) -> Self {
        match read {
            Ok(tasks) => FeedState::Ready(Snapshot::new(tasks)),
            Err(err) => FeedState::Failed(err.to_string()),
        }
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::Loading
    }
}


/// See [`feed_channel`]
pub type FeedSender = watch::Sender<FeedState>;
/// See [`feed_channel`]
pub type FeedReceiver = watch::Receiver<FeedState>;

/// Create a channel that carries the successive states of a collection
pub fn feed_channel() -> (FeedSender, FeedReceiver) {
    watch::channel(FeedState::default())
}

/// Send `state`, unless it equals the latest one. Returns whether it has been sent.
pub fn publish_if_changed(sender: &FeedSender, state: FeedState) -> bool {
    if *sender.borrow() == state {
        return false;
    }
    sender.send_replace(state);
    true
}


/// A standing query on a collection.
///
/// Dropping it (or calling [`Self::cancel`]) stops whatever task was feeding it.
#[derive(Debug)]
pub struct Subscription {
    receiver: FeedReceiver,
    feeder: Option<JoinHandle<()>>,
}

impl Subscription {
    /// `feeder` is the background task that pushes updates, if there is one
    pub fn new(receiver: FeedReceiver, feeder: Option<JoinHandle<()>>) -> Self {
        Self { receiver, feeder }
    }

    /// The latest known state
    pub fn current(&self) -> FeedState {
        self.receiver.borrow().clone()
    }

    /// Wait until the state changes, and return the new one.
    ///
    /// Returns `None` once the store has stopped feeding this subscription.
    pub async fn next(&mut self) -> Option<FeedState> {
        if self.receiver.changed().await.is_err() {
            return None;
        }
        Some(self.receiver.borrow().clone())
    }

    /// Stop receiving updates
    pub fn cancel(mut self) {
        self.stop_feeder();
    }

    fn stop_feeder(&mut self) {
        if let Some(handle) = self.feeder.take() {
            log::debug!("Cancelling a subscription");
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop_feeder();
    }
}
