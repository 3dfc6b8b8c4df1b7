use std::collections::HashMap;
use std::error::Error;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::mock_behaviour::MockBehaviour;
use crate::subscription::{FeedSender, FeedState, Snapshot, Subscription};
use crate::task::{Task, TaskFields, TaskId, TaskPatch};
use crate::traits::TaskStore;


/// A store that keeps its tasks in memory.
///
/// Every write is immediately pushed to the subscriptions of this store.
/// Its [`MockBehaviour`] can make some operations fail, to simulate an unreliable remote store.
#[derive(Debug)]
pub struct MemoryStore {
    collection: String,
    state: Mutex<MemoryState>,
    feed: FeedSender,
}

#[derive(Debug, Default)]
struct MemoryState {
    tasks: HashMap<TaskId, Task>,
    mock_behaviour: MockBehaviour,
    /// How many writes actually changed the collection
    n_writes: u64,
}

impl MemoryStore {
    /// Create an empty store for the default collection
    pub fn new() -> Self {
        Self::with_collection(crate::config::collection_name())
    }

    pub fn with_collection<S: ToString>(collection: S) -> Self {
        let (feed, _) = watch::channel(FeedState::Ready(Snapshot::default()));
        Self {
            collection: collection.to_string(),
            state: Mutex::new(MemoryState::default()),
            feed,
        }
    }

    /// Create a store that already contains some tasks. They do not count as writes.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state();
            for task in tasks {
                state.tasks.insert(task.id().clone(), task);
            }
            store.publish(&state);
        }
        store
    }

    pub fn set_mock_behaviour(&self, behaviour: MockBehaviour) {
        self.state().mock_behaviour = behaviour;
    }

    /// How many writes changed the collection since this store was created
    pub fn n_writes(&self) -> u64 {
        self.state().n_writes
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, state: &MemoryState) {
        let snapshot = Snapshot::new(state.tasks.values().cloned().collect());
        self.feed.send_replace(FeedState::Ready(snapshot));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        let mut state = self.state();
        state.mock_behaviour.can_get_tasks()?;
        Ok(state.tasks.values().cloned().collect())
    }

    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>, Box<dyn Error>> {
        let mut state = self.state();
        state.mock_behaviour.can_get_tasks()?;
        Ok(state.tasks.get(id).cloned())
    }

    async fn create(&self, fields: TaskFields) -> Result<TaskId, Box<dyn Error>> {
        let mut state = self.state();
        state.mock_behaviour.can_create()?;

        let id = TaskId::random();
        log::debug!("Creating task {} in {}", id, self.collection);
        state.tasks.insert(id.clone(), Task::new(id.clone(), fields));
        state.n_writes += 1;
        self.publish(&state);
        Ok(id)
    }

    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<(), Box<dyn Error>> {
        let mut state = self.state();
        state.mock_behaviour.can_update()?;

        match state.tasks.get_mut(id) {
            None => return Err(format!("No task {} in {}", id, self.collection).into()),
            Some(task) => task.apply(&patch),
        }
        state.n_writes += 1;
        self.publish(&state);
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<(), Box<dyn Error>> {
        let mut state = self.state();
        state.mock_behaviour.can_delete()?;

        if state.tasks.remove(id).is_none() {
            log::warn!("Deleting task {}, that does not exist", id);
            return Ok(());
        }
        state.n_writes += 1;
        self.publish(&state);
        Ok(())
    }

    async fn subscribe(&self) -> Subscription {
        Subscription::new(self.feed.subscribe(), None)
    }
}
