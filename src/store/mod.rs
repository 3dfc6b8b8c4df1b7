//! Implementations of [`TaskStore`](crate::traits::TaskStore)
//!
//! * [`FirestoreStore`] reads and writes a Firestore collection through its REST API
//! * [`MemoryStore`] keeps everything in memory. It is used offline, and to mock a remote store in tests

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
