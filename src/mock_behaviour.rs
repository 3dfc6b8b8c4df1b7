//! Scripted failures for the in-memory store, to simulate an unreliable remote collection

use std::error::Error;

/// How a [`MemoryStore`](crate::store::MemoryStore) answers each kind of operation.
///
/// Each field is `(successes, failures)`: the operation succeeds `successes` times, then fails `failures` times,
/// then always succeeds.
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    pub get_tasks_behaviour: (u32, u32),
    pub create_behaviour: (u32, u32),
    pub update_behaviour: (u32, u32),
    pub delete_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails its next `n_fails` calls
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            get_tasks_behaviour: (0, n_fails),
            create_behaviour: (0, n_fails),
            update_behaviour: (0, n_fails),
            delete_behaviour: (0, n_fails),
        }
    }

    /// Writes fail their next `n_fails` calls, reads always succeed
    pub fn fail_writes(n_fails: u32) -> Self {
        Self {
            get_tasks_behaviour: (0, 0),
            ..Self::fail_now(n_fails)
        }
    }

    pub fn can_get_tasks(&mut self) -> Result<(), Box<dyn Error>> {
        decrement(&mut self.get_tasks_behaviour, "get_tasks")
    }
    pub fn can_create(&mut self) -> Result<(), Box<dyn Error>> {
        decrement(&mut self.create_behaviour, "create")
    }
    pub fn can_update(&mut self) -> Result<(), Box<dyn Error>> {
        decrement(&mut self.update_behaviour, "update")
    }
    pub fn can_delete(&mut self) -> Result<(), Box<dyn Error>> {
        decrement(&mut self.delete_behaviour, "delete")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Box<dyn Error>> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        for _ in 0..5 {
            assert!(ok.can_create().is_ok());
            assert!(ok.can_delete().is_ok());
        }

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_get_tasks().is_err());
        assert!(now.can_update().is_err());
        assert!(now.can_update().is_err());
        assert!(now.can_get_tasks().is_err());
        assert!(now.can_get_tasks().is_ok());
        assert!(now.can_update().is_ok());

        let mut writes = MockBehaviour::fail_writes(1);
        assert!(writes.can_get_tasks().is_ok());
        assert!(writes.can_delete().is_err());
        assert!(writes.can_delete().is_ok());

        let mut custom = MockBehaviour {
            create_behaviour: (1, 2),
            ..MockBehaviour::default()
        };
        assert!(custom.can_create().is_ok());
        assert!(custom.can_create().is_err());
        assert!(custom.can_create().is_err());
        assert!(custom.can_create().is_ok());
        assert!(custom.can_delete().is_ok());
    }
}
