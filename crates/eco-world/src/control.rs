//! Run status shared between the simulation loop and the control input.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What the driver loop does on its next iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Simulate,
    #[default]
    Pause,
    /// Undo one tick per iteration
    Reverse,
    Quit,
}

impl Status {
    /// Map a console command (`s`, `p`, `r`, `q`) to a status
    pub fn from_command(command: &str) -> Option<Self> {
        match command.trim().to_ascii_lowercase().as_str() {
            "s" | "start" => Some(Status::Simulate),
            "p" | "pause" => Some(Status::Pause),
            "r" | "reverse" => Some(Status::Reverse),
            "q" | "quit" => Some(Status::Quit),
            _ => None,
        }
    }
}

/// Cloneable handle to the shared status.
///
/// The driver reads it once per iteration, between ticks; the control side
/// writes it. A tick in progress always completes.
#[derive(Debug, Clone, Default)]
pub struct StatusHandle {
    inner: Arc<RwLock<Status>>,
}

impl StatusHandle {
    pub fn new(status: Status) -> Self {
        Self {
            inner: Arc::new(RwLock::new(status)),
        }
    }

    pub fn get(&self) -> Status {
        *self.inner.read()
    }

    pub fn set(&self, status: Status) {
        *self.inner.write() = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command() {
        assert_eq!(Status::from_command("s"), Some(Status::Simulate));
        assert_eq!(Status::from_command(" P\n"), Some(Status::Pause));
        assert_eq!(Status::from_command("r"), Some(Status::Reverse));
        assert_eq!(Status::from_command("quit"), Some(Status::Quit));
        assert_eq!(Status::from_command("x"), None);
        assert_eq!(Status::from_command(""), None);
    }

    #[test]
    fn test_handle_is_shared() {
        let handle = StatusHandle::new(Status::Simulate);
        let control = handle.clone();
        control.set(Status::Quit);
        assert_eq!(handle.get(), Status::Quit);
    }

    #[test]
    fn test_handle_across_threads() {
        let handle = StatusHandle::default();
        assert_eq!(handle.get(), Status::Pause);

        let writer = handle.clone();
        std::thread::spawn(move || writer.set(Status::Reverse))
            .join()
            .unwrap();
        assert_eq!(handle.get(), Status::Reverse);
    }
}
