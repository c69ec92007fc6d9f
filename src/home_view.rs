//! Home view refresh signal
//!
//! Linking a bank publishes the owner's user document id so subscribers know
//! the home dashboard is out of date. Balances are never held here; every
//! home view is assembled from the aggregation API.

use tokio::sync::broadcast;

/// Signals buffered per subscriber before the oldest are dropped
const CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct HomeViewSignal {
    sender: broadcast::Sender<String>,
}

impl Default for HomeViewSignal {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }
}

impl HomeViewSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive the user ids whose home view went stale
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// Mark `user_id`'s home view for a refresh
    pub fn invalidate(&self, user_id: &str) {
        match self.sender.send(user_id.to_string()) {
            Ok(receivers) => tracing::debug!(
                "Home view of user {} invalidated for {} subscribers",
                user_id,
                receivers
            ),
            Err(_) => {
                tracing::debug!("Home view of user {} invalidated, nobody listening", user_id)
            }
        }
    }
}
