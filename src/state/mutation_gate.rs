// ============================================================================
// MUTATION GATE - Ordering policy for a store's remote mutations
// ============================================================================

use std::future::Future;
use std::rc::Rc;

use futures::lock::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOrdering {
    /// Requests overlap freely; whichever response lands last wins.
    #[default]
    LastResponseWins,
    /// One request in flight per store; later calls wait their turn.
    Serialized,
}

impl MutationOrdering {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "last_response_wins" | "last-response-wins" => Some(Self::LastResponseWins),
            "serialized" | "serialised" | "queue" => Some(Self::Serialized),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct MutationGate {
    ordering: MutationOrdering,
    lock: Rc<Mutex<()>>,
}

impl MutationGate {
    pub fn new(ordering: MutationOrdering) -> Self {
        Self {
            ordering,
            lock: Rc::new(Mutex::new(())),
        }
    }

    /// Drive `operation` under this gate's policy
    pub async fn run<F, T>(&self, operation: F) -> T
    where
        F: Future<Output = T>,
    {
        match self.ordering {
            MutationOrdering::LastResponseWins => operation.await,
            MutationOrdering::Serialized => {
                let _turn = self.lock.lock().await;
                operation.await
            }
        }
    }
}
