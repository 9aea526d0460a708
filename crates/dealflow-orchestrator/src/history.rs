//! Append-only execution history.

use crate::workflow::WorkflowResult;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Workflow results in submission order.
///
/// Appends are serialized by the write lock. Entries are `Arc`s and never
/// mutated, so a snapshot can be read without holding any lock.
#[derive(Debug, Default)]
pub struct ExecutionHistory {
    entries: RwLock<Vec<Arc<WorkflowResult>>>,
}

impl ExecutionHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result and returns the shared handle to it.
    pub async fn append(&self, result: WorkflowResult) -> Arc<WorkflowResult> {
        let entry = Arc::new(result);
        self.entries.write().await.push(Arc::clone(&entry));
        entry
    }

    /// All entries, oldest first.
    pub async fn snapshot(&self) -> Vec<Arc<WorkflowResult>> {
        self.entries.read().await.clone()
    }

    pub async fn find(&self, workflow_id: &str) -> Option<Arc<WorkflowResult>> {
        self.entries.read().await.iter().find(|w| w.workflow_id == workflow_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::WorkflowStatus;

    #[tokio::test]
    async fn test_append_preserves_order() {
        let history = ExecutionHistory::new();
        assert!(history.is_empty().await);

        for i in 0..3 {
            let mut result = WorkflowResult::new(format!("workflow_{i}"));
            result.status = WorkflowStatus::Completed;
            history.append(result).await;
        }

        let ids: Vec<String> =
            history.snapshot().await.iter().map(|w| w.workflow_id.clone()).collect();
        assert_eq!(ids, vec!["workflow_0", "workflow_1", "workflow_2"]);
        assert!(history.find("workflow_1").await.is_some());
        assert!(history.find("workflow_9").await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_recorded() {
        let history = Arc::new(ExecutionHistory::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let history = Arc::clone(&history);
                tokio::spawn(async move {
                    history.append(WorkflowResult::new(format!("workflow_{i}"))).await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(history.len().await, 16);
    }
}
