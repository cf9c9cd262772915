// gitbackup: Git Clone Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::any::Any;
use tokio::task::JoinHandle;
use tracing::error;

use super::{Completion, WorkflowState};

/// Handle to a workflow running on a worker task.
///
/// ```text
/// spawn() --> CloneHandle
///               progress()  Receiver<WorkflowState>   (any number of events)
///               wait(self)  Completion                (exactly once)
/// ```
#[derive(Debug)]
pub struct CloneHandle {
    task: JoinHandle<Completion>,
    progress: flume::Receiver<WorkflowState>,
}

impl CloneHandle {
    pub(super) const fn new(
        task: JoinHandle<Completion>,
        progress: flume::Receiver<WorkflowState>,
    ) -> Self {
        Self { task, progress }
    }

    /// State transitions in the order they happened.
    #[must_use]
    pub const fn progress(&self) -> &flume::Receiver<WorkflowState> {
        &self.progress
    }

    /// Waits for the worker. A panicked or cancelled worker still yields a
    /// failure completion.
    pub async fn wait(self) -> Completion {
        match self.task.await {
            Ok(completion) => completion,
            Err(e) => {
                let detail = if e.is_panic() {
                    panic_message(&*e.into_panic())
                } else {
                    e.to_string()
                };
                error!(detail = %detail, "clone worker did not complete");
                Completion::internal(&detail)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "worker panicked".to_string())
}
