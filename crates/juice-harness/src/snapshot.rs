//! # Suite Isolation
//!
//! Each suite runs between a snapshot and its revert, so chain state from
//! one suite never leaks into the next.

use std::sync::Arc;

use tracing::warn;

use juice_chain::{ChainClient, SnapshotId};

use crate::context::TestContext;
use crate::errors::HarnessError;

/// Reverts the chain to the state captured at construction.
pub struct SnapshotGuard {
    client: Arc<dyn ChainClient>,
    id: Option<SnapshotId>,
    time_mark: u64,
}

impl SnapshotGuard {
    /// Capture the current chain state and time mark.
    pub async fn take(ctx: &TestContext) -> Result<Self, HarnessError> {
        let id = ctx.client().snapshot().await?;
        Ok(Self {
            client: Arc::clone(ctx.client()),
            id: Some(id),
            time_mark: *ctx.time_mark.lock(),
        })
    }

    /// Restore the captured state.
    pub async fn finish(mut self, ctx: &TestContext) -> Result<(), HarnessError> {
        if let Some(id) = self.id.take() {
            self.client.revert_to(id).await?;
            ctx.set_time_mark(self.time_mark);
        }
        Ok(())
    }
}

impl Drop for SnapshotGuard {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            warn!(
                target: "juice::harness",
                id = id.0,
                "snapshot guard dropped without finish(); chain state leaked"
            );
        }
    }
}
