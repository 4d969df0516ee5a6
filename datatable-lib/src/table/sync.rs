//! Debounced URL synchronization.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use log::trace;
use log::warn;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::NavigateOptions;
use super::Navigator;
use crate::codec::QueryUpdate;
use crate::error::NavigationError;

/// One URL rewrite: the encoded query state applied to whatever URL the
/// navigator shows when the job runs.
pub(crate) struct SyncJob {
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) update: QueryUpdate,
    pub(crate) options: NavigateOptions,
}

impl SyncJob {
    pub(crate) fn run(self) -> Result<(), NavigationError> {
        let current = self.navigator.current_url();
        let target = self.update.apply_to(&current);
        debug!("Syncing table state to URL: {}", target);
        self.navigator.replace(target, self.options)
    }
}

/// At most one scheduled [`SyncJob`].
///
/// Arming replaces the scheduled job, so a burst of changes ends in a single
/// navigation carrying the last state. Dropping aborts the scheduled job.
pub(crate) struct PendingSync {
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl PendingSync {
    pub(crate) fn new(runtime: Handle) -> Self {
        Self { runtime, task: None }
    }

    /// Schedules `job` to run after `delay`, cancelling any job already
    /// scheduled.
    pub(crate) fn arm(&mut self, delay: Duration, job: SyncJob) {
        if self.cancel() {
            trace!("Debounce timer reset");
        }
        self.task = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = job.run() {
                warn!("Failed to sync table state to URL: {}", e);
            }
        }));
    }

    /// Cancels the scheduled job. Returns `true` if one was still waiting.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) if !task.is_finished() => {
                task.abort();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for PendingSync {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::table::MemoryNavigator;

    fn job(navigator: &Arc<MemoryNavigator>, page: &str) -> SyncJob {
        let mut update = QueryUpdate::new();
        update.set("page", page);
        SyncJob {
            navigator: Arc::clone(navigator) as Arc<dyn Navigator>,
            update,
            options: NavigateOptions::default(),
        }
    }

    fn navigator() -> Arc<MemoryNavigator> {
        Arc::new(MemoryNavigator::new(Url::parse("https://example.com/tasks?tab=all").unwrap()))
    }

    #[test]
    fn test_job_preserves_other_params() {
        let navigator = navigator();
        job(&navigator, "3").run().unwrap();
        assert_eq!(navigator.current_url().query(), Some("tab=all&page=3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_keeps_last_job() {
        let navigator = navigator();
        let mut pending = PendingSync::new(Handle::current());

        pending.arm(Duration::from_millis(300), job(&navigator, "2"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        pending.arm(Duration::from_millis(300), job(&navigator, "5"));
        assert!(pending.is_pending());

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(!pending.is_pending());
        assert_eq!(navigator.navigation_count(), 1);
        assert_eq!(navigator.current_url().query(), Some("tab=all&page=5"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts() {
        let navigator = navigator();
        let mut pending = PendingSync::new(Handle::current());
        pending.arm(Duration::from_millis(300), job(&navigator, "2"));
        drop(pending);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(navigator.navigation_count(), 0);
    }
}
