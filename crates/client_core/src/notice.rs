use std::{
    sync::{Arc, Mutex, PoisonError, Weak},
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::warn;

/// How long a success message stays visible.
pub const SUCCESS_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Default)]
struct NoticeState {
    error: Option<String>,
    success: Option<String>,
    generation: u64,
    clear_task: Option<JoinHandle<()>>,
}

/// Error and success slots shown to the user.
///
/// Errors stay until overwritten or cleared. A success message is cleared by a
/// timer task owned by the board; posting a new message aborts the previous
/// timer, and the generation check keeps a timer that already fired from
/// clearing a newer message.
#[derive(Clone)]
pub struct NoticeBoard {
    inner: Arc<Mutex<NoticeState>>,
    ttl: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::with_ttl(SUCCESS_NOTICE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NoticeState::default())),
            ttl,
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, NoticeState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn success(&self) -> Option<String> {
        self.state().success.clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.state().error = Some(message.into());
    }

    pub fn clear_error(&self) {
        self.state().error = None;
    }

    pub fn set_success(&self, message: impl Into<String>) {
        let mut state = self.state();
        state.generation += 1;
        state.success = Some(message.into());
        if let Some(previous) = state.clear_task.take() {
            previous.abort();
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!("notice: no async runtime; success message will not auto-clear");
            return;
        };
        let generation = state.generation;
        let ttl = self.ttl;
        let board: Weak<Mutex<NoticeState>> = Arc::downgrade(&self.inner);
        state.clear_task = Some(runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            let Some(board) = board.upgrade() else {
                return;
            };
            let mut state = board.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation == generation {
                state.success = None;
                state.clear_task = None;
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn success_clears_after_ttl() {
        let board = NoticeBoard::new();
        board.set_success("Item added successfully!");

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(board.success().as_deref(), Some("Item added successfully!"));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(board.success(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_message_restarts_the_timer() {
        let board = NoticeBoard::new();
        board.set_success("first");
        tokio::time::sleep(Duration::from_secs(2)).await;

        board.set_success("second");
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(board.success().as_deref(), Some("second"));

        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(board.success(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_do_not_expire_and_overwrite_each_other() {
        let board = NoticeBoard::new();
        board.set_error("Failed to fetch items. Please try again later.");
        board.set_error("Duplicate name");

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(board.error().as_deref(), Some("Duplicate name"));

        board.clear_error();
        assert_eq!(board.error(), None);
    }

    #[test]
    fn success_without_runtime_is_kept() {
        let board = NoticeBoard::new();
        board.set_success("Category added successfully!");
        assert_eq!(board.success().as_deref(), Some("Category added successfully!"));
    }
}
