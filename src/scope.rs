use tokio::sync::watch;

/// ViewScope
///
/// Lifetime of a single view. Requests issued through a client scoped to it
/// are aborted with `ClientError::Cancelled` once the scope is cancelled or
/// dropped (the user navigated away).
#[derive(Debug)]
pub struct ViewScope {
    sender: watch::Sender<bool>,
}

impl ViewScope {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// A cheap handle that observes this scope from inside a request.
    pub fn token(&self) -> ScopeToken {
        ScopeToken {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// ScopeToken
///
/// Observer side of a `ViewScope`.
#[derive(Clone, Debug)]
pub struct ScopeToken {
    receiver: watch::Receiver<bool>,
}

impl ScopeToken {
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once the owning scope is cancelled or dropped.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        // An Err means the sender is gone, which only happens after Drop cancelled it.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}
