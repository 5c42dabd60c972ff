//! Modal confirmation dialogs.
//!
//! A confirmation is an explicit two-outcome exchange: opening a dialog
//! yields a handle whose `outcome()` suspends until the user resolves
//! it. Dropping an unresolved dialog counts as cancellation, so a
//! dismissed or replaced dialog can never leave a waiter hanging.

use tokio::sync::oneshot;

// Info is part of the dialog contract even though current flows only
// raise warning, danger, and logout dialogs
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    Warning,
    Danger,
    Info,
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    Cancelled,
}

#[derive(Debug)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub kind: ConfirmKind,
    pub confirm_label: String,
    pub cancel_label: String,
    responder: oneshot::Sender<ConfirmOutcome>,
}

/// Waiting side of a confirmation.
#[derive(Debug)]
pub struct ConfirmHandle {
    receiver: oneshot::Receiver<ConfirmOutcome>,
}

impl ConfirmDialog {
    pub fn new(
        kind: ConfirmKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> (Self, ConfirmHandle) {
        let (tx, rx) = oneshot::channel();
        let dialog = Self {
            title: title.into(),
            message: message.into(),
            kind,
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            responder: tx,
        };
        (dialog, ConfirmHandle { receiver: rx })
    }

    pub fn with_labels(
        mut self,
        confirm_label: impl Into<String>,
        cancel_label: impl Into<String>,
    ) -> Self {
        self.confirm_label = confirm_label.into();
        self.cancel_label = cancel_label.into();
        self
    }

    /// Resolve the dialog, waking the waiter. Consumes the dialog; a
    /// dialog can only be resolved once.
    pub fn resolve(self, outcome: ConfirmOutcome) {
        // The waiter may have given up; nothing to do then
        let _ = self.responder.send(outcome);
    }
}

impl ConfirmHandle {
    /// Suspend until the dialog is resolved. A dialog dropped without
    /// being resolved reads as cancelled.
    pub async fn outcome(self) -> ConfirmOutcome {
        self.receiver.await.unwrap_or(ConfirmOutcome::Cancelled)
    }
}
