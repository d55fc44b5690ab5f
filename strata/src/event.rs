//! Remove notifications.
//!
//! Tearing down a populated table (`deinit`, `delete_all`) must give
//! component-lifecycle handlers a chance to observe the rows before their
//! storage goes away. The dispatcher that runs those handlers lives outside
//! this crate; the storage layer only publishes a [`Removed`] notification
//! per affected row range onto a channel the dispatcher drains.

use crossbeam::channel::{self, Receiver, Sender, TryIter};

use crate::{kind::Kind, storage::table};

/// Notification that a range of rows is being removed from a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed {
    /// The table the rows are removed from.
    pub table: table::Id,

    /// The kind of the table, naming the components being dropped.
    pub kind: Kind,

    /// First affected row.
    pub start_row: usize,

    /// Number of affected rows.
    pub count: usize,
}

/// The remove-notification channel of one world.
///
/// Unbounded: teardown never blocks on a slow consumer. Notifications are
/// published through `&self` so any holder of the world can emit without
/// exclusive access.
#[derive(Debug)]
pub struct Events {
    sender: Sender<Removed>,
    receiver: Receiver<Removed>,
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

impl Events {
    /// Create a fresh notification channel.
    pub fn new() -> Self {
        let (sender, receiver) = channel::unbounded();
        Self { sender, receiver }
    }

    /// Publish a remove notification.
    pub(crate) fn notify(&self, event: Removed) {
        // The receiver half lives as long as self, so the send cannot fail.
        let _ = self.sender.send(event);
    }

    /// Drain all pending notifications without blocking.
    pub fn try_iter(&self) -> TryIter<'_, Removed> {
        self.receiver.try_iter()
    }

    /// Number of undelivered notifications.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}
