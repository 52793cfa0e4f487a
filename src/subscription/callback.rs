// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for device state subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Ordered registry that stores and dispatches callbacks

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;

/// Unique identifier for a subscription.
///
/// Returned by `on_change` and accepted by `unsubscribe`. IDs are unique
/// within a device's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for state change callbacks.
type ChangeCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Ordered registry of state change callbacks.
///
/// Callbacks run in registration order. Dispatch works on a snapshot of the
/// list, so a callback may register or remove callbacks (on this or any
/// other device) without deadlocking; such edits take effect on the next
/// dispatch. A callback that panics is logged and skipped.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    callbacks: RwLock<Vec<(SubscriptionId, ChangeCallback)>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: RwLock::new(Vec::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Appends a callback.
    pub fn on_change<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.callbacks.write().push((id, Arc::new(callback)));
        id
    }

    /// Removes a callback.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Returns `true` if no callback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.read().is_empty()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.callbacks.write().clear();
    }

    /// Calls every callback once, in registration order.
    pub fn dispatch(&self, change: &StateChange) {
        let snapshot: Vec<(SubscriptionId, ChangeCallback)> = self.callbacks.read().clone();
        for (id, callback) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| callback(change))).is_err() {
                tracing::warn!(
                    serial = %change.serial,
                    subscription = %id,
                    "state listener panicked; continuing with the next listener"
                );
            }
        }
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.len())
            .finish_non_exhaustive()
    }
}
