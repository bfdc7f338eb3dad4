//! Outside-interaction dismissal of the open editor
//!
//! While a word is being edited, a pointer subscription is held for the edit
//! surface. Any pointer-down that lands elsewhere closes the session without
//! committing. The subscription only exists while editing; dropping it
//! unregisters the listener.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::EditSession;

/// Where a pointer-down landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointerTarget {
    /// Inside the open edit surface (its input or save button)
    EditSurface,
    /// On a word in the transcript
    Token(usize),
    /// On the playback controls
    Controls,
    /// Anywhere else
    Outside,
}

/// Registered pointer listener for one edit surface
///
/// Unregisters itself from the listener count on drop.
#[derive(Debug)]
struct OutsideClickSubscription {
    surface: usize,
    listeners: Arc<AtomicUsize>,
}

impl OutsideClickSubscription {
    fn register(surface: usize, listeners: &Arc<AtomicUsize>) -> Self {
        listeners.fetch_add(1, Ordering::SeqCst);
        Self {
            surface,
            listeners: Arc::clone(listeners),
        }
    }
}

impl Drop for OutsideClickSubscription {
    fn drop(&mut self) {
        self.listeners.fetch_sub(1, Ordering::SeqCst);
        debug!("Released pointer listener for word {}", self.surface);
    }
}

/// Closes the edit session on interaction outside the edit surface
#[derive(Debug, Default)]
pub(crate) struct DismissalController {
    listeners: Arc<AtomicUsize>,
    subscription: Option<OutsideClickSubscription>,
}

impl DismissalController {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start listening for the edit surface of word `surface`
    pub(crate) fn arm(&mut self, surface: usize) {
        // Release the old listener before registering the new one
        self.subscription = None;
        self.subscription = Some(OutsideClickSubscription::register(
            surface,
            &self.listeners,
        ));
    }

    /// Stop listening
    pub(crate) fn disarm(&mut self) {
        self.subscription = None;
    }

    #[cfg(test)]
    pub(crate) fn is_armed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Number of pointer listeners currently registered
    #[cfg(test)]
    pub(crate) fn active_listeners(&self) -> usize {
        self.listeners.load(Ordering::SeqCst)
    }

    /// Handle a pointer-down. Returns true if it dismissed the session.
    pub(crate) fn on_pointer_down(
        &mut self,
        target: PointerTarget,
        session: &mut EditSession,
    ) -> bool {
        let Some(subscription) = &self.subscription else {
            return false;
        };

        if target == PointerTarget::EditSurface {
            return false;
        }

        let surface = subscription.surface;
        self.disarm();
        if !session.dismiss() {
            return false;
        }

        match target {
            PointerTarget::Token(index) => {
                info!("Dismissed editor for word {} (clicked word {})", surface, index)
            }
            _ => info!("Dismissed editor for word {} ({:?})", surface, target),
        }
        true
    }
}
