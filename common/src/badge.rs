use crate::clock::Clock;
use crate::storage::StorageScope;
use crate::store::SubmissionStore;

/// What the pending-requests indicator should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeState {
    /// Nothing pending.
    Hidden,
    /// Shown with the pending count, always at least one.
    Visible(usize),
}

impl BadgeState {
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            BadgeState::Hidden
        } else {
            BadgeState::Visible(count)
        }
    }

    /// Text for the badge element, `None` when it should not be shown.
    pub fn label(&self) -> Option<String> {
        match self {
            BadgeState::Hidden => None,
            BadgeState::Visible(n) => Some(n.to_string()),
        }
    }
}

/// Read-only view of the store's pending count.
///
/// Holds no state of its own; every `render` re-reads the store.
pub struct BadgeProjection<'a, S, C> {
    store: &'a SubmissionStore<S, C>,
}

impl<'a, S: StorageScope, C: Clock> BadgeProjection<'a, S, C> {
    pub fn new(store: &'a SubmissionStore<S, C>) -> Self {
        Self { store }
    }

    pub fn render(&self) -> BadgeState {
        BadgeState::from_count(self.store.pending_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(BadgeState::from_count(0).label(), None);
        assert_eq!(BadgeState::from_count(3).label().as_deref(), Some("3"));
    }
}
