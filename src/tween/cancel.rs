//! Hierarchical cancellation.
//!
//! A [`CancelToken`] is cancelled either directly or through any of its
//! ancestors. A [`CancelScope`] owns a token for the lifetime of one playback
//! run and cancels it when dropped, so whatever was linked to the run ends
//! with it on every exit path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct TokenNode {
    cancelled: AtomicBool,
    parent: Option<CancelToken>,
}

/// Shared cancellation flag linked to an optional parent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    node: Arc<TokenNode>,
}

impl CancelToken {
    /// A root token with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that is cancelled when `self` is.
    pub fn child(&self) -> CancelToken {
        CancelToken {
            node: Arc::new(TokenNode {
                cancelled: AtomicBool::new(false),
                parent: Some(self.clone()),
            }),
        }
    }

    pub fn cancel(&self) {
        self.node.cancelled.store(true, Ordering::Release);
    }

    /// True if this token or any ancestor was cancelled.
    pub fn is_cancelled(&self) -> bool {
        let mut node = &self.node;
        loop {
            if node.cancelled.load(Ordering::Acquire) {
                return true;
            }
            match &node.parent {
                Some(parent) => node = &parent.node,
                None => return false,
            }
        }
    }
}

/// Owns the token of a single playback run. Dropping it cancels the token.
#[derive(Debug)]
pub struct CancelScope {
    token: CancelToken,
}

impl CancelScope {
    /// Open a scope, linked to `parent` when given.
    pub fn linked(parent: Option<&CancelToken>) -> Self {
        let token = match parent {
            Some(parent) => parent.child(),
            None => CancelToken::new(),
        };
        Self { token }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for CancelScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_is_not_cancelled() {
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn test_parent_cancellation_reaches_grandchild() {
        let root = CancelToken::new();
        let child = root.child();
        let grandchild = child.child();
        root.cancel();
        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn test_child_cancellation_does_not_reach_parent() {
        let root = CancelToken::new();
        let child = root.child();
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!root.is_cancelled());
    }

    #[test]
    fn test_dropping_scope_cancels_linked_tokens() {
        let scope = CancelScope::linked(None);
        let linked = scope.token().child();
        assert!(!linked.is_cancelled());
        drop(scope);
        assert!(linked.is_cancelled());
    }

    #[test]
    fn test_scope_observes_parent() {
        let parent = CancelToken::new();
        let scope = CancelScope::linked(Some(&parent));
        parent.cancel();
        assert!(scope.is_cancelled());
    }
}
