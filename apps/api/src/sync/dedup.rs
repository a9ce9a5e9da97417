use std::collections::HashSet;

use crate::models::tool::InvocationIdentity;

/// Ledger of tool invocations already applied in this session.
///
/// Grows monotonically and is dropped with the session; it is never persisted
/// and never shrinks.
#[derive(Debug, Clone, Default)]
pub struct InvocationLedger {
    applied: HashSet<InvocationIdentity>,
}

impl InvocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly once per identity; the identity is marked applied on that
    /// first call.
    pub fn should_apply(&mut self, identity: &InvocationIdentity) -> bool {
        if self.applied.contains(identity) {
            return false;
        }
        self.applied.insert(identity.clone())
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }
}
