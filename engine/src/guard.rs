//! Reentrancy guard shared by every mutating entry point.

use crate::error::TemplError;
use templ_host::Reentry;

#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: bool,
}

impl ReentrancyGuard {
    /// Lock the guard for the operation named `op`.
    pub fn enter(&mut self, op: &str) -> Result<(), TemplError> {
        if self.entered {
            return Err(TemplError::ReentrancyGuardReentrantCall {
                call: op.to_string(),
            });
        }
        self.entered = true;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.entered = false;
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// Route a callback reported by the host through the guard. While an
    /// operation is running every callback is refused.
    pub fn admit(&self, reentry: &Reentry) -> Result<(), TemplError> {
        if self.entered {
            tracing::warn!(from = %reentry.from, call = %reentry.call, "reentrant call rejected");
            return Err(TemplError::ReentrancyGuardReentrantCall {
                call: reentry.call.to_string(),
            });
        }
        Ok(())
    }
}
