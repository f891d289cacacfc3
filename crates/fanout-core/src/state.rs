//! Production status state machine.
//!
//! Status changes go through an explicit allowed-transition table instead
//! of a bare field assignment, so concurrent callers cannot push a ticket
//! into an inconsistent state.

use thiserror::Error;

use fanout_store::models::ProductionStatus;

/// Error raised for an edge outside the transition graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ProductionStatus,
        to: ProductionStatus,
    },
}

/// The ticket/job status state machine.
///
/// Enforces the valid transition graph:
///
/// ```text
/// pending       -> in_production
/// in_production -> approved
/// approved      -> delivered
/// ```
///
/// No backward edges and no skipping.
pub struct StatusMachine;

impl StatusMachine {
    /// Check whether `from -> to` is a valid edge in the state graph.
    pub fn is_valid_transition(from: ProductionStatus, to: ProductionStatus) -> bool {
        matches!(
            (from, to),
            (ProductionStatus::Pending, ProductionStatus::InProduction)
                | (ProductionStatus::InProduction, ProductionStatus::Approved)
                | (ProductionStatus::Approved, ProductionStatus::Delivered)
        )
    }

    /// Validate a transition, returning the target status when legal.
    pub fn transition(
        from: ProductionStatus,
        to: ProductionStatus,
    ) -> Result<ProductionStatus, StatusError> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(StatusError::InvalidTransition { from, to })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
