//! Boundary validation errors.
//!
//! Only structurally invalid input is rejected outright; resolution and
//! lookup misses inside the pipeline degrade gracefully instead.

use thiserror::Error;

/// Malformed strategy/concept input, rejected before entering the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("strategy intent must carry a segment ID or segment name")]
    MissingSegment,
    #[error("concept directive must carry a concept ID or concept name")]
    MissingConcept,
}
