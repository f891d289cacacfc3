//! Production matrix engine: resolves loosely-labeled target environments
//! to canonical placement specs, expands them into production tickets, and
//! consolidates tickets that share a physical master asset into jobs with
//! multiple delivery destinations.

pub mod consolidate;
pub mod error;
pub mod expand;
pub mod normalize;
pub mod service;
pub mod state;

pub use consolidate::{SpecSelection, consolidate, group_by_creative};
pub use error::ValidationError;
pub use expand::expand;
pub use normalize::{DEFAULT_ENVIRONMENTS, LABEL_RULES, LabelNormalizer};
pub use service::MatrixService;
pub use state::{StatusError, StatusMachine};
