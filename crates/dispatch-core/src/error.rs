//! Engine-wide error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `DispatchError` or wrap it as one variant, whichever keeps call sites clean.

use thiserror::Error;

use crate::{AgencyId, CallId, EventId, UnitId, ZoneId};

/// The top-level error type for `dispatch-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("agency {0} not found")]
    UnknownAgency(AgencyId),

    #[error("unit {0} not found")]
    UnknownUnit(UnitId),

    #[error("call {0} not found")]
    UnknownCall(CallId),

    #[error("event {0} not found")]
    UnknownEvent(EventId),

    #[error("zone {0} has no agency for this service")]
    NoJurisdiction(ZoneId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `dispatch-*` crates.
pub type DispatchResult<T> = Result<T, DispatchError>;
