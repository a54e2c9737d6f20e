//! # Errors
//!
//! [`OrreryError`] is the single error type of the crate. Loading defects in a body
//! record are not errors: they fall back to defaults (see [`crate::bodies::record`]).
//! Errors are reserved for structural problems such as unresolved or cyclic primaries,
//! lookups of unknown bodies and rejected parameters.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("Moon {moon:?} orbits {primary:?}, which is not part of the loaded bodies")]
    UnresolvedPrimary { moon: String, primary: String },

    #[error("Moon {0:?} is part of a cycle of primaries")]
    CyclicPrimary(String),

    #[error("Unknown body: {0}")]
    UnknownBody(String),

    #[error("Body index out of range: {0}")]
    BodyIndexOutOfRange(usize),

    #[error("Invalid ephemeris parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid comet date code {0:?}, expected YYYYMMDD.dddd")]
    InvalidDateCode(String),

    #[error("Invalid orbit frame selector {0:?}, expected E, L or Q")]
    InvalidFrameSelector(String),

    #[error("ROOTS finding error: {0}")]
    RootFindingError(#[from] roots::SearchError),
}

impl PartialEq for OrreryError {
    fn eq(&self, other: &Self) -> bool {
        use OrreryError::*;
        match (self, other) {
            (
                UnresolvedPrimary {
                    moon: m1,
                    primary: p1,
                },
                UnresolvedPrimary {
                    moon: m2,
                    primary: p2,
                },
            ) => m1 == m2 && p1 == p2,
            (CyclicPrimary(a), CyclicPrimary(b)) => a == b,
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (BodyIndexOutOfRange(a), BodyIndexOutOfRange(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (InvalidDateCode(a), InvalidDateCode(b)) => a == b,
            (InvalidFrameSelector(a), InvalidFrameSelector(b)) => a == b,
            (RootFindingError(a), RootFindingError(b)) => a == b,
            _ => false,
        }
    }
}
