//! Error type shared by every fallible operation in the crate.
//!
//! Failures are local and synchronous: a constructor rejects bad input or a
//! kernel call rejects mismatched arrays. Nothing is retried and no partial
//! result is ever returned.

use thiserror::Error;

/// Errors raised while building or evaluating the peridynamic core.
#[derive(Debug, Error)]
pub enum Error {
    /// A material, discretisation or simulation parameter is out of range.
    #[error("invalid configuration: {parameter} = {value} ({reason})")]
    InvalidConfiguration {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Value that was rejected.
        value: f64,
        /// Which constraint it violates.
        reason: &'static str,
    },

    /// The requested behaviour has no implementation.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// Derived softening parameters are not ordered as the law requires.
    ///
    /// Usually the shape parameter does not fit the material, e.g. a kink
    /// position that pushes the transition stretch past the critical stretch.
    #[error("inconsistent {law} parameters: {detail}")]
    InconsistentParameters {
        /// Law whose derivation failed.
        law: &'static str,
        /// Description of the broken ordering.
        detail: String,
    },

    /// Two arrays that must be aligned element-for-element are not.
    #[error("length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch {
        /// Which array pair disagreed.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// Failed to parse a TOML configuration document.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an [`InconsistentParameters`](Error::InconsistentParameters) error.
    pub fn inconsistent(law: &'static str, detail: impl Into<String>) -> Self {
        Self::InconsistentParameters {
            law,
            detail: detail.into(),
        }
    }
}

/// Reject values that are not strictly positive and finite.
pub(crate) fn require_positive(parameter: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidConfiguration {
            parameter,
            value,
            reason: "must be positive and finite",
        })
    }
}

/// Reject a pair of arrays whose lengths differ.
pub(crate) fn require_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            what,
            expected,
            found,
        })
    }
}
