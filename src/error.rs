//! Errors returned by parameter generation, setup and the parameter file codecs.

use crate::setup::SetupState;
use thiserror::Error;

/// Errors of this crate.
///
/// All of them are reported to the caller; whether one is fatal is up to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid security parameter: {bits} (must be between 1 and {max})", max = crate::config::MAX_SECURITY_BITS)]
    InvalidSecurityParameter { bits: u32 },
    #[error("no suitable parameters found after {attempts} attempts")]
    ParameterGenerationExhausted { attempts: usize },
    #[error("context not ready: setup is in state {state:?}")]
    ContextNotReady { state: SetupState },
    #[error("invalid setup transition from {from:?} to {to:?}")]
    InvalidTransition { from: SetupState, to: SetupState },
    #[error("corrupt parameter file: {0}")]
    ParameterFileCorrupt(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
