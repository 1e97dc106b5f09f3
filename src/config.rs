//! Setup configuration.
//!
//! ```ignore
//! use spe::{MessageEncoding, SetupConfig};
//!
//! let config = SetupConfig {
//!     security_bits: 64,
//!     message_encoding: MessageEncoding::BitString,
//!     ..SetupConfig::default()
//! };
//! config.validate().expect("valid config");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How `h2` pre-encodes a message before hashing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageEncoding {
    /// Hash the message bytes as they are.
    Raw,
    /// Hash the ASCII '0'/'1' rendering of the message, each byte written
    /// most significant bit first without leading zeros.
    BitString,
}

impl Default for MessageEncoding {
    fn default() -> Self {
        MessageEncoding::Raw
    }
}

/// Largest accepted security parameter.
pub const MAX_SECURITY_BITS: u32 = 1 << 16;

/// Parameters that drive [`Setup`](crate::setup::Setup).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Security parameter λ. The group order gets `λ + 1` bits.
    pub security_bits: u32,
    /// Target size of the field prime. Only steers the cofactor range, the
    /// field prime always ends up larger than the group order.
    pub field_bits: u32,
    /// Bound on group order candidates, and on generator draws.
    pub max_attempts: usize,
    /// Cofactors tried for every prime group order.
    pub cofactor_attempts: usize,
    /// Miller-Rabin rounds.
    pub primality_rounds: usize,
    pub message_encoding: MessageEncoding,
}

impl Default for SetupConfig {
    fn default() -> Self {
        SetupConfig {
            security_bits: 10,
            field_bits: 10,
            max_attempts: 10_000,
            cofactor_attempts: 10,
            primality_rounds: 20,
            message_encoding: MessageEncoding::Raw,
        }
    }
}

impl SetupConfig {
    /// Configuration with the given security parameter and defaults otherwise.
    pub fn with_security_bits(security_bits: u32) -> Self {
        SetupConfig {
            security_bits,
            ..SetupConfig::default()
        }
    }

    /// Reads a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SetupConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Checks the configuration before any parameters are generated.
    pub fn validate(&self) -> Result<()> {
        if self.security_bits < 1 || self.security_bits > MAX_SECURITY_BITS {
            return Err(Error::InvalidSecurityParameter {
                bits: self.security_bits,
            });
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be positive".into()));
        }
        if self.cofactor_attempts == 0 {
            return Err(Error::InvalidConfig(
                "cofactor_attempts must be positive".into(),
            ));
        }
        if self.primality_rounds == 0 {
            return Err(Error::InvalidConfig(
                "primality_rounds must be positive".into(),
            ));
        }

        Ok(())
    }
}
