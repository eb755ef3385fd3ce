//! scrypt hashing of token candidates.
//!
//! A token candidate (`<geohash><time window>`) has very little entropy: the
//! whole planet at geohash precision 8 over a day is a few quadrillion
//! strings. A fast hash would be reversed by enumeration in minutes, so
//! tokens are derived with scrypt, which is deliberately slow and
//! memory-hard.
//!
//! The parameter set is part of the token format. Tokens derived under
//! different parameters never match, so parameters must only change together
//! with a new [`TokenFormat`].

use serde::{Deserialize, Serialize};

use super::error::{Result, TokenError};

/// Salt shared by every token format so far.
pub const TOKEN_SALT: &str = "salt";

/// Length of the derived key in bytes (16 hex characters).
pub const TOKEN_LEN: usize = 8;

/// scrypt only uses this for its PHC string API; the derived key length is
/// set by the output buffer.
const SCRYPT_PHC_LEN: usize = 32;

/// Versions of the token format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenFormat {
    /// First release: N = 16384.
    V1,
    /// Current format: N lowered to 4096 so hashing keeps up on phones.
    #[default]
    V2,
}

impl TokenFormat {
    /// The scrypt parameters that define this format.
    #[must_use]
    pub fn params(self) -> HashParams {
        let cost = match self {
            Self::V1 => 16_384,
            Self::V2 => 4_096,
        };
        HashParams {
            cost,
            block_size: 8,
            parallelism: 1,
            salt: TOKEN_SALT.to_string(),
            output_len: TOKEN_LEN,
        }
    }
}

/// scrypt parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashParams {
    /// CPU/memory cost `N`. Must be a power of two greater than 1.
    pub cost: u32,
    /// Block size `r`.
    pub block_size: u32,
    /// Parallelization `p`.
    pub parallelism: u32,
    /// Salt, used as its UTF-8 bytes.
    pub salt: String,
    /// Derived key length in bytes (1 to 64).
    pub output_len: usize,
}

impl Default for HashParams {
    fn default() -> Self {
        TokenFormat::default().params()
    }
}

impl HashParams {
    /// Checks that scrypt can run with these parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidParams`] if the cost is not a power of
    /// two above 1, `r` or `p` is zero, the output length is outside
    /// `1..=64`, or scrypt rejects the combination.
    pub fn validate(&self) -> Result<()> {
        self.scrypt_params().map(|_| ())
    }

    fn scrypt_params(&self) -> Result<scrypt::Params> {
        if self.cost < 2 || !self.cost.is_power_of_two() {
            return Err(TokenError::InvalidParams(format!(
                "cost {} is not a power of two greater than 1",
                self.cost
            )));
        }
        if self.block_size == 0 || self.parallelism == 0 {
            return Err(TokenError::InvalidParams(
                "block size and parallelism must be positive".to_string(),
            ));
        }
        if !(1..=64).contains(&self.output_len) {
            return Err(TokenError::InvalidParams(format!(
                "output length {} is outside 1..=64",
                self.output_len
            )));
        }

        #[allow(clippy::cast_possible_truncation)] // trailing_zeros of a u32 is at most 32.
        let log_n = self.cost.trailing_zeros() as u8;
        Ok(scrypt::Params::new(
            log_n,
            self.block_size,
            self.parallelism,
            SCRYPT_PHC_LEN,
        )?)
    }
}

/// Derives opaque hex tokens from token candidates.
///
/// # Examples
///
/// ```
/// use geotrace_core::token::TokenHasher;
///
/// let hasher = TokenHasher::default();
/// let token = hasher.hash("9q8yyk8y1590000000000").unwrap();
/// assert_eq!(token, "e0a9052ac6f3e604");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenHasher {
    params: HashParams,
}

impl TokenHasher {
    /// Creates a hasher after validating `params`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidParams`] if scrypt cannot run with them.
    pub fn new(params: HashParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Creates a hasher for a token format.
    #[must_use]
    pub fn for_format(format: TokenFormat) -> Self {
        Self {
            params: format.params(),
        }
    }

    /// The parameters in use.
    #[must_use]
    pub const fn params(&self) -> &HashParams {
        &self.params
    }

    /// Hashes one candidate into lowercase hex.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::KeyDerivation`] if scrypt fails. With validated
    /// parameters this does not happen for any input.
    pub fn hash(&self, candidate: &str) -> Result<String> {
        let params = self.params.scrypt_params()?;
        let mut output = vec![0u8; self.params.output_len];
        scrypt::scrypt(
            candidate.as_bytes(),
            self.params.salt.as_bytes(),
            &params,
            &mut output,
        )?;
        Ok(hex::encode(output))
    }

    /// Hashes every candidate, preserving order.
    ///
    /// # Errors
    ///
    /// Fails on the first candidate that fails to hash.
    pub fn hash_all<S: AsRef<str>>(&self, candidates: &[S]) -> Result<Vec<String>> {
        candidates
            .iter()
            .map(|candidate| self.hash(candidate.as_ref()))
            .collect()
    }
}
