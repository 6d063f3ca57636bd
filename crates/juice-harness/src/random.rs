//! # Random Fixture Generators
//!
//! Bounded generators with a deliberate bias: to exercise edge conditions,
//! half of all draws return a boundary value (the minimum, the maximum, or
//! an immediate neighbor of either). Address and string generators resample
//! around an exclude list.

use rand::Rng;

use juice_types::{constants, Address, Bytes32, U256};

use crate::context::TestContext;
use crate::errors::HarnessError;

/// Granularity of the uniform draw over wide ranges.
const PRECISION: u64 = 10_000_000;

/// Upper bound on generated string lengths.
const MAX_STRING_LEN: u64 = 12;

/// Bounds for a random `U256` draw.
#[derive(Debug, Clone)]
pub struct RandomU256 {
    /// Inclusive lower bound.
    pub min: U256,
    /// Inclusive upper bound.
    pub max: U256,
    /// Whether half the draws return a boundary or its neighbor.
    pub favor_edges: bool,
}

impl Default for RandomU256 {
    fn default() -> Self {
        Self {
            min: U256::zero(),
            max: constants::max_uint256(),
            favor_edges: true,
        }
    }
}

impl RandomU256 {
    /// Bounded below.
    pub fn at_least(min: U256) -> Self {
        Self {
            min,
            ..Self::default()
        }
    }

    /// Bounded above.
    pub fn at_most(max: U256) -> Self {
        Self {
            max,
            ..Self::default()
        }
    }

    /// Bounded on both sides.
    pub fn between(min: U256, max: U256) -> Self {
        Self {
            min,
            max,
            favor_edges: true,
        }
    }
}

/// Options for a random string draw.
#[derive(Debug, Clone, Default)]
pub struct RandomString {
    /// Values that must not be returned.
    pub exclude: Vec<String>,
    /// Prefix prepended to every candidate.
    pub prepend: String,
    /// Whether the generated part may be empty.
    pub can_be_empty: bool,
}

/// Draw a `U256` within `[min, max]`.
pub fn sample_u256(rng: &mut impl Rng, spec: &RandomU256) -> U256 {
    if spec.min >= spec.max {
        return spec.min;
    }
    if spec.favor_edges && rng.gen_bool(0.5) {
        let r: f64 = rng.gen();
        if r <= 0.25 && spec.min + 1 < spec.max {
            return spec.min + 1;
        }
        if r >= 0.75 && spec.max - 1 > spec.min {
            return spec.max - 1;
        }
        return if r < 0.5 { spec.min } else { spec.max };
    }

    let base = spec.max - spec.min;
    let precision = U256::from(PRECISION);
    let draw = U256::from(rng.gen_range(0..PRECISION));
    let in_range = if base > precision {
        base / precision * draw
    } else {
        base * draw / precision
    };
    in_range + spec.min
}

/// Draw an address from the bound accounts, avoiding `exclude`.
///
/// Half the draws return the first account so that repeated-actor edge
/// conditions get exercised.
pub fn sample_address(rng: &mut impl Rng, accounts: &[Address], exclude: &[Address]) -> Address {
    let pool = accounts.len().min(10).max(1);
    for _ in 0..100 {
        let candidate = if rng.gen_bool(0.5) {
            accounts[0]
        } else {
            accounts[rng.gen_range(0..pool)]
        };
        if !exclude.contains(&candidate) {
            return candidate;
        }
    }
    // exclude list covered the biased pool; fall back to a scan
    *accounts
        .iter()
        .find(|a| !exclude.contains(a))
        .unwrap_or(&accounts[0])
}

/// Draw a random lowercase alphanumeric string.
pub fn sample_string(rng: &mut impl Rng, spec: &RandomString) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let min_len = u64::from(!spec.can_be_empty);
    loop {
        let len = sample_u256(
            rng,
            &RandomU256::between(U256::from(min_len), U256::from(MAX_STRING_LEN)),
        )
        .low_u64() as usize;
        let mut candidate = spec.prepend.clone();
        for _ in 0..len {
            candidate.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
        }
        if !spec.exclude.contains(&candidate) {
            return candidate;
        }
    }
}

impl TestContext {
    /// Random `U256` within the requested bounds.
    pub fn random_u256(&self, spec: &RandomU256) -> U256 {
        sample_u256(&mut *self.rng.lock(), spec)
    }

    /// Random account address, avoiding `exclude`.
    pub fn random_address(&self, exclude: &[Address]) -> Address {
        let mut accounts = vec![self.deployer];
        accounts.extend_from_slice(&self.addrs);
        sample_address(&mut *self.rng.lock(), &accounts, exclude)
    }

    /// Random signer account, avoiding `exclude`.
    ///
    /// Signers and addresses coincide here; the alias keeps call sites
    /// readable where the result is used as a caller.
    pub fn random_signer(&self, exclude: &[Address]) -> Address {
        self.random_address(exclude)
    }

    /// Random boolean.
    pub fn random_bool(&self) -> bool {
        self.rng.lock().gen_bool(0.5)
    }

    /// Random string.
    pub fn random_string(&self, spec: &RandomString) -> String {
        sample_string(&mut *self.rng.lock(), spec)
    }

    /// Random 32-byte word built from a non-empty random string.
    pub fn random_bytes32(&self, prepend: &str, exclude: &[Bytes32]) -> Result<Bytes32, HarnessError> {
        let mut rng = self.rng.lock();
        loop {
            let s = sample_string(
                &mut *rng,
                &RandomString {
                    prepend: prepend.to_string(),
                    can_be_empty: false,
                    ..Default::default()
                },
            );
            let truncated: String = s.chars().take(31).collect();
            let candidate = Bytes32::from_string(&truncated)?;
            if !exclude.contains(&candidate) {
                return Ok(candidate);
            }
        }
    }
}
