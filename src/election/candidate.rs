//! Per-candidate aggregate built up during calculation.

use num_bigint::BigInt;
use num_bigint::Sign;
use num_traits::Zero;

use super::Registration;
use crate::BallotsyncError;
use crate::Result;

/// A candidate with its accumulated score and self-staking tokens. Both
/// totals only ever grow while buckets are being aggregated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    name: Vec<u8>,
    address: Vec<u8>,
    self_staking_weight: u64,
    score: BigInt,
    self_staking_tokens: BigInt,
}

impl Candidate {
    #[must_use]
    pub fn from_registration(registration: &Registration) -> Self {
        Self {
            name: registration.name().to_vec(),
            address: registration.address().to_vec(),
            self_staking_weight: registration.self_staking_weight(),
            score: BigInt::zero(),
            self_staking_tokens: BigInt::zero(),
        }
    }

    #[must_use]
    pub fn new(
        name: Vec<u8>,
        address: Vec<u8>,
        self_staking_weight: u64,
        score: BigInt,
        self_staking_tokens: BigInt,
    ) -> Self {
        Self {
            name,
            address,
            self_staking_weight,
            score,
            self_staking_tokens,
        }
    }

    #[must_use]
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    #[must_use]
    pub fn address(&self) -> &[u8] {
        &self.address
    }

    #[must_use]
    pub const fn self_staking_weight(&self) -> u64 {
        self.self_staking_weight
    }

    #[must_use]
    pub fn score(&self) -> &BigInt {
        &self.score
    }

    #[must_use]
    pub fn self_staking_tokens(&self) -> &BigInt {
        &self.self_staking_tokens
    }

    /// Adds `score` to the candidate's total.
    ///
    /// # Errors
    /// Rejects negative scores; the total is monotone.
    pub fn add_score(&mut self, score: &BigInt) -> Result<()> {
        if score.sign() == Sign::Minus {
            return Err(BallotsyncError::NegativeValue("score"));
        }
        self.score += score;
        Ok(())
    }

    /// Adds `tokens` to the candidate's self-staking total.
    ///
    /// # Errors
    /// Rejects negative amounts; the total is monotone.
    pub fn add_self_staking_tokens(&mut self, tokens: &BigInt) -> Result<()> {
        if tokens.sign() == Sign::Minus {
            return Err(BallotsyncError::NegativeValue("self-staking tokens"));
        }
        self.self_staking_tokens += tokens;
        Ok(())
    }
}
