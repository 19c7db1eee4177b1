//! A bucket paired with its computed time-weighted score.

use num_bigint::BigInt;
use num_bigint::Sign;

use super::Bucket;
use crate::BallotsyncError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    bucket: Bucket,
    weighted_score: BigInt,
}

impl Vote {
    /// # Errors
    /// Rejects a negative weighted score.
    pub fn new(bucket: Bucket, weighted_score: BigInt) -> Result<Self> {
        if weighted_score.sign() == Sign::Minus {
            return Err(BallotsyncError::NegativeValue("weighted score"));
        }
        Ok(Self {
            bucket,
            weighted_score,
        })
    }

    #[must_use]
    pub const fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    #[must_use]
    pub fn weighted_score(&self) -> &BigInt {
        &self.weighted_score
    }
}
