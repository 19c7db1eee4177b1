//! Candidate registration as read from the gravity chain.

use num_bigint::BigInt;

/// A candidate declaration. `self_staking_weight` of 1 is the plain case;
/// anything greater marks a "manified" candidate that the calculator may be
/// configured to skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: Vec<u8>,
    address: Vec<u8>,
    operator_address: Vec<u8>,
    self_staking_amount: BigInt,
    self_staking_weight: u64,
}

impl Registration {
    #[must_use]
    pub fn new(
        name: Vec<u8>,
        address: Vec<u8>,
        operator_address: Vec<u8>,
        self_staking_amount: BigInt,
        self_staking_weight: u64,
    ) -> Self {
        Self {
            name,
            address,
            operator_address,
            self_staking_amount,
            self_staking_weight,
        }
    }

    #[must_use]
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Beneficiary address; self-votes are detected against it.
    #[must_use]
    pub fn address(&self) -> &[u8] {
        &self.address
    }

    #[must_use]
    pub fn operator_address(&self) -> &[u8] {
        &self.operator_address
    }

    #[must_use]
    pub fn self_staking_amount(&self) -> &BigInt {
        &self.self_staking_amount
    }

    #[must_use]
    pub const fn self_staking_weight(&self) -> u64 {
        self.self_staking_weight
    }
}
