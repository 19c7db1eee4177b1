use thiserror::Error;

use crate::chain::ChainError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum BallotsyncError {
    #[error("not exist")]
    NotExist,

    #[error("height {height} is lower than start height {start_height}")]
    HeightBelowStart { height: u64, start_height: u64 },

    #[error("height {0} is an invalid height")]
    InvalidHeight(u64),

    #[error("duplicate candidate {0}")]
    DuplicateCandidate(String),

    #[error("cannot modify a calculated result")]
    AlreadyCalculated,

    #[error("negative {0} is not allowed")]
    NegativeValue(&'static str),

    #[error("candidates should be added before any votes")]
    VotesAlreadyAdded,

    #[error("invalid height {height}, last height is {last}")]
    HeightNotIncreasing { height: u64, last: u64 },

    #[error("invalid mint time {time}, last mint time is {last}")]
    TimeNotIncreasing { time: String, last: String },

    #[error("committed ledger invariant violated: {0}")]
    InvariantViolation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("chain error: {0}")]
    Chain(ChainError),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("{0}")]
    Custom(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),
}

// NotFound from the chain and NotExist from the store both surface as the
// committee's NotExist; everything else propagates verbatim.
impl From<ChainError> for BallotsyncError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::NotFound => Self::NotExist,
            other => Self::Chain(other),
        }
    }
}

impl From<StoreError> for BallotsyncError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotExist => Self::NotExist,
            other => Self::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, BallotsyncError>;
