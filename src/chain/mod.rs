//! Gravity chain client contract.
//!
//! The committee mirrors state from an external chain through this trait;
//! transport (RPC endpoints, contract ABIs) lives entirely behind it.
//! Candidate pagination cursors start at 1, vote cursors at 0, and a page
//! shorter than `page_size` signals end of stream.

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use num_bigint::BigInt;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::election::Bucket;
use crate::election::Registration;

pub mod mock;

pub use mock::MockChainClient;

#[derive(Error, Debug)]
pub enum ChainError {
    /// The requested block does not exist on the chain.
    #[error("block not found")]
    NotFound,

    #[error("chain transport error: {0}")]
    Transport(String),

    #[error("chain client closed")]
    Closed,
}

/// Chain head height and timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipInfo {
    pub height: u64,
    pub block_time: DateTime<Utc>,
}

/// Read access to the gravity chain's voting state.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current chain head.
    async fn tip(&self) -> Result<TipInfo, ChainError>;

    /// Block timestamp at `height`, or [`ChainError::NotFound`] if the chain
    /// has not reached it.
    async fn block_timestamp(&self, height: u64) -> Result<DateTime<Utc>, ChainError>;

    /// One page of candidate registrations at `height`, starting at
    /// `cursor` (first page cursor is 1). Returns the next cursor and the
    /// page; a short page ends the stream.
    async fn candidates(
        &self,
        height: u64,
        cursor: BigInt,
        page_size: u8,
    ) -> Result<(BigInt, Vec<Registration>), ChainError>;

    /// One page of vote buckets at `height`, starting at `cursor` (first
    /// page cursor is 0). Same pagination contract as [`Self::candidates`].
    async fn votes(
        &self,
        height: u64,
        cursor: BigInt,
        page_size: u8,
    ) -> Result<(BigInt, Vec<Bucket>), ChainError>;

    /// Register a block subscription. New tips are delivered on `tips`,
    /// subscription failures on `errors`; the subscription ends when the
    /// receivers are dropped.
    async fn subscribe_new_block(
        &self,
        tips: mpsc::Sender<TipInfo>,
        errors: mpsc::Sender<ChainError>,
    ) -> Result<(), ChainError>;

    /// Release the underlying transport.
    fn close(&self);
}
