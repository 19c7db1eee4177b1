//! `ballotsync` - gravity chain election committee
//!
//! `ballotsync` continuously mirrors on-chain voting state from an external
//! ("gravity") blockchain and, at a fixed height cadence, computes
//! deterministic leader-election results that downstream consumers query by
//! height or by wall-clock time.
//!
//! # Features
//!
//! - **Sync engine**: catch-up plus block subscription with bounded
//!   parallel fetches, retries, and ordered commits
//! - **Deterministic calculator**: time-weighted scoring, filtering, and a
//!   reproducible BLAKE2b-based ranking
//! - **Query surface**: results by height, heights by time, liveness
//!   status
//! - **Stable persistence**: byte-stable result encoding under 8-byte
//!   little-endian height keys
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ballotsync::AppConfig;
//! use ballotsync::Committee;
//! use ballotsync::MemStore;
//! use ballotsync::MockChainClient;
//!
//! #[tokio::main]
//! async fn main() -> ballotsync::Result<()> {
//!     let config = AppConfig::load()?;
//!     ballotsync::logging::init_logging(&config.logging.level)?;
//!
//!     // Swap in a real chain client and a durable store in production.
//!     let chain = Arc::new(MockChainClient::new());
//!     let store = Arc::new(MemStore::new());
//!
//!     let committee = Committee::with_namespaced_store(store, chain, &config.committee)?;
//!     committee.start().await?;
//!
//!     let latest = committee.latest_height().await;
//!     println!("latest committed height: {latest}");
//!
//!     committee.stop().await
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! chain client → fetch batch → calculator → (cache, KV store, height index)
//!                                                    → query API
//! ```
//!
//! # Modules
//!
//! - [`chain`]: gravity chain client contract
//! - [`committee`]: sync engine, cache, height index, query surface
//! - [`config`]: configuration management
//! - [`election`]: data model and the result calculator
//! - [`store`]: key-value persistence contract
//! - [`util`]: byte and time codecs
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`] with [`BallotsyncError`].

pub mod chain;
pub mod committee;
pub mod config;
pub mod election;
pub mod errors;
pub mod logging;
pub mod store;
pub mod util;

pub use chain::ChainClient;
pub use chain::ChainError;
pub use chain::MockChainClient;
pub use chain::TipInfo;
pub use committee::calc_weighted_votes;
pub use committee::Committee;
pub use committee::Status;
pub use config::AppConfig;
pub use config::CommitteeConfig;
pub use election::Bucket;
pub use election::Candidate;
pub use election::ElectionResult;
pub use election::Registration;
pub use election::ResultCalculator;
pub use election::Vote;
pub use errors::*;
pub use store::KvStore;
pub use store::MemStore;
pub use store::NamespacedStore;
pub use store::StoreError;
