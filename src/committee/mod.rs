//! The election committee: a light state mirror of the gravity chain.
//!
//! [`Committee`] owns the KV store, the chain client, the result cache, and
//! the height index. `start` restores committed state, then a single
//! long-lived worker catches up to the chain tip and follows the block
//! subscription, committing results in ascending height order. Query
//! methods share one reader/writer lock with the worker;
//! `last_update_timestamp` is an atomic so `status` never blocks.

use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use num_bigint::BigInt;
use num_traits::One;
use num_traits::Zero;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::sync::RwLock;
use tokio::sync::Semaphore;
use tracing::error;
use tracing::info;

use crate::chain::ChainClient;
use crate::chain::TipInfo;
use crate::config::CommitteeConfig;
use crate::election::Bucket;
use crate::election::ElectionResult;
use crate::election::Registration;
use crate::election::ResultCalculator;
use crate::store::KvStore;
use crate::store::NamespacedStore;
use crate::store::StoreError;
use crate::store::NAMESPACE;
use crate::store::NEXT_HEIGHT_KEY;
use crate::util;
use crate::BallotsyncError;
use crate::Result;

pub mod cache;
pub mod heights;

pub use cache::ResultCache;
pub use heights::HeightManager;

/// Default cap on concurrent per-height fetches.
pub const DEFAULT_NUM_OF_FETCH_IN_PARALLEL: u8 = 10;

/// Default number of epochs fetched per catch-up round.
pub const DEFAULT_GRAVITY_CHAIN_BATCH_SIZE: u64 = 10;

// Heights closer than this to the observed tip are not fetched; the gravity
// chain is assumed to never reorganize deeper.
const REORG_SAFETY_MARGIN: u64 = 12;

// A committee is ACTIVE if it committed within this window.
const ACTIVE_WINDOW_SECS: i64 = 60;

const SECONDS_PER_DAY: f64 = 86400.0;
const WEIGHT_FRACTION_BITS: usize = 52;

/// Liveness classification of the sync worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No batch has been committed yet.
    Starting,
    /// A batch was committed within the last 60 seconds.
    Active,
    /// The worker has fallen behind the chain.
    Inactive,
}

/// The default time-weighted score of a bucket: 0 before the vote starts,
/// otherwise `floor(amount × weight)` where the weight grows with the
/// logarithm of the remaining full days.
#[must_use]
pub fn calc_weighted_votes(bucket: &Bucket, now: DateTime<Utc>) -> BigInt {
    if now < bucket.start_time() {
        return BigInt::zero();
    }
    let remaining_seconds = bucket.remaining_time(now).num_seconds();
    let mut weight = 1.0_f64;
    if remaining_seconds > 0 {
        weight +=
            (remaining_seconds as f64 / SECONDS_PER_DAY).ceil().ln() / 1.2_f64.ln() / 100.0;
    }
    scale_by_weight(bucket.amount(), weight)
}

// floor(amount × weight) with the weight in 52-bit fixed point, so a weight
// of exactly 1 returns the amount unchanged.
fn scale_by_weight(amount: &BigInt, weight: f64) -> BigInt {
    let fixed = (weight * (1u64 << WEIGHT_FRACTION_BITS) as f64) as u128;
    (amount * BigInt::from(fixed)) >> WEIGHT_FRACTION_BITS
}

// State guarded by the committee's outer reader/writer lock.
struct Inner {
    next_height: u64,
    current_height: u64,
    cache: ResultCache,
    heights: HeightManager,
}

struct CommitteeCore {
    db: Arc<dyn KvStore>,
    chain: Arc<dyn ChainClient>,
    retry_limit: u8,
    pagination_size: u8,
    fetch_in_parallel: u8,
    skip_manified: bool,
    vote_threshold: BigInt,
    score_threshold: BigInt,
    self_staking_threshold: BigInt,
    start_height: u64,
    interval: u64,
    batch_size: u64,
    inner: RwLock<Inner>,
    last_update_timestamp: AtomicI64,
}

/// The election committee service.
pub struct Committee {
    core: Arc<CommitteeCore>,
    terminate: parking_lot::Mutex<Option<mpsc::Sender<oneshot::Sender<()>>>>,
}

impl Committee {
    /// Builds a committee over the given store and chain client.
    ///
    /// # Errors
    /// Fails on an invalid contract address, threshold, or height interval.
    pub fn new(
        db: Arc<dyn KvStore>,
        chain: Arc<dyn ChainClient>,
        cfg: &CommitteeConfig,
    ) -> Result<Self> {
        if !is_hex_address(&cfg.staking_contract_address) {
            return Err(BallotsyncError::Config(
                "invalid staking contract address".to_string(),
            ));
        }
        if !is_hex_address(&cfg.register_contract_address) {
            return Err(BallotsyncError::Config(
                "invalid register contract address".to_string(),
            ));
        }
        if cfg.gravity_chain_height_interval == 0 {
            return Err(BallotsyncError::Config(
                "gravity chain height interval must be positive".to_string(),
            ));
        }
        let vote_threshold = parse_threshold(&cfg.vote_threshold, "vote threshold")?;
        let score_threshold = parse_threshold(&cfg.score_threshold, "score threshold")?;
        let self_staking_threshold =
            parse_threshold(&cfg.self_staking_threshold, "self staking threshold")?;
        let fetch_in_parallel = if cfg.num_of_fetch_in_parallel > 0 {
            cfg.num_of_fetch_in_parallel
        } else {
            DEFAULT_NUM_OF_FETCH_IN_PARALLEL
        };
        let batch_size = if cfg.gravity_chain_batch_size > 0 {
            cfg.gravity_chain_batch_size
        } else {
            DEFAULT_GRAVITY_CHAIN_BATCH_SIZE
        };
        Ok(Self {
            core: Arc::new(CommitteeCore {
                db,
                chain,
                retry_limit: cfg.num_of_retries,
                pagination_size: cfg.pagination_size,
                fetch_in_parallel,
                skip_manified: cfg.skip_manified_candidate,
                vote_threshold,
                score_threshold,
                self_staking_threshold,
                start_height: cfg.gravity_chain_start_height,
                interval: cfg.gravity_chain_height_interval,
                batch_size,
                inner: RwLock::new(Inner {
                    next_height: cfg.gravity_chain_start_height,
                    current_height: 0,
                    cache: ResultCache::new(cfg.cache_size),
                    heights: HeightManager::new(),
                }),
                last_update_timestamp: AtomicI64::new(0),
            }),
            terminate: parking_lot::Mutex::new(None),
        })
    }

    /// Like [`Committee::new`], wrapping the store in the `electionNS`
    /// namespace first.
    ///
    /// # Errors
    /// Same conditions as [`Committee::new`].
    pub fn with_namespaced_store(
        db: Arc<dyn KvStore>,
        chain: Arc<dyn ChainClient>,
        cfg: &CommitteeConfig,
    ) -> Result<Self> {
        let namespaced: Arc<dyn KvStore> = Arc::new(NamespacedStore::new(NAMESPACE, db));
        Self::new(namespaced, chain, cfg)
    }

    /// Starts the store, restores committed results, and spawns the sync
    /// worker. Returns without waiting for catch-up to finish.
    ///
    /// # Errors
    /// Fails if the store cannot start, a persisted result fails to decode
    /// or violates the ledger invariants, or the chain tip is unreachable.
    pub async fn start(&self) -> Result<()> {
        if self.terminate.lock().is_some() {
            return Err(BallotsyncError::Config(
                "committee already started".to_string(),
            ));
        }
        let core = &self.core;
        core.db.start().await?;
        match core.db.get(NEXT_HEIGHT_KEY).await {
            Ok(bytes) => {
                info!("restoring from store");
                let next_height = util::bytes_to_u64(&bytes)?;
                let mut inner = core.inner.write().await;
                let mut height = core.start_height;
                while height < next_height {
                    info!(height, "loading");
                    let data = core.db.get(&util::u64_to_bytes(height)).await?;
                    let result = ElectionResult::deserialize(&data)?;
                    inner.heights.add(height, result.mint_time())?;
                    inner.cache.insert(height, Arc::new(result));
                    height += core.interval;
                }
                inner.next_height = next_height;
            }
            Err(StoreError::NotExist) => {}
            Err(err) => return Err(err.into()),
        }
        let tip = core.chain.tip().await?;
        let (terminate_tx, terminate_rx) = mpsc::channel(1);
        *self.terminate.lock() = Some(terminate_tx);
        tokio::spawn(run_worker(Arc::clone(core), tip, terminate_rx));
        Ok(())
    }

    /// Stops the worker (rendezvous), closes the chain client, and stops
    /// the store.
    ///
    /// # Errors
    /// Fails if the store fails to stop.
    pub async fn stop(&self) -> Result<()> {
        let terminate = self.terminate.lock().take();
        if let Some(terminate) = terminate {
            let (ack_tx, ack_rx) = oneshot::channel();
            if terminate.send(ack_tx).await.is_ok() {
                let _ = ack_rx.await;
            }
        }
        self.core.chain.close();
        self.core.db.stop().await?;
        Ok(())
    }

    /// Fetches and commits everything up to `tip_height`.
    ///
    /// # Errors
    /// Returns the first per-height fetch error in ascending order, or an
    /// invariant violation if the chain contradicts the committed ledger.
    pub async fn sync(&self, tip_height: u64, tip_time: DateTime<Utc>) -> Result<()> {
        self.core.sync(tip_height, tip_time).await
    }

    /// Committed result at `height`, from cache or store.
    ///
    /// # Errors
    /// Rejects heights below the start height or off the epoch grid;
    /// absent data is [`BallotsyncError::NotExist`].
    pub async fn result_by_height(&self, height: u64) -> Result<Arc<ElectionResult>> {
        self.core.result_by_height(height).await
    }

    /// Recomputes the result at `height` (0 means the current tip) straight
    /// from the chain, bypassing persistence.
    ///
    /// # Errors
    /// Propagates chain and calculator errors.
    pub async fn fetch_result_by_height(&self, height: u64) -> Result<ElectionResult> {
        let height = if height == 0 {
            self.core.chain.tip().await?.height
        } else {
            height
        };
        self.core.fetch_result_by_height(height).await
    }

    /// Greatest committed height minted at or before `ts`.
    ///
    /// # Errors
    /// [`BallotsyncError::NotExist`] unless the ledger provably extends
    /// past `ts`.
    pub async fn height_by_time(&self, ts: DateTime<Utc>) -> Result<u64> {
        self.core.height_by_time(ts).await
    }

    /// Last committed height, or 0.
    pub async fn latest_height(&self) -> u64 {
        let inner = self.core.inner.read().await;
        inner.heights.last_height().unwrap_or(0)
    }

    #[must_use]
    pub fn status(&self) -> Status {
        let last_update = self.core.last_update_timestamp.load(Ordering::SeqCst);
        if last_update == 0 {
            Status::Starting
        } else if last_update > Utc::now().timestamp() - ACTIVE_WINDOW_SECS {
            Status::Active
        } else {
            Status::Inactive
        }
    }
}

impl CommitteeCore {
    async fn sync(self: &Arc<Self>, tip_height: u64, tip_time: DateTime<Utc>) -> Result<()> {
        let (results, errs) = self.fetch_in_batch(tip_height).await;
        self.store_in_batch(results, errs, tip_time).await
    }

    /// Raises `current_height` to the tip and fetches every pending epoch
    /// height up to the reorg-safety margin, `fetch_in_parallel` at a time.
    async fn fetch_in_batch(
        self: &Arc<Self>,
        tip_height: u64,
    ) -> (
        HashMap<u64, Arc<ElectionResult>>,
        HashMap<u64, BallotsyncError>,
    ) {
        let (next_height, current_height) = {
            let mut inner = self.inner.write().await;
            if inner.current_height < tip_height {
                inner.current_height = tip_height;
            }
            (inner.next_height, inner.current_height)
        };
        let semaphore = Arc::new(Semaphore::new(self.fetch_in_parallel as usize));
        let mut handles = Vec::new();
        let limit = current_height.saturating_sub(REORG_SAFETY_MARGIN);
        let mut height = next_height;
        while height <= limit {
            let core = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);
            handles.push((
                height,
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|err| BallotsyncError::Custom(format!("semaphore: {err}")))?;
                    core.retry_fetch_result_by_height(height).await
                }),
            ));
            height += self.interval;
        }
        let mut results = HashMap::new();
        let mut errs = HashMap::new();
        for (height, handle) in handles {
            match handle.await {
                Ok(Ok(result)) => {
                    results.insert(height, Arc::new(result));
                }
                Ok(Err(err)) => {
                    errs.insert(height, err);
                }
                Err(err) => {
                    errs.insert(
                        height,
                        BallotsyncError::Custom(format!("fetch task failed: {err}")),
                    );
                }
            }
        }
        (results, errs)
    }

    /// Commits a batch in ascending height order. The first failed height
    /// aborts the batch; a ledger-invariant failure is surfaced as
    /// [`BallotsyncError::InvariantViolation`], which the worker treats as
    /// fatal.
    async fn store_in_batch(
        &self,
        results: HashMap<u64, Arc<ElectionResult>>,
        mut errs: HashMap<u64, BallotsyncError>,
        tip_time: DateTime<Utc>,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        let mut heights: Vec<u64> = results.keys().chain(errs.keys()).copied().collect();
        heights.sort_unstable();
        heights.dedup();
        for height in heights {
            if let Some(err) = errs.remove(&height) {
                return Err(err);
            }
            let Some(result) = results.get(&height) else {
                continue;
            };
            if let Err(err) = inner.heights.validate(height, result.mint_time()) {
                return Err(BallotsyncError::InvariantViolation(err.to_string()));
            }
            self.store_result(&mut inner, height, Arc::clone(result))
                .await?;
            inner.next_height = height + self.interval;
        }
        info!(block_time = %tip_time, "synced to");
        self.last_update_timestamp
            .store(tip_time.timestamp(), Ordering::SeqCst);
        Ok(())
    }

    // Persist, cache, and index one result. Caller holds the write lock.
    async fn store_result(
        &self,
        inner: &mut Inner,
        height: u64,
        result: Arc<ElectionResult>,
    ) -> Result<()> {
        let data = result.serialize();
        self.db.put(&util::u64_to_bytes(height), data).await?;
        self.db
            .put(
                NEXT_HEIGHT_KEY,
                util::u64_to_bytes(height + self.interval).to_vec(),
            )
            .await?;
        inner.cache.insert(height, Arc::clone(&result));
        inner.heights.add(height, result.mint_time())?;
        Ok(())
    }

    async fn retry_fetch_result_by_height(&self, height: u64) -> Result<ElectionResult> {
        let mut last_error = None;
        for attempt in 1..=self.retry_limit {
            match self.fetch_result_by_height(height).await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    error!(height, attempt, error = %err, "failed to fetch result by height");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| BallotsyncError::Config("retry limit is zero".to_string())))
    }

    async fn fetch_result_by_height(&self, height: u64) -> Result<ElectionResult> {
        info!(height, "fetching result from gravity chain");
        let mint_time = self.chain.block_timestamp(height).await?;
        let calculator = self.calculator(mint_time);
        let registrations = self.fetch_registrations_by_height(height).await?;
        calculator.add_registrations(&registrations)?;
        let buckets = self.fetch_buckets_by_height(height).await?;
        calculator.add_buckets(&buckets)?;
        calculator.calculate()
    }

    fn calculator(&self, mint_time: DateTime<Utc>) -> ResultCalculator {
        let vote_threshold = self.vote_threshold.clone();
        let self_staking_threshold = self.self_staking_threshold.clone();
        let score_threshold = self.score_threshold.clone();
        ResultCalculator::new(
            mint_time,
            self.skip_manified,
            Box::new(move |bucket| bucket.amount() < &vote_threshold),
            Box::new(calc_weighted_votes),
            Box::new(move |candidate| {
                candidate.self_staking_tokens() < &self_staking_threshold
                    || candidate.score() < &score_threshold
            }),
        )
    }

    async fn fetch_registrations_by_height(&self, height: u64) -> Result<Vec<Registration>> {
        let mut all = Vec::new();
        let mut cursor = BigInt::one();
        loop {
            let (next_cursor, page) = self
                .chain
                .candidates(height, cursor, self.pagination_size)
                .await?;
            let short_page = page.len() < self.pagination_size as usize;
            all.extend(page);
            if short_page {
                break;
            }
            cursor = next_cursor;
        }
        Ok(all)
    }

    async fn fetch_buckets_by_height(&self, height: u64) -> Result<Vec<Bucket>> {
        let mut all = Vec::new();
        let mut cursor = BigInt::zero();
        loop {
            let (next_cursor, page) = self
                .chain
                .votes(height, cursor, self.pagination_size)
                .await?;
            let short_page = page.len() < self.pagination_size as usize;
            all.extend(page);
            if short_page {
                break;
            }
            cursor = next_cursor;
        }
        Ok(all)
    }

    async fn result_by_height(&self, height: u64) -> Result<Arc<ElectionResult>> {
        let inner = self.inner.read().await;
        if height < self.start_height {
            return Err(BallotsyncError::HeightBelowStart {
                height,
                start_height: self.start_height,
            });
        }
        if (height - self.start_height) % self.interval != 0 {
            return Err(BallotsyncError::InvalidHeight(height));
        }
        if let Some(result) = inner.cache.get(height) {
            return Ok(result);
        }
        let data = self.db.get(&util::u64_to_bytes(height)).await?;
        Ok(Arc::new(ElectionResult::deserialize(&data)?))
    }

    async fn height_by_time(&self, ts: DateTime<Utc>) -> Result<u64> {
        let inner = self.inner.read().await;
        // Only answer once a block after ts has been committed, so the
        // height returned is final for that timestamp.
        let last_update = self.last_update_timestamp.load(Ordering::SeqCst);
        if last_update <= ts.timestamp() {
            return Err(BallotsyncError::NotExist);
        }
        let height = inner.heights.nearest_height_before(ts);
        if height == 0 {
            return Err(BallotsyncError::NotExist);
        }
        Ok(height)
    }
}

async fn run_worker(
    core: Arc<CommitteeCore>,
    tip: TipInfo,
    mut terminate_rx: mpsc::Receiver<oneshot::Sender<()>>,
) {
    info!("catching up via network");
    let gap = core.interval * core.batch_size;
    let mut height = {
        let inner = core.inner.read().await;
        inner.next_height + gap
    };
    while height < tip.height {
        info!(height, "catching up to");
        let (results, errs) = core.fetch_in_batch(height).await;
        match core.chain.block_timestamp(height).await {
            Ok(block_time) => {
                if let Err(err) = core.store_in_batch(results, errs, block_time).await {
                    fail_on_invariant(&err);
                    error!(height, error = %err, "failed to catch up via network");
                }
            }
            Err(err) => {
                error!(height, error = %err, "failed to get block timestamp");
            }
        }
        height += gap;
    }
    let (results, errs) = core.fetch_in_batch(tip.height).await;
    if let Err(err) = core.store_in_batch(results, errs, tip.block_time).await {
        fail_on_invariant(&err);
        error!(error = %err, "failed to catch up via network");
    }

    info!("subscribing to new block");
    let (tip_tx, mut tip_rx) = mpsc::channel(16);
    let (err_tx, mut err_rx) = mpsc::channel(16);
    if let Err(err) = core.chain.subscribe_new_block(tip_tx, err_tx).await {
        error!(error = %err, "failed to subscribe to new blocks");
    }
    loop {
        tokio::select! {
            ack = terminate_rx.recv() => {
                if let Some(ack) = ack {
                    let _ = ack.send(());
                }
                return;
            }
            Some(new_tip) = tip_rx.recv() => {
                info!(height = new_tip.height, "new gravity block");
                if let Err(err) = core.sync(new_tip.height, new_tip.block_time).await {
                    fail_on_invariant(&err);
                    error!(error = %err, "failed to sync");
                }
            }
            Some(err) = err_rx.recv() => {
                error!(error = %err, "subscription reported an error");
            }
        }
    }
}

// The committed ledger is append-only and monotone; if the chain disagrees,
// continuing would corrupt the index.
fn fail_on_invariant(err: &BallotsyncError) {
    if matches!(err, BallotsyncError::InvariantViolation(_)) {
        error!(error = %err, "upcoming block height or time contradicts the committed ledger");
        std::process::exit(1);
    }
}

fn parse_threshold(value: &str, what: &str) -> Result<BigInt> {
    BigInt::parse_bytes(value.as_bytes(), 10)
        .ok_or_else(|| BallotsyncError::Config(format!("invalid {what} {value:?}")))
}

fn is_hex_address(address: &str) -> bool {
    let hex_part = address.strip_prefix("0x").unwrap_or(address);
    hex_part.len() == 40 && hex_part.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use chrono::TimeZone;

    use super::*;

    fn bucket(amount: i64, start: DateTime<Utc>, duration_secs: i64) -> Bucket {
        Bucket::new(
            b"voter".to_vec(),
            b"candidate".to_vec(),
            BigInt::from(amount),
            start,
            TimeDelta::seconds(duration_secs),
            false,
        )
    }

    #[test]
    fn test_weighted_votes_zero_before_start() {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let b = bucket(1_000_000, start, 86400 * 14);
        assert_eq!(
            calc_weighted_votes(&b, start - TimeDelta::seconds(1)),
            BigInt::zero()
        );
    }

    #[test]
    fn test_weighted_votes_exact_amount_at_expiry() {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let b = bucket(123_456_789, start, 86400 * 14);
        // Expired stake carries weight exactly 1.
        assert_eq!(
            calc_weighted_votes(&b, start + TimeDelta::seconds(86400 * 14)),
            BigInt::from(123_456_789)
        );
    }

    #[test]
    fn test_weighted_votes_exact_amount_within_last_day() {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let b = bucket(1000, start, 86400);
        // ceil(remaining/86400) == 1, so ln(1) == 0 and the weight stays 1.
        assert_eq!(
            calc_weighted_votes(&b, start + TimeDelta::seconds(10)),
            BigInt::from(1000)
        );
    }

    #[test]
    fn test_weighted_votes_grow_with_remaining_days() {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let b = bucket(1_000_000, start, 86400 * 100);
        let weighted = calc_weighted_votes(&b, start);
        // weight = 1 + ln(100)/ln(1.2)/100 ≈ 1.2526
        assert!(weighted > BigInt::from(1_250_000));
        assert!(weighted < BigInt::from(1_255_000));
    }

    #[test]
    fn test_weighted_votes_truncate_toward_zero() {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let b = bucket(3, start, 86400 * 100);
        // 3 × 1.2526… = 3.757…, truncated to 3.
        assert_eq!(calc_weighted_votes(&b, start), BigInt::from(3));
    }

    #[test]
    fn test_is_hex_address() {
        assert!(is_hex_address("0x95724986563028deb58f15c5fac19fa09304f32d"));
        assert!(is_hex_address("95724986563028deb58f15c5fac19fa09304f32d"));
        assert!(!is_hex_address("0x123"));
        assert!(!is_hex_address(""));
        assert!(!is_hex_address("0xzz724986563028deb58f15c5fac19fa09304f32d"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let chain = Arc::new(crate::chain::MockChainClient::new());
        let db = Arc::new(crate::store::MemStore::new());

        let mut cfg = CommitteeConfig::default();
        cfg.vote_threshold = "not-a-number".to_string();
        assert!(Committee::new(db.clone(), chain.clone(), &cfg).is_err());

        let mut cfg = CommitteeConfig::default();
        cfg.staking_contract_address = "bogus".to_string();
        assert!(Committee::new(db.clone(), chain.clone(), &cfg).is_err());

        let mut cfg = CommitteeConfig::default();
        cfg.gravity_chain_height_interval = 0;
        assert!(Committee::new(db, chain, &cfg).is_err());
    }
}
