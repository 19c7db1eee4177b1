//! Scriptable in-memory chain client for tests and embedders.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::ChainClient;
use super::ChainError;
use super::TipInfo;
use crate::election::Bucket;
use crate::election::Registration;

#[derive(Clone)]
struct MockBlock {
    block_time: DateTime<Utc>,
    registrations: Vec<Registration>,
    buckets: Vec<Bucket>,
}

#[derive(Default)]
struct MockState {
    tip: Option<TipInfo>,
    blocks: HashMap<u64, MockBlock>,
    // Remaining forced timestamp failures per height, for retry tests.
    failures: HashMap<u64, u32>,
    tip_subscribers: Vec<mpsc::Sender<TipInfo>>,
    error_subscribers: Vec<mpsc::Sender<ChainError>>,
    closed: bool,
}

/// A [`ChainClient`] whose blocks, tip, and failures are scripted by the
/// test harness.
#[derive(Default)]
pub struct MockChainClient {
    state: Mutex<MockState>,
}

impl MockChainClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a block: its timestamp plus the candidate and bucket pages
    /// the chain serves at that height.
    pub fn set_block(
        &self,
        height: u64,
        block_time: DateTime<Utc>,
        registrations: Vec<Registration>,
        buckets: Vec<Bucket>,
    ) {
        let mut state = self.state.lock();
        state.blocks.insert(
            height,
            MockBlock {
                block_time,
                registrations,
                buckets,
            },
        );
    }

    /// Move the chain head without notifying subscribers.
    pub fn set_tip(&self, height: u64, block_time: DateTime<Utc>) {
        self.state.lock().tip = Some(TipInfo { height, block_time });
    }

    /// Make the next `count` timestamp lookups at `height` fail with a
    /// transport error.
    pub fn fail_fetches(&self, height: u64, count: u32) {
        self.state.lock().failures.insert(height, count);
    }

    /// Move the chain head and deliver it to every subscriber.
    pub async fn push_tip(&self, height: u64, block_time: DateTime<Utc>) {
        let tip = TipInfo { height, block_time };
        let subscribers = {
            let mut state = self.state.lock();
            state.tip = Some(tip);
            state.tip_subscribers.clone()
        };
        for subscriber in subscribers {
            let _ = subscriber.send(tip).await;
        }
    }

    /// Deliver a subscription error to every subscriber.
    pub async fn push_error(&self, message: &str) {
        let subscribers = self.state.lock().error_subscribers.clone();
        for subscriber in subscribers {
            let _ = subscriber
                .send(ChainError::Transport(message.to_string()))
                .await;
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of registered block subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().tip_subscribers.len()
    }

    fn check_open(state: &MockState) -> Result<(), ChainError> {
        if state.closed {
            return Err(ChainError::Closed);
        }
        Ok(())
    }

    fn cursor_index(cursor: &BigInt, base: usize) -> Result<usize, ChainError> {
        cursor
            .to_usize()
            .and_then(|c| c.checked_sub(base))
            .ok_or_else(|| ChainError::Transport(format!("invalid cursor {cursor}")))
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn tip(&self) -> Result<TipInfo, ChainError> {
        let state = self.state.lock();
        Self::check_open(&state)?;
        state
            .tip
            .ok_or_else(|| ChainError::Transport("no tip scripted".to_string()))
    }

    async fn block_timestamp(&self, height: u64) -> Result<DateTime<Utc>, ChainError> {
        let mut state = self.state.lock();
        Self::check_open(&state)?;
        if let Some(remaining) = state.failures.get_mut(&height) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ChainError::Transport(format!(
                    "simulated failure at height {height}"
                )));
            }
        }
        state
            .blocks
            .get(&height)
            .map(|block| block.block_time)
            .ok_or(ChainError::NotFound)
    }

    async fn candidates(
        &self,
        height: u64,
        cursor: BigInt,
        page_size: u8,
    ) -> Result<(BigInt, Vec<Registration>), ChainError> {
        let state = self.state.lock();
        Self::check_open(&state)?;
        let block = state.blocks.get(&height).ok_or(ChainError::NotFound)?;
        // Candidate cursors are 1-based.
        let start = Self::cursor_index(&cursor, 1)?;
        let page: Vec<Registration> = block
            .registrations
            .iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        let next = cursor + BigInt::from(page.len());
        Ok((next, page))
    }

    async fn votes(
        &self,
        height: u64,
        cursor: BigInt,
        page_size: u8,
    ) -> Result<(BigInt, Vec<Bucket>), ChainError> {
        let state = self.state.lock();
        Self::check_open(&state)?;
        let block = state.blocks.get(&height).ok_or(ChainError::NotFound)?;
        // Vote cursors are 0-based.
        let start = Self::cursor_index(&cursor, 0)?;
        let page: Vec<Bucket> = block
            .buckets
            .iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        let next = cursor + BigInt::from(page.len());
        Ok((next, page))
    }

    async fn subscribe_new_block(
        &self,
        tips: mpsc::Sender<TipInfo>,
        errors: mpsc::Sender<ChainError>,
    ) -> Result<(), ChainError> {
        let mut state = self.state.lock();
        Self::check_open(&state)?;
        state.tip_subscribers.push(tips);
        state.error_subscribers.push(errors);
        Ok(())
    }

    fn close(&self) {
        self.state.lock().closed = true;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use num_bigint::BigInt;

    use super::*;
    use crate::election::Registration;

    fn registration(name: &[u8]) -> Registration {
        Registration::new(
            name.to_vec(),
            b"addr".to_vec(),
            b"op".to_vec(),
            BigInt::from(0),
            1,
        )
    }

    #[tokio::test]
    async fn test_candidate_pagination_is_one_based() {
        let chain = MockChainClient::new();
        let time = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let registrations: Vec<Registration> = (0..5u8)
            .map(|i| registration(&[b'a' + i; 4]))
            .collect();
        chain.set_block(100, time, registrations, vec![]);

        let (next, page) = chain
            .candidates(100, BigInt::from(1), 2)
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(next, BigInt::from(3));

        let (next, page) = chain.candidates(100, next, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(next, BigInt::from(5));

        // Final short page signals end of stream.
        let (_, page) = chain.candidates(100, next, 2).await.unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_forced_failures_are_consumed() {
        let chain = MockChainClient::new();
        let time = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        chain.set_block(100, time, vec![], vec![]);
        chain.fail_fetches(100, 2);

        assert!(chain.block_timestamp(100).await.is_err());
        assert!(chain.block_timestamp(100).await.is_err());
        assert_eq!(chain.block_timestamp(100).await.unwrap(), time);
    }
}
