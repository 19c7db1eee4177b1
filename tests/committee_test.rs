//! End-to-end committee tests against the scripted chain client and the
//! in-memory store.

use std::sync::Arc;
use std::time::Duration;

use ballotsync::util;
use ballotsync::BallotsyncError;
use ballotsync::Bucket;
use ballotsync::Committee;
use ballotsync::CommitteeConfig;
use ballotsync::ElectionResult;
use ballotsync::KvStore;
use ballotsync::MemStore;
use ballotsync::MockChainClient;
use ballotsync::Registration;
use ballotsync::Status;
use chrono::DateTime;
use chrono::TimeDelta;
use chrono::TimeZone;
use chrono::Utc;
use num_bigint::BigInt;

fn ts(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).unwrap()
}

fn test_config() -> CommitteeConfig {
    CommitteeConfig {
        num_of_retries: 3,
        gravity_chain_apis: vec!["ws://localhost:8546".to_string()],
        gravity_chain_height_interval: 10,
        gravity_chain_start_height: 100,
        register_contract_address: "0x95724986563028deb58f15c5fac19fa09304f32d".to_string(),
        staking_contract_address: "0x87c9dbff0016af23f5b1ab9b8e072124ab729193".to_string(),
        // Page size of 2 so three candidates exercise the pagination loop.
        pagination_size: 2,
        vote_threshold: "0".to_string(),
        score_threshold: "0".to_string(),
        self_staking_threshold: "0".to_string(),
        cache_size: 16,
        num_of_fetch_in_parallel: 4,
        skip_manified_candidate: false,
        gravity_chain_batch_size: 2,
    }
}

fn registration(name: &[u8], address: &[u8]) -> Registration {
    Registration::new(
        name.to_vec(),
        address.to_vec(),
        b"operator".to_vec(),
        BigInt::from(0),
        1,
    )
}

fn bucket(voter: &[u8], candidate: &[u8], amount: i64, mint_time: DateTime<Utc>) -> Bucket {
    Bucket::new(
        voter.to_vec(),
        candidate.to_vec(),
        BigInt::from(amount),
        mint_time - TimeDelta::days(1),
        // Within the last remaining day, so the weighted score equals the
        // amount and assertions stay exact.
        TimeDelta::days(1) + TimeDelta::seconds(100),
        false,
    )
}

fn script_epoch(chain: &MockChainClient, height: u64, mint_time: DateTime<Utc>) {
    chain.set_block(
        height,
        mint_time,
        vec![
            registration(b"delegate-a", b"addr-a"),
            registration(b"delegate-b", b"addr-b"),
            registration(b"delegate-c", b"addr-c"),
        ],
        vec![
            bucket(b"voter-1", b"delegate-a", 300, mint_time),
            bucket(b"voter-2", b"delegate-b", 200, mint_time),
            bucket(b"voter-3", b"delegate-c", 100, mint_time),
        ],
    );
}

async fn wait_for_height(committee: &Committee, height: u64) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while committee.latest_height().await != height {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("timed out waiting for committed height");
}

#[tokio::test]
async fn test_sync_commits_in_order_and_serves_queries() {
    let chain = Arc::new(MockChainClient::new());
    let store = Arc::new(MemStore::new());
    script_epoch(&chain, 100, ts(1000));
    script_epoch(&chain, 110, ts(1010));
    script_epoch(&chain, 120, ts(1020));

    let committee = Committee::new(store.clone(), chain, &test_config()).unwrap();
    // Tip at 132: the 12-block reorg margin leaves 100..=120 fetchable.
    committee.sync(132, ts(1030)).await.unwrap();

    assert_eq!(committee.latest_height().await, 120);
    assert_eq!(committee.status(), Status::Inactive);

    let result = committee.result_by_height(110).await.unwrap();
    assert_eq!(result.mint_time(), ts(1010));
    let names: Vec<&[u8]> = result.delegates().iter().map(|d| d.name()).collect();
    assert_eq!(
        names,
        vec![&b"delegate-a"[..], &b"delegate-b"[..], &b"delegate-c"[..]]
    );
    assert_eq!(result.total_voted_stakes(), &BigInt::from(600));
    assert_eq!(result.total_votes(), &BigInt::from(600));
    let votes = result.votes(&hex::encode(b"delegate-a")).unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].weighted_score(), &BigInt::from(300));

    // Cached and persisted copies agree byte for byte.
    let stored = store.get(&util::u64_to_bytes(110)).await.unwrap();
    let decoded = ElectionResult::deserialize(&stored).unwrap();
    assert_eq!(&decoded, result.as_ref());
    assert_eq!(decoded.serialize(), stored);

    // Height/time lookups over the committed ledger.
    assert_eq!(committee.height_by_time(ts(1015)).await.unwrap(), 110);
    assert_eq!(committee.height_by_time(ts(1020)).await.unwrap(), 120);
    assert!(matches!(
        committee.height_by_time(ts(999)).await,
        Err(BallotsyncError::NotExist)
    ));
    // The ledger does not provably extend past the last tip time.
    assert!(matches!(
        committee.height_by_time(ts(1030)).await,
        Err(BallotsyncError::NotExist)
    ));
}

#[tokio::test]
async fn test_result_by_height_rejects_bad_heights() {
    let chain = Arc::new(MockChainClient::new());
    let store = Arc::new(MemStore::new());
    let committee = Committee::new(store, chain, &test_config()).unwrap();

    assert!(matches!(
        committee.result_by_height(90).await,
        Err(BallotsyncError::HeightBelowStart { .. })
    ));
    assert!(matches!(
        committee.result_by_height(105).await,
        Err(BallotsyncError::InvalidHeight(105))
    ));
    assert!(matches!(
        committee.result_by_height(110).await,
        Err(BallotsyncError::NotExist)
    ));
}

#[tokio::test]
async fn test_non_monotone_chain_data_aborts_commit() {
    let chain = Arc::new(MockChainClient::new());
    let store = Arc::new(MemStore::new());
    script_epoch(&chain, 100, ts(1000));
    script_epoch(&chain, 110, ts(1010));
    script_epoch(&chain, 120, ts(1020));

    let committee = Committee::new(store, chain.clone(), &test_config()).unwrap();
    committee.sync(132, ts(1030)).await.unwrap();
    assert_eq!(committee.latest_height().await, 120);

    // Height 130 reports a mint time before the last committed one: the
    // chain contradicts the ledger and the commit must fail hard.
    script_epoch(&chain, 130, ts(1005));
    let err = committee.sync(142, ts(1040)).await.unwrap_err();
    assert!(matches!(err, BallotsyncError::InvariantViolation(_)));
    assert_eq!(committee.latest_height().await, 120);
}

#[tokio::test]
async fn test_retry_exhaustion_aborts_batch_then_recovers() {
    let chain = Arc::new(MockChainClient::new());
    let store = Arc::new(MemStore::new());
    script_epoch(&chain, 100, ts(1000));

    let committee = Committee::new(store, chain.clone(), &test_config()).unwrap();

    // Five scripted failures outlast the three configured retries.
    chain.fail_fetches(100, 5);
    assert!(committee.sync(112, ts(1015)).await.is_err());
    assert_eq!(committee.latest_height().await, 0);

    // The remaining two failures are absorbed by the next round's retries.
    committee.sync(112, ts(1016)).await.unwrap();
    assert_eq!(committee.latest_height().await, 100);
}

#[tokio::test]
async fn test_restore_from_store_resumes_sync() {
    let chain = Arc::new(MockChainClient::new());
    let store = Arc::new(MemStore::new());
    script_epoch(&chain, 100, ts(1000));
    script_epoch(&chain, 110, ts(1010));

    {
        let committee = Committee::new(store.clone(), chain.clone(), &test_config()).unwrap();
        committee.sync(122, ts(1020)).await.unwrap();
        assert_eq!(committee.latest_height().await, 110);
    }

    // A fresh committee over the same store restores the ledger in start()
    // before its worker does any network work.
    chain.set_tip(122, ts(1020));
    let committee = Committee::new(store, chain.clone(), &test_config()).unwrap();
    committee.start().await.unwrap();
    assert_eq!(committee.latest_height().await, 110);
    let result = committee.result_by_height(100).await.unwrap();
    assert_eq!(result.mint_time(), ts(1000));

    // And resumes from the persisted next height.
    script_epoch(&chain, 120, ts(1020));
    committee.sync(132, ts(1030)).await.unwrap();
    assert_eq!(committee.latest_height().await, 120);

    committee.stop().await.unwrap();
    assert!(chain.is_closed());
}

#[tokio::test]
async fn test_background_worker_follows_subscription() {
    let chain = Arc::new(MockChainClient::new());
    let store = Arc::new(MemStore::new());
    // Anchor near the wall clock so the committee registers as ACTIVE
    // within its 60-second liveness window.
    let base = Utc::now().timestamp() - 40;
    script_epoch(&chain, 100, ts(base));
    script_epoch(&chain, 110, ts(base + 10));
    chain.set_tip(122, ts(base + 20));

    let committee = Committee::new(store, chain.clone(), &test_config()).unwrap();
    assert_eq!(committee.status(), Status::Starting);
    committee.start().await.unwrap();

    // Catch-up driven by the worker.
    wait_for_height(&committee, 110).await;

    // Tips pushed before the worker registers its subscription would be
    // lost; wait for the registration first.
    tokio::time::timeout(Duration::from_secs(5), async {
        while chain.subscriber_count() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("timed out waiting for subscription");

    // A new tip over the subscription commits the next epoch.
    script_epoch(&chain, 120, ts(base + 20));
    chain.push_tip(132, ts(base + 30)).await;
    wait_for_height(&committee, 120).await;
    assert_eq!(committee.status(), Status::Active);

    // Subscription errors are logged and do not kill the worker.
    chain.push_error("transient subscription hiccup").await;
    script_epoch(&chain, 130, ts(base + 30));
    chain.push_tip(142, ts(base + 40)).await;
    wait_for_height(&committee, 130).await;

    committee.stop().await.unwrap();
    assert!(chain.is_closed());
}

#[tokio::test]
async fn test_start_twice_is_rejected() {
    let chain = Arc::new(MockChainClient::new());
    let store = Arc::new(MemStore::new());
    chain.set_tip(100, ts(1000));

    let committee = Committee::new(store, chain, &test_config()).unwrap();
    committee.start().await.unwrap();
    assert!(committee.start().await.is_err());
    committee.stop().await.unwrap();
}

#[tokio::test]
async fn test_fetch_result_by_height_bypasses_persistence() {
    let chain = Arc::new(MockChainClient::new());
    let store = Arc::new(MemStore::new());
    script_epoch(&chain, 120, ts(1020));
    chain.set_tip(120, ts(1020));

    let committee = Committee::new(store, chain, &test_config()).unwrap();

    // Height 0 resolves to the tip.
    let result = committee.fetch_result_by_height(0).await.unwrap();
    assert_eq!(result.mint_time(), ts(1020));
    assert_eq!(result.delegates().len(), 3);

    // Nothing was committed along the way.
    assert_eq!(committee.latest_height().await, 0);
    assert!(matches!(
        committee.result_by_height(120).await,
        Err(BallotsyncError::NotExist)
    ));
}

#[tokio::test]
async fn test_fetch_result_at_unknown_height_is_not_exist() {
    let chain = Arc::new(MockChainClient::new());
    let store = Arc::new(MemStore::new());
    let committee = Committee::new(store, chain, &test_config()).unwrap();

    assert!(matches!(
        committee.fetch_result_by_height(500).await,
        Err(BallotsyncError::NotExist)
    ));
}

#[tokio::test]
async fn test_namespaced_store_round_trips_results() {
    let chain = Arc::new(MockChainClient::new());
    let store = Arc::new(MemStore::new());
    script_epoch(&chain, 100, ts(1000));
    script_epoch(&chain, 110, ts(1010));

    let committee =
        Committee::with_namespaced_store(store.clone(), chain.clone(), &test_config()).unwrap();
    chain.set_tip(122, ts(1020));
    committee.start().await.unwrap();
    wait_for_height(&committee, 110).await;

    let result = committee.result_by_height(110).await.unwrap();
    assert_eq!(result.mint_time(), ts(1010));
    assert_eq!(result.total_voted_stakes(), &BigInt::from(600));

    // Everything landed under the namespace: the raw height key is unused.
    assert!(store.get(&util::u64_to_bytes(110)).await.is_err());

    committee.stop().await.unwrap();

    // A second namespaced committee over the same backing store restores
    // the committed ledger.
    let chain = Arc::new(MockChainClient::new());
    chain.set_tip(122, ts(1020));
    let committee = Committee::with_namespaced_store(store, chain, &test_config()).unwrap();
    committee.start().await.unwrap();
    assert_eq!(committee.latest_height().await, 110);
    let restored = committee.result_by_height(110).await.unwrap();
    assert_eq!(restored.as_ref(), result.as_ref());
    committee.stop().await.unwrap();
}

#[tokio::test]
async fn test_thresholds_shape_the_result() {
    let chain = Arc::new(MockChainClient::new());
    let store = Arc::new(MemStore::new());
    let mint_time = ts(1000);
    chain.set_block(
        100,
        mint_time,
        vec![
            registration(b"delegate-a", b"addr-a"),
            registration(b"delegate-b", b"addr-b"),
        ],
        vec![
            bucket(b"voter-1", b"delegate-a", 300, mint_time),
            // Below the vote threshold: dropped before scoring.
            bucket(b"voter-2", b"delegate-a", 40, mint_time),
            // Keeps delegate-b under the score threshold.
            bucket(b"voter-3", b"delegate-b", 90, mint_time),
        ],
    );

    let mut cfg = test_config();
    cfg.vote_threshold = "50".to_string();
    cfg.score_threshold = "100".to_string();
    let committee = Committee::new(store, chain, &cfg).unwrap();
    committee.sync(112, ts(1015)).await.unwrap();

    let result = committee.result_by_height(100).await.unwrap();
    let names: Vec<&[u8]> = result.delegates().iter().map(|d| d.name()).collect();
    assert_eq!(names, vec![&b"delegate-a"[..]]);
    // The undersized bucket is gone entirely; the under-threshold
    // candidate's bucket still counts toward the totals.
    assert_eq!(result.total_voted_stakes(), &BigInt::from(390));
    assert_eq!(result.total_votes(), &BigInt::from(390));
}
