//! Single-shot election result calculator.
//!
//! A calculator is created per target height, fed registrations and then
//! buckets, and finalized exactly once by [`ResultCalculator::calculate`].
//! All three strategy hooks (bucket filter, scorer, candidate filter) are
//! injected as plain function values; the sync engine supplies its defaults
//! and tests supply stubs.

use std::collections::HashMap;

use blake2::digest::consts::U32;
use blake2::Blake2b;
use blake2::Digest;
use chrono::DateTime;
use chrono::Utc;
use num_bigint::BigInt;
use num_traits::Zero;
use parking_lot::Mutex;

use super::Bucket;
use super::Candidate;
use super::ElectionResult;
use super::Registration;
use super::Vote;
use crate::util;
use crate::BallotsyncError;
use crate::Result;

type Blake2b256 = Blake2b<U32>;

/// Returns true to drop a bucket before scoring.
pub type BucketFilterFn = dyn Fn(&Bucket) -> bool + Send + Sync;

/// Computes a bucket's time-weighted score at the given mint time.
pub type ScoreFn = dyn Fn(&Bucket, DateTime<Utc>) -> BigInt + Send + Sync;

/// Returns true to drop a candidate from the final ranking.
pub type CandidateFilterFn = dyn Fn(&Candidate) -> bool + Send + Sync;

struct CalculatorState {
    candidates: HashMap<String, Candidate>,
    candidate_votes: HashMap<String, Vec<Vote>>,
    total_voted_stakes: BigInt,
    total_votes: BigInt,
    calculated: bool,
}

/// Build-then-freeze calculator for one election snapshot.
pub struct ResultCalculator {
    mint_time: DateTime<Utc>,
    skip_manified: bool,
    bucket_filter: Box<BucketFilterFn>,
    calc_score: Box<ScoreFn>,
    candidate_filter: Box<CandidateFilterFn>,
    state: Mutex<CalculatorState>,
}

impl ResultCalculator {
    #[must_use]
    pub fn new(
        mint_time: DateTime<Utc>,
        skip_manified: bool,
        bucket_filter: Box<BucketFilterFn>,
        calc_score: Box<ScoreFn>,
        candidate_filter: Box<CandidateFilterFn>,
    ) -> Self {
        Self {
            mint_time: mint_time.with_timezone(&Utc),
            skip_manified,
            bucket_filter,
            calc_score,
            candidate_filter,
            state: Mutex::new(CalculatorState {
                candidates: HashMap::new(),
                candidate_votes: HashMap::new(),
                total_voted_stakes: BigInt::zero(),
                total_votes: BigInt::zero(),
                calculated: false,
            }),
        }
    }

    /// Registers candidates. Must happen before any bucket is recorded.
    ///
    /// Manified registrations (`self_staking_weight > 1`) are silently
    /// skipped when the calculator was built with `skip_manified`.
    ///
    /// # Errors
    /// Fails on a finalized calculator, after any vote has been recorded,
    /// or on a duplicate candidate name.
    pub fn add_registrations(&self, registrations: &[Registration]) -> Result<()> {
        let mut state = self.state.lock();
        if state.calculated {
            return Err(BallotsyncError::AlreadyCalculated);
        }
        if state.total_votes > BigInt::zero() {
            return Err(BallotsyncError::VotesAlreadyAdded);
        }
        for registration in registrations {
            let name = hex::encode(registration.name());
            if state.candidates.contains_key(&name) {
                return Err(BallotsyncError::DuplicateCandidate(name));
            }
            if registration.self_staking_weight() > 1 && self.skip_manified {
                continue;
            }
            state
                .candidates
                .insert(name.clone(), Candidate::from_registration(registration));
            state.candidate_votes.insert(name, Vec::new());
        }
        Ok(())
    }

    /// Scores and aggregates buckets.
    ///
    /// A bucket for a registered candidate lands in that candidate's vote
    /// list and score; a self-vote is scaled by the candidate's weight
    /// first. Every surviving bucket, registered or not, feeds the two
    /// running totals.
    ///
    /// # Errors
    /// Fails on a finalized calculator or a negative computed score.
    pub fn add_buckets(&self, buckets: &[Bucket]) -> Result<()> {
        let mut state = self.state.lock();
        if state.calculated {
            return Err(BallotsyncError::AlreadyCalculated);
        }
        let state = &mut *state;
        for bucket in buckets {
            if (self.bucket_filter)(bucket) {
                continue;
            }
            if bucket.candidate().is_empty() {
                continue;
            }
            // The all-zero name is reserved; its buckets are discarded
            // before they touch any aggregate.
            if util::is_all_zeros(bucket.candidate()) {
                continue;
            }
            let name = hex::encode(bucket.candidate());
            let mut amount = bucket.amount().clone();
            let mut score = (self.calc_score)(bucket, self.mint_time);
            if let Some(candidate) = state.candidates.get_mut(&name) {
                if bucket.voter() == candidate.address() {
                    let weight = BigInt::from(candidate.self_staking_weight());
                    amount *= &weight;
                    candidate.add_self_staking_tokens(&amount)?;
                    score *= &weight;
                }
                let vote = Vote::new(bucket.clone(), score.clone())?;
                candidate.add_score(&score)?;
                if let Some(votes) = state.candidate_votes.get_mut(&name) {
                    votes.push(vote);
                }
            }
            state.total_voted_stakes += amount;
            state.total_votes += score;
        }
        Ok(())
    }

    /// Filters, ranks, and freezes the calculator.
    ///
    /// # Errors
    /// Fails if the calculator was already finalized.
    pub fn calculate(&self) -> Result<ElectionResult> {
        let mut state = self.state.lock();
        if state.calculated {
            return Err(BallotsyncError::AlreadyCalculated);
        }
        let qualifiers = self.filter_and_sort_candidates(&state);
        let mut delegates = Vec::with_capacity(qualifiers.len());
        let mut votes = HashMap::with_capacity(qualifiers.len());
        for name in qualifiers {
            if let (Some(candidate), Some(candidate_votes)) = (
                state.candidates.get(&name),
                state.candidate_votes.get(&name),
            ) {
                delegates.push(candidate.clone());
                votes.insert(name, candidate_votes.clone());
            }
        }
        state.calculated = true;
        Ok(ElectionResult::new(
            self.mint_time,
            delegates,
            votes,
            state.total_voted_stakes.clone(),
            state.total_votes.clone(),
        ))
    }

    fn filter_and_sort_candidates(&self, state: &CalculatorState) -> Vec<String> {
        struct Item<'a> {
            name: &'a str,
            score: &'a BigInt,
            priority: u64,
        }

        let ts_bytes = util::u64_to_bytes(self.mint_time.timestamp() as u64);
        let mut items: Vec<Item<'_>> = state
            .candidates
            .iter()
            .filter(|(_, candidate)| !(self.candidate_filter)(candidate))
            .map(|(name, candidate)| Item {
                name: name.as_str(),
                score: candidate.score(),
                priority: priority(candidate.name(), &ts_bytes),
            })
            .collect();
        // Names are unique, so the composite key is total and the order is
        // deterministic regardless of map iteration order.
        items.sort_by(|a, b| {
            b.score
                .cmp(a.score)
                .then_with(|| b.priority.cmp(&a.priority))
                .then_with(|| b.name.cmp(a.name))
        });
        items.into_iter().map(|item| item.name.to_string()).collect()
    }
}

/// Ranking tiebreaker: the first 8 bytes of
/// `BLAKE2b-256(name ‖ mint_time_unix_seconds_LE)` read as a little-endian
/// unsigned integer. Hashes the candidate's original name bytes.
fn priority(name: &[u8], mint_ts_le: &[u8; 8]) -> u64 {
    let mut hasher = Blake2b256::new();
    hasher.update(name);
    hasher.update(mint_ts_le);
    let digest = hasher.finalize();
    let mut first = [0u8; 8];
    first.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(first)
}
