//! Immutable election result and its stable binary encoding.
//!
//! The serialized form is the on-disk record: field order is fixed, lengths
//! and counts are little-endian `u32`, big integers are a sign byte plus
//! their minimal big-endian magnitude, and times are RFC-3339 UTC strings
//! with nanosecond precision. Serializing the same result always yields the
//! same bytes.

use std::collections::HashMap;

use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;
use num_bigint::BigInt;
use num_bigint::Sign;

use super::Bucket;
use super::Candidate;
use super::Vote;
use crate::util;
use crate::BallotsyncError;
use crate::Result;

const SIGN_PLUS: u8 = 0;
const SIGN_MINUS: u8 = 1;

/// The outcome of one epoch's election: the ranked delegates, their vote
/// lists, and the two running totals. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionResult {
    mint_time: DateTime<Utc>,
    delegates: Vec<Candidate>,
    votes: HashMap<String, Vec<Vote>>,
    total_voted_stakes: BigInt,
    total_votes: BigInt,
}

impl ElectionResult {
    #[must_use]
    pub(crate) fn new(
        mint_time: DateTime<Utc>,
        delegates: Vec<Candidate>,
        votes: HashMap<String, Vec<Vote>>,
        total_voted_stakes: BigInt,
        total_votes: BigInt,
    ) -> Self {
        Self {
            mint_time,
            delegates,
            votes,
            total_voted_stakes,
            total_votes,
        }
    }

    #[must_use]
    pub const fn mint_time(&self) -> DateTime<Utc> {
        self.mint_time
    }

    /// Qualifying candidates in ranking order.
    #[must_use]
    pub fn delegates(&self) -> &[Candidate] {
        &self.delegates
    }

    /// Votes for the delegate with the given lowercase-hex name.
    #[must_use]
    pub fn votes(&self, name: &str) -> Option<&[Vote]> {
        self.votes.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn total_voted_stakes(&self) -> &BigInt {
        &self.total_voted_stakes
    }

    #[must_use]
    pub fn total_votes(&self) -> &BigInt {
        &self.total_votes
    }

    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        put_time(&mut buf, self.mint_time);
        put_u32(&mut buf, self.delegates.len() as u32);
        for delegate in &self.delegates {
            put_bytes(&mut buf, delegate.name());
            put_bytes(&mut buf, delegate.address());
            buf.extend_from_slice(&delegate.self_staking_weight().to_le_bytes());
            put_bigint(&mut buf, delegate.score());
            put_bigint(&mut buf, delegate.self_staking_tokens());
            let name = hex::encode(delegate.name());
            let votes = self.votes.get(&name).map_or(&[][..], Vec::as_slice);
            put_u32(&mut buf, votes.len() as u32);
            for vote in votes {
                put_vote(&mut buf, vote);
            }
        }
        put_bigint(&mut buf, &self.total_voted_stakes);
        put_bigint(&mut buf, &self.total_votes);
        buf
    }

    /// # Errors
    /// Returns a decode error on truncated or malformed input.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        let mint_time = reader.take_time()?;
        let delegate_count = reader.take_u32()? as usize;
        let mut delegates = Vec::with_capacity(delegate_count);
        let mut votes = HashMap::with_capacity(delegate_count);
        for _ in 0..delegate_count {
            let name = reader.take_bytes()?;
            let address = reader.take_bytes()?;
            let self_staking_weight = reader.take_u64()?;
            let score = reader.take_bigint()?;
            let self_staking_tokens = reader.take_bigint()?;
            let vote_count = reader.take_u32()? as usize;
            let mut delegate_votes = Vec::with_capacity(vote_count);
            for _ in 0..vote_count {
                delegate_votes.push(take_vote(&mut reader)?);
            }
            votes.insert(hex::encode(&name), delegate_votes);
            delegates.push(Candidate::new(
                name,
                address,
                self_staking_weight,
                score,
                self_staking_tokens,
            ));
        }
        let total_voted_stakes = reader.take_bigint()?;
        let total_votes = reader.take_bigint()?;
        reader.finish()?;
        Ok(Self {
            mint_time,
            delegates,
            votes,
            total_voted_stakes,
            total_votes,
        })
    }
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_bytes(buf: &mut Vec<u8>, b: &[u8]) {
    put_u32(buf, b.len() as u32);
    buf.extend_from_slice(b);
}

fn put_time(buf: &mut Vec<u8>, t: DateTime<Utc>) {
    put_bytes(buf, &util::time_to_bytes(t));
}

fn put_bigint(buf: &mut Vec<u8>, v: &BigInt) {
    let (sign, magnitude) = v.to_bytes_be();
    buf.push(if sign == Sign::Minus { SIGN_MINUS } else { SIGN_PLUS });
    // to_bytes_be encodes zero as [0]; strip it so the magnitude is minimal.
    if magnitude == [0] {
        put_u32(buf, 0);
    } else {
        put_bytes(buf, &magnitude);
    }
}

fn put_vote(buf: &mut Vec<u8>, vote: &Vote) {
    let bucket = vote.bucket();
    put_bytes(buf, bucket.voter());
    put_bytes(buf, bucket.candidate());
    put_bigint(buf, bucket.amount());
    put_time(buf, bucket.start_time());
    buf.extend_from_slice(&bucket.duration().num_seconds().to_le_bytes());
    buf.push(u8::from(bucket.decay()));
    put_bigint(buf, vote.weighted_score());
}

fn take_vote(reader: &mut Reader<'_>) -> Result<Vote> {
    let voter = reader.take_bytes()?;
    let candidate = reader.take_bytes()?;
    let amount = reader.take_bigint()?;
    let start_time = reader.take_time()?;
    let duration = TimeDelta::seconds(reader.take_i64()?);
    let decay = reader.take_u8()? != 0;
    let weighted_score = reader.take_bigint()?;
    Vote::new(
        Bucket::new(voter, candidate, amount, start_time, duration, decay),
        weighted_score,
    )
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| BallotsyncError::Decode("unexpected end of input".to_string()))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn take_u32(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(bytes))
    }

    fn take_u64(&mut self) -> Result<u64> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(bytes))
    }

    fn take_i64(&mut self) -> Result<i64> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.take(8)?);
        Ok(i64::from_le_bytes(bytes))
    }

    fn take_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.take_u32()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    fn take_bigint(&mut self) -> Result<BigInt> {
        let sign_byte = self.take_u8()?;
        let magnitude = self.take_bytes()?;
        if magnitude.is_empty() {
            return Ok(BigInt::from(0));
        }
        let sign = match sign_byte {
            SIGN_PLUS => Sign::Plus,
            SIGN_MINUS => Sign::Minus,
            other => {
                return Err(BallotsyncError::Decode(format!(
                    "invalid big integer sign byte {other}"
                )))
            }
        };
        Ok(BigInt::from_bytes_be(sign, &magnitude))
    }

    fn take_time(&mut self) -> Result<DateTime<Utc>> {
        let bytes = self.take_bytes()?;
        util::bytes_to_time(&bytes)
    }

    fn finish(&self) -> Result<()> {
        if self.pos != self.data.len() {
            return Err(BallotsyncError::Decode(format!(
                "{} trailing bytes after result",
                self.data.len() - self.pos
            )));
        }
        Ok(())
    }
}
