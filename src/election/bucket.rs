//! A stake-locked voting position.

use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;
use num_bigint::BigInt;

/// A single vote: `amount` locked for `duration` starting at `start_time`,
/// targeting the candidate named `candidate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    voter: Vec<u8>,
    candidate: Vec<u8>,
    amount: BigInt,
    start_time: DateTime<Utc>,
    duration: TimeDelta,
    decay: bool,
}

impl Bucket {
    #[must_use]
    pub fn new(
        voter: Vec<u8>,
        candidate: Vec<u8>,
        amount: BigInt,
        start_time: DateTime<Utc>,
        duration: TimeDelta,
        decay: bool,
    ) -> Self {
        Self {
            voter,
            candidate,
            amount,
            start_time: start_time.with_timezone(&Utc),
            duration,
            decay,
        }
    }

    #[must_use]
    pub fn voter(&self) -> &[u8] {
        &self.voter
    }

    /// Target candidate name; empty means the bucket targets nobody.
    #[must_use]
    pub fn candidate(&self) -> &[u8] {
        &self.candidate
    }

    #[must_use]
    pub fn amount(&self) -> &BigInt {
        &self.amount
    }

    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[must_use]
    pub const fn duration(&self) -> TimeDelta {
        self.duration
    }

    #[must_use]
    pub const fn decay(&self) -> bool {
        self.decay
    }

    /// Time left until the stake unlocks: `max(0, start + duration − now)`.
    #[must_use]
    pub fn remaining_time(&self, now: DateTime<Utc>) -> TimeDelta {
        let end = self.start_time + self.duration;
        if now >= end {
            TimeDelta::zero()
        } else {
            end - now
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn bucket(start: DateTime<Utc>, duration_secs: i64) -> Bucket {
        Bucket::new(
            b"voter".to_vec(),
            b"candidate".to_vec(),
            BigInt::from(100),
            start,
            TimeDelta::seconds(duration_secs),
            false,
        )
    }

    #[test]
    fn test_remaining_time_clips_at_zero() {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let b = bucket(start, 1000);

        assert_eq!(
            b.remaining_time(start + TimeDelta::seconds(400)),
            TimeDelta::seconds(600)
        );
        assert_eq!(
            b.remaining_time(start + TimeDelta::seconds(1000)),
            TimeDelta::zero()
        );
        assert_eq!(
            b.remaining_time(start + TimeDelta::seconds(5000)),
            TimeDelta::zero()
        );
    }

    #[test]
    fn test_remaining_time_before_start_includes_wait() {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let b = bucket(start, 1000);
        assert_eq!(
            b.remaining_time(start - TimeDelta::seconds(500)),
            TimeDelta::seconds(1500)
        );
    }
}
