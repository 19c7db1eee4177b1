//! Append-only index of committed (height, mint time) pairs.

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;

use crate::BallotsyncError;
use crate::Result;

/// Parallel sequences of committed heights and mint times, both strictly
/// increasing. Committed results form a monotone ledger in height and in
/// time, so time-based lookup reduces to binary search and the paired
/// monotonicity doubles as a correctness check on chain data.
#[derive(Default)]
pub struct HeightManager {
    heights: Vec<u64>,
    mint_times: Vec<DateTime<Utc>>,
}

impl HeightManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a committed pair.
    ///
    /// # Errors
    /// Fails unless both the height and the mint time are strictly greater
    /// than the last committed pair.
    pub fn add(&mut self, height: u64, mint_time: DateTime<Utc>) -> Result<()> {
        self.validate(height, mint_time)?;
        self.heights.push(height);
        self.mint_times.push(mint_time);
        Ok(())
    }

    /// Succeeds iff [`Self::add`] would.
    ///
    /// # Errors
    /// Same conditions as [`Self::add`].
    pub fn validate(&self, height: u64, mint_time: DateTime<Utc>) -> Result<()> {
        if let Some(&last) = self.heights.last() {
            if height <= last {
                return Err(BallotsyncError::HeightNotIncreasing { height, last });
            }
        }
        if let Some(&last) = self.mint_times.last() {
            if mint_time <= last {
                return Err(BallotsyncError::TimeNotIncreasing {
                    time: mint_time.to_rfc3339_opts(SecondsFormat::Nanos, true),
                    last: last.to_rfc3339_opts(SecondsFormat::Nanos, true),
                });
            }
        }
        Ok(())
    }

    /// Greatest committed height whose mint time is at or before `ts`, or 0
    /// if none.
    #[must_use]
    pub fn nearest_height_before(&self, ts: DateTime<Utc>) -> u64 {
        let committed = self.mint_times.partition_point(|t| *t <= ts);
        if committed == 0 {
            0
        } else {
            self.heights[committed - 1]
        }
    }

    /// Last committed height, if any.
    #[must_use]
    pub fn last_height(&self) -> Option<u64> {
        self.heights.last().copied()
    }
}
