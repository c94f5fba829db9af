use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::submission::Submission;

/// How many submissions the store keeps.
///
/// The store never evicts on its own; a bound only exists when one of the
/// limited variants is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "limit", rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Keep everything.
    #[default]
    Unbounded,
    /// Keep only the `n` newest submissions by timestamp. With `0` every
    /// append is evicted straight away, including the one just made.
    MaxCount(usize),
    /// Drop submissions older than this many days. A limit reaching past
    /// the earliest representable date keeps everything.
    MaxAgeDays(u32),
}

impl RetentionPolicy {
    /// Drop entries the policy no longer allows. Survivors keep their
    /// stored order. Returns how many entries were dropped.
    pub fn apply(&self, submissions: &mut Vec<Submission>, now: DateTime<Utc>) -> usize {
        let before = submissions.len();
        match *self {
            RetentionPolicy::Unbounded => {}
            RetentionPolicy::MaxCount(max) => {
                if submissions.len() > max {
                    let mut by_age: Vec<(usize, DateTime<Utc>)> = submissions
                        .iter()
                        .enumerate()
                        .map(|(i, s)| (i, s.timestamp))
                        .collect();
                    // Newest first; among equal timestamps the later insert wins.
                    by_age.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
                    let mut keep = vec![false; submissions.len()];
                    for (i, _) in by_age.into_iter().take(max) {
                        keep[i] = true;
                    }
                    let mut idx = 0;
                    submissions.retain(|_| {
                        let k = keep[idx];
                        idx += 1;
                        k
                    });
                }
            }
            RetentionPolicy::MaxAgeDays(days) => {
                let cutoff = Duration::try_days(i64::from(days))
                    .and_then(|age| now.checked_sub_signed(age));
                if let Some(cutoff) = cutoff {
                    submissions.retain(|s| s.timestamp >= cutoff);
                }
            }
        }
        before - submissions.len()
    }
}
