//! Practice streak calculation.
//!
//! Operates on a reverse-chronological list of distinct practice days,
//! typically the 100 most recent days with completed practice. The longest
//! streak is therefore bounded by that window; callers fetching a wider
//! window get a wider bound.

use chrono::NaiveDate;

use crate::types::StreakSummary;

/// Compute current and longest streaks from distinct practice days.
///
/// `days` must be sorted most-recent-first and contain no duplicates.
/// The current streak counts consecutive days ending at `today`; it is zero
/// when the most recent practice day is more than one day in the past, even
/// if a longer run exists deeper in the history.
pub fn compute_streaks(days: &[NaiveDate], today: NaiveDate) -> StreakSummary {
    let Some(&most_recent) = days.first() else {
        return StreakSummary::empty();
    };

    let mut longest = 1u32;
    let mut run = 1u32;
    let mut leading_run = 1u32;
    let mut in_leading_run = true;

    for pair in days.windows(2) {
        let gap = (pair[0] - pair[1]).num_days();
        if gap == 1 {
            run += 1;
            if in_leading_run {
                leading_run = run;
            }
        } else {
            // Run broken; the trailing run is folded after the loop.
            longest = longest.max(run);
            run = 1;
            in_leading_run = false;
        }
    }
    longest = longest.max(run);

    let current = if (today - most_recent).num_days() <= 1 {
        leading_run
    } else {
        0
    };

    StreakSummary {
        current_streak: current,
        longest_streak: longest,
        total_practice_days: days.len() as u32,
        last_practice_date: Some(most_recent),
    }
}
