use crate::utils::error::{BrightloomError, Result};
use chrono::{Duration, NaiveDate};

/// One chunk of a larger date range. Both bounds are inclusive at day
/// granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Split `[start, end]` into contiguous, ordered intervals of at most
/// `chunk_days` days each. Every interval after the first starts the day
/// after the previous one ends, and the last is clipped to `end`. A
/// zero-length range still yields one single-day interval.
pub fn date_intervals(
    start: NaiveDate,
    end: NaiveDate,
    chunk_days: u32,
) -> Result<Vec<DateInterval>> {
    if chunk_days == 0 {
        return Err(BrightloomError::ValidationError {
            message: "chunk_days must be at least 1".to_string(),
        });
    }
    if end < start {
        return Err(BrightloomError::ValidationError {
            message: format!("end date {} must not precede start date {}", end, start),
        });
    }

    let days_apart = (end - start).num_days();
    let chunk = i64::from(chunk_days);
    let chunk_count = ((days_apart + chunk - 1) / chunk).max(1);

    let mut intervals = Vec::with_capacity(chunk_count as usize);
    let mut chunk_start = start;
    for i in 1..=chunk_count {
        // clamp the offset before adding so oversized chunk sizes cannot
        // push the date arithmetic out of range
        let chunk_end = start + Duration::days((i * chunk).min(days_apart));
        intervals.push(DateInterval {
            start: chunk_start,
            end: chunk_end,
        });
        if i < chunk_count {
            chunk_start = chunk_end + Duration::days(1);
        }
    }

    Ok(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_single_day_range_yields_one_interval() {
        let day = date("2024-03-15");
        let intervals = date_intervals(day, day, 30).unwrap();

        assert_eq!(intervals, vec![DateInterval { start: day, end: day }]);
    }

    #[test]
    fn test_range_smaller_than_chunk_yields_one_interval() {
        let start = date("2024-01-01");
        let end = date("2024-01-10");
        let intervals = date_intervals(start, end, 30).unwrap();

        assert_eq!(intervals, vec![DateInterval { start, end }]);
    }

    #[test]
    fn test_range_splits_into_contiguous_chunks() {
        let start = date("2024-01-01");
        let end = date("2024-02-05"); // 35 days apart
        let intervals = date_intervals(start, end, 30).unwrap();

        assert_eq!(
            intervals,
            vec![
                DateInterval {
                    start: date("2024-01-01"),
                    end: date("2024-01-31"),
                },
                DateInterval {
                    start: date("2024-02-01"),
                    end: date("2024-02-05"),
                },
            ]
        );
    }

    #[test]
    fn test_exact_chunk_boundary_is_single_interval() {
        let start = date("2024-01-01");
        let end = date("2024-01-31"); // exactly 30 days apart
        let intervals = date_intervals(start, end, 30).unwrap();

        assert_eq!(intervals, vec![DateInterval { start, end }]);
    }

    #[test]
    fn test_intervals_cover_range_without_gaps_or_overlap() {
        let start = date("2024-01-01");

        for (days_apart, chunk_days) in [(0, 1), (1, 1), (7, 3), (29, 30), (30, 30), (31, 30), (90, 7)]
        {
            let end = start + Duration::days(days_apart);
            let intervals = date_intervals(start, end, chunk_days).unwrap();

            assert!(!intervals.is_empty());
            assert_eq!(intervals[0].start, start);
            assert_eq!(intervals.last().unwrap().end, end);

            for window in intervals.windows(2) {
                assert_eq!(window[1].start, window[0].end + Duration::days(1));
            }
            for interval in &intervals {
                assert!(interval.start <= interval.end);
                assert!((interval.end - interval.start).num_days() <= i64::from(chunk_days));
            }
        }
    }

    #[test]
    fn test_oversized_chunk_yields_single_clipped_interval() {
        let start = date("2024-01-01");
        let end = date("2024-01-02");
        let intervals = date_intervals(start, end, u32::MAX).unwrap();

        assert_eq!(intervals, vec![DateInterval { start, end }]);
    }

    #[test]
    fn test_zero_chunk_days_is_rejected() {
        let day = date("2024-01-01");
        let err = date_intervals(day, day, 0).unwrap_err();
        assert!(matches!(err, BrightloomError::ValidationError { .. }));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = date_intervals(date("2024-01-02"), date("2024-01-01"), 30).unwrap_err();
        assert!(matches!(err, BrightloomError::ValidationError { .. }));
    }
}
