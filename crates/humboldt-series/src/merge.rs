//! Outer-join-forward-fill of two normalized series.

use humboldt_types::{FundingRate, FuturesRow, OpenInterest};

/// Joins funding rates onto the open-interest timestamp grid.
///
/// Produces one row per open-interest timestamp, attaching the most
/// recent funding rate at or before that timestamp (forward-fill).
/// Timestamps before the first funding settlement get an empty funding
/// cell, and funding timestamps with no open-interest counterpart are
/// dropped: open interest defines the sampling grid, funding is the
/// slower-changing overlay.
///
/// Both inputs must be normalized (sorted ascending, unique timestamps).
///
/// The carry is an explicit last-seen-value pass over the sorted axis so
/// the at-the-boundary inclusion rule stays visible: a funding settlement
/// stamped exactly on a grid timestamp is attached to that same row.
#[must_use]
pub fn merge_forward_fill(
    open_interest: &[OpenInterest],
    funding: &[FundingRate],
) -> Vec<FuturesRow> {
    let mut merged = Vec::with_capacity(open_interest.len());
    let mut carried: Option<f64> = None;
    let mut next_funding = 0;

    for oi in open_interest {
        while next_funding < funding.len()
            && funding[next_funding].timestamp_ms <= oi.timestamp_ms
        {
            carried = Some(funding[next_funding].funding_rate);
            next_funding += 1;
        }
        merged.push(FuturesRow {
            timestamp_ms: oi.timestamp_ms,
            open_interest: oi.open_interest,
            funding_rate: carried,
        });
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oi(timestamp_ms: i64, open_interest: f64) -> OpenInterest {
        OpenInterest {
            timestamp_ms,
            open_interest,
        }
    }

    fn fr(timestamp_ms: i64, funding_rate: f64) -> FundingRate {
        FundingRate {
            timestamp_ms,
            funding_rate,
        }
    }

    #[test]
    fn test_value_carried_past_last_settlement() {
        let merged = merge_forward_fill(&[oi(1, 10.0), oi(2, 20.0)], &[fr(1, 0.5)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].funding_rate, Some(0.5));
        assert_eq!(merged[1].funding_rate, Some(0.5));
    }

    #[test]
    fn test_leading_gap_left_empty() {
        let merged = merge_forward_fill(&[oi(1, 10.0), oi(2, 20.0)], &[fr(3, 0.5)]);
        assert_eq!(merged[0].funding_rate, None);
        assert_eq!(merged[1].funding_rate, None);
    }

    #[test]
    fn test_grid_anchored_to_open_interest() {
        // A funding timestamp with no open-interest counterpart is dropped.
        let merged = merge_forward_fill(&[oi(10, 1.0), oi(30, 3.0)], &[fr(20, 0.25)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].timestamp_ms, 10);
        assert_eq!(merged[0].funding_rate, None);
        assert_eq!(merged[1].timestamp_ms, 30);
        assert_eq!(merged[1].funding_rate, Some(0.25));
    }

    #[test]
    fn test_settlement_on_boundary_is_included() {
        let merged = merge_forward_fill(&[oi(10, 1.0)], &[fr(10, 0.1)]);
        assert_eq!(merged[0].funding_rate, Some(0.1));
    }

    #[test]
    fn test_latest_settlement_wins() {
        let merged = merge_forward_fill(&[oi(30, 1.0)], &[fr(10, 0.1), fr(20, 0.2)]);
        assert_eq!(merged[0].funding_rate, Some(0.2));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_forward_fill(&[], &[fr(1, 0.1)]).is_empty());
        let merged = merge_forward_fill(&[oi(1, 1.0)], &[]);
        assert_eq!(merged[0].funding_rate, None);
    }
}
