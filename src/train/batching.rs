use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Where the trailing window goes when the dataset size is not a multiple
/// of the batch size.
///
/// For 10 samples and a batch size of 4 the full windows are `0..4` and
/// `4..8`; the trailing window is
/// - `ShiftByOne`: `7..10`, the remainder plus one sample of the previous window
/// - `FullWindow`: `6..10`, a full `batch_size` window ending at the last sample
/// - `Disjoint`: `8..10`, the remainder alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailPolicy {
    #[default]
    ShiftByOne,
    FullWindow,
    Disjoint,
}

/// Sample windows of one epoch, in processing order.
///
/// No window is ever longer than `batch_size`. A dataset shorter than one
/// batch yields the single window `0..len`.
pub fn batch_windows(len: usize, batch_size: usize, policy: TailPolicy) -> Vec<Range<usize>> {
    if len == 0 || batch_size == 0 {
        return Vec::new();
    }

    let full = len / batch_size;
    let mut windows: Vec<Range<usize>> = (0..full)
        .map(|b| b * batch_size..(b + 1) * batch_size)
        .collect();

    let remainder = len % batch_size;
    if remainder > 0 {
        let start = len - remainder;
        let start = match policy {
            TailPolicy::ShiftByOne => start.saturating_sub(1),
            TailPolicy::FullWindow => len.saturating_sub(batch_size),
            TailPolicy::Disjoint => start,
        };
        windows.push(start..len);
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiple_has_no_tail() {
        assert_eq!(batch_windows(8, 4, TailPolicy::ShiftByOne), vec![0..4, 4..8]);
    }

    #[test]
    fn trailing_window_per_policy() {
        assert_eq!(batch_windows(10, 4, TailPolicy::ShiftByOne), vec![0..4, 4..8, 7..10]);
        assert_eq!(batch_windows(10, 4, TailPolicy::FullWindow), vec![0..4, 4..8, 6..10]);
        assert_eq!(batch_windows(10, 4, TailPolicy::Disjoint), vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn short_dataset_is_one_window() {
        for policy in [TailPolicy::ShiftByOne, TailPolicy::FullWindow, TailPolicy::Disjoint] {
            assert_eq!(batch_windows(3, 4, policy), vec![0..3]);
        }
    }

    #[test]
    fn windows_never_exceed_batch_size() {
        for len in 1..20 {
            for batch in 1..7 {
                for policy in [TailPolicy::ShiftByOne, TailPolicy::FullWindow, TailPolicy::Disjoint] {
                    for w in batch_windows(len, batch, policy) {
                        assert!(w.len() <= batch && !w.is_empty() && w.end <= len);
                    }
                }
            }
        }
    }
}
