//! Per-sample comparison of two equal-shape sample arrays.
//!
//! Works on plain sample slices and knows nothing about the codec, so it can
//! check a decoded file against any reference.

use std::fmt;

/// Difference statistics for two arrays of the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffStats {
    pub total: usize,
    /// Positions whose samples differ
    pub differing: usize,
    /// Largest absolute difference at any position
    pub max_diff: u16,
    /// Mean absolute difference over all positions
    pub mean_diff: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    Identical { total: usize },
    Different(DiffStats),
    LengthMismatch { left: usize, right: usize },
}

impl Comparison {
    pub fn is_identical(&self) -> bool {
        matches!(self, Comparison::Identical { .. })
    }
}

pub fn compare_samples(left: &[u16], right: &[u16]) -> Comparison {
    if left.len() != right.len() {
        return Comparison::LengthMismatch {
            left: left.len(),
            right: right.len(),
        };
    }

    let mut differing = 0usize;
    let mut max_diff = 0u16;
    let mut sum = 0u64;
    for (&a, &b) in left.iter().zip(right) {
        let diff = a.abs_diff(b);
        if diff > 0 {
            differing += 1;
            max_diff = max_diff.max(diff);
            sum += diff as u64;
        }
    }

    if differing == 0 {
        return Comparison::Identical { total: left.len() };
    }
    Comparison::Different(DiffStats {
        total: left.len(),
        differing,
        max_diff,
        mean_diff: sum as f64 / left.len() as f64,
    })
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Identical { total } => {
                write!(f, "IDENTICAL: all {total} samples match")
            }
            Comparison::Different(stats) => {
                writeln!(f, "DIFFERENT: the arrays do not match")?;
                writeln!(f, " - differing samples: {} / {}", stats.differing, stats.total)?;
                writeln!(f, " - max difference: {}", stats.max_diff)?;
                write!(f, " - mean difference: {:.4}", stats.mean_diff)
            }
            Comparison::LengthMismatch { left, right } => {
                write!(f, "DIFFERENT: sample counts differ ({left} vs {right})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        let cmp = compare_samples(&[1, 2, 3], &[1, 2, 3]);
        assert_eq!(cmp, Comparison::Identical { total: 3 });
        assert!(cmp.is_identical());
    }

    #[test]
    fn test_differences() {
        let cmp = compare_samples(&[10, 20, 30, 40], &[10, 25, 30, 0]);
        let Comparison::Different(stats) = cmp else {
            panic!("expected differences, got {cmp:?}");
        };
        assert_eq!(stats.differing, 2);
        assert_eq!(stats.max_diff, 40);
        assert!((stats.mean_diff - 11.25).abs() < 1e-9);
    }

    #[test]
    fn test_length_mismatch() {
        let cmp = compare_samples(&[1, 2], &[1]);
        assert_eq!(cmp, Comparison::LengthMismatch { left: 2, right: 1 });
        assert!(cmp.to_string().contains("2 vs 1"));
    }

    #[test]
    fn test_empty_arrays_match() {
        assert!(compare_samples(&[], &[]).is_identical());
    }
}
