//! Descriptive statistics over a numeric sequence

use serde::{Deserialize, Serialize};

use crate::models::Money;

/// Summary statistics; all zero for an empty sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResult {
    pub mean: f64,
    pub median: f64,
    /// Most frequent value; the first one seen wins a tie
    pub mode: f64,
    /// Population variance (divides by N)
    pub variance: f64,
    pub standard_deviation: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: usize,
}

/// Compute summary statistics
///
/// Non-finite values are counted as zero. Results that would overflow
/// saturate at the largest finite `f64`, so every field stays finite.
pub fn calculate_statistics(values: &[f64]) -> StatisticsResult {
    if values.is_empty() {
        return StatisticsResult::default();
    }

    let clean: Vec<f64> = values
        .iter()
        .map(|v| if v.is_finite() { *v } else { 0.0 })
        .collect();
    let count = clean.len();
    let n = count as f64;

    let sum = clean.iter().fold(0.0, |acc, v| saturate(acc + v));

    // Running mean; each step's terms stay within range
    let mut mean = 0.0;
    for (i, v) in clean.iter().enumerate() {
        let k = (i + 1) as f64;
        mean += v / k - mean / k;
    }

    let variance = clean
        .iter()
        .fold(0.0, |acc, v| saturate(acc + (v - mean).powi(2)))
        / n;

    let mut sorted = clean.clone();
    sorted.sort_by(f64::total_cmp);
    let mid = count / 2;
    let median = if count % 2 == 0 {
        sorted[mid - 1] / 2.0 + sorted[mid] / 2.0
    } else {
        sorted[mid]
    };

    StatisticsResult {
        mean,
        median,
        mode: mode(&clean),
        variance,
        standard_deviation: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
        sum,
        count,
    }
}

fn saturate(value: f64) -> f64 {
    value.clamp(f64::MIN, f64::MAX)
}

/// Statistics over money amounts, in currency units
pub fn calculate_money_statistics(amounts: &[Money]) -> StatisticsResult {
    let values: Vec<f64> = amounts.iter().map(Money::to_f64).collect();
    calculate_statistics(&values)
}

fn mode(values: &[f64]) -> f64 {
    // (value, occurrences) in first-seen order
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((*value, 1)),
        }
    }

    let mut best = (0.0, 0);
    for (value, n) in counts {
        if n > best.1 {
            best = (value, n);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_to_five() {
        let stats = calculate_statistics(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.variance, 2.0);
        assert!((stats.standard_deviation - 1.414).abs() < 0.001);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.sum, 15.0);
        assert_eq!(stats.count, 5);
    }

    #[test]
    fn test_empty_is_all_zero() {
        assert_eq!(calculate_statistics(&[]), StatisticsResult::default());
    }

    #[test]
    fn test_even_length_median() {
        let stats = calculate_statistics(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn test_mode_first_seen_wins() {
        assert_eq!(calculate_statistics(&[7.0, 3.0, 3.0, 7.0, 1.0]).mode, 7.0);
        assert_eq!(calculate_statistics(&[1.0, 2.0, 2.0]).mode, 2.0);
        assert_eq!(calculate_statistics(&[5.0, 6.0]).mode, 5.0);
    }

    #[test]
    fn test_non_finite_values_count_as_zero() {
        let stats = calculate_statistics(&[f64::NAN, 4.0, f64::INFINITY]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.sum, 4.0);
        assert_eq!(stats.min, 0.0);
        assert!(stats.mean.is_finite());
    }

    #[test]
    fn test_huge_values_stay_finite() {
        for values in [[1e308, 1e308], [1e308, -1e308], [f64::MAX, f64::MAX]] {
            let stats = calculate_statistics(&values);
            for field in [
                stats.mean,
                stats.median,
                stats.mode,
                stats.variance,
                stats.standard_deviation,
                stats.min,
                stats.max,
                stats.sum,
            ] {
                assert!(field.is_finite(), "{:?} gave {:?}", values, stats);
            }
        }

        let stats = calculate_statistics(&[1e308, 1e308]);
        assert_eq!(stats.mean, 1e308);
        assert_eq!(stats.median, 1e308);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.sum, f64::MAX);
    }

    #[test]
    fn test_input_not_sorted_in_place() {
        let values = vec![3.0, 1.0, 2.0];
        let _ = calculate_statistics(&values);
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_money_statistics() {
        let stats = calculate_money_statistics(&[Money::from_cents(1050), Money::from_cents(950)]);
        assert_eq!(stats.mean, 10.0);
        assert_eq!(stats.sum, 20.0);
    }
}
