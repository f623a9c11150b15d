// Grouped z-score outlier detection.
//
// Records are partitioned by a group key; each value is scored against its
// own group's mean and population standard deviation:
//
//   z = (value - mean) / (std + EPSILON)
//
// A record is flagged when |z| is strictly greater than the threshold.
// EPSILON keeps zero-variance groups finite: every member equals the mean,
// so z is 0 and nothing in the group is flagged.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{ProximityError, Result};
use crate::table::models::OutlierType;

/// Smoothing added to the standard deviation before dividing.
pub const EPSILON: f64 = 1e-9;

/// Default threshold, in standard deviations.
pub const DEFAULT_THRESHOLD: f64 = 2.0;

/// One flagged record. `index` points back into the scored slice.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierRecord<K> {
    pub group_key: K,
    pub index: usize,
    pub value: f64,
    pub group_mean: f64,
    pub group_std: f64,
    pub z_score: f64,
    pub classification: OutlierType,
}

/// Mean and population standard deviation of one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStats {
    pub mean: f64,
    pub std: f64,
}

/// Compute the mean and population standard deviation of a set of values.
/// An empty set yields zeros.
pub fn group_stats(values: &[f64]) -> GroupStats {
    if values.is_empty() {
        return GroupStats { mean: 0.0, std: 0.0 };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    GroupStats {
        mean,
        std: variance.sqrt(),
    }
}

/// Standard score of `value` against a group, epsilon-smoothed.
pub fn z_score(value: f64, stats: &GroupStats) -> f64 {
    (value - stats.mean) / (stats.std + EPSILON)
}

/// Flag records whose value deviates from their group by more than
/// `threshold` standard deviations.
///
/// Output is sorted by descending |z|; ties keep input order.
pub fn detect<R, K, V, G>(
    records: &[R],
    value_fn: V,
    key_fn: G,
    threshold: f64,
) -> Result<Vec<OutlierRecord<K>>>
where
    K: Eq + Hash + Clone,
    V: Fn(&R) -> f64,
    G: Fn(&R) -> K,
{
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ProximityError::InvalidParameter(format!(
            "z-score threshold must be a non-negative number, got {threshold}"
        )));
    }

    let values: Vec<f64> = records.iter().map(&value_fn).collect();

    // One pass: key -> member indices, keys remembered in first-seen order
    let mut groups: HashMap<K, Vec<usize>> = HashMap::new();
    let mut key_order: Vec<K> = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let key = key_fn(record);
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                key_order.push(key);
                Vec::new()
            })
            .push(i);
    }

    let mut flagged = Vec::new();
    for key in key_order {
        let Some(members) = groups.get(&key) else {
            continue;
        };
        let group_values: Vec<f64> = members.iter().map(|&i| values[i]).collect();
        let stats = group_stats(&group_values);

        for &i in members {
            let z = z_score(values[i], &stats);
            if z.abs() > threshold {
                flagged.push(OutlierRecord {
                    group_key: key.clone(),
                    index: i,
                    value: values[i],
                    group_mean: stats.mean,
                    group_std: stats.std,
                    z_score: z,
                    classification: OutlierType::from_z(z),
                });
            }
        }
    }

    // Restore input order before the stable sort so ties are deterministic
    flagged.sort_by_key(|o| o.index);
    flagged.sort_by(|a, b| b.z_score.abs().total_cmp(&a.z_score.abs()));

    Ok(flagged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect_plain(values: &[(u8, f64)], threshold: f64) -> Vec<OutlierRecord<u8>> {
        detect(values, |r| r.1, |r| r.0, threshold).unwrap()
    }

    #[test]
    fn test_group_stats_population() {
        let stats = group_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_group_flags_nothing() {
        let values = [(0, 0.5), (0, 0.5), (0, 0.5)];
        assert!(detect_plain(&values, 2.0).is_empty());
    }

    #[test]
    fn test_single_high_value_is_positive() {
        let mut values: Vec<(u8, f64)> = (0..9).map(|_| (0, 0.3)).collect();
        values.push((0, 0.9));
        let out = detect_plain(&values, 2.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].index, 9);
        assert_eq!(out[0].classification, OutlierType::Positive);
        // 9 equal values + 1 outlier: z = sqrt(9) = 3
        assert!((out[0].z_score - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_groups_are_independent() {
        // Group 1 alone would flag 0.9; group 2 has a wide spread
        let mut values: Vec<(u8, f64)> = (0..9).map(|_| (1, 0.3)).collect();
        values.push((1, 0.9));
        values.extend([(2, 0.0), (2, 1.0), (2, 0.0), (2, 1.0)]);
        let out = detect_plain(&values, 2.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].group_key, 1);
    }

    #[test]
    fn test_sorted_by_abs_z_descending() {
        // Two groups with outliers of different strength
        let mut values: Vec<(u8, f64)> = (0..4).map(|_| (1, 0.5)).collect();
        values.push((1, 0.0));
        let mut strong: Vec<(u8, f64)> = (0..15).map(|_| (2, 0.5)).collect();
        strong.push((2, 1.0));
        values.extend(strong);

        let out = detect_plain(&values, 1.5);
        assert_eq!(out.len(), 2);
        assert!(out[0].z_score.abs() >= out[1].z_score.abs());
        assert_eq!(out[0].group_key, 2);
        assert_eq!(out[1].classification, OutlierType::Negative);
    }

    #[test]
    fn test_threshold_boundary_is_strict() {
        let mut values: Vec<(u8, f64)> = (0..9).map(|_| (0, 0.3)).collect();
        values.push((0, 0.9));
        let group: Vec<f64> = values.iter().map(|v| v.1).collect();
        let z = z_score(0.9, &group_stats(&group));

        assert!(detect_plain(&values, z).is_empty(), "|z| == threshold must not flag");
        assert_eq!(detect_plain(&values, z - 1e-6).len(), 1);
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let err = detect(&[1.0_f64], |v| *v, |_| 0u8, -1.0).unwrap_err();
        assert!(matches!(err, ProximityError::InvalidParameter(_)));
    }
}
