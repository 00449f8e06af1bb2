use crate::error::{Error, Result};
use crate::stats::DescriptiveStats;

pub(crate) fn describe_impl(data: &[f64]) -> Result<DescriptiveStats> {
    if data.is_empty() {
        return Err(Error::EmptyData(
            "descriptive statistics need at least one value".into(),
        ));
    }

    let count = data.len();
    let mean = data.iter().sum::<f64>() / count as f64;

    let variance = if count > 1 {
        data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (count - 1) as f64
    } else {
        0.0
    };

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Ok(DescriptiveStats {
        count,
        mean,
        std: variance.sqrt(),
        min: sorted[0],
        q1: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.5),
        q3: percentile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Linear-interpolated percentile of sorted data
fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let n = sorted_data.len();
    let idx = p * (n - 1) as f64;
    let idx_floor = idx.floor() as usize;
    let idx_ceil = idx.ceil() as usize;

    if idx_floor == idx_ceil {
        return sorted_data[idx_floor];
    }

    let weight_ceil = idx - idx_floor as f64;
    sorted_data[idx_floor] * (1.0 - weight_ceil) + sorted_data[idx_ceil] * weight_ceil
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_quartiles() {
        let stats = describe_impl(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        assert!((stats.std - 2.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_describe_empty() {
        assert!(describe_impl(&[]).is_err());
    }
}
