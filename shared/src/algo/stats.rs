//! Summary statistics over sample sets

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Root mean square; `None` for an empty input
pub fn rms<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let (count, sum_sq) = values
        .into_iter()
        .fold((0usize, 0.0), |(n, acc), v| (n + 1, acc + v * v));
    if count == 0 {
        return None;
    }
    Some((sum_sq / count as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&v).unwrap(), 5.0);
    }

    #[test]
    fn test_rms() {
        assert_relative_eq!(rms(&[3.0, -4.0]).unwrap(), (12.5_f64).sqrt());
        assert_relative_eq!(rms(&[1.0, 1.0, 1.0]).unwrap(), 1.0);
    }

    #[test]
    fn test_empty_inputs() {
        let empty: [f64; 0] = [];
        assert!(mean(&empty).is_none());
        assert!(rms(&empty).is_none());
    }
}
