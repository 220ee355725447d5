//! Numeric helpers shared by the rating code

/// Population standard deviation (divides by `n`, not `n - 1`)
///
/// Returns 0.0 for an empty sequence.
pub fn population_std_dev<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let n = iter.clone().count();
    if n == 0 {
        return 0.0;
    }

    let mean = iter.clone().sum::<f64>() / n as f64;
    let variance = iter.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;

    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_std_dev() {
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[1400.0]), 0.0);
        assert_eq!(population_std_dev(&[1400.0, 1416.0]), 8.0);
        assert_eq!(
            population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]),
            2.0
        );
    }
}
