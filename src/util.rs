/// Mean of whole-number metrics, rounded half away from zero. Empty input is 0.
pub fn rounded_mean<I>(values: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));

    match count {
        0 => 0,
        n => (sum as f64 / n as f64).round() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_mean() {
        assert_eq!(rounded_mean([10, 20, 30, 15, 22]), 19);
        assert_eq!(rounded_mean([15, 7, 55, 12, 4]), 19);
    }

    #[test]
    fn test_rounded_mean_half_rounds_up() {
        assert_eq!(rounded_mean([1, 2]), 2);
        assert_eq!(rounded_mean([90, 95]), 93);
    }

    #[test]
    fn test_rounded_mean_single_value() {
        assert_eq!(rounded_mean([42]), 42);
    }

    #[test]
    fn test_rounded_mean_empty() {
        assert_eq!(rounded_mean(Vec::new()), 0);
    }

    #[test]
    fn test_rounded_mean_large_values() {
        assert_eq!(rounded_mean([u32::MAX, u32::MAX]), u32::MAX);
    }
}
