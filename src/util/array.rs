use std::cmp::Ordering;

/// Inclusive arithmetic range from `start` to `stop`.
///
/// Returns `[start]` when the bounds are equal. A zero step, or one pointing
/// away from `stop`, produces an empty vector.
pub fn array_range(start: i32, stop: i32, step: i32) -> Vec<i32> {
    if start == stop {
        return vec![start];
    }
    if step == 0 || (stop - start).signum() != step.signum() {
        return Vec::new();
    }

    let len = (stop - start) / step + 1;
    (0..len).map(|i| start + i * step).collect()
}

pub fn sort_alphabetically_asc(first: &str, second: &str) -> Ordering {
    first.cmp(second)
}

pub fn sort_alphabetically_desc(first: &str, second: &str) -> Ordering {
    second.cmp(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_with_equal_bounds_is_single_element() {
        assert_eq!(array_range(7, 7, 1), vec![7]);
    }

    #[test]
    fn range_is_inclusive() {
        assert_eq!(array_range(1990, 1994, 1), vec![1990, 1991, 1992, 1993, 1994]);
        assert_eq!(array_range(0, 10, 5), vec![0, 5, 10]);
    }

    #[test]
    fn range_with_uneven_step_stops_before_overshoot() {
        assert_eq!(array_range(0, 7, 3), vec![0, 3, 6]);
    }

    #[test]
    fn descending_range() {
        assert_eq!(array_range(3, 1, -1), vec![3, 2, 1]);
    }

    #[test]
    fn bad_step_is_empty() {
        assert!(array_range(0, 5, 0).is_empty());
        assert!(array_range(0, 5, -1).is_empty());
    }

    #[test]
    fn comparators_sort_both_ways() {
        let mut names = vec!["reuters", "bbc", "guardian"];
        names.sort_by(|a, b| sort_alphabetically_asc(a, b));
        assert_eq!(names, vec!["bbc", "guardian", "reuters"]);

        names.sort_by(|a, b| sort_alphabetically_desc(a, b));
        assert_eq!(names, vec!["reuters", "guardian", "bbc"]);

        assert_eq!(sort_alphabetically_asc("a", "a"), Ordering::Equal);
        assert_eq!(sort_alphabetically_desc("a", "a"), Ordering::Equal);
    }
}
