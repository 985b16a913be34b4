//! Sorting a sequence through chained segment reversals.

use list::SequenceTreap;

/// Sorts `values` in as many steps as there are elements: each step locates
/// the smallest remaining value, reverses the segment between the front and
/// its position so it becomes the new front, and then removes it. Removed
/// elements leave the treap in ascending order.
///
/// The returned vector reports, for each step, the 1-based position of the
/// step's minimum within the original sequence, counting the elements already
/// removed: `position_in_treap + step + 1`.
///
/// # Examples
/// ```
/// use sequence_treap::sort::reversal_sort;
///
/// assert_eq!(reversal_sort(vec![4, 2, 1, 3]), vec![3, 2, 4, 4]);
/// ```
pub fn reversal_sort<T: Ord + Clone>(values: Vec<T>) -> Vec<usize> {
    let mut list = values.into_iter().collect::<SequenceTreap<T>>();
    let mut reported = Vec::with_capacity(list.size());
    let mut step = 0;
    while let Some(index) = list.min_index() {
        reported.push(index + step + 1);
        if index != 0 {
            list.reverse_range(0, index);
        }
        list.pop_front();
        step += 1;
    }
    reported
}

#[cfg(test)]
mod tests {
    use super::reversal_sort;

    #[test]
    fn test_worked_example() {
        assert_eq!(reversal_sort(vec![4, 2, 1, 3]), vec![3, 2, 4, 4]);
    }

    #[test]
    fn test_already_sorted() {
        assert_eq!(reversal_sort(vec![1, 2, 3, 4, 5]), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_input() {
        let values: Vec<u32> = Vec::new();
        assert_eq!(reversal_sort(values), Vec::new());
    }

    #[test]
    fn test_matches_naive_simulation() {
        let values = vec![7, 3, 9, 1, 5, 8, 2, 6, 4, 10];

        let mut model = values.clone();
        let mut expected = Vec::new();
        let mut step = 0;
        while !model.is_empty() {
            let index = model
                .iter()
                .enumerate()
                .min_by_key(|&(_, value)| value)
                .map(|(index, _)| index)
                .unwrap();
            expected.push(index + step + 1);
            model[0..index + 1].reverse();
            model.remove(0);
            step += 1;
        }

        assert_eq!(reversal_sort(values), expected);
    }
}
