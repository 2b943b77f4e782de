use proptest::prelude::*;

use aai_curriculum::partition;

proptest! {
    #[test]
    fn chunks_cover_input_and_differ_by_at_most_one(len in 0usize..500, n in 1usize..40) {
        let items: Vec<usize> = (0..len).collect();
        let parts = partition(&items, n).unwrap();

        prop_assert_eq!(parts.len(), n);
        prop_assert_eq!(parts.concat(), items.as_slice());

        let sizes: Vec<usize> = parts.iter().map(|p| p.len()).collect();
        let max = sizes.iter().copied().max().unwrap_or(0);
        let min = sizes.iter().copied().min().unwrap_or(0);
        prop_assert!(max - min <= 1, "sizes {:?}", sizes);
    }
}
