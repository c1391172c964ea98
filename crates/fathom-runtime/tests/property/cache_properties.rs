//! Property tests: the LRU bound holds under arbitrary operation mixes.

use proptest::prelude::*;

use fathom_runtime::LruCache;

proptest! {
    #[test]
    fn capacity_bound_holds_for_any_put_sequence(
        keys in proptest::collection::vec("[a-e][0-9]", 1..200),
        capacity in 1usize..16,
    ) {
        let cache = LruCache::with_capacity(capacity);
        for (i, key) in keys.iter().enumerate() {
            cache.put(key.clone(), i);
        }
        prop_assert!(cache.len() <= capacity);
    }

    #[test]
    fn distinct_puts_past_capacity_drop_the_oldest(
        capacity in 1usize..12,
    ) {
        let cache = LruCache::with_capacity(capacity);
        for i in 0..=capacity {
            cache.put(format!("key-{i}"), i);
        }
        // capacity + 1 distinct puts: the first key must be gone and the
        // rest present.
        prop_assert_eq!(cache.get("key-0"), None);
        for i in 1..=capacity {
            prop_assert_eq!(cache.get(&format!("key-{i}")), Some(i));
        }
    }

    #[test]
    fn get_always_returns_last_put_value(
        writes in proptest::collection::vec(("[a-c]", 0usize..100), 1..50),
    ) {
        let cache = LruCache::with_capacity(8);
        let mut last = std::collections::HashMap::new();
        for (key, value) in &writes {
            cache.put(key.clone(), *value);
            last.insert(key.clone(), *value);
        }
        for (key, expected) in &last {
            if let Some(found) = cache.get(key) {
                prop_assert_eq!(found, *expected);
            }
        }
    }
}
