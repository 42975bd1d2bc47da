//! Optimized collection types for Lorecraft.
//!
//! Re-exports of hash collections using AHash. The code/name registries and
//! the glyph page bookkeeping all key through these.

// Re-export optimized hash collections
pub use ahash::{AHashMap as HashMap, AHashSet as HashSet};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_char_keys() {
        let mut map = HashMap::new();
        map.insert('c', "RED");
        assert_eq!(map.get(&'c'), Some(&"RED"));
        assert_eq!(map.get(&'q'), None);
    }

    #[test]
    fn test_hashset_dedup() {
        let mut set = HashSet::new();
        set.insert(0u8);
        set.insert(0u8);
        set.insert(37u8);
        assert_eq!(set.len(), 2);
    }
}
