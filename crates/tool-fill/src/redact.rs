use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn value_len(raw: &str) -> usize {
    raw.chars().count()
}

pub fn value_hash(raw: &str) -> String {
    let mut hasher = DefaultHasher::new();
    raw.hash(&mut hasher);
    format!("{:08x}", hasher.finish() >> 32)
}
