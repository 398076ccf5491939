/// Items a leaf may hold before it splits at the median.
pub const DEFAULT_LEAF_CAPACITY: usize = 8;

/// Two sibling leaves holding this many items or fewer fold back into their parent.
pub const DEFAULT_MERGE_THRESHOLD: usize = 4;

pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    // Slots reserved up front in the item and node pools
    pub pool_size: usize,
    pub leaf_capacity: usize,
    pub merge_threshold: usize,
    pub max_depth: usize,
}

impl Config {
    // Clamp values that would make the split/merge policy oscillate or never split
    pub(crate) fn normalized(self) -> Self {
        let leaf_capacity = self.leaf_capacity.max(1);
        Config {
            pool_size: self.pool_size,
            leaf_capacity,
            merge_threshold: self.merge_threshold.min(leaf_capacity),
            max_depth: self.max_depth,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pool_size: 1024,
            leaf_capacity: DEFAULT_LEAF_CAPACITY,
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
