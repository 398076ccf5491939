pub mod collision_detection;
pub mod error;
pub mod kdtree;
pub mod object_pool;

pub use common::shapes;
pub use error::{KdTreeError, KdTreeResult};
