//! Dynamic 2D kd-tree over moving circles and capsules.
//!
//! Items are stored in exactly one leaf, chosen by their anchor point (circle
//! center or capsule midpoint). Every node records the largest reach of the
//! items below it, which lets queries cross split planes only where a stored
//! shape can actually extend over them.
//!
//! Leaves split at the median anchor along an axis that alternates with depth
//! once they exceed [`Config::leaf_capacity`]. An emptied leaf collapses into
//! its sibling, and sibling leaves that together hold no more than
//! [`Config::merge_threshold`] items fold back into their parent.
//!
//! [`KdTree::update_item`] keeps an item in place whenever its new anchor is
//! still inside its leaf's region, which is the common case for per-frame
//! movement.

use crate::error::{KdTreeError, KdTreeResult};
use crate::object_pool::ObjectPool;
use fxhash::FxHashSet;

mod api;
mod config;
mod insert;
mod maintenance;
mod query;
mod remove;
mod types;
mod update;

pub use config::*;
pub use types::{Axis, ItemId, Node, NodeId, RectExtent, TrackedItem, UpdateKind};

use types::*;

pub struct KdTree {
    root: Option<NodeId>,
    nodes: ObjectPool<Node>,
    items: ObjectPool<TrackedItem>,
    // Source of truth for "is this item currently indexed"
    members: FxHashSet<ItemId>,
    config: Config,
}

impl KdTree {
    fn root_id(&self) -> KdTreeResult<NodeId> {
        self.root.ok_or(KdTreeError::NotInitialized)
    }

    fn tracked(&self, item: ItemId) -> KdTreeResult<&TrackedItem> {
        self.items.get(item).ok_or(KdTreeError::StaleItem {
            index: item.index(),
            generation: item.generation(),
        })
    }

    fn tracked_mut(&mut self, item: ItemId) -> KdTreeResult<&mut TrackedItem> {
        self.items.get_mut(item).ok_or(KdTreeError::StaleItem {
            index: item.index(),
            generation: item.generation(),
        })
    }
}

impl Default for KdTree {
    fn default() -> Self {
        Self::new()
    }
}
