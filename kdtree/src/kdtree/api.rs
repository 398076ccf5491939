use super::*;
use crate::shapes::ShapeEnum;
use log::debug;

impl KdTree {
    /// Creates an index with no root. Call [`KdTree::init`] before using it.
    pub fn new() -> Self {
        Self::new_with_config(Config::default())
    }

    pub fn new_with_config(config: Config) -> Self {
        let config = config.normalized();
        KdTree {
            root: None,
            nodes: ObjectPool::with_capacity(config.pool_size),
            items: ObjectPool::with_capacity(config.pool_size),
            members: FxHashSet::default(),
            config,
        }
    }

    pub fn init(&mut self) -> KdTreeResult<()> {
        if self.root.is_some() {
            return Err(KdTreeError::AlreadyInitialized);
        }
        let root = self.nodes.acquire();
        self.nodes[root].init_leaf(None, RectExtent::EVERYWHERE, 0);
        self.root = Some(root);
        debug!(
            "kd-tree initialized (leaf capacity {}, merge threshold {}, max depth {})",
            self.config.leaf_capacity, self.config.merge_threshold, self.config.max_depth
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.root.is_some()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Takes a tracked item from the pool. It is not indexed until passed to [`KdTree::add`].
    pub fn create_item(&mut self, shape: ShapeEnum, owner: u32) -> KdTreeResult<ItemId> {
        validate_shape(&shape)?;
        let item = self.items.acquire();
        let tracked = &mut self.items[item];
        tracked.shape = shape;
        tracked.owner = owner;
        Ok(item)
    }

    /// Removes the item if it is indexed, then returns it to the pool.
    /// The handle is stale afterwards.
    pub fn release_item(&mut self, item: ItemId) -> KdTreeResult<()> {
        self.tracked(item)?;
        if self.members.remove(&item) {
            self.detach(item);
        }
        self.items.release(item);
        Ok(())
    }

    /// Indexes the item. Adding an item that is already indexed does nothing.
    pub fn add(&mut self, item: ItemId) -> KdTreeResult<()> {
        let root = self.root_id()?;
        self.tracked(item)?;
        if self.members.contains(&item) {
            return Ok(());
        }
        self.insert_from(root, item);
        self.members.insert(item);
        Ok(())
    }

    /// Takes the item out of the tree without releasing it. Removing an item
    /// that is not indexed does nothing.
    pub fn remove(&mut self, item: ItemId) -> KdTreeResult<()> {
        self.root_id()?;
        self.tracked(item)?;
        if !self.members.remove(&item) {
            return Ok(());
        }
        self.detach(item);
        Ok(())
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.members.contains(&item)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn item(&self, item: ItemId) -> KdTreeResult<&TrackedItem> {
        self.tracked(item)
    }

    pub fn owner(&self, item: ItemId) -> KdTreeResult<u32> {
        Ok(self.tracked(item)?.owner)
    }

    pub fn shape(&self, item: ItemId) -> KdTreeResult<ShapeEnum> {
        Ok(self.tracked(item)?.shape)
    }

    /// Leaf currently holding the item, `None` when it is not indexed.
    pub fn item_leaf(&self, item: ItemId) -> KdTreeResult<Option<NodeId>> {
        Ok(self.tracked(item)?.leaf)
    }

    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node)
    }
}
