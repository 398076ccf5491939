use super::*;
use crate::shapes::{Shape, ShapeEnum, Vec2};
use log::trace;

impl KdTree {
    /// Moves an item so its anchor sits at `new_position`, keeping its size.
    ///
    /// When the new anchor is still inside the item's current leaf the shape
    /// is rewritten in place and the tree is untouched. Only a boundary
    /// crossing pays for a remove and reinsert.
    pub fn update_item(&mut self, item: ItemId, new_position: Vec2) -> KdTreeResult<UpdateKind> {
        self.root_id()?;
        validate_position(new_position)?;
        let shape = self.tracked(item)?.shape.translated_to(new_position);
        validate_shape(&shape)?;
        self.apply_shape(item, shape)
    }

    /// Replaces an item's shape outright, for radius or thickness changes.
    pub fn update_shape(&mut self, item: ItemId, shape: ShapeEnum) -> KdTreeResult<UpdateKind> {
        self.root_id()?;
        validate_shape(&shape)?;
        self.tracked(item)?;
        self.apply_shape(item, shape)
    }

    pub fn relocate_batch(&mut self, requests: &[(ItemId, Vec2)]) -> KdTreeResult<usize> {
        let mut relocated = 0;
        for (item, position) in requests {
            if self.update_item(*item, *position)? == UpdateKind::Relocated {
                relocated += 1;
            }
        }
        Ok(relocated)
    }

    /// True when `new_anchor` falls outside the region of the item's leaf.
    pub fn node_belongs_to_changed(&self, item: ItemId, new_anchor: Vec2) -> KdTreeResult<bool> {
        let tracked = self.tracked(item)?;
        Ok(match tracked.leaf {
            Some(leaf) => !self.nodes[leaf].region.contains_anchor(new_anchor),
            None => true,
        })
    }

    fn apply_shape(&mut self, item: ItemId, shape: ShapeEnum) -> KdTreeResult<UpdateKind> {
        if !self.members.contains(&item) {
            self.tracked_mut(item)?.shape = shape;
            return Ok(UpdateKind::Detached);
        }

        if self.node_belongs_to_changed(item, shape.anchor())? {
            trace!("item {:?} crossed its leaf boundary, reinserting", item);
            self.detach(item);
            self.tracked_mut(item)?.shape = shape;
            let root = self.root_id()?;
            self.insert_from(root, item);
            return Ok(UpdateKind::Relocated);
        }

        let reach = shape.reach();
        let tracked = self.tracked_mut(item)?;
        tracked.shape = shape;
        if let Some(leaf) = tracked.leaf {
            self.raise_reach(leaf, reach);
        }
        Ok(UpdateKind::InPlace)
    }

    // A grown shape must widen every ancestor that now underestimates it.
    // Pure translation stops at the first check.
    fn raise_reach(&mut self, mut node_id: NodeId, reach: f32) {
        loop {
            let node = &mut self.nodes[node_id];
            if node.reach >= reach {
                return;
            }
            node.reach = reach;
            match node.parent {
                Some(parent) => node_id = parent,
                None => return,
            }
        }
    }
}
