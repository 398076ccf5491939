use super::*;
use crate::collision_detection;
use crate::shapes::{Capsule, Circle, ShapeEnum, Vec2};
use smallvec::SmallVec;
use std::ops::ControlFlow;

impl KdTree {
    pub fn check_collision(&self, shape: &ShapeEnum) -> KdTreeResult<bool> {
        let root = self.root_id()?;
        validate_shape(shape)?;
        let found = self.for_each_overlap(root, shape, |_, _| ControlFlow::Break(()));
        Ok(found.is_break())
    }

    pub fn check_collision_circle(&self, circle: &Circle) -> KdTreeResult<bool> {
        self.check_collision(&ShapeEnum::Circle(*circle))
    }

    pub fn check_collision_capsule(&self, capsule: &Capsule) -> KdTreeResult<bool> {
        self.check_collision(&ShapeEnum::Capsule(*capsule))
    }

    pub fn check_collision_line(&self, start: Vec2, end: Vec2) -> KdTreeResult<bool> {
        self.check_collision(&ShapeEnum::line(start, end))
    }

    /// Like [`KdTree::check_collision`], ignoring one item. Handy for asking
    /// whether an item's own proposed move would hit anything else.
    pub fn check_collision_excluding(
        &self,
        shape: &ShapeEnum,
        exclude: ItemId,
    ) -> KdTreeResult<bool> {
        let root = self.root_id()?;
        validate_shape(shape)?;
        let found = self.for_each_overlap(root, shape, |item, _| {
            if item == exclude {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        });
        Ok(found.is_break())
    }

    pub fn collisions(&self, shape: &ShapeEnum, collisions: &mut Vec<ItemId>) -> KdTreeResult<()> {
        self.collisions_with(shape, |item, _| collisions.push(item))
    }

    /// Calls `f` with every overlapping item and its owner.
    pub fn collisions_with<F>(&self, shape: &ShapeEnum, mut f: F) -> KdTreeResult<()>
    where
        F: FnMut(ItemId, u32),
    {
        let root = self.root_id()?;
        validate_shape(shape)?;
        let _ = self.for_each_overlap(root, shape, |item, tracked| {
            f(item, tracked.owner);
            ControlFlow::<()>::Continue(())
        });
        Ok(())
    }

    pub fn collisions_batch(&self, shapes: &[ShapeEnum]) -> KdTreeResult<Vec<Vec<ItemId>>> {
        shapes
            .iter()
            .map(|shape| {
                let mut collisions = Vec::new();
                self.collisions(shape, &mut collisions)?;
                Ok(collisions)
            })
            .collect()
    }

    // Walk every subtree that could hold a shape touching `query`. A child is
    // skipped only if its split plane, widened by the child's reach, keeps all
    // of its items clear of the query extent.
    fn for_each_overlap<F>(&self, root: NodeId, query: &ShapeEnum, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(ItemId, &TrackedItem) -> ControlFlow<()>,
    {
        let extent = RectExtent::of_shape(query);
        let mut stack: SmallVec<[NodeId; QUERY_STACK_INLINE]> = SmallVec::new();
        stack.push(root);

        while let Some(node_id) = stack.pop() {
            match &self.nodes[node_id].kind {
                NodeKind::Leaf(leaf) => {
                    for &item in &leaf.items {
                        let tracked = &self.items[item];
                        if collision_detection::shape_shape(query, &tracked.shape) {
                            f(item, tracked)?;
                        }
                    }
                }
                NodeKind::Internal(internal) => {
                    let (query_min, query_max) = extent.span(internal.axis);
                    let high_reach = self.nodes[internal.high].reach;
                    if within(internal.split - high_reach, query_max) {
                        stack.push(internal.high);
                    }
                    let low_reach = self.nodes[internal.low].reach;
                    if within(query_min, internal.split + low_reach) {
                        stack.push(internal.low);
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }
}
