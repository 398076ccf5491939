use crate::error::{KdTreeError, KdTreeResult};
use crate::object_pool::{Handle, Resettable};
use crate::shapes::{Circle, Shape, ShapeEnum, Vec2};
use smallvec::SmallVec;

pub type NodeId = Handle<Node>;
pub type ItemId = Handle<TrackedItem>;

pub(crate) const LEAF_INLINE: usize = 8;
pub(crate) const QUERY_STACK_INLINE: usize = 64;

// Relative slack applied when pruning subtrees, so rounding in extents can
// only widen a query, never drop an item that touches it.
const PRUNE_SLACK: f32 = 1e-5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn for_depth(depth: usize) -> Axis {
        if depth % 2 == 0 {
            Axis::X
        } else {
            Axis::Y
        }
    }

    #[inline(always)]
    pub fn of(self, point: Vec2) -> f32 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
        }
    }
}

/// Axis-aligned region. Min edges are inclusive and max edges exclusive, so
/// sibling regions partition their parent without overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectExtent {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl RectExtent {
    pub const EVERYWHERE: RectExtent = RectExtent {
        min_x: f32::NEG_INFINITY,
        min_y: f32::NEG_INFINITY,
        max_x: f32::INFINITY,
        max_y: f32::INFINITY,
    };

    pub fn from_min_max(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    // Tight extent of a shape, used for the query side of pruning
    pub(crate) fn of_shape(shape: &ShapeEnum) -> Self {
        match shape {
            ShapeEnum::Circle(circle) => Self::from_min_max(
                circle.x - circle.radius,
                circle.y - circle.radius,
                circle.x + circle.radius,
                circle.y + circle.radius,
            ),
            ShapeEnum::Capsule(capsule) => Self::from_min_max(
                capsule.a.x.min(capsule.b.x) - capsule.thickness,
                capsule.a.y.min(capsule.b.y) - capsule.thickness,
                capsule.a.x.max(capsule.b.x) + capsule.thickness,
                capsule.a.y.max(capsule.b.y) + capsule.thickness,
            ),
        }
    }

    #[inline(always)]
    pub fn contains_anchor(&self, point: Vec2) -> bool {
        point.x >= self.min_x
            && point.x < self.max_x
            && point.y >= self.min_y
            && point.y < self.max_y
    }

    #[inline(always)]
    pub(crate) fn span(&self, axis: Axis) -> (f32, f32) {
        match axis {
            Axis::X => (self.min_x, self.max_x),
            Axis::Y => (self.min_y, self.max_y),
        }
    }

    // Low half keeps coordinates below `split`, high half the rest
    pub(crate) fn split(&self, axis: Axis, split: f32) -> (RectExtent, RectExtent) {
        let mut low = *self;
        let mut high = *self;
        match axis {
            Axis::X => {
                low.max_x = split;
                high.min_x = split;
            }
            Axis::Y => {
                low.max_y = split;
                high.min_y = split;
            }
        }
        (low, high)
    }
}

#[inline(always)]
pub(crate) fn within(lhs: f32, rhs: f32) -> bool {
    lhs <= rhs + (lhs.abs().max(rhs.abs()) + 1.0) * PRUNE_SLACK
}

/// A shape registered with the tree, plus the opaque id of whoever placed it.
#[derive(Debug, Clone)]
pub struct TrackedItem {
    pub(crate) shape: ShapeEnum,
    pub(crate) owner: u32,
    pub(crate) leaf: Option<NodeId>,
}

impl TrackedItem {
    pub fn shape(&self) -> &ShapeEnum {
        &self.shape
    }

    pub fn owner(&self) -> u32 {
        self.owner
    }

    pub(crate) fn anchor(&self) -> Vec2 {
        self.shape.anchor()
    }
}

impl Default for TrackedItem {
    fn default() -> Self {
        Self {
            shape: ShapeEnum::Circle(Circle::default()),
            owner: 0,
            leaf: None,
        }
    }
}

impl Resettable for TrackedItem {
    fn reset(&mut self) {
        self.shape = ShapeEnum::Circle(Circle::default());
        self.owner = 0;
        self.leaf = None;
    }
}

// Why an oversized leaf was left unsplit
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SplitBlock {
    MaxDepth,
    // Every anchor shares this coordinate on the leaf's axis
    Coincident(f32),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Leaf {
    pub(crate) items: SmallVec<[ItemId; LEAF_INLINE]>,
    pub(crate) blocked: Option<SplitBlock>,
}

impl Leaf {
    pub(crate) fn with_items(items: SmallVec<[ItemId; LEAF_INLINE]>) -> Self {
        Leaf {
            items,
            blocked: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Internal {
    pub(crate) axis: Axis,
    pub(crate) split: f32,
    pub(crate) low: NodeId,
    pub(crate) high: NodeId,
}

impl Internal {
    pub(crate) fn child_for(&self, anchor: Vec2) -> NodeId {
        if self.axis.of(anchor) < self.split {
            self.low
        } else {
            self.high
        }
    }

    pub(crate) fn sibling_of(&self, child: NodeId) -> NodeId {
        if child == self.low {
            self.high
        } else {
            self.low
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Leaf(Leaf),
    Internal(Internal),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) region: RectExtent,
    pub(crate) depth: usize,
    // Upper bound on the reach of every item stored below this node
    pub(crate) reach: f32,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub fn region(&self) -> RectExtent {
        self.region
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub(crate) fn init_leaf(&mut self, parent: Option<NodeId>, region: RectExtent, depth: usize) {
        self.parent = parent;
        self.region = region;
        self.depth = depth;
        self.reach = 0.0;
        self.kind = NodeKind::Leaf(Leaf::default());
    }
}

impl Default for Node {
    fn default() -> Self {
        Self {
            parent: None,
            region: RectExtent::EVERYWHERE,
            depth: 0,
            reach: 0.0,
            kind: NodeKind::Leaf(Leaf::default()),
        }
    }
}

impl Resettable for Node {
    fn reset(&mut self) {
        self.init_leaf(None, RectExtent::EVERYWHERE, 0);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateKind {
    // Still inside its leaf; the shape was rewritten in place
    InPlace,
    // Crossed its leaf's boundary and was reinserted
    Relocated,
    // Valid item that is not in the tree; only the stored shape changed
    Detached,
}

pub(crate) fn validate_position(point: Vec2) -> KdTreeResult<()> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(KdTreeError::InvalidPosition {
            x: point.x,
            y: point.y,
        })
    }
}

pub(crate) fn validate_shape(shape: &ShapeEnum) -> KdTreeResult<()> {
    match shape {
        ShapeEnum::Circle(circle) => {
            validate_position(circle.center())?;
            if !circle.radius.is_finite() || circle.radius < 0.0 {
                return Err(KdTreeError::InvalidCircleRadius {
                    radius: circle.radius,
                });
            }
        }
        ShapeEnum::Capsule(capsule) => {
            validate_position(capsule.a)?;
            validate_position(capsule.b)?;
            if !capsule.thickness.is_finite() || capsule.thickness < 0.0 {
                return Err(KdTreeError::InvalidCapsuleThickness {
                    thickness: capsule.thickness,
                });
            }
        }
    }

    // Finite endpoints near f32::MAX can still overflow the midpoint or reach
    let anchor = shape.anchor();
    if !anchor.is_finite() || !shape.reach().is_finite() {
        return Err(KdTreeError::InvalidPosition {
            x: anchor.x,
            y: anchor.y,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_partitions_region() {
        let region = RectExtent::from_min_max(0.0, 0.0, 10.0, 10.0);
        let (low, high) = region.split(Axis::X, 4.0);
        let on_plane = Vec2::new(4.0, 5.0);
        assert!(!low.contains_anchor(on_plane));
        assert!(high.contains_anchor(on_plane));
        assert!(low.contains_anchor(Vec2::new(3.999, 5.0)));
        assert_eq!(high.span(Axis::X), (4.0, 10.0));
    }

    #[test]
    fn everywhere_contains_finite_points() {
        assert!(RectExtent::EVERYWHERE.contains_anchor(Vec2::new(-1e30, 1e30)));
    }

    #[test]
    fn axis_alternates_with_depth() {
        assert_eq!(Axis::for_depth(0), Axis::X);
        assert_eq!(Axis::for_depth(1), Axis::Y);
        assert_eq!(Axis::for_depth(2), Axis::X);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(validate_shape(&ShapeEnum::circle(0.0, 0.0, 0.0)).is_ok());
        assert_eq!(
            validate_shape(&ShapeEnum::circle(0.0, 0.0, -1.0)),
            Err(KdTreeError::InvalidCircleRadius { radius: -1.0 })
        );
        assert!(matches!(
            validate_shape(&ShapeEnum::circle(f32::NAN, 0.0, 1.0)),
            Err(KdTreeError::InvalidPosition { .. })
        ));
        assert_eq!(
            validate_shape(&ShapeEnum::capsule(Vec2::ZERO, Vec2::ZERO, f32::INFINITY)),
            Err(KdTreeError::InvalidCapsuleThickness {
                thickness: f32::INFINITY
            })
        );
    }

    #[test]
    fn rejects_overflowing_anchor() {
        let far = ShapeEnum::capsule(Vec2::new(3e38, 0.0), Vec2::new(3e38, 1.0), 0.0);
        assert!(matches!(
            validate_shape(&far),
            Err(KdTreeError::InvalidPosition { .. })
        ));
        let wide = ShapeEnum::capsule(Vec2::new(-3e38, 0.0), Vec2::new(3e38, 0.0), 0.0);
        assert!(validate_shape(&wide).is_ok());
        let too_thick = ShapeEnum::capsule(Vec2::new(-3e38, 0.0), Vec2::new(3e38, 0.0), 3e38);
        assert!(matches!(
            validate_shape(&too_thick),
            Err(KdTreeError::InvalidPosition { .. })
        ));
    }
}
