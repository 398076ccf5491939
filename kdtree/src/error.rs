use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KdTreeError {
    NotInitialized,
    AlreadyInitialized,
    StaleItem { index: u32, generation: u32 },
    InvalidPosition { x: f32, y: f32 },
    InvalidCircleRadius { radius: f32 },
    InvalidCapsuleThickness { thickness: f32 },
    CorruptTree { reason: &'static str },
}

pub type KdTreeResult<T> = Result<T, KdTreeError>;

impl fmt::Display for KdTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KdTreeError::NotInitialized => write!(
                f,
                "kd-tree is not initialized (call init() first, or again after destroy_tree())"
            ),
            KdTreeError::AlreadyInitialized => {
                write!(f, "kd-tree is already initialized")
            }
            KdTreeError::StaleItem { index, generation } => {
                write!(
                    f,
                    "item handle refers to a released item (index: {}, generation: {})",
                    index, generation
                )
            }
            KdTreeError::InvalidPosition { x, y } => {
                write!(f, "position must be finite (x: {}, y: {})", x, y)
            }
            KdTreeError::InvalidCircleRadius { radius } => {
                write!(
                    f,
                    "circle radius must be finite and non-negative (radius: {})",
                    radius
                )
            }
            KdTreeError::InvalidCapsuleThickness { thickness } => {
                write!(
                    f,
                    "capsule thickness must be finite and non-negative (thickness: {})",
                    thickness
                )
            }
            KdTreeError::CorruptTree { reason } => {
                write!(f, "kd-tree invariant violated: {}", reason)
            }
        }
    }
}

impl std::error::Error for KdTreeError {}
