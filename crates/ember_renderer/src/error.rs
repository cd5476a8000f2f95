//! Error types for scene construction and rendering.

use thiserror::Error;

/// Errors building a bounding volume hierarchy.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BvhError {
    #[error("cannot build a BVH over an empty object list")]
    Empty,

    #[error("object has no bounding box and cannot be placed in a BVH")]
    MissingBoundingBox,
}

/// Errors building or running a render unit.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("scene construction failed: {0}")]
    Bvh(#[from] BvhError),

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("image has zero width or height")]
    EmptyImage,
}
