//! Rendering-surface collaborators.
//!
//! The rendering layer owns the visible surface and the trash target; core
//! only queries them at the moment a constraint or collision is evaluated.

use crate::model::geometry::{Rect, Size};

/// Live size of the visible interaction surface.
///
/// Implementations must answer with the current size on every call; core
/// never caches the result between operations.
pub trait ViewportProvider {
    fn viewport_size(&self) -> Size;
}

/// Current bounding rectangle of the delete target.
///
/// `None` means the target is not mounted, so nothing is trashed.
pub trait TrashRegionProvider {
    fn trash_region(&self) -> Option<Rect>;
}

/// Viewport with a constant size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedViewport(pub Size);

impl ViewportProvider for FixedViewport {
    fn viewport_size(&self) -> Size {
        self.0
    }
}

/// Trash target at a constant position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTrashRegion(pub Option<Rect>);

impl FixedTrashRegion {
    /// Trash button anchored to the bottom-right corner of `viewport`.
    ///
    /// Matches the default layout: a 48px square inset by 12px.
    pub fn bottom_right(viewport: Size) -> Self {
        const SIDE: f64 = 48.0;
        const INSET: f64 = 12.0;
        Self(Some(Rect::new(
            viewport.width - INSET - SIDE,
            viewport.height - INSET - SIDE,
            SIDE,
            SIDE,
        )))
    }
}

impl TrashRegionProvider for FixedTrashRegion {
    fn trash_region(&self) -> Option<Rect> {
        self.0
    }
}
