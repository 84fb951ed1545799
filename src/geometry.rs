//! Bounds and scroll positions carried by views.
//!
//! Layout happens in the host. A view only remembers the rectangle the host
//! last reported for it and how far it has been scrolled; the grid compares
//! the two to tell whether content lies past an edge, and the dispatcher
//! hit-tests mouse presses against the rectangles.

use std::ops::Add;

/// A scroll position, or a scroll delta.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, delta: Offset) -> Offset {
        Offset::new(self.x + delta.x, self.y + delta.y)
    }
}

/// Screen bounds of a view: top-left corner plus size, in cells.
///
/// Right and bottom edges are exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// No bounds reported yet.
    pub const EMPTY: Region = Region::new(0, 0, 0, 0);

    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn left(self) -> i32 {
        self.x
    }

    pub const fn top(self) -> i32 {
        self.y
    }

    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    /// Whether the cell at (`x`, `y`) falls inside. Empty bounds contain
    /// nothing.
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }
}
