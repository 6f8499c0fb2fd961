//! Frame-level composition: Y/U/V planes, macroblock views and the
//! raster-order reconstruction contract.
//!
//! A [`Raster`] owns the three component planes of one frame, sized to
//! the display dimensions rounded up to whole macroblocks (4:2:0
//! subsampling: luma in 16-pixel steps, chroma in 8). Macroblocks are
//! never allocated; they are computed views over the planes.

use crate::error::RasterError;
use crate::plane::{Block, BlockMut, Plane};

/// One frame's pixel storage: luma plus two chroma planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    y: Plane,
    u: Plane,
    v: Plane,
    display_width: usize,
    display_height: usize,
    macroblock_cols: usize,
    macroblock_rows: usize,
}

impl Raster {
    /// Allocates planes for a frame of the given display size, rounded
    /// up to the macroblock grid. Fails if either dimension is zero.
    pub fn new(display_width: usize, display_height: usize) -> Result<Self, RasterError> {
        if display_width == 0 || display_height == 0 {
            return Err(RasterError::EmptyPlane {
                width: display_width,
                height: display_height,
            });
        }
        let macroblock_cols = Self::macroblock_dimension(display_width);
        let macroblock_rows = Self::macroblock_dimension(display_height);
        Ok(Raster {
            y: Plane::new_aligned(macroblock_cols * 16, macroblock_rows * 16, 16)?,
            u: Plane::new_aligned(macroblock_cols * 8, macroblock_rows * 8, 8)?,
            v: Plane::new_aligned(macroblock_cols * 8, macroblock_rows * 8, 8)?,
            display_width,
            display_height,
            macroblock_cols,
            macroblock_rows,
        })
    }

    /// Number of macroblocks covering `num` pixels.
    pub const fn macroblock_dimension(num: usize) -> usize {
        (num + 15) / 16
    }

    /// The luma plane.
    pub fn y(&self) -> &Plane {
        &self.y
    }

    /// The luma plane, mutably.
    pub fn y_mut(&mut self) -> &mut Plane {
        &mut self.y
    }

    /// The first chroma plane.
    pub fn u(&self) -> &Plane {
        &self.u
    }

    /// The first chroma plane, mutably.
    pub fn u_mut(&mut self) -> &mut Plane {
        &mut self.u
    }

    /// The second chroma plane.
    pub fn v(&self) -> &Plane {
        &self.v
    }

    /// The second chroma plane, mutably.
    pub fn v_mut(&mut self) -> &mut Plane {
        &mut self.v
    }

    /// Display width in pixels (may be less than the luma plane width).
    pub fn display_width(&self) -> usize {
        self.display_width
    }

    /// Display height in pixels (may be less than the luma plane height).
    pub fn display_height(&self) -> usize {
        self.display_height
    }

    /// Macroblock grid width.
    pub fn macroblock_cols(&self) -> usize {
        self.macroblock_cols
    }

    /// Macroblock grid height.
    pub fn macroblock_rows(&self) -> usize {
        self.macroblock_rows
    }

    /// A shared view of the macroblock at grid position `(column, row)`.
    /// Panics outside the grid.
    pub fn macroblock(&self, column: usize, row: usize) -> Macroblock<'_> {
        assert!(column < self.macroblock_cols && row < self.macroblock_rows);
        // In bounds by construction: the planes are whole multiples of
        // the macroblock size.
        Macroblock {
            y: self.y.block(column * 16, row * 16, 16).unwrap(),
            u: self.u.block(column * 8, row * 8, 8).unwrap(),
            v: self.v.block(column * 8, row * 8, 8).unwrap(),
        }
    }

    /// An exclusive view of the macroblock at grid position
    /// `(column, row)` for in-place reconstruction. Panics outside the
    /// grid.
    pub fn macroblock_mut(&mut self, column: usize, row: usize) -> MacroblockMut<'_> {
        assert!(column < self.macroblock_cols && row < self.macroblock_rows);
        MacroblockMut {
            y: self.y.block_mut(column * 16, row * 16, 16).unwrap(),
            u: self.u.block_mut(column * 8, row * 8, 8).unwrap(),
            v: self.v.block_mut(column * 8, row * 8, 8).unwrap(),
        }
    }

    /// Visits every macroblock exactly once in raster order (row-major,
    /// columns innermost), passing the view and its grid coordinates.
    /// This is the canonical reconstruction-order contract.
    pub fn for_each_macroblock<F>(&self, mut f: F)
    where
        F: FnMut(Macroblock<'_>, usize, usize),
    {
        for row in 0..self.macroblock_rows {
            for column in 0..self.macroblock_cols {
                f(self.macroblock(column, row), column, row);
            }
        }
    }

    /// Raster-order iteration for reconstruction. The callback receives
    /// the raster itself plus the grid coordinates so it can gather
    /// causal neighbors from the planes before mutating the current
    /// macroblock.
    pub fn for_each_macroblock_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Raster, usize, usize),
    {
        for row in 0..self.macroblock_rows {
            for column in 0..self.macroblock_cols {
                f(&mut *self, column, row);
            }
        }
    }
}

/// A shared macroblock view: one 16x16 luma block, two 8x8 chroma
/// blocks and their 4x4 tilings. Owns no pixels.
#[derive(Debug)]
pub struct Macroblock<'a> {
    /// The 16x16 luma block.
    pub y: Block<'a>,
    /// The 8x8 first-chroma block.
    pub u: Block<'a>,
    /// The 8x8 second-chroma block.
    pub v: Block<'a>,
}

impl<'a> Macroblock<'a> {
    /// The `(i, j)` tile of the luma 4x4 grid, `i, j < 4`.
    pub fn y_sub(&self, i: usize, j: usize) -> Block<'a> {
        self.y.sub_block(i, j, 4)
    }

    /// The `(i, j)` tile of the first-chroma 2x2 grid, `i, j < 2`.
    pub fn u_sub(&self, i: usize, j: usize) -> Block<'a> {
        self.u.sub_block(i, j, 4)
    }

    /// The `(i, j)` tile of the second-chroma 2x2 grid, `i, j < 2`.
    pub fn v_sub(&self, i: usize, j: usize) -> Block<'a> {
        self.v.sub_block(i, j, 4)
    }
}

/// Equality is defined purely by Y/U/V pixel content, never by the
/// identity of the underlying storage.
impl PartialEq for Macroblock<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.y == other.y && self.u == other.u && self.v == other.v
    }
}

impl Eq for Macroblock<'_> {}

/// An exclusive macroblock view used while reconstructing it in place.
pub struct MacroblockMut<'a> {
    /// The 16x16 luma block.
    pub y: BlockMut<'a>,
    /// The 8x8 first-chroma block.
    pub u: BlockMut<'a>,
    /// The 8x8 second-chroma block.
    pub v: BlockMut<'a>,
}

impl<'a> MacroblockMut<'a> {
    /// The `(i, j)` tile of the luma 4x4 grid, mutably.
    pub fn y_sub_mut(&mut self, i: usize, j: usize) -> BlockMut<'_> {
        self.y.sub_block_mut(i, j, 4)
    }

    /// The `(i, j)` tile of the first-chroma 2x2 grid, mutably.
    pub fn u_sub_mut(&mut self, i: usize, j: usize) -> BlockMut<'_> {
        self.u.sub_block_mut(i, j, 4)
    }

    /// The `(i, j)` tile of the second-chroma 2x2 grid, mutably.
    pub fn v_sub_mut(&mut self, i: usize, j: usize) -> BlockMut<'_> {
        self.v.sub_block_mut(i, j, 4)
    }

    /// A shared view of the same macroblock.
    pub fn as_macroblock(&self) -> Macroblock<'_> {
        Macroblock {
            y: self.y.as_block(),
            u: self.u.as_block(),
            v: self.v.as_block(),
        }
    }
}
