//! Plane storage, block views and the edge-extended reference wrapper.
//!
//! A [`Plane`] owns one color component's pixels as a flat buffer. Blocks
//! are never allocated on their own: a [`Block`] or [`BlockMut`] is a
//! strided window over the plane's storage, so mutation through a view is
//! immediately visible to every later reader of the same region. A 16x16
//! block tiles exactly into four 8x8 or sixteen 4x4 sub-views with no
//! remainder and no overlap.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::error::RasterError;

/// Block dimensions a plane can hand out views for.
pub const BLOCK_SIZES: [usize; 3] = [4, 8, 16];

/// A single color component's pixel buffer.
///
/// The stride may exceed the width; all row access goes through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    data: Vec<u8>,
    width: usize,
    height: usize,
    stride: usize,
}

impl Plane {
    /// Allocates a zeroed plane. Fails if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, RasterError> {
        Self::new_aligned(width, height, 1)
    }

    /// Allocates a zeroed plane whose dimensions must be multiples of
    /// `align` (16 for luma, 8 for chroma in 4:2:0).
    pub fn new_aligned(width: usize, height: usize, align: usize) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyPlane { width, height });
        }
        if align > 1 && (width % align != 0 || height % align != 0) {
            return Err(RasterError::MisalignedPlane {
                width,
                height,
                align,
            });
        }
        Ok(Plane {
            data: vec![0u8; width * height],
            width,
            height,
            stride: width,
        })
    }

    /// Plane width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Plane height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Reads the pixel at `(column, row)`. Panics when out of bounds.
    pub fn at(&self, column: usize, row: usize) -> u8 {
        assert!(column < self.width && row < self.height);
        self.data[row * self.stride + column]
    }

    /// Writes the pixel at `(column, row)`. Panics when out of bounds.
    pub fn put(&mut self, column: usize, row: usize, value: u8) {
        assert!(column < self.width && row < self.height);
        self.data[row * self.stride + column] = value;
    }

    /// One full row of pixels.
    pub fn row(&self, row: usize) -> &[u8] {
        &self.data[row * self.stride..][..self.width]
    }

    /// One full row of pixels, mutably.
    pub fn row_mut(&mut self, row: usize) -> &mut [u8] {
        let stride = self.stride;
        &mut self.data[row * stride..][..self.width]
    }

    pub(crate) fn data(&self) -> &[u8] {
        &self.data
    }

    fn check_block(&self, x0: usize, y0: usize, size: usize) -> Result<(), RasterError> {
        if !BLOCK_SIZES.contains(&size) {
            return Err(RasterError::UnsupportedBlockSize(size));
        }
        if x0 + size > self.width || y0 + size > self.height {
            return Err(RasterError::BlockOutOfBounds {
                x0,
                y0,
                size,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// A shared `size`x`size` view with its top-left pixel at `(x0, y0)`.
    pub fn block(&self, x0: usize, y0: usize, size: usize) -> Result<Block<'_>, RasterError> {
        self.check_block(x0, y0, size)?;
        Ok(Block {
            data: &self.data[y0 * self.stride + x0..],
            stride: self.stride,
            size,
        })
    }

    /// An exclusive `size`x`size` view with its top-left pixel at `(x0, y0)`.
    pub fn block_mut(
        &mut self,
        x0: usize,
        y0: usize,
        size: usize,
    ) -> Result<BlockMut<'_>, RasterError> {
        self.check_block(x0, y0, size)?;
        let stride = self.stride;
        Ok(BlockMut {
            data: &mut self.data[y0 * stride + x0..],
            stride,
            size,
            x0,
            y0,
        })
    }

    /// A boundary-clamped read-only wrapper for out-of-frame sampling.
    pub fn edge_extended(&self) -> EdgeExtended<'_> {
        EdgeExtended { plane: self }
    }
}

/// A shared fixed-size window into a [`Plane`]. Owns no pixels.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    data: &'a [u8],
    stride: usize,
    size: usize,
}

impl<'a> Block<'a> {
    /// Block dimension in pixels (4, 8 or 16).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Reads the pixel at local `(column, row)`. Panics when either
    /// coordinate is not below the block size.
    pub fn at(&self, column: usize, row: usize) -> u8 {
        assert!(column < self.size && row < self.size);
        self.data[row * self.stride + column]
    }

    /// One row of the block's pixels.
    pub fn row(&self, row: usize) -> &'a [u8] {
        assert!(row < self.size);
        &self.data[row * self.stride..][..self.size]
    }

    /// The `(i, j)` tile of the exact sub-block tiling with dimension
    /// `sub_size`. Panics unless `sub_size` divides the block size and the
    /// tile lies inside it.
    pub fn sub_block(&self, i: usize, j: usize, sub_size: usize) -> Block<'a> {
        assert!(BLOCK_SIZES.contains(&sub_size) && self.size % sub_size == 0);
        assert!((i + 1) * sub_size <= self.size && (j + 1) * sub_size <= self.size);
        Block {
            data: &self.data[j * sub_size * self.stride + i * sub_size..],
            stride: self.stride,
            size: sub_size,
        }
    }

    /// Per-pixel signed difference `self - other`, row-major. Pure; used
    /// by analysis and encoding paths.
    pub fn diff(&self, other: &Block<'_>) -> Vec<i16> {
        assert_eq!(self.size, other.size);
        let mut out = Vec::with_capacity(self.size * self.size);
        for row in 0..self.size {
            for (a, b) in self.row(row).iter().zip(other.row(row)) {
                out.push(i16::from(*a) - i16::from(*b));
            }
        }
        out
    }
}

/// Content equality: same dimension and identical pixels.
impl PartialEq for Block<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && (0..self.size).all(|r| self.row(r) == other.row(r))
    }
}

impl Eq for Block<'_> {}

/// Dumps the block's pixels comma-separated in row-major order.
impl fmt::Display for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for column in 0..self.size {
                if row + column > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.at(column, row))?;
            }
        }
        Ok(())
    }
}

/// An exclusive fixed-size window into a [`Plane`], used to fill a block's
/// baseline pixels in place during reconstruction.
#[derive(Debug)]
pub struct BlockMut<'a> {
    data: &'a mut [u8],
    stride: usize,
    size: usize,
    x0: usize,
    y0: usize,
}

impl<'a> BlockMut<'a> {
    /// Block dimension in pixels (4, 8 or 16).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The block's origin column in its plane.
    pub fn x0(&self) -> usize {
        self.x0
    }

    /// The block's origin row in its plane.
    pub fn y0(&self) -> usize {
        self.y0
    }

    /// Reads the pixel at local `(column, row)`. Panics when either
    /// coordinate is not below the block size.
    pub fn at(&self, column: usize, row: usize) -> u8 {
        assert!(column < self.size && row < self.size);
        self.data[row * self.stride + column]
    }

    /// Writes the pixel at local `(column, row)`. Panics when either
    /// coordinate is not below the block size.
    pub fn put(&mut self, column: usize, row: usize, value: u8) {
        assert!(column < self.size && row < self.size);
        self.data[row * self.stride + column] = value;
    }

    /// One row of the block's pixels.
    pub fn row(&self, row: usize) -> &[u8] {
        assert!(row < self.size);
        &self.data[row * self.stride..][..self.size]
    }

    /// One row of the block's pixels, mutably.
    pub fn row_mut(&mut self, row: usize) -> &mut [u8] {
        assert!(row < self.size);
        &mut self.data[row * self.stride..][..self.size]
    }

    /// A shared view of the same window.
    pub fn as_block(&self) -> Block<'_> {
        Block {
            data: &self.data[..],
            stride: self.stride,
            size: self.size,
        }
    }

    /// The `(i, j)` tile of the exact sub-block tiling with dimension
    /// `sub_size`, reborrowed mutably. Panics unless `sub_size` divides
    /// the block size and the tile lies inside it.
    pub fn sub_block_mut(&mut self, i: usize, j: usize, sub_size: usize) -> BlockMut<'_> {
        assert!(BLOCK_SIZES.contains(&sub_size) && self.size % sub_size == 0);
        assert!((i + 1) * sub_size <= self.size && (j + 1) * sub_size <= self.size);
        let stride = self.stride;
        BlockMut {
            data: &mut self.data[j * sub_size * stride + i * sub_size..],
            stride,
            size: sub_size,
            x0: self.x0 + i * sub_size,
            y0: self.y0 + j * sub_size,
        }
    }
}

/// A read-only wrapper over a reference plane that clamps every sample
/// coordinate to the nearest valid pixel.
///
/// This is the only mechanism by which out-of-frame motion vectors are
/// made safe; it never fails.
pub struct EdgeExtended<'a> {
    plane: &'a Plane,
}

impl EdgeExtended<'_> {
    /// Samples `(column, row)`, replicating the nearest edge pixel when
    /// the coordinate falls outside the plane.
    pub fn at(&self, column: isize, row: isize) -> u8 {
        let bounded_column = column.clamp(0, self.plane.width() as isize - 1) as usize;
        let bounded_row = row.clamp(0, self.plane.height() as isize - 1) as usize;
        self.plane.at(bounded_column, bounded_row)
    }
}
