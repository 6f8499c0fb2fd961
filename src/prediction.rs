//! Causal neighbor gathering and the VP8 intra predictor set.
//!
//! Every predictor fills a whole block from neighbor pixels alone. The
//! edge cases live in [`Neighbors`]: at the frame's top row the above
//! pixels and the corner read as the synthetic constant 127, in the
//! leftmost column the left pixels and the corner read as 129, and the
//! above-right extension needed by the 4x4 diagonal modes is resolved up
//! front by an [`AboveRight`] policy. With neighbors reduced to a value
//! first, every predictor can assume they are always available and the
//! block can then be borrowed mutably and filled in place.
//!
//! The arithmetic is the normative one from RFC 6386; any deviation
//! desyncs reconstruction from real encoders.

use crate::plane::{BlockMut, Plane, BLOCK_SIZES};

/// Synthetic above-row value used on the frame's top row.
pub const TOP_EDGE_PIXEL: u8 = 127;
/// Synthetic left-column value used in the frame's leftmost column.
pub const LEFT_EDGE_PIXEL: u8 = 129;

#[inline]
pub(crate) fn clamp255(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

fn avg3(left: u8, this: u8, right: u8) -> u8 {
    let avg = (u16::from(left) + 2 * u16::from(this) + u16::from(right) + 2) >> 2;
    avg as u8
}

fn avg2(this: u8, right: u8) -> u8 {
    let avg = (u16::from(this) + u16::from(right) + 1) >> 1;
    avg as u8
}

/// Prediction modes for whole 16x16 luma and 8x8 chroma blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroblockMode {
    /// Average of the real above and left neighbors, 128 when neither side exists.
    DC,
    /// Copy the above row downward.
    V,
    /// Copy the left column rightward.
    H,
    /// `above + left - corner`, clamped to `[0, 255]`.
    TM,
}

/// Prediction modes for 4x4 luma sub-blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubblockMode {
    /// Fixed-divisor average of the above and left neighbor rows.
    DC,
    /// `above + left - corner`, clamped to `[0, 255]`.
    TM,
    /// Vertical, smoothed with the corner and above-right pixel.
    VE,
    /// Horizontal, smoothed with the corner.
    HE,
    /// Left-down diagonal.
    LD,
    /// Right-down diagonal.
    RD,
    /// Vertical-right diagonal.
    VR,
    /// Vertical-left diagonal.
    VL,
    /// Horizontal-down diagonal.
    HD,
    /// Horizontal-up diagonal.
    HU,
}

/// How to resolve the above-right extension when gathering neighbors.
///
/// The extension is real pixel data only when the block to the upper
/// right has already been reconstructed; the enclosing macroblock logic
/// knows this, the plane does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AboveRight {
    /// Read the pixels right of the above row from the plane, replicating
    /// the last in-frame pixel past the right edge.
    FromFrame,
    /// Replicate the last above-row pixel across the extension.
    Replicate,
}

/// The causal neighbor pixels of one block, captured as a value.
///
/// `gather` performs all edge-case synthesis so the predictors never
/// branch on frame position.
#[derive(Debug, Clone)]
pub struct Neighbors {
    above: [u8; 16],
    left: [u8; 16],
    east: [u8; 4],
    corner: u8,
    size: usize,
    has_above: bool,
    has_left: bool,
}

impl Neighbors {
    /// Captures the neighbors of the `size`x`size` block at `(x0, y0)`.
    ///
    /// Must run before the block itself is borrowed for writing, and
    /// after every block it reads has been fully reconstructed.
    pub fn gather(
        plane: &Plane,
        x0: usize,
        y0: usize,
        size: usize,
        above_right: AboveRight,
    ) -> Self {
        assert!(BLOCK_SIZES.contains(&size));
        let has_above = y0 > 0;
        let has_left = x0 > 0;

        let mut above = [TOP_EDGE_PIXEL; 16];
        let mut left = [LEFT_EDGE_PIXEL; 16];
        let mut east = [TOP_EDGE_PIXEL; 4];

        if has_above {
            let src = plane.row(y0 - 1);
            above[..size].copy_from_slice(&src[x0..x0 + size]);

            match above_right {
                AboveRight::FromFrame => {
                    let avail = plane.width().saturating_sub(x0 + size).min(4);
                    east[..avail].copy_from_slice(&src[x0 + size..x0 + size + avail]);
                    let last = if avail > 0 {
                        src[x0 + size + avail - 1]
                    } else {
                        above[size - 1]
                    };
                    east[avail..].fill(last);
                }
                AboveRight::Replicate => east.fill(above[size - 1]),
            }
        }

        if has_left {
            for (row, value) in left[..size].iter_mut().enumerate() {
                *value = plane.at(x0 - 1, y0 + row);
            }
        }

        let corner = if !has_above {
            TOP_EDGE_PIXEL
        } else if !has_left {
            LEFT_EDGE_PIXEL
        } else {
            plane.at(x0 - 1, y0 - 1)
        };

        Neighbors {
            above,
            left,
            east,
            corner,
            size,
            has_above,
            has_left,
        }
    }

    /// Pixel above column `i`; `-1` is the corner, `size` the first
    /// above-right pixel.
    pub fn above(&self, i: isize) -> u8 {
        if i < 0 {
            self.corner
        } else if (i as usize) < self.size {
            self.above[i as usize]
        } else {
            self.east[i as usize - self.size]
        }
    }

    /// Pixel left of row `i`; `-1` is the corner. Panics past
    /// `size - 1`, like block access does.
    pub fn left(&self, i: isize) -> u8 {
        if i < 0 {
            self.corner
        } else {
            assert!((i as usize) < self.size);
            self.left[i as usize]
        }
    }

    /// `i`-th pixel of the above-right extension, `i < 4`.
    pub fn east(&self, i: usize) -> u8 {
        self.east[i]
    }

    /// Whether the block has a real above row (not the frame's top edge).
    pub fn has_above(&self) -> bool {
        self.has_above
    }

    /// Whether the block has a real left column (not the frame's left edge).
    pub fn has_left(&self) -> bool {
        self.has_left
    }
}

impl<'a> BlockMut<'a> {
    /// Fills the block with a macroblock-level intra prediction.
    pub fn intra_predict(&mut self, mode: MacroblockMode, neighbors: &Neighbors) {
        match mode {
            MacroblockMode::DC => dc_predict(self, neighbors),
            MacroblockMode::V => vertical_predict(self, neighbors),
            MacroblockMode::H => horizontal_predict(self, neighbors),
            MacroblockMode::TM => true_motion_predict(self, neighbors),
        }
    }

    /// Fills the block with a 4x4 sub-block intra prediction. The
    /// diagonal modes are defined for 4x4 blocks only and panic on other
    /// sizes.
    pub fn intra_predict_sub(&mut self, mode: SubblockMode, neighbors: &Neighbors) {
        match mode {
            SubblockMode::DC => dc_predict_simple(self, neighbors),
            SubblockMode::TM => true_motion_predict(self, neighbors),
            SubblockMode::VE => vertical_smoothed_predict(self, neighbors),
            SubblockMode::HE => horizontal_smoothed_predict(self, neighbors),
            SubblockMode::LD => left_down_predict(self, neighbors),
            SubblockMode::RD => right_down_predict(self, neighbors),
            SubblockMode::VR => vertical_right_predict(self, neighbors),
            SubblockMode::VL => vertical_left_predict(self, neighbors),
            SubblockMode::HD => horizontal_down_predict(self, neighbors),
            SubblockMode::HU => horizontal_up_predict(self, neighbors),
        }
    }

    /// Adds a dequantized 4x4 residual to the `(i, j)` sub-block tile,
    /// saturating to `[0, 255]`. The downstream half of reconstruction;
    /// prediction must already have run.
    pub fn add_residue(&mut self, coeffs: &[i32; 16], i: usize, j: usize) {
        assert!((i + 1) * 4 <= self.size() && (j + 1) * 4 <= self.size());
        for (r, coeff_row) in coeffs.chunks(4).enumerate() {
            let row = &mut self.row_mut(j * 4 + r)[i * 4..][..4];
            for (p, &a) in row.iter_mut().zip(coeff_row) {
                *p = (a + i32::from(*p)).clamp(0, 255) as u8;
            }
        }
    }
}

/// Neighbor-count-aware DC: the divisor follows how many real sides
/// contribute; 128 when there are none. Used at macroblock level.
fn dc_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    let size = block.size();
    let mut sum = 0u32;
    let mut shf = size.trailing_zeros() - 1;

    if nb.has_left() {
        for row in 0..size {
            sum += u32::from(nb.left(row as isize));
        }
        shf += 1;
    }

    if nb.has_above() {
        for column in 0..size {
            sum += u32::from(nb.above(column as isize));
        }
        shf += 1;
    }

    let dcval = if !nb.has_left() && !nb.has_above() {
        128u8
    } else {
        ((sum + (1 << (shf - 1))) >> shf) as u8
    };

    for row in 0..size {
        block.row_mut(row).fill(dcval);
    }
}

/// Fixed-divisor DC over the synthetic-or-real neighbor values. Used for
/// 4x4 sub-blocks.
fn dc_predict_simple(block: &mut BlockMut<'_>, nb: &Neighbors) {
    let size = block.size();
    let mut sum = size as u32;
    for i in 0..size {
        sum += u32::from(nb.above(i as isize)) + u32::from(nb.left(i as isize));
    }
    let dcval = (sum >> (2 * size).trailing_zeros()) as u8;

    for row in 0..size {
        block.row_mut(row).fill(dcval);
    }
}

fn vertical_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    let size = block.size();
    let mut top = [0u8; 16];
    for (column, value) in top[..size].iter_mut().enumerate() {
        *value = nb.above(column as isize);
    }
    for row in 0..size {
        block.row_mut(row).copy_from_slice(&top[..size]);
    }
}

fn horizontal_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    let size = block.size();
    for row in 0..size {
        block.row_mut(row).fill(nb.left(row as isize));
    }
}

fn true_motion_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    let size = block.size();
    let corner = i32::from(nb.above(-1));
    for row in 0..size {
        let left_minus_corner = i32::from(nb.left(row as isize)) - corner;
        for column in 0..size {
            let value = left_minus_corner + i32::from(nb.above(column as isize));
            block.put(column, row, clamp255(value));
        }
    }
}

fn vertical_smoothed_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    let size = block.size();
    let mut top = [0u8; 16];
    for (column, value) in top[..size].iter_mut().enumerate() {
        let c = column as isize;
        *value = avg3(nb.above(c - 1), nb.above(c), nb.above(c + 1));
    }
    for row in 0..size {
        block.row_mut(row).copy_from_slice(&top[..size]);
    }
}

fn horizontal_smoothed_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    let size = block.size();
    for row in 0..size {
        let r = row as isize;
        // The bottom row reuses its own left pixel as the third tap.
        let below = r.min(size as isize - 2) + 1;
        let value = avg3(nb.left(r - 1), nb.left(r), nb.left(below));
        block.row_mut(row).fill(value);
    }
}

/// The ordered edge sequence shared by the RD, VR and HD modes: left
/// column bottom-to-top, the corner, then the above row.
fn edge_sequence(nb: &Neighbors) -> [u8; 9] {
    [
        nb.left(3),
        nb.left(2),
        nb.left(1),
        nb.left(0),
        nb.above(-1),
        nb.above(0),
        nb.above(1),
        nb.above(2),
        nb.above(3),
    ]
}

/// The above row extended by the above-right pixels, as used by the LD,
/// VL and VR modes.
fn top_sequence(nb: &Neighbors) -> [u8; 8] {
    [
        nb.above(0),
        nb.above(1),
        nb.above(2),
        nb.above(3),
        nb.east(0),
        nb.east(1),
        nb.east(2),
        nb.east(3),
    ]
}

fn left_down_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    assert_eq!(block.size(), 4);
    let [a0, a1, a2, a3, a4, a5, a6, a7] = top_sequence(nb);

    let avgs = [
        avg3(a0, a1, a2),
        avg3(a1, a2, a3),
        avg3(a2, a3, a4),
        avg3(a3, a4, a5),
        avg3(a4, a5, a6),
        avg3(a5, a6, a7),
        avg3(a6, a7, a7),
    ];

    for row in 0..4 {
        block.row_mut(row).copy_from_slice(&avgs[row..row + 4]);
    }
}

fn right_down_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    assert_eq!(block.size(), 4);
    let [e0, e1, e2, e3, e4, e5, e6, e7, e8] = edge_sequence(nb);

    let avgs = [
        avg3(e0, e1, e2),
        avg3(e1, e2, e3),
        avg3(e2, e3, e4),
        avg3(e3, e4, e5),
        avg3(e4, e5, e6),
        avg3(e5, e6, e7),
        avg3(e6, e7, e8),
    ];

    for row in 0..4 {
        block.row_mut(row).copy_from_slice(&avgs[3 - row..7 - row]);
    }
}

fn vertical_right_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    assert_eq!(block.size(), 4);
    let [_, e1, e2, e3, e4, e5, e6, e7, e8] = edge_sequence(nb);

    block.put(0, 3, avg3(e1, e2, e3));
    block.put(0, 2, avg3(e2, e3, e4));
    block.put(1, 3, avg3(e3, e4, e5));
    block.put(0, 1, avg3(e3, e4, e5));
    block.put(1, 2, avg2(e4, e5));
    block.put(0, 0, avg2(e4, e5));
    block.put(2, 3, avg3(e4, e5, e6));
    block.put(1, 1, avg3(e4, e5, e6));
    block.put(2, 2, avg2(e5, e6));
    block.put(1, 0, avg2(e5, e6));
    block.put(3, 3, avg3(e5, e6, e7));
    block.put(2, 1, avg3(e5, e6, e7));
    block.put(3, 2, avg2(e6, e7));
    block.put(2, 0, avg2(e6, e7));
    block.put(3, 1, avg3(e6, e7, e8));
    block.put(3, 0, avg2(e7, e8));
}

fn vertical_left_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    assert_eq!(block.size(), 4);
    let [a0, a1, a2, a3, a4, a5, a6, a7] = top_sequence(nb);

    block.put(0, 0, avg2(a0, a1));
    block.put(0, 1, avg3(a0, a1, a2));
    block.put(0, 2, avg2(a1, a2));
    block.put(1, 0, avg2(a1, a2));
    block.put(1, 1, avg3(a1, a2, a3));
    block.put(0, 3, avg3(a1, a2, a3));
    block.put(1, 2, avg2(a2, a3));
    block.put(2, 0, avg2(a2, a3));
    block.put(1, 3, avg3(a2, a3, a4));
    block.put(2, 1, avg3(a2, a3, a4));
    block.put(2, 2, avg2(a3, a4));
    block.put(3, 0, avg2(a3, a4));
    block.put(2, 3, avg3(a3, a4, a5));
    block.put(3, 1, avg3(a3, a4, a5));
    block.put(3, 2, avg3(a4, a5, a6));
    block.put(3, 3, avg3(a5, a6, a7));
}

fn horizontal_down_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    assert_eq!(block.size(), 4);
    let [e0, e1, e2, e3, e4, e5, e6, e7, _] = edge_sequence(nb);

    block.put(0, 3, avg2(e0, e1));
    block.put(1, 3, avg3(e0, e1, e2));
    block.put(0, 2, avg2(e1, e2));
    block.put(2, 3, avg2(e1, e2));
    block.put(1, 2, avg3(e1, e2, e3));
    block.put(3, 3, avg3(e1, e2, e3));
    block.put(2, 2, avg2(e2, e3));
    block.put(0, 1, avg2(e2, e3));
    block.put(3, 2, avg3(e2, e3, e4));
    block.put(1, 1, avg3(e2, e3, e4));
    block.put(2, 1, avg2(e3, e4));
    block.put(0, 0, avg2(e3, e4));
    block.put(3, 1, avg3(e3, e4, e5));
    block.put(1, 0, avg3(e3, e4, e5));
    block.put(2, 0, avg3(e4, e5, e6));
    block.put(3, 0, avg3(e5, e6, e7));
}

fn horizontal_up_predict(block: &mut BlockMut<'_>, nb: &Neighbors) {
    assert_eq!(block.size(), 4);
    let (l0, l1, l2, l3) = (nb.left(0), nb.left(1), nb.left(2), nb.left(3));

    block.put(0, 0, avg2(l0, l1));
    block.put(1, 0, avg3(l0, l1, l2));
    block.put(2, 0, avg2(l1, l2));
    block.put(0, 1, avg2(l1, l2));
    block.put(3, 0, avg3(l1, l2, l3));
    block.put(1, 1, avg3(l1, l2, l3));
    block.put(2, 1, avg2(l2, l3));
    block.put(0, 2, avg2(l2, l3));
    block.put(3, 1, avg3(l2, l3, l3));
    block.put(1, 2, avg3(l2, l3, l3));
    block.put(2, 2, l3);
    block.put(3, 2, l3);
    block.put(0, 3, l3);
    block.put(1, 3, l3);
    block.put(2, 3, l3);
    block.put(3, 3, l3);
}
