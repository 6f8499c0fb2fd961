//! Inter prediction: six-tap sub-pixel motion compensation.
//!
//! A block's baseline pixels are sampled from a reference plane at a
//! motion-vector offset. The fractional part of the vector selects one of
//! eight fixed six-tap kernels, applied separably: a horizontal pass into
//! a clamped intermediate, then a vertical pass. A zero fraction on an
//! axis skips that pass entirely; a fully integer vector is a plain copy.
//!
//! Two sampling paths feed the same kernel. The direct path indexes the
//! reference storage when the whole filter support window is in bounds,
//! which is the common case and the dominant cost of inter-frame
//! decoding. Near frame borders the support window is first materialized
//! through the edge-extended view, so out-of-frame vectors are always
//! defined and never an error.

use crate::plane::{BlockMut, Plane};
use crate::prediction::clamp255;

/// A block motion vector in eighth-pel units.
///
/// Luma vectors carry quarter-pel precision and are therefore always
/// even in these units; chroma vectors are derived averages and use the
/// full eighth-pel range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionVector {
    /// Horizontal displacement, eighth-pels.
    pub x: i16,
    /// Vertical displacement, eighth-pels.
    pub y: i16,
}

impl MotionVector {
    /// A vector of `(x, y)` eighth-pels.
    pub const fn new(x: i16, y: i16) -> Self {
        MotionVector { x, y }
    }
}

/// The normative six-tap kernels, indexed by the eighth-pel fraction.
/// Tap sums are 128; both passes round with `(acc + 64) >> 7`.
const SIXTAP_FILTERS: [[i32; 6]; 8] = [
    [0, 0, 128, 0, 0, 0],
    [0, -6, 123, 12, -1, 0],
    [2, -11, 108, 36, -8, 1],
    [0, -9, 93, 50, -6, 0],
    [3, -16, 77, 77, -16, 3],
    [0, -6, 50, 93, -9, 0],
    [1, -8, 36, 108, -11, 2],
    [0, -1, 12, 123, -6, 0],
];

/// Filter taps reaching before the base sample.
const EDGE_PRE: usize = 2;
/// Filter taps reaching past the base sample.
const EDGE_POST: usize = 3;
/// Stride of the clamped gather window and the two-pass intermediate:
/// a 16-pixel block plus the filter support.
const TMP_STRIDE: usize = 16 + EDGE_PRE + EDGE_POST;

fn sixtap(src: &[u8], off: usize, step: usize, frac: usize) -> u8 {
    let filt = &SIXTAP_FILTERS[frac];
    let mut acc = 64i32;
    for (k, tap) in filt.iter().enumerate() {
        acc += i32::from(src[off + k * step]) * tap;
    }
    clamp255(acc >> 7)
}

/// Runs the separable kernel over a support window whose origin is
/// `(EDGE_PRE, EDGE_PRE)` above-left of the base sample position.
fn filter_window(dst: &mut BlockMut<'_>, src: &[u8], sstride: usize, fx: usize, fy: usize) {
    let size = dst.size();

    if fx == 0 && fy == 0 {
        for row in 0..size {
            let off = (row + EDGE_PRE) * sstride + EDGE_PRE;
            dst.row_mut(row).copy_from_slice(&src[off..off + size]);
        }
    } else if fy == 0 {
        for row in 0..size {
            let base = (row + EDGE_PRE) * sstride;
            for column in 0..size {
                dst.put(column, row, sixtap(src, base + column, 1, fx));
            }
        }
    } else if fx == 0 {
        for row in 0..size {
            for column in 0..size {
                let off = row * sstride + column + EDGE_PRE;
                dst.put(column, row, sixtap(src, off, sstride, fy));
            }
        }
    } else {
        // Horizontal pass over every row the vertical taps will touch,
        // then the vertical pass over the clamped intermediate.
        let mut tmp = [0u8; TMP_STRIDE * TMP_STRIDE];
        for row in 0..size + EDGE_PRE + EDGE_POST {
            for column in 0..size {
                tmp[row * TMP_STRIDE + column] = sixtap(src, row * sstride + column, 1, fx);
            }
        }
        for row in 0..size {
            for column in 0..size {
                let off = row * TMP_STRIDE + column;
                dst.put(column, row, sixtap(&tmp, off, TMP_STRIDE, fy));
            }
        }
    }
}

impl<'a> BlockMut<'a> {
    /// Fills the block by motion-compensated sampling of `reference` at
    /// this block's own frame position offset by `mv`.
    ///
    /// The reference plane must have this block's geometry (the same
    /// component and subsampling); out-of-frame sampling is resolved by
    /// edge clamping.
    pub fn inter_predict(&mut self, mv: MotionVector, reference: &Plane) {
        let size = self.size() as isize;
        let ref_x = self.x0() as isize + (mv.x >> 3) as isize;
        let ref_y = self.y0() as isize + (mv.y >> 3) as isize;
        let fx = (mv.x & 7) as usize;
        let fy = (mv.y & 7) as usize;

        let fits = ref_x >= EDGE_PRE as isize
            && ref_y >= EDGE_PRE as isize
            && ref_x + size + EDGE_POST as isize <= reference.width() as isize
            && ref_y + size + EDGE_POST as isize <= reference.height() as isize;

        if fits {
            self.inter_predict_direct(reference, ref_x as usize, ref_y as usize, fx, fy);
        } else {
            self.inter_predict_clamped(reference, ref_x, ref_y, fx, fy);
        }
    }

    /// Fast path: the whole support window is in bounds, index the
    /// reference storage directly.
    fn inter_predict_direct(
        &mut self,
        reference: &Plane,
        ref_x: usize,
        ref_y: usize,
        fx: usize,
        fy: usize,
    ) {
        let sstride = reference.stride();
        let off = (ref_y - EDGE_PRE) * sstride + (ref_x - EDGE_PRE);
        filter_window(self, &reference.data()[off..], sstride, fx, fy);
    }

    /// Border path: materialize the support window through the
    /// edge-extended view, then run the identical kernel.
    fn inter_predict_clamped(
        &mut self,
        reference: &Plane,
        ref_x: isize,
        ref_y: isize,
        fx: usize,
        fy: usize,
    ) {
        let span = self.size() + EDGE_PRE + EDGE_POST;
        let edge = reference.edge_extended();
        let mut window = [0u8; TMP_STRIDE * TMP_STRIDE];
        for row in 0..span {
            for column in 0..span {
                window[row * TMP_STRIDE + column] = edge.at(
                    ref_x - EDGE_PRE as isize + column as isize,
                    ref_y - EDGE_PRE as isize + row as isize,
                );
            }
        }
        filter_window(self, &window, TMP_STRIDE, fx, fy);
    }
}
