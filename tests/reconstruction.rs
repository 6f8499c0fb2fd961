//! End-to-end reconstruction over whole frames: intra-predict a key
//! frame in raster order, then motion-compensate a second frame from it.

use zenraster::{
    AboveRight, MacroblockMode, MotionVector, Neighbors, Plane, Raster, SubblockMode,
};

fn checkerboard(plane: &mut Plane, period: usize) {
    for r in 0..plane.height() {
        for c in 0..plane.width() {
            let v = if (r / period + c / period) % 2 == 0 { 60 } else { 190 };
            plane.put(c, r, v);
        }
    }
}

/// Builds a frame the way a decoder would: every macroblock intra
/// DC-predicted in raster order from already-reconstructed neighbors.
fn dc_key_frame(width: usize, height: usize) -> Raster {
    let mut frame = Raster::new(width, height).unwrap();
    frame.for_each_macroblock_mut(|frame, column, row| {
        let nb = Neighbors::gather(frame.y(), column * 16, row * 16, 16, AboveRight::Replicate);
        let nb_u = Neighbors::gather(frame.u(), column * 8, row * 8, 8, AboveRight::Replicate);
        let nb_v = Neighbors::gather(frame.v(), column * 8, row * 8, 8, AboveRight::Replicate);
        let mut mb = frame.macroblock_mut(column, row);
        mb.y.intra_predict(MacroblockMode::DC, &nb);
        mb.u.intra_predict(MacroblockMode::DC, &nb_u);
        mb.v.intra_predict(MacroblockMode::DC, &nb_v);
    });
    frame
}

#[test]
fn dc_key_frame_is_uniform_128() {
    // With no residuals the DC chain never leaves 128: the first
    // macroblock has no neighbors, every later one averages 128s.
    let frame = dc_key_frame(48, 32);
    frame.for_each_macroblock(|mb, _, _| {
        for r in 0..16 {
            assert_eq!(mb.y.row(r), &[128; 16]);
        }
        for r in 0..8 {
            assert_eq!(mb.u.row(r), &[128; 8]);
            assert_eq!(mb.v.row(r), &[128; 8]);
        }
    });
}

#[test]
fn subblock_reconstruction_with_above_right_policy() {
    // Reconstruct one macroblock's luma 4x4 by 4x4 the way a decoder
    // does. A tile in the rightmost column below the first row must not
    // read pixels to its upper right: they belong to macroblock rows
    // that are reconstructed later.
    let mut frame = Raster::new(64, 64).unwrap();
    checkerboard(frame.y_mut(), 8);

    let (column, row) = (1, 1);
    for sby in 0..4 {
        for sbx in 0..4 {
            let x0 = column * 16 + sbx * 4;
            let y0 = row * 16 + sby * 4;
            let policy = if sbx == 3 && sby > 0 {
                AboveRight::Replicate
            } else {
                AboveRight::FromFrame
            };
            let nb = Neighbors::gather(frame.y(), x0, y0, 4, policy);
            let mut mb = frame.macroblock_mut(column, row);
            let mut sub = mb.y_sub_mut(sbx, sby);
            sub.intra_predict_sub(SubblockMode::LD, &nb);
        }
    }

    // Tile (3, 1) starts at (28, 20). With the replicated extension the
    // left-down diagonal collapses to the last above pixel wherever all
    // three taps fall past the block, so the top-right pixel equals it
    // exactly and its left neighbor smooths toward it.
    let a2 = frame.y().at(30, 19);
    let a3 = frame.y().at(31, 19);
    assert_eq!(frame.y().at(31, 20), a3);
    assert_eq!(frame.y().at(31, 21), a3);
    let smoothed = ((u16::from(a2) + 3 * u16::from(a3) + 2) >> 2) as u8;
    assert_eq!(frame.y().at(30, 20), smoothed);
}

#[test]
fn inter_frame_copies_and_shifts_reference() {
    let mut reference = Raster::new(64, 48).unwrap();
    checkerboard(reference.y_mut(), 4);
    checkerboard(reference.u_mut(), 4);
    checkerboard(reference.v_mut(), 4);

    // Zero vectors: bit-exact copy of the whole reference.
    let mut copied = Raster::new(64, 48).unwrap();
    copied.for_each_macroblock_mut(|frame, column, row| {
        let mut mb = frame.macroblock_mut(column, row);
        mb.y.inter_predict(MotionVector::new(0, 0), reference.y());
        mb.u.inter_predict(MotionVector::new(0, 0), reference.u());
        mb.v.inter_predict(MotionVector::new(0, 0), reference.v());
    });
    assert_eq!(copied.y(), reference.y());
    assert_eq!(copied.u(), reference.u());
    assert_eq!(copied.v(), reference.v());

    // A whole-pel luma shift reproduces the reference at an offset for
    // every interior sample.
    let mut shifted = Raster::new(64, 48).unwrap();
    let mv = MotionVector::new(2 * 8, 8);
    shifted.for_each_macroblock_mut(|frame, column, row| {
        let mut mb = frame.macroblock_mut(column, row);
        mb.y.inter_predict(mv, reference.y());
    });
    for r in 0..47 {
        for c in 0..62 {
            assert_eq!(shifted.y().at(c, r), reference.y().at(c + 2, r + 1));
        }
    }
}

#[test]
fn border_macroblocks_motion_compensate_without_panicking() {
    // Vectors pointing far outside the frame from every border
    // macroblock must resolve through edge clamping.
    let mut reference = Raster::new(48, 48).unwrap();
    checkerboard(reference.y_mut(), 8);

    let mut frame = Raster::new(48, 48).unwrap();
    let vectors = [
        MotionVector::new(-200 * 8, -200 * 8),
        MotionVector::new(200 * 8 + 4, 4),
        MotionVector::new(-3, 200 * 8 + 7),
    ];
    frame.for_each_macroblock_mut(|frame, column, row| {
        let mv = vectors[(row * 3 + column) % vectors.len()];
        let mut mb = frame.macroblock_mut(column, row);
        mb.y.inter_predict(mv, reference.y());
    });

    // A vector far past the bottom-left corner reads only the
    // replicated corner pixel, whatever the fraction.
    let mut far = Raster::new(48, 48).unwrap();
    let mut mb = far.macroblock_mut(0, 0);
    mb.y.inter_predict(MotionVector::new(-200 * 8, 200 * 8), reference.y());
    let corner = reference.y().at(0, 47);
    let mb = far.macroblock(0, 0);
    for r in 0..16 {
        assert_eq!(mb.y.row(r), &[corner; 16]);
    }
}

#[test]
fn residue_completes_prediction() {
    // Prediction then residue addition, the full reconstruction of one
    // 4x4 tile.
    let mut frame = dc_key_frame(32, 32);
    let coeffs: [i32; 16] = [
        12, -3, 0, 0, -3, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    {
        let mut mb = frame.macroblock_mut(0, 0);
        mb.y.add_residue(&coeffs, 1, 2);
    }
    let mb = frame.macroblock(0, 0);
    // Tile (1, 2) starts at pixel (4, 8) inside the macroblock.
    assert_eq!(mb.y.at(4, 8), 140);
    assert_eq!(mb.y.at(5, 8), 125);
    assert_eq!(mb.y.at(4, 9), 125);
    assert_eq!(mb.y.at(5, 9), 129);
    assert_eq!(mb.y.at(6, 10), 128);
}
