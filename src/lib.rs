//! VP8 raster reconstruction engine
//!
//! This crate implements the pixel-storage model and the prediction
//! algorithms a VP8 decoder uses to rebuild frames: planes, block views,
//! the causal-neighbor accessor, the full intra predictor set of RFC 6386
//! and six-tap sub-pixel motion compensation. Bitstream parsing, residual
//! transforms and loop filtering are external collaborators; this crate
//! produces the baseline pixels they operate on, in place.
//!
//! # Reconstruction order
//!
//! Frames are rebuilt macroblock by macroblock in raster order. A block's
//! predictors only ever read pixels that were reconstructed before it
//! (the row above, the column to the left, earlier sub-blocks of the same
//! macroblock), so reconstruction is deterministic and sequential per
//! frame.
//!
//! ```
//! use zenraster::{AboveRight, MacroblockMode, Neighbors, Raster};
//!
//! let mut raster = Raster::new(64, 48)?;
//! raster.for_each_macroblock_mut(|raster, mbx, mby| {
//!     // Phase one: resolve every causal neighbor into a value.
//!     let nb = Neighbors::gather(raster.y(), mbx * 16, mby * 16, 16, AboveRight::Replicate);
//!     // Phase two: fill the block in place.
//!     let mut mb = raster.macroblock_mut(mbx, mby);
//!     mb.y.intra_predict(MacroblockMode::DC, &nb);
//! });
//! # Ok::<(), zenraster::RasterError>(())
//! ```
//!
//! # no_std Support
//!
//! The engine works in `no_std` environments (requires `alloc`):
//! ```toml
//! [dependencies]
//! zenraster = { version = "...", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

pub mod error;
pub mod motion;
pub mod plane;
pub mod prediction;
pub mod raster;

pub use error::RasterError;
pub use motion::MotionVector;
pub use plane::{Block, BlockMut, EdgeExtended, Plane};
pub use prediction::{AboveRight, MacroblockMode, Neighbors, SubblockMode};
pub use raster::{Macroblock, MacroblockMut, Raster};
