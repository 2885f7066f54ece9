//! Catch detection
//!
//! A drop is caught when its horizontal extent overlaps the catcher's and
//! its vertical extent has entered the catch band just above the floor.
//! Axis-aligned interval tests only; drop positions are top-left corners.

use crate::consts::{CATCH_BAND_HEIGHT, PLAYFIELD_HEIGHT};

use super::state::{Catcher, Drop};

/// True if the drop's horizontal extent overlaps the catcher's
pub fn horizontal_overlap(drop: &Drop, catcher: &Catcher) -> bool {
    let size = drop.size.diameter();
    drop.pos.x + size > catcher.x - catcher.half_width()
        && drop.pos.x < catcher.x + catcher.half_width()
}

/// True if the drop's vertical extent is inside the catch band
/// (bottom edge below the band top, top edge above the floor)
pub fn in_catch_band(drop: &Drop) -> bool {
    let size = drop.size.diameter();
    drop.pos.y + size > PLAYFIELD_HEIGHT - CATCH_BAND_HEIGHT && drop.pos.y < PLAYFIELD_HEIGHT
}

/// Full catch test: band and overlap together
pub fn is_caught(drop: &Drop, catcher: &Catcher) -> bool {
    horizontal_overlap(drop, catcher) && in_catch_band(drop)
}
