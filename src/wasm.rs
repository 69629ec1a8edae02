//! Bindings for use from JavaScript.

use wasm_bindgen::prelude::*;

use crate::cell::Mode;

/// Length of the longest hike across `trails`, or `undefined` if the finish is unreachable.
///
/// Throws an `Error` if the map is malformed or has too many junctions.
#[wasm_bindgen(js_name = longestHike)]
pub fn longest_hike(trails: &str, slippery: bool) -> Result<Option<u32>, js_sys::Error> {
    let mode = if slippery { Mode::Slippery } else { Mode::Dry };
    crate::solve(trails, mode).map_err(|failure| js_sys::Error::new(&failure.to_string()))
}
