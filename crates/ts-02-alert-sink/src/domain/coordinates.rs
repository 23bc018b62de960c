//! Integer encoding of coordinates for the ledger.
//!
//! One policy for every call path: multiply by the scale and truncate toward
//! zero. With the default scale of 1 the ledger stores whole degrees.

use serde::{Deserialize, Serialize};
use shared_types::Coordinates;

/// Scale-and-truncate coordinate encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateEncoding {
    scale: u32,
}

impl Default for CoordinateEncoding {
    fn default() -> Self {
        Self { scale: 1 }
    }
}

impl CoordinateEncoding {
    /// A zero scale is treated as 1.
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn encode_degrees(&self, value: f64) -> i64 {
        (value * f64::from(self.scale)).trunc() as i64
    }

    /// Encode a fix as (lat, lon). An unknown position encodes as (0, 0).
    pub fn encode(&self, position: Option<Coordinates>) -> (i64, i64) {
        match position {
            Some(p) => (
                self.encode_degrees(p.latitude),
                self.encode_degrees(p.longitude),
            ),
            None => (0, 0),
        }
    }
}
