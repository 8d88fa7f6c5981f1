//! Taxi zone identifiers.
//!
//! NYC TLC divides the city into 263 pickup zones numbered from 1. Ids 264
//! and 265 appear in raw exports as "unknown" buckets and are not zones.

use std::fmt;

/// Number of valid taxi zones.
pub const TAXI_ZONE_COUNT: i32 = 263;

/// A validated taxi zone id in `1..=263`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneId(i32);

impl ZoneId {
    /// Smallest valid zone id.
    pub const MIN: Self = Self(1);
    /// Largest valid zone id.
    pub const MAX: Self = Self(TAXI_ZONE_COUNT);

    /// Create a zone id, returning `None` outside `1..=263`.
    pub const fn new(id: i32) -> Option<Self> {
        if id >= 1 && id <= TAXI_ZONE_COUNT {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Raw integer id.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
