//! Configuration boundary: profile selection, connection parameters and pool sizing.

pub mod params;
pub mod pool;
pub mod profile;
