//! Numeric constants and fixed bounds
//!
//! The bounds mirror the bit widths of the compact identifier so that every
//! valid configuration can also be encoded.

/// Calibration constants `c0, c1, c2` of the minimum-length heuristic
/// `N = 2^(c0 + c1/ln(snr) + c2*ln(1-similarity)/ln(snr))`.
pub const REQUIRED_LENGTH_COEFS: [f64; 3] = [6.0, 0.75, -3.5];

/// Largest filter length (16-bit field).
pub const MAX_LENGTH: usize = 65535;

/// Largest derivative order, kappa, hull order and mu endpoint (4-bit fields,
/// 16-bit derivative mask).
pub const MAX_ORDER: u8 = 15;

/// Snapshot and seed file suffix.
pub const SNAPSHOT_SUFFIX: &str = "zdft";

/// Streaming input file suffix.
pub const INPUT_SUFFIX: &str = "zdfi";

/// Streaming output file suffix.
pub const OUTPUT_SUFFIX: &str = "zdfo";

/// Size in bytes of one persisted sample.
pub const SAMPLE_BYTES: usize = std::mem::size_of::<f32>();
