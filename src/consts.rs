//! Default settings and numeric constants

/// Seed used when the caller does not pick one
pub const DEFAULT_RANDOM_SEED: u64 = 1983;
/// Number of iterations between progress messages
pub const DEFAULT_MESSAGE_INTERVAL: usize = 100;
/// Number of iterations between stored samples after burn-in
pub const DEFAULT_SPACING: usize = 1;
/// Maximum distance a count table entry may fall below its smoothing floor
/// before it is considered a negative count. Entries are always the floor
/// plus a whole number, so anything past half a count is a defect.
pub const COUNT_FLOOR_TOL: f64 = 0.5;
