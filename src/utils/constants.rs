/// Record layout
pub const NEWLINE: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const DELIMITER: u8 = b';';

/// Initial number of bytes inspected past a target offset when looking
/// for the next line terminator. Doubled until a terminator or EOF is hit.
pub const BOUNDARY_PROBE_LEN: u64 = 256;

/// Mapping alignment used where the platform cannot be queried (64 KiB,
/// the Windows allocation granularity).
pub const FALLBACK_ALLOCATION_GRANULARITY: u64 = 64 * 1024;

/// Processing defaults
pub const DEFAULT_STATION_CAPACITY: usize = 512;
pub const MAX_WORKERS: usize = 1024;

/// Environment variable prefix for settings (e.g. `BRC_WORKERS`)
pub const ENV_PREFIX: &str = "BRC";
