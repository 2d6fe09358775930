//! Lending Protocol Constants

/// Basis-point divisor (10000 bps = 100%)
pub const BPS_DIVISOR: u64 = 10_000;

/// Maximum unsupported assets carried in a snapshot.
/// The wallet view shows at most a handful of non-collateral NFTs; the rest
/// are counted but dropped.
pub const MAX_UNSUPPORTED_ASSETS: usize = 9;

/// Seconds in a day, for reserve-age display
pub const SECONDS_IN_DAY: u64 = 86_400;

/// Health level thresholds for UI color coding
///
/// Health level is a 0-100 percentage of margin left before liquidation:
/// - >= HEALTHY_THRESHOLD (60): safe position, displayed in green
/// - >= WARNING_THRESHOLD (30): at risk, displayed in amber/yellow
/// - < WARNING_THRESHOLD: danger of liquidation, displayed in red
pub mod health {
    pub const HEALTHY_THRESHOLD: u8 = 60;
    pub const WARNING_THRESHOLD: u8 = 30;
}
