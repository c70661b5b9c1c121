//! Mapping from centipawns to a bounded win-chance style scale.

/// Centipawns per percentage point around the neutral 50.
const CP_PER_PERCENT: f64 = 20.0;

/// Converts a centipawn evaluation to a `[0, 100]` scale.
///
/// Linear around the neutral point (0 cp = 50) and saturating at
/// ±1000 cp, so mate sentinels collapse to 0 or 100.
///
/// ```
/// use chess_analysis::to_percent;
///
/// assert_eq!(to_percent(0.0), 50.0);
/// assert_eq!(to_percent(200.0), 60.0);
/// assert_eq!(to_percent(-500_000.0), 0.0);
/// ```
pub fn to_percent(centipawns: f64) -> f64 {
    (50.0 + centipawns / CP_PER_PERCENT).clamp(0.0, 100.0)
}
