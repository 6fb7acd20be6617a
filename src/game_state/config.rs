//! Rule switches applied by a `Position`.

/// Behavior toggles for move generation and diagnostics.
///
/// Build with struct-update syntax on top of the defaults:
/// `RulesConfig { offer_pawn_promotion: false, ..RulesConfig::default() }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesConfig {
    /// Offer the fifth promotion variant where the pawn stays a pawn.
    pub offer_pawn_promotion: bool,
    /// Cross-check counts, kings, key and packed mirror after every apply/undo.
    pub verify_integrity: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            offer_pawn_promotion: true,
            verify_integrity: cfg!(debug_assertions),
        }
    }
}

impl RulesConfig {
    /// FIDE promotion set (four pieces), integrity checks as in the defaults.
    pub fn standard() -> Self {
        Self {
            offer_pawn_promotion: false,
            ..Self::default()
        }
    }
}
