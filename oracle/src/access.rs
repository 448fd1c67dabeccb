//! Capability checks.

use vdao_types::Identity;

/// Answers role questions about an already-authenticated identity.
pub trait AccessRegistry {
    /// Holds the admin role.
    fn is_admin(&self, who: &Identity) -> bool;

    /// Holds a veto credential (e.g. a veto NFT).
    fn is_veto_holder(&self, who: &Identity) -> bool;
}
