//! Veto gate: lets admins and veto-credential holders block a proposal for good.

use crate::error::VetoError;
use crate::state::GovernanceState;
use vdao_oracle::AccessRegistry;
use vdao_types::{Identity, ProposalId};

#[derive(Clone, Copy, Debug, Default)]
pub struct VetoGate;

impl VetoGate {
    /// Whether `caller` may veto at all.
    pub fn authorized(&self, access: &dyn AccessRegistry, caller: &Identity) -> bool {
        access.is_veto_holder(caller) || access.is_admin(caller)
    }

    /// Set the veto flag on `id`. Authorization is checked before the proposal
    /// is even looked up.
    pub fn veto(
        &self,
        state: &mut GovernanceState,
        access: &dyn AccessRegistry,
        id: ProposalId,
        caller: Identity,
    ) -> Result<(), VetoError> {
        if !self.authorized(access, &caller) {
            return Err(VetoError::Unauthorized(caller));
        }
        let proposal = state
            .proposals
            .get_mut(id)
            .ok_or(VetoError::ProposalNotFound(id))?;
        if proposal.is_executed() {
            return Err(VetoError::AlreadyExecuted(id));
        }
        if proposal.is_vetoed() {
            return Err(VetoError::AlreadyVetoed(id));
        }
        proposal.mark_vetoed();
        Ok(())
    }
}
