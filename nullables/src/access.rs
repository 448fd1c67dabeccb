//! Nullable access registry: role sets controlled by the test.

use std::collections::HashSet;
use std::sync::Mutex;
use vdao_oracle::AccessRegistry;
use vdao_types::Identity;

pub struct NullAccess {
    admins: Mutex<HashSet<Identity>>,
    veto_holders: Mutex<HashSet<Identity>>,
}

impl NullAccess {
    pub fn new() -> Self {
        Self {
            admins: Mutex::new(HashSet::new()),
            veto_holders: Mutex::new(HashSet::new()),
        }
    }

    pub fn grant_admin(&self, who: &Identity) {
        self.admins.lock().unwrap().insert(*who);
    }

    pub fn revoke_admin(&self, who: &Identity) {
        self.admins.lock().unwrap().remove(who);
    }

    /// Hand out a veto credential.
    pub fn grant_veto(&self, who: &Identity) {
        self.veto_holders.lock().unwrap().insert(*who);
    }

    pub fn revoke_veto(&self, who: &Identity) {
        self.veto_holders.lock().unwrap().remove(who);
    }
}

impl Default for NullAccess {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessRegistry for NullAccess {
    fn is_admin(&self, who: &Identity) -> bool {
        self.admins.lock().unwrap().contains(who)
    }

    fn is_veto_holder(&self, who: &Identity) -> bool {
        self.veto_holders.lock().unwrap().contains(who)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_independent() {
        let access = NullAccess::new();
        let a = Identity::new([1; 20]);
        access.grant_admin(&a);
        assert!(access.is_admin(&a));
        assert!(!access.is_veto_holder(&a));

        access.grant_veto(&a);
        access.revoke_admin(&a);
        assert!(!access.is_admin(&a));
        assert!(access.is_veto_holder(&a));

        access.revoke_veto(&a);
        assert!(!access.is_veto_holder(&a));
    }
}
