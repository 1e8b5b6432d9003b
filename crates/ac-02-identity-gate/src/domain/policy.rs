//! Access checks for every gated operation.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::caller::{Caller, Role};
use super::errors::IdentityError;

/// Organisation ids and attribute name the gate trusts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentityConfig {
    pub academy_org: String,
    pub student_org: String,
    /// Credential attribute carrying the caller's username.
    pub identity_attribute: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            academy_org: "AcademyMSP".to_string(),
            student_org: "StudentMSP".to_string(),
            identity_attribute: "username".to_string(),
        }
    }
}

/// Authorisation decisions over resolved callers.
///
/// Every check is pure: it reads the caller and the config, never the store.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    config: IdentityConfig,
}

impl AccessPolicy {
    pub fn new(config: IdentityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Organisation id bound to a role.
    pub fn org_of(&self, role: Role) -> &str {
        match role {
            Role::Academy => &self.config.academy_org,
            Role::Learner => &self.config.student_org,
        }
    }

    /// Role of the caller's organisation, if it is one we know.
    pub fn role_of(&self, caller: &Caller) -> Option<Role> {
        [Role::Academy, Role::Learner]
            .into_iter()
            .find(|role| self.org_of(*role) == caller.organization_id)
    }

    /// Caller must belong to the role's organisation.
    pub fn require_org(&self, caller: &Caller, role: Role) -> Result<(), IdentityError> {
        if self.org_of(role) == caller.organization_id {
            return Ok(());
        }
        warn!(
            "[ac-02] Denied {}: requires {} organisation",
            caller.organization_id, role
        );
        Err(IdentityError::PermissionDenied(format!(
            "organization {} is not allowed, requires {}",
            caller.organization_id,
            self.org_of(role)
        )))
    }

    /// Caller must belong to one of the roles' organisations.
    pub fn require_any_org(&self, caller: &Caller, roles: &[Role]) -> Result<Role, IdentityError> {
        match self.role_of(caller) {
            Some(role) if roles.contains(&role) => Ok(role),
            _ => {
                warn!(
                    "[ac-02] Denied {}: requires one of {:?}",
                    caller.organization_id, roles
                );
                Err(IdentityError::PermissionDenied(format!(
                    "organization {} is not allowed",
                    caller.organization_id
                )))
            }
        }
    }

    /// Caller must belong to the role's organisation and its verified
    /// attribute must equal `id`.
    pub fn require_self(&self, caller: &Caller, role: Role, id: &str) -> Result<(), IdentityError> {
        self.require_org(caller, role)?;
        match caller.attribute() {
            Some(attribute) if attribute == id => Ok(()),
            Some(attribute) => {
                warn!("[ac-02] Denied {}: acting on behalf of {}", attribute, id);
                Err(IdentityError::PermissionDenied(format!(
                    "{} may not act on behalf of {}",
                    attribute, id
                )))
            }
            None => {
                warn!("[ac-02] Denied caller without {} attribute", self.config.identity_attribute);
                Err(IdentityError::PermissionDenied(format!(
                    "credential carries no {} attribute",
                    self.config.identity_attribute
                )))
            }
        }
    }

    /// Caller must NOT belong to the role's organisation.
    pub fn deny_org(&self, caller: &Caller, role: Role) -> Result<(), IdentityError> {
        if self.org_of(role) != caller.organization_id {
            return Ok(());
        }
        warn!("[ac-02] Denied {}: closed to {} organisation", caller.organization_id, role);
        Err(IdentityError::PermissionDenied(format!(
            "organization {} is not allowed",
            caller.organization_id
        )))
    }

    /// Verified attribute of a caller, required for "act as myself" operations.
    pub fn own_attribute<'a>(&self, caller: &'a Caller) -> Result<&'a str, IdentityError> {
        caller.attribute().ok_or_else(|| {
            IdentityError::PermissionDenied(format!(
                "credential carries no {} attribute",
                self.config.identity_attribute
            ))
        })
    }
}
