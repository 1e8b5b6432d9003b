use crate::domain::caller::Caller;
use crate::domain::errors::IdentityError;
use crate::ports::IdentityProvider;

/// Identity provider that always returns the same caller.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    caller: Caller,
}

impl StaticIdentity {
    pub fn new(caller: Caller) -> Self {
        Self { caller }
    }

    pub fn academy(username: impl Into<String>) -> Self {
        Self::new(Caller::with_attribute("AcademyMSP", username))
    }

    pub fn learner(username: impl Into<String>) -> Self {
        Self::new(Caller::with_attribute("StudentMSP", username))
    }
}

impl IdentityProvider for StaticIdentity {
    fn resolve_caller(&self) -> Result<Caller, IdentityError> {
        Ok(self.caller.clone())
    }
}
