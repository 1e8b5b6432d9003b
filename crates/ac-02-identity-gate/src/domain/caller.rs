use serde::{Deserialize, Serialize};

/// A resolved caller identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    /// Membership-service organisation id (e.g. `AcademyMSP`).
    pub organization_id: String,
    /// Verified identity attribute, usually a username.
    pub attribute: Option<String>,
}

impl Caller {
    pub fn new(organization_id: impl Into<String>, attribute: Option<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            attribute,
        }
    }

    /// Caller with an organisation and a verified attribute.
    pub fn with_attribute(organization_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::new(organization_id, Some(attribute.into()))
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }
}

/// Coarse authorisation unit. Each role maps to one organisation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Staff organisation.
    Academy,
    /// Student organisation.
    Learner,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Academy => write!(f, "academy"),
            Role::Learner => write!(f, "learner"),
        }
    }
}
