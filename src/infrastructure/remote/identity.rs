use crate::application::ports::IdentityProvider;
use crate::domain::value_objects::offline::UserId;

/// Serves a fixed, configured user id.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user_id: Option<UserId>,
}

impl StaticIdentity {
    pub fn new(user_id: Option<UserId>) -> Self {
        Self { user_id }
    }

    pub fn from_config(user_id: Option<&str>) -> Result<Self, String> {
        let user_id = user_id
            .filter(|value| !value.trim().is_empty())
            .map(|value| UserId::new(value.to_string()))
            .transpose()?;
        Ok(Self { user_id })
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.user_id.clone()
    }
}
