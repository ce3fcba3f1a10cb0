use crate::domain::value_objects::offline::UserId;

/// The signed-in user, stamped onto uploaded records.
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<UserId>;
}
