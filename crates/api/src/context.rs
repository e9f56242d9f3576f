use taskdeck_core::UserId;

/// Authenticated owner for a request.
///
/// Injected by the auth middleware; every owner-scoped handler reads the
/// task owner from here and nowhere else, so the owner can never be
/// supplied (or reassigned) through a request body.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OwnerContext {
    user_id: UserId,
}

impl OwnerContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
