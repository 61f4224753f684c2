use uuid::Uuid;

use crate::database::models::{role::Role, user};

/// The authenticated identity a request is evaluated for.
///
/// Built server-side from the user row the bearer token resolves to; nothing in
/// a request body ever feeds into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
    pub is_staff: bool,
}

impl Caller {
    pub const fn new(id: Uuid, role: Role, is_staff: bool) -> Self {
        Self { id, role, is_staff }
    }
}

impl From<&user::Model> for Caller {
    fn from(user: &user::Model) -> Self {
        Self::new(user.id, user.role, user.is_staff)
    }
}
