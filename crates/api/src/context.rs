use storecms_core::AdminId;

/// Authenticated admin context for a request.
///
/// Inserted by the auth middleware; present on all protected routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AdminContext {
    admin_id: AdminId,
}

impl AdminContext {
    pub fn new(admin_id: AdminId) -> Self {
        Self { admin_id }
    }

    pub fn admin_id(&self) -> AdminId {
        self.admin_id
    }
}
