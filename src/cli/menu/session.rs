/// Who is using the interactive menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// May add, edit and delete libraries and items.
    Admin,
    /// May borrow and return items under this member ID.
    Member(String),
}

/// State of one interactive session.
///
/// The catalog itself trusts every caller; the menu uses the session to
/// decide which operations to offer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    role: Option<Role>,
    library_id: Option<String>,
}

impl Session {
    pub fn log_in(&mut self, role: Role) {
        tracing::debug!("Session role: {role:?}");
        self.role = Some(role);
        self.library_id = None;
    }

    pub fn log_out(&mut self) {
        *self = Self::default();
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Some(Role::Admin))
    }

    pub fn member_id(&self) -> Option<&str> {
        match &self.role {
            Some(Role::Member(id)) => Some(id),
            _ => None,
        }
    }

    pub fn select_library(&mut self, id: String) {
        self.library_id = Some(id);
    }

    pub fn leave_library(&mut self) {
        self.library_id = None;
    }

    pub fn library_id(&self) -> Option<&str> {
        self.library_id.as_deref()
    }
}
