use std::fmt;

/// A person entitled to borrow items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// The unique identifier of the member.
    pub id: String,
    /// The member's first name.
    pub first_name: String,
    /// The member's last name.
    pub last_name: String,
    /// The member's email address.
    pub email: String,
}

impl Member {
    /// Creates a new member.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Member ID: {} Name: {} {} Email: {}",
            self.id, self.first_name, self.last_name, self.email
        )
    }
}
