use std::fmt;

/// A named collection of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    /// The unique identifier of the library.
    pub id: String,
    /// The display name of the library.
    pub name: String,
}

impl Library {
    /// Creates a new library.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Library ID: {} Name: {}", self.id, self.name)
    }
}
