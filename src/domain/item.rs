//! Catalog items and their type-specific attributes.

use std::{fmt, str::FromStr};

/// The three kinds of item a library can hold.
///
/// This is the discriminant of [`ItemKind`], used where only the type is known
/// (menus, filters, the `item_type` column of the item file).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemType {
    /// A book, identified by its author.
    Book,
    /// An article, identified by its journal.
    Article,
    /// Digital media, identified by its format.
    DigitalMedia,
}

impl ItemType {
    /// All item types, in menu order.
    pub const ALL: [Self; 3] = [Self::Book, Self::Article, Self::DigitalMedia];

    /// The label used in the backing file and in listings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Book => "Book",
            Self::Article => "Article",
            Self::DigitalMedia => "Digital Media",
        }
    }

    /// The name of the type-specific attribute, e.g. "author" for a book.
    #[must_use]
    pub const fn attribute_name(self) -> &'static str {
        match self {
            Self::Book => "author",
            Self::Article => "journal",
            Self::DigitalMedia => "format",
        }
    }

    /// Builds the [`ItemKind`] of this type carrying the given attribute.
    #[must_use]
    pub fn with_attribute(self, attribute: impl Into<String>) -> ItemKind {
        let attribute = attribute.into();
        match self {
            Self::Book => ItemKind::Book { author: attribute },
            Self::Article => ItemKind::Article { journal: attribute },
            Self::DigitalMedia => ItemKind::DigitalMedia { format: attribute },
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a recognised item type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item type '{0}': expected 'Book', 'Article' or 'Digital Media'")]
pub struct UnknownItemType(String);

impl FromStr for ItemType {
    type Err = UnknownItemType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Book" => Ok(Self::Book),
            "Article" => Ok(Self::Article),
            "Digital Media" => Ok(Self::DigitalMedia),
            other => Err(UnknownItemType(other.to_string())),
        }
    }
}

/// The type of an item together with its single type-specific attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// A book.
    Book {
        /// The author of the book.
        author: String,
    },
    /// An article.
    Article {
        /// The journal the article appeared in.
        journal: String,
    },
    /// Digital media.
    DigitalMedia {
        /// The media format, e.g. "DVD" or "MP3".
        format: String,
    },
}

impl ItemKind {
    /// Returns the discriminant of this kind.
    #[must_use]
    pub const fn item_type(&self) -> ItemType {
        match self {
            Self::Book { .. } => ItemType::Book,
            Self::Article { .. } => ItemType::Article,
            Self::DigitalMedia { .. } => ItemType::DigitalMedia,
        }
    }

    /// Returns the type-specific attribute.
    #[must_use]
    pub fn attribute(&self) -> &str {
        match self {
            Self::Book { author } => author,
            Self::Article { journal } => journal,
            Self::DigitalMedia { format } => format,
        }
    }
}

/// A catalog entry held by a library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The unique identifier of the item.
    pub id: String,
    /// The library that owns this item.
    pub library_id: String,
    /// The display name of the item.
    pub name: String,
    /// The item type and its type-specific attribute.
    pub kind: ItemKind,
}

impl Item {
    /// Creates a new item.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        library_id: impl Into<String>,
        name: impl Into<String>,
        kind: ItemKind,
    ) -> Self {
        Self {
            id: id.into(),
            library_id: library_id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Shorthand for [`ItemKind::item_type`].
    #[must_use]
    pub const fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let item_type = self.item_type();
        write!(
            f,
            "Item ID: {} Library ID: {} Type: {} Name: {} {}: {}",
            self.id,
            self.library_id,
            item_type,
            self.name,
            capitalise(item_type.attribute_name()),
            self.kind.attribute()
        )
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_labels_parse_back() {
        for item_type in ItemType::ALL {
            assert_eq!(item_type.as_str().parse::<ItemType>(), Ok(item_type));
        }
    }

    #[test]
    fn unknown_item_type_is_rejected() {
        assert!("DigitalMedia".parse::<ItemType>().is_err());
        assert!("book".parse::<ItemType>().is_err());
    }

    #[test]
    fn with_attribute_builds_matching_kind() {
        let kind = ItemType::Article.with_attribute("Nature");
        assert_eq!(
            kind,
            ItemKind::Article {
                journal: "Nature".to_string()
            }
        );
        assert_eq!(kind.item_type(), ItemType::Article);
        assert_eq!(kind.attribute(), "Nature");
    }

    #[test]
    fn display_includes_attribute() {
        let item = Item::new("B1", "L1", "Dune", ItemType::Book.with_attribute("Herbert"));
        assert_eq!(
            item.to_string(),
            "Item ID: B1 Library ID: L1 Type: Book Name: Dune Author: Herbert"
        );
    }
}
