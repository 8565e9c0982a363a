//! In-memory catalog of libraries, items, members and borrowings.
//!
//! The [`Catalog`] knows nothing about the filesystem. It enforces the
//! uniqueness and cascade rules of the catalog; persisting the result is the
//! job of [`Directory`](crate::Directory).

use std::fmt;

use thiserror::Error;

use crate::domain::{
    field::{check_id, check_text, FieldProblem, NULL_MARKER},
    Borrowing, Item, ItemKind, ItemType, Library, Member,
};

/// The kinds of record held by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A [`Library`].
    Library,
    /// An [`Item`].
    Item,
    /// A [`Member`].
    Member,
    /// A [`Borrowing`].
    Borrowing,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Library => "library",
            Self::Item => "item",
            Self::Member => "member",
            Self::Borrowing => "borrowing",
        })
    }
}

/// An expected failure of a catalog operation.
///
/// Rejections leave the catalog unchanged. They are business-rule outcomes
/// for the caller to report, not faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// A record with this key already exists.
    #[error("{entity} '{id}' already exists")]
    DuplicateId {
        /// The collection that was targeted.
        entity: Entity,
        /// The conflicting key.
        id: String,
    },
    /// No record with this key exists.
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// The collection that was searched.
        entity: Entity,
        /// The missing key.
        id: String,
    },
    /// The member already holds this item and has not returned it.
    #[error("item '{item_id}' is already borrowed by member '{member_id}'")]
    AlreadyBorrowed {
        /// The requested item.
        item_id: String,
        /// The requesting member.
        member_id: String,
    },
    /// The borrowing has already been returned.
    #[error("borrowing {0} has already been returned")]
    AlreadyReturned(crate::domain::BorrowingId),
    /// Every borrowing ID up to the largest representable one is taken.
    #[error("no borrowing IDs are left to allocate")]
    BorrowingIdsExhausted,
    /// A field value cannot be stored.
    #[error("invalid {field}: {problem}")]
    InvalidField {
        /// The name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        problem: FieldProblem,
    },
}

/// The full in-memory state of the catalog.
///
/// Collections keep insertion order, which is used for display only. Records
/// are found by scanning for a matching key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub(super) libraries: Vec<Library>,
    pub(super) items: Vec<Item>,
    pub(super) members: Vec<Member>,
    pub(super) borrowings: Vec<Borrowing>,
}

impl Catalog {
    /// Assembles a catalog from previously loaded collections.
    ///
    /// No uniqueness checks are made; the collections are taken as they were
    /// stored.
    #[must_use]
    pub const fn from_parts(
        libraries: Vec<Library>,
        items: Vec<Item>,
        members: Vec<Member>,
        borrowings: Vec<Borrowing>,
    ) -> Self {
        Self {
            libraries,
            items,
            members,
            borrowings,
        }
    }

    /// All libraries, in insertion order.
    #[must_use]
    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// All items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// All members, in insertion order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// All borrowings, in insertion order.
    #[must_use]
    pub fn borrowings(&self) -> &[Borrowing] {
        &self.borrowings
    }

    /// Looks up a library by ID.
    #[must_use]
    pub fn library(&self, id: &str) -> Option<&Library> {
        self.libraries.iter().find(|library| library.id == id)
    }

    /// Looks up an item by ID.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Looks up a member by ID.
    #[must_use]
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    /// Returns `true` if a library with this ID exists.
    #[must_use]
    pub fn find_library(&self, id: &str) -> bool {
        self.library(id).is_some()
    }

    /// Returns `true` if an item with this ID exists.
    #[must_use]
    pub fn find_item(&self, id: &str) -> bool {
        self.item(id).is_some()
    }

    /// Returns `true` if a member with this ID exists.
    #[must_use]
    pub fn find_member(&self, id: &str) -> bool {
        self.member(id).is_some()
    }

    /// The items of one type held by one library, in insertion order.
    pub fn items_in<'a>(
        &'a self,
        library_id: &'a str,
        item_type: ItemType,
    ) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .iter()
            .filter(move |item| item.library_id == library_id && item.item_type() == item_type)
    }

    /// Adds a library.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::DuplicateId`] if the ID is taken, or
    /// [`Rejection::InvalidField`] if a field cannot be stored.
    pub fn add_library(&mut self, library: Library) -> Result<(), Rejection> {
        check_id("library ID", &library.id)?;
        check_text("library name", &library.name)?;
        if self.find_library(&library.id) {
            return Err(Rejection::DuplicateId {
                entity: Entity::Library,
                id: library.id,
            });
        }
        self.libraries.push(library);
        Ok(())
    }

    /// Renames a library.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::NotFound`] if there is no such library, or
    /// [`Rejection::InvalidField`] if the name cannot be stored.
    pub fn edit_library(&mut self, id: &str, name: String) -> Result<(), Rejection> {
        check_text("library name", &name)?;
        let library = self
            .libraries
            .iter_mut()
            .find(|library| library.id == id)
            .ok_or_else(|| not_found(Entity::Library, id))?;
        library.name = name;
        Ok(())
    }

    /// Deletes a library together with every item it holds.
    ///
    /// Borrowings are kept, even those referring to the removed items.
    /// Returns the removed items.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::NotFound`] if there is no such library.
    pub fn delete_library(&mut self, id: &str) -> Result<Vec<Item>, Rejection> {
        let position = self
            .libraries
            .iter()
            .position(|library| library.id == id)
            .ok_or_else(|| not_found(Entity::Library, id))?;
        self.libraries.remove(position);

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.library_id == id);
        self.items = kept;

        tracing::debug!("Cascade removed {} item(s) of library {id}", removed.len());
        Ok(removed)
    }

    /// Adds an item.
    ///
    /// The owning library is not required to exist.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::DuplicateId`] if the ID is taken, or
    /// [`Rejection::InvalidField`] if a field cannot be stored.
    pub fn add_item(&mut self, item: Item) -> Result<(), Rejection> {
        check_id("item ID", &item.id)?;
        check_item_fields(&item.library_id, &item.name, &item.kind)?;
        if self.find_item(&item.id) {
            return Err(Rejection::DuplicateId {
                entity: Entity::Item,
                id: item.id,
            });
        }
        self.items.push(item);
        Ok(())
    }

    /// Replaces the library, name and kind of an item.
    ///
    /// The kind is replaced as a whole, so changing the item type drops the
    /// previous type-specific attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::NotFound`] if there is no such item, or
    /// [`Rejection::InvalidField`] if a field cannot be stored.
    pub fn edit_item(
        &mut self,
        id: &str,
        library_id: String,
        name: String,
        kind: ItemKind,
    ) -> Result<(), Rejection> {
        check_item_fields(&library_id, &name, &kind)?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| not_found(Entity::Item, id))?;
        item.library_id = library_id;
        item.name = name;
        item.kind = kind;
        Ok(())
    }

    /// Deletes an item, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::NotFound`] if there is no such item.
    pub fn delete_item(&mut self, id: &str) -> Result<Item, Rejection> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| not_found(Entity::Item, id))?;
        Ok(self.items.remove(position))
    }

    /// Adds a member.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::DuplicateId`] if the ID is taken, or
    /// [`Rejection::InvalidField`] if a field cannot be stored.
    pub fn add_member(&mut self, member: Member) -> Result<(), Rejection> {
        check_id("member ID", &member.id)?;
        check_member_fields(&member.first_name, &member.last_name, &member.email)?;
        if self.find_member(&member.id) {
            return Err(Rejection::DuplicateId {
                entity: Entity::Member,
                id: member.id,
            });
        }
        self.members.push(member);
        Ok(())
    }

    /// Replaces the name and email of a member.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::NotFound`] if there is no such member, or
    /// [`Rejection::InvalidField`] if a field cannot be stored.
    pub fn edit_member(
        &mut self,
        id: &str,
        first_name: String,
        last_name: String,
        email: String,
    ) -> Result<(), Rejection> {
        check_member_fields(&first_name, &last_name, &email)?;
        let member = self
            .members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or_else(|| not_found(Entity::Member, id))?;
        member.first_name = first_name;
        member.last_name = last_name;
        member.email = email;
        Ok(())
    }

    /// Deletes a member, returning it.
    ///
    /// The member's borrowing history is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::NotFound`] if there is no such member.
    pub fn delete_member(&mut self, id: &str) -> Result<Member, Rejection> {
        let position = self
            .members
            .iter()
            .position(|member| member.id == id)
            .ok_or_else(|| not_found(Entity::Member, id))?;
        Ok(self.members.remove(position))
    }
}

pub(super) fn not_found(entity: Entity, id: impl fmt::Display) -> Rejection {
    Rejection::NotFound {
        entity,
        id: id.to_string(),
    }
}

fn check_item_fields(library_id: &str, name: &str, kind: &ItemKind) -> Result<(), Rejection> {
    check_id("library ID", library_id)?;
    check_text("item name", name)?;

    let field = kind.item_type().attribute_name();
    check_text(field, kind.attribute())?;
    // The attribute shares its column with the null marker of the other types.
    if kind.attribute() == NULL_MARKER {
        return Err(Rejection::InvalidField {
            field,
            problem: FieldProblem::NullMarker,
        });
    }
    Ok(())
}

fn check_member_fields(first_name: &str, last_name: &str, email: &str) -> Result<(), Rejection> {
    check_text("first name", first_name)?;
    check_text("last name", last_name)?;
    check_text("email", email)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::BorrowingId;

    fn book(id: &str, library_id: &str) -> Item {
        Item::new(id, library_id, "Dune", ItemType::Book.with_attribute("Herbert"))
    }

    #[test]
    fn duplicate_library_is_rejected_without_mutation() {
        let mut catalog = Catalog::default();
        catalog.add_library(Library::new("L1", "Central")).unwrap();

        let error = catalog
            .add_library(Library::new("L1", "Other"))
            .unwrap_err();

        assert_eq!(
            error,
            Rejection::DuplicateId {
                entity: Entity::Library,
                id: "L1".to_string()
            }
        );
        assert_eq!(catalog.libraries(), &[Library::new("L1", "Central")]);
    }

    #[test]
    fn duplicate_item_and_member_are_rejected() {
        let mut catalog = Catalog::default();
        catalog.add_item(book("B1", "L1")).unwrap();
        catalog
            .add_member(Member::new("M1", "Ada", "Lovelace", "ada@example.com"))
            .unwrap();

        assert!(matches!(
            catalog.add_item(book("B1", "L2")),
            Err(Rejection::DuplicateId { entity: Entity::Item, .. })
        ));
        assert!(matches!(
            catalog.add_member(Member::new("M1", "A", "B", "c@d.e")),
            Err(Rejection::DuplicateId { entity: Entity::Member, .. })
        ));
        assert_eq!(catalog.items().len(), 1);
        assert_eq!(catalog.members().len(), 1);
    }

    #[test]
    fn edit_missing_records_is_rejected() {
        let mut catalog = Catalog::default();

        assert!(matches!(
            catalog.edit_library("L1", "Name".to_string()),
            Err(Rejection::NotFound { entity: Entity::Library, .. })
        ));
        assert!(matches!(
            catalog.edit_item(
                "B1",
                "L1".to_string(),
                "Dune".to_string(),
                ItemType::Book.with_attribute("Herbert")
            ),
            Err(Rejection::NotFound { entity: Entity::Item, .. })
        ));
        assert!(matches!(
            catalog.edit_member(
                "M1",
                "A".to_string(),
                "B".to_string(),
                "c@d.e".to_string()
            ),
            Err(Rejection::NotFound { entity: Entity::Member, .. })
        ));
    }

    #[test]
    fn edit_library_changes_name_only() {
        let mut catalog = Catalog::default();
        catalog.add_library(Library::new("L1", "Central")).unwrap();

        catalog.edit_library("L1", "Main".to_string()).unwrap();

        assert_eq!(catalog.library("L1"), Some(&Library::new("L1", "Main")));
    }

    #[test]
    fn edit_item_replaces_kind_when_type_changes() {
        let mut catalog = Catalog::default();
        catalog.add_item(book("I1", "L1")).unwrap();

        catalog
            .edit_item(
                "I1",
                "L2".to_string(),
                "Dune (film)".to_string(),
                ItemType::DigitalMedia.with_attribute("DVD"),
            )
            .unwrap();

        let item = catalog.item("I1").unwrap();
        assert_eq!(item.library_id, "L2");
        assert_eq!(item.name, "Dune (film)");
        assert_eq!(
            item.kind,
            ItemKind::DigitalMedia {
                format: "DVD".to_string()
            }
        );
    }

    #[test]
    fn delete_library_cascades_to_its_items_only() {
        let borrowing = Borrowing::new(
            BorrowingId::new(1),
            "I1",
            "M1",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let mut catalog = Catalog::from_parts(
            vec![Library::new("L", "Central"), Library::new("M", "West")],
            vec![book("I1", "L"), book("I2", "L"), book("I3", "M")],
            Vec::new(),
            vec![borrowing.clone()],
        );

        let removed = catalog.delete_library("L").unwrap();

        let removed_ids: Vec<_> = removed.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(removed_ids, ["I1", "I2"]);
        assert!(!catalog.find_library("L"));
        assert!(catalog.find_library("M"));
        assert_eq!(catalog.items(), &[book("I3", "M")]);
        assert_eq!(catalog.borrowings(), &[borrowing]);
    }

    #[test]
    fn delete_missing_library_is_rejected() {
        let mut catalog = Catalog::default();
        catalog.add_item(book("I1", "L")).unwrap();

        assert!(catalog.delete_library("L").is_err());
        assert!(catalog.find_item("I1"));
    }

    #[test]
    fn delete_member_keeps_borrowings() {
        let borrowing = Borrowing::new(
            BorrowingId::new(1),
            "I1",
            "M1",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let mut catalog = Catalog::from_parts(
            Vec::new(),
            Vec::new(),
            vec![Member::new("M1", "Ada", "Lovelace", "ada@example.com")],
            vec![borrowing],
        );

        let removed = catalog.delete_member("M1").unwrap();

        assert_eq!(removed.id, "M1");
        assert!(catalog.members().is_empty());
        assert_eq!(catalog.borrowings().len(), 1);
        assert!(catalog.delete_member("M1").is_err());
    }

    #[test]
    fn delete_item_removes_only_that_item() {
        let mut catalog = Catalog::default();
        catalog.add_item(book("I1", "L")).unwrap();
        catalog.add_item(book("I2", "L")).unwrap();

        let removed = catalog.delete_item("I1").unwrap();

        assert_eq!(removed.id, "I1");
        assert_eq!(catalog.items(), &[book("I2", "L")]);
    }

    #[test]
    fn items_in_filters_by_library_and_type() {
        let mut catalog = Catalog::default();
        catalog.add_item(book("B1", "L1")).unwrap();
        catalog
            .add_item(Item::new(
                "A1",
                "L1",
                "On Computable Numbers",
                ItemType::Article.with_attribute("Proc. LMS"),
            ))
            .unwrap();
        catalog.add_item(book("B2", "L2")).unwrap();
        catalog.add_item(book("B3", "L1")).unwrap();

        let books: Vec<_> = catalog
            .items_in("L1", ItemType::Book)
            .map(|item| item.id.as_str())
            .collect();

        assert_eq!(books, ["B1", "B3"]);
        assert_eq!(catalog.items_in("L1", ItemType::DigitalMedia).count(), 0);
    }

    #[test]
    fn fields_that_would_corrupt_records_are_rejected() {
        let mut catalog = Catalog::default();

        assert_eq!(
            catalog.add_library(Library::new("L1", "Central, North")),
            Err(Rejection::InvalidField {
                field: "library name",
                problem: FieldProblem::ContainsDelimiter
            })
        );
        assert_eq!(
            catalog.add_library(Library::new("", "Central")),
            Err(Rejection::InvalidField {
                field: "library ID",
                problem: FieldProblem::Empty
            })
        );
        assert_eq!(
            catalog.add_member(Member::new("M1", "Ada\n", "Lovelace", "ada@example.com")),
            Err(Rejection::InvalidField {
                field: "first name",
                problem: FieldProblem::ContainsLineBreak
            })
        );
        assert_eq!(
            catalog.add_item(Item::new(
                "B1",
                "L1",
                "Dune",
                ItemType::Book.with_attribute(NULL_MARKER)
            )),
            Err(Rejection::InvalidField {
                field: "author",
                problem: FieldProblem::NullMarker
            })
        );
        assert!(catalog.libraries().is_empty());
        assert!(catalog.items().is_empty());
        assert!(catalog.members().is_empty());
    }
}
