//! The borrowing engine.
//!
//! Each [`Borrowing`] is a one-way state machine:
//!
//! ```text
//! Outstanding ──return──▶ Returned { on }
//! ```
//!
//! A member can hold at most one outstanding borrowing of the same item.

use chrono::NaiveDate;
use tracing::instrument;

use crate::domain::{
    catalog::{not_found, Entity},
    field::check_id,
    Borrowing, BorrowingId, BorrowingState, Catalog, Rejection,
};

impl Catalog {
    /// Looks up a borrowing by ID.
    #[must_use]
    pub fn borrowing(&self, id: BorrowingId) -> Option<&Borrowing> {
        self.borrowings.iter().find(|borrowing| borrowing.id == id)
    }

    /// Returns `true` if a borrowing with this ID exists.
    #[must_use]
    pub fn find_borrowing(&self, id: BorrowingId) -> bool {
        self.borrowing(id).is_some()
    }

    /// The next free borrowing ID.
    ///
    /// This is one more than the largest ID in use (or `1` for an empty
    /// ledger). Gaps left in the sequence are never reused. Returns `None` once
    /// the largest representable ID is in use.
    #[must_use]
    pub fn next_borrowing_id(&self) -> Option<BorrowingId> {
        let max = self
            .borrowings
            .iter()
            .map(|borrowing| borrowing.id)
            .max()
            .unwrap_or(BorrowingId::new(0));

        let mut id = max.next()?;
        while self.find_borrowing(id) {
            id = id.next()?;
        }
        Some(id)
    }

    /// Lends an item to a member, returning the ID of the new borrowing.
    ///
    /// The item and member are not required to exist in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::InvalidField`] if either ID cannot be stored,
    /// [`Rejection::AlreadyBorrowed`] if the member holds an outstanding
    /// borrowing of the same item, or [`Rejection::BorrowingIdsExhausted`] if
    /// no ID is left to allocate.
    #[instrument(level = "trace", skip(self))]
    pub fn borrow_item(
        &mut self,
        item_id: &str,
        member_id: &str,
        today: NaiveDate,
    ) -> Result<BorrowingId, Rejection> {
        check_id("item ID", item_id)?;
        check_id("member ID", member_id)?;
        if self.holds(member_id, item_id) {
            return Err(Rejection::AlreadyBorrowed {
                item_id: item_id.to_string(),
                member_id: member_id.to_string(),
            });
        }

        let id = self
            .next_borrowing_id()
            .ok_or(Rejection::BorrowingIdsExhausted)?;
        self.borrowings.push(Borrowing::new(id, item_id, member_id, today));
        Ok(id)
    }

    /// Marks a borrowing as returned.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::NotFound`] if there is no such borrowing, or
    /// [`Rejection::AlreadyReturned`] if it was returned before.
    #[instrument(level = "trace", skip(self))]
    pub fn return_item(&mut self, id: BorrowingId, today: NaiveDate) -> Result<(), Rejection> {
        let borrowing = self
            .borrowings
            .iter_mut()
            .find(|borrowing| borrowing.id == id)
            .ok_or_else(|| not_found(Entity::Borrowing, id))?;

        match borrowing.state {
            BorrowingState::Outstanding => {
                borrowing.state = BorrowingState::Returned { on: today };
                Ok(())
            }
            BorrowingState::Returned { .. } => Err(Rejection::AlreadyReturned(id)),
        }
    }

    /// Returns `true` if the member has an outstanding borrowing of the item.
    #[must_use]
    pub fn holds(&self, member_id: &str, item_id: &str) -> bool {
        self.borrowings.iter().any(|borrowing| {
            borrowing.is_outstanding()
                && borrowing.item_id == item_id
                && borrowing.member_id == member_id
        })
    }

    /// The member's borrowings that have not been returned.
    pub fn outstanding_for<'a>(
        &'a self,
        member_id: &'a str,
    ) -> impl Iterator<Item = &'a Borrowing> {
        self.borrowings_of(member_id)
            .filter(|borrowing| borrowing.is_outstanding())
    }

    /// The member's borrowings that have been returned.
    pub fn returned_for<'a>(
        &'a self,
        member_id: &'a str,
    ) -> impl Iterator<Item = &'a Borrowing> {
        self.borrowings_of(member_id)
            .filter(|borrowing| !borrowing.is_outstanding())
    }

    fn borrowings_of<'a>(&'a self, member_id: &'a str) -> impl Iterator<Item = &'a Borrowing> {
        self.borrowings
            .iter()
            .filter(move |borrowing| borrowing.member_id == member_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, ItemType, Library};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn ledger(ids: &[u64]) -> Catalog {
        let borrowings = ids
            .iter()
            .map(|&id| Borrowing::new(BorrowingId::new(id), "I", "M", day(1)))
            .collect();
        Catalog::from_parts(Vec::new(), Vec::new(), Vec::new(), borrowings)
    }

    #[test]
    fn first_borrowing_gets_id_one() {
        assert_eq!(
            Catalog::default().next_borrowing_id(),
            Some(BorrowingId::new(1))
        );
    }

    #[test]
    fn next_id_is_max_plus_one_not_first_gap() {
        assert_eq!(
            ledger(&[1, 3, 5]).next_borrowing_id(),
            Some(BorrowingId::new(6))
        );
        assert_eq!(
            ledger(&[5, 3, 1]).next_borrowing_id(),
            Some(BorrowingId::new(6))
        );
    }

    #[test]
    fn borrowing_after_the_largest_id_is_rejected() {
        let mut catalog = ledger(&[u64::MAX]);

        assert_eq!(catalog.next_borrowing_id(), None);
        assert_eq!(
            catalog.borrow_item("B2", "M1", day(2)),
            Err(Rejection::BorrowingIdsExhausted)
        );
        assert_eq!(catalog.borrowings().len(), 1);
    }

    #[test]
    fn unstorable_ids_are_rejected_before_borrowing() {
        let mut catalog = Catalog::default();

        for (item_id, member_id, field) in [
            ("B1,extra", "M1", "item ID"),
            ("B1\n", "M1", "item ID"),
            ("", "M1", "item ID"),
            ("B1", "M1,M2", "member ID"),
            ("B1", "", "member ID"),
        ] {
            assert!(matches!(
                catalog.borrow_item(item_id, member_id, day(1)),
                Err(Rejection::InvalidField { field: f, .. }) if f == field
            ));
        }
        assert!(catalog.borrowings().is_empty());
    }

    #[test]
    fn borrowing_twice_is_rejected_until_returned() {
        let mut catalog = Catalog::default();

        let first = catalog.borrow_item("A", "B", day(1)).unwrap();
        assert_eq!(
            catalog.borrow_item("A", "B", day(2)),
            Err(Rejection::AlreadyBorrowed {
                item_id: "A".to_string(),
                member_id: "B".to_string()
            })
        );
        assert_eq!(catalog.borrowings().len(), 1);

        catalog.return_item(first, day(3)).unwrap();
        let second = catalog.borrow_item("A", "B", day(4)).unwrap();

        assert_ne!(first, second);
        assert_eq!(second, BorrowingId::new(2));
        assert!(catalog.borrowing(second).unwrap().is_outstanding());
    }

    #[test]
    fn other_members_can_borrow_the_same_item() {
        let mut catalog = Catalog::default();
        catalog.borrow_item("A", "B", day(1)).unwrap();

        assert!(catalog.borrow_item("A", "C", day(1)).is_ok());
        assert!(catalog.borrow_item("Z", "B", day(1)).is_ok());
    }

    #[test]
    fn return_sets_return_date() {
        let mut catalog = Catalog::default();
        let id = catalog.borrow_item("A", "B", day(1)).unwrap();

        catalog.return_item(id, day(9)).unwrap();

        let borrowing = catalog.borrowing(id).unwrap();
        assert_eq!(borrowing.state, BorrowingState::Returned { on: day(9) });
        assert_eq!(borrowing.borrow_date, day(1));
    }

    #[test]
    fn return_of_unknown_borrowing_is_rejected() {
        let mut catalog = Catalog::default();
        assert_eq!(
            catalog.return_item(BorrowingId::new(1), day(1)),
            Err(Rejection::NotFound {
                entity: Entity::Borrowing,
                id: "1".to_string()
            })
        );
    }

    #[test]
    fn returned_is_terminal() {
        let mut catalog = Catalog::default();
        let id = catalog.borrow_item("A", "B", day(1)).unwrap();
        catalog.return_item(id, day(2)).unwrap();

        assert_eq!(
            catalog.return_item(id, day(5)),
            Err(Rejection::AlreadyReturned(id))
        );
        assert_eq!(
            catalog.borrowing(id).unwrap().return_date(),
            Some(day(2))
        );
    }

    #[test]
    fn member_borrowings_split_by_state() {
        let mut catalog = Catalog::default();
        let a = catalog.borrow_item("A", "M1", day(1)).unwrap();
        let b = catalog.borrow_item("B", "M1", day(1)).unwrap();
        catalog.borrow_item("C", "M2", day(1)).unwrap();
        catalog.return_item(a, day(2)).unwrap();

        let outstanding: Vec<_> = catalog.outstanding_for("M1").map(|x| x.id).collect();
        let returned: Vec<_> = catalog.returned_for("M1").map(|x| x.id).collect();

        assert_eq!(outstanding, [b]);
        assert_eq!(returned, [a]);
    }

    #[test]
    fn library_to_return_scenario() {
        let mut catalog = Catalog::default();
        catalog.add_library(Library::new("L1", "Central")).unwrap();
        catalog
            .add_item(Item::new(
                "B1",
                "L1",
                "Dune",
                ItemType::Book.with_attribute("Herbert"),
            ))
            .unwrap();

        let id = catalog.borrow_item("B1", "M1", day(1)).unwrap();
        assert_eq!(
            catalog.borrowing(id),
            Some(&Borrowing::new(BorrowingId::new(1), "B1", "M1", day(1)))
        );

        catalog.return_item(id, day(1)).unwrap();
        assert_eq!(catalog.borrowing(id).unwrap().return_date(), Some(day(1)));

        let again = catalog.borrow_item("B1", "M1", day(1)).unwrap();
        assert_eq!(again, BorrowingId::new(2));
    }
}
