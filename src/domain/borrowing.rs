//! Borrowing transactions.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;

/// The identifier of a borrowing transaction.
///
/// Borrowing IDs are allocated by the catalog as increasing integers and are
/// stored as their decimal representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BorrowingId(u64);

impl BorrowingId {
    /// Creates a borrowing ID from its numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the ID following this one, or `None` past the largest ID.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for BorrowingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a borrowing ID in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a borrowing ID: expected a decimal number without sign or leading zeros")]
pub struct InvalidBorrowingId(String);

impl FromStr for BorrowingId {
    type Err = InvalidBorrowingId;

    /// Parses the decimal form written by [`Display`](fmt::Display).
    ///
    /// Only that exact form is accepted, so an ID always reads back as the
    /// same text it was stored as.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidBorrowingId(s.to_string());
        let digits_only = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits_only || (s.len() > 1 && s.starts_with('0')) {
            return Err(invalid());
        }
        s.parse().map(Self).map_err(|_| invalid())
    }
}

/// Where a borrowing is in its lifecycle.
///
/// A borrowing starts out [`Outstanding`](Self::Outstanding) and moves to
/// [`Returned`](Self::Returned) exactly once. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowingState {
    /// The item has not been returned yet.
    Outstanding,
    /// The item was returned.
    Returned {
        /// The date the item was returned.
        on: NaiveDate,
    },
}

impl BorrowingState {
    /// Returns the return date, if the item has been returned.
    #[must_use]
    pub const fn return_date(self) -> Option<NaiveDate> {
        match self {
            Self::Outstanding => None,
            Self::Returned { on } => Some(on),
        }
    }
}

/// A transaction linking one item and one member across a date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Borrowing {
    /// The unique identifier of the transaction.
    pub id: BorrowingId,
    /// The borrowed item.
    pub item_id: String,
    /// The borrowing member.
    pub member_id: String,
    /// The date the item was borrowed.
    pub borrow_date: NaiveDate,
    /// Whether and when the item was returned.
    pub state: BorrowingState,
}

impl Borrowing {
    /// Creates a new outstanding borrowing.
    #[must_use]
    pub fn new(
        id: BorrowingId,
        item_id: impl Into<String>,
        member_id: impl Into<String>,
        borrow_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            item_id: item_id.into(),
            member_id: member_id.into(),
            borrow_date,
            state: BorrowingState::Outstanding,
        }
    }

    /// Returns `true` if the item has not been returned.
    #[must_use]
    pub const fn is_outstanding(&self) -> bool {
        matches!(self.state, BorrowingState::Outstanding)
    }

    /// Returns the return date, if the item has been returned.
    #[must_use]
    pub const fn return_date(&self) -> Option<NaiveDate> {
        self.state.return_date()
    }
}

impl fmt::Display for Borrowing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Borrowing ID: {} Item ID: {} Borrowing date: {}",
            self.id, self.item_id, self.borrow_date
        )?;
        if let Some(returned) = self.return_date() {
            write!(f, " Return Date: {returned}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn borrowing_id_parses_decimal() {
        assert_eq!("42".parse::<BorrowingId>(), Ok(BorrowingId::new(42)));
        assert_eq!("0".parse::<BorrowingId>(), Ok(BorrowingId::new(0)));
        assert!("4a".parse::<BorrowingId>().is_err());
        assert!("".parse::<BorrowingId>().is_err());
    }

    #[test]
    fn borrowing_id_rejects_non_canonical_forms() {
        for text in ["007", "+7", "-7", " 7", "00", "18446744073709551616"] {
            assert_eq!(
                text.parse::<BorrowingId>(),
                Err(InvalidBorrowingId(text.to_string())),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn next_stops_at_the_largest_id() {
        assert_eq!(BorrowingId::new(1).next(), Some(BorrowingId::new(2)));
        assert_eq!(BorrowingId::new(u64::MAX).next(), None);
    }

    #[test]
    fn new_borrowing_is_outstanding() {
        let borrowing = Borrowing::new(BorrowingId::new(1), "B1", "M1", date(2024, 3, 1));
        assert!(borrowing.is_outstanding());
        assert_eq!(borrowing.return_date(), None);
    }

    #[test]
    fn display_shows_return_date_once_returned() {
        let mut borrowing = Borrowing::new(BorrowingId::new(7), "B1", "M1", date(2024, 3, 1));
        assert_eq!(
            borrowing.to_string(),
            "Borrowing ID: 7 Item ID: B1 Borrowing date: 2024-03-01"
        );

        borrowing.state = BorrowingState::Returned {
            on: date(2024, 3, 9),
        };
        assert_eq!(
            borrowing.to_string(),
            "Borrowing ID: 7 Item ID: B1 Borrowing date: 2024-03-01 Return Date: 2024-03-09"
        );
    }
}
