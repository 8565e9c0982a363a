//! Line encoding of catalog records.
//!
//! Every record is a single line of comma-separated fields in a fixed order.
//! Absent values are written as the literal [`NULL_MARKER`].
//!
//! [`NULL_MARKER`]: crate::domain::NULL_MARKER
//!
//! | record    | fields                                                                    |
//! |-----------|---------------------------------------------------------------------------|
//! | library   | `library_id,name`                                                         |
//! | item      | `item_id,library_id,item_type,name,book_author,article_journal,media_format` |
//! | member    | `member_id,first_name,last_name,email`                                    |
//! | borrowing | `borrowing_id,item_id,member_id,borrow_date,return_date`                  |

use chrono::NaiveDate;

use crate::domain::{
    item::UnknownItemType, Borrowing, BorrowingId, BorrowingState, InvalidBorrowingId, Item,
    ItemType, Library, Member, DELIMITER, NULL_MARKER,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A type that is stored as one line of a backing file.
pub trait Record: Sized {
    /// Encodes the record as a single line, without the trailing newline.
    fn encode(&self) -> String;

    /// Decodes a record from a single line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not hold a well-formed record.
    fn decode(line: &str) -> Result<Self, MalformedRecord>;
}

/// A line that does not hold a well-formed record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRecord {
    /// The line has the wrong number of fields.
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        /// Fields required by the record type.
        expected: usize,
        /// Fields present on the line.
        found: usize,
    },
    /// The item type column holds an unknown value.
    #[error(transparent)]
    ItemType(#[from] UnknownItemType),
    /// The column matching the item type holds the null marker.
    #[error("{item_type} record has no value in the {column} column")]
    MissingAttribute {
        /// The declared item type.
        item_type: ItemType,
        /// The empty column.
        column: &'static str,
    },
    /// A column belonging to another item type holds a value.
    #[error("{item_type} record has a value in the {column} column")]
    UnexpectedAttribute {
        /// The declared item type.
        item_type: ItemType,
        /// The populated column.
        column: &'static str,
    },
    /// A date column is not in `YYYY-MM-DD` form.
    #[error("invalid date '{value}': {source}")]
    Date {
        /// The offending value.
        value: String,
        /// Why it could not be parsed.
        source: chrono::ParseError,
    },
    /// The borrowing ID is not a decimal number in canonical form.
    #[error(transparent)]
    BorrowingId(#[from] InvalidBorrowingId),
}

fn fields<const N: usize>(line: &str) -> Result<[&str; N], MalformedRecord> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let found = fields.len();
    fields
        .try_into()
        .map_err(|_| MalformedRecord::FieldCount { expected: N, found })
}

fn optional(field: &str) -> Option<&str> {
    (field != NULL_MARKER).then_some(field)
}

fn parse_date(value: &str) -> Result<NaiveDate, MalformedRecord> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| MalformedRecord::Date {
        value: value.to_string(),
        source,
    })
}

impl Record for Library {
    fn encode(&self) -> String {
        format!("{}{DELIMITER}{}", self.id, self.name)
    }

    fn decode(line: &str) -> Result<Self, MalformedRecord> {
        let [id, name] = fields(line)?;
        Ok(Self::new(id, name))
    }
}

/// The type-specific columns of an item record, in file order.
const ATTRIBUTE_COLUMNS: [(ItemType, &str); 3] = [
    (ItemType::Book, "book_author"),
    (ItemType::Article, "article_journal"),
    (ItemType::DigitalMedia, "media_format"),
];

impl Record for Item {
    fn encode(&self) -> String {
        let mut line = [
            self.id.as_str(),
            self.library_id.as_str(),
            self.item_type().as_str(),
            self.name.as_str(),
        ]
        .join(",");

        for (column_type, _) in ATTRIBUTE_COLUMNS {
            line.push(DELIMITER);
            if column_type == self.item_type() {
                line.push_str(self.kind.attribute());
            } else {
                line.push_str(NULL_MARKER);
            }
        }
        line
    }

    fn decode(line: &str) -> Result<Self, MalformedRecord> {
        let [id, library_id, item_type, name, author, journal, format] = fields(line)?;
        let item_type: ItemType = item_type.parse()?;

        let mut attribute = None;
        let columns = ATTRIBUTE_COLUMNS.into_iter().zip([author, journal, format]);
        for ((column_type, column), value) in columns {
            match (column_type == item_type, optional(value)) {
                (true, Some(value)) => attribute = Some(value),
                (true, None) => {
                    return Err(MalformedRecord::MissingAttribute { item_type, column });
                }
                (false, Some(_)) => {
                    return Err(MalformedRecord::UnexpectedAttribute { item_type, column });
                }
                (false, None) => {}
            }
        }
        let attribute = attribute.ok_or(MalformedRecord::MissingAttribute {
            item_type,
            column: "attribute",
        })?;

        Ok(Self::new(
            id,
            library_id,
            name,
            item_type.with_attribute(attribute),
        ))
    }
}

impl Record for Member {
    fn encode(&self) -> String {
        [
            self.id.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
        ]
        .join(",")
    }

    fn decode(line: &str) -> Result<Self, MalformedRecord> {
        let [id, first_name, last_name, email] = fields(line)?;
        Ok(Self::new(id, first_name, last_name, email))
    }
}

impl Record for Borrowing {
    fn encode(&self) -> String {
        let return_date = self
            .return_date()
            .map_or_else(|| NULL_MARKER.to_string(), |date| date.format(DATE_FORMAT).to_string());
        format!(
            "{id},{item},{member},{borrowed},{return_date}",
            id = self.id,
            item = self.item_id,
            member = self.member_id,
            borrowed = self.borrow_date.format(DATE_FORMAT),
        )
    }

    fn decode(line: &str) -> Result<Self, MalformedRecord> {
        let [id, item_id, member_id, borrow_date, return_date] = fields(line)?;

        let id: BorrowingId = id.parse()?;
        let state = match optional(return_date) {
            None => BorrowingState::Outstanding,
            Some(date) => BorrowingState::Returned {
                on: parse_date(date)?,
            },
        };

        Ok(Self {
            id,
            item_id: item_id.to_string(),
            member_id: member_id.to_string(),
            borrow_date: parse_date(borrow_date)?,
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn library_line_layout() {
        let library = Library::new("L1", "Central");
        assert_eq!(library.encode(), "L1,Central");
        assert_eq!(Library::decode("L1,Central").unwrap(), library);
    }

    #[test]
    fn item_lines_always_have_seven_fields() {
        let cases = [
            (
                Item::new("B1", "L1", "Dune", ItemType::Book.with_attribute("Herbert")),
                "B1,L1,Book,Dune,Herbert,None,None",
            ),
            (
                Item::new("A1", "L1", "Relativity", ItemType::Article.with_attribute("Annalen")),
                "A1,L1,Article,Relativity,None,Annalen,None",
            ),
            (
                Item::new("D1", "L1", "Metropolis", ItemType::DigitalMedia.with_attribute("DVD")),
                "D1,L1,Digital Media,Metropolis,None,None,DVD",
            ),
        ];

        for (item, line) in cases {
            assert_eq!(item.encode(), line);
            assert_eq!(Item::decode(line).unwrap(), item);
        }
    }

    #[test]
    fn member_line_layout() {
        let member = Member::new("M1", "Ada", "Lovelace", "ada@example.com");
        assert_eq!(member.encode(), "M1,Ada,Lovelace,ada@example.com");
        assert_eq!(Member::decode(&member.encode()).unwrap(), member);
    }

    #[test]
    fn borrowing_round_trips_with_and_without_return_date() {
        let mut borrowing = Borrowing::new(BorrowingId::new(12), "B1", "M1", date(2024, 2, 29));
        assert_eq!(borrowing.encode(), "12,B1,M1,2024-02-29,None");
        assert_eq!(Borrowing::decode(&borrowing.encode()).unwrap(), borrowing);

        borrowing.state = BorrowingState::Returned {
            on: date(2024, 3, 4),
        };
        assert_eq!(borrowing.encode(), "12,B1,M1,2024-02-29,2024-03-04");
        assert_eq!(Borrowing::decode(&borrowing.encode()).unwrap(), borrowing);
    }

    #[test]
    fn wrong_field_count_is_malformed() {
        assert_eq!(
            Library::decode("L1,Central,extra"),
            Err(MalformedRecord::FieldCount {
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            Member::decode("M1,Ada"),
            Err(MalformedRecord::FieldCount {
                expected: 4,
                found: 2
            })
        );
    }

    #[test]
    fn item_attribute_must_match_type() {
        assert_eq!(
            Item::decode("B1,L1,Book,Dune,None,Annalen,None"),
            Err(MalformedRecord::MissingAttribute {
                item_type: ItemType::Book,
                column: "book_author"
            })
        );
        assert_eq!(
            Item::decode("B1,L1,Book,Dune,Herbert,Annalen,None"),
            Err(MalformedRecord::UnexpectedAttribute {
                item_type: ItemType::Book,
                column: "article_journal"
            })
        );
        assert!(matches!(
            Item::decode("B1,L1,Pamphlet,Dune,Herbert,None,None"),
            Err(MalformedRecord::ItemType(_))
        ));
    }

    #[test]
    fn bad_dates_and_ids_are_malformed() {
        assert!(matches!(
            Borrowing::decode("1,B1,M1,yesterday,None"),
            Err(MalformedRecord::Date { value, .. }) if value == "yesterday"
        ));
        assert!(matches!(
            Borrowing::decode("1,B1,M1,2024-01-01,2024-13-01"),
            Err(MalformedRecord::Date { .. })
        ));
        assert!(matches!(
            Borrowing::decode("one,B1,M1,2024-01-01,None"),
            Err(MalformedRecord::BorrowingId(_))
        ));
    }

    #[test]
    fn borrowing_ids_must_read_back_unchanged() {
        for id in ["007", "+7"] {
            let line = format!("{id},B1,M1,2024-01-01,None");
            assert_eq!(
                Borrowing::decode(&line),
                Err(MalformedRecord::BorrowingId(
                    id.parse::<BorrowingId>().unwrap_err()
                ))
            );
        }
        assert_eq!(
            Borrowing::decode("7,B1,M1,2024-01-01,None").unwrap().encode(),
            "7,B1,M1,2024-01-01,None"
        );
    }
}
