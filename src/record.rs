//! CSV record type.
//!
//! A [`Record`] is one CSV row: an ordered list of string fields. Fields are
//! never coerced, and an empty field is a real value, distinct from a field
//! that is not there at all.

use crate::error::{CsvToolError, Result};
use csv::StringRecord;

/// One CSV row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    /// Create an empty record (zero fields).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from anything that yields string-like fields.
    ///
    /// # Example
    /// ```
    /// use csvtool::Record;
    ///
    /// let r = Record::from_fields(["Title", "A", "B"]);
    /// assert_eq!(r.len(), 3);
    /// assert_eq!(r.field(1), Some("A"));
    /// ```
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get the field at `index`, or `None` past the end of the row.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Position of the first field exactly equal to `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Build a new record from the fields at `positions`, in that order.
    ///
    /// `row` is only used to label the error when a position is past the end
    /// of this record. Short rows are never padded.
    pub fn project(&self, positions: &[usize], row: usize) -> Result<Record> {
        let mut fields = Vec::with_capacity(positions.len());
        for &position in positions {
            match self.fields.get(position) {
                Some(value) => fields.push(value.clone()),
                None => {
                    return Err(CsvToolError::RowProjection {
                        row,
                        position,
                        width: self.fields.len(),
                    });
                }
            }
        }
        Ok(Record { fields })
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

impl From<Vec<String>> for Record {
    fn from(fields: Vec<String>) -> Self {
        Self { fields }
    }
}

impl From<&StringRecord> for Record {
    fn from(record: &StringRecord) -> Self {
        Self::from_fields(record.iter())
    }
}

impl From<StringRecord> for Record {
    fn from(record: StringRecord) -> Self {
        Self::from(&record)
    }
}

impl From<&Record> for StringRecord {
    fn from(record: &Record) -> Self {
        StringRecord::from(record.fields.clone())
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
