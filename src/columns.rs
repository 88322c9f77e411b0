//! Column selection.
//!
//! A [`ColumnSpec`] names the columns to keep, either by 0-based position or
//! by header name. [`resolve`] turns it into concrete positions for one input.

use crate::error::{CsvToolError, Result};
use crate::record::Record;
use tracing::debug;

/// Which columns to select, and in what order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    /// 0-based positions.
    Indices(Vec<usize>),
    /// Header names, matched by exact string equality.
    Names(Vec<String>),
}

impl ColumnSpec {
    /// Build a spec from raw command line values.
    ///
    /// With `named` the values are taken verbatim as header names, otherwise
    /// each value must be a non-negative integer.
    pub fn parse<S: AsRef<str>>(values: &[S], named: bool) -> Result<Self> {
        if values.is_empty() {
            return Err(CsvToolError::NoColumns);
        }

        if named {
            return Ok(ColumnSpec::Names(
                values.iter().map(|v| v.as_ref().to_string()).collect(),
            ));
        }

        let indices = values
            .iter()
            .map(|v| {
                let v = v.as_ref();
                let digits = v.trim();
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(CsvToolError::InvalidColumnIndex(v.to_string()));
                }
                digits
                    .parse::<usize>()
                    .map_err(|_| CsvToolError::InvalidColumnIndex(v.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ColumnSpec::Indices(indices))
    }

    pub fn is_named(&self) -> bool {
        matches!(self, ColumnSpec::Names(_))
    }

    /// Number of selected columns (duplicates included).
    pub fn len(&self) -> usize {
        match self {
            ColumnSpec::Indices(indices) => indices.len(),
            ColumnSpec::Names(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve `spec` into source column positions.
///
/// Index specs are returned unchanged; they are not checked against the
/// header width here, a short row fails later when it is projected.
///
/// Name specs need `header`. Each name maps to the position of its *first*
/// exact match in the header: if the header repeats a name, the later
/// columns with that name can only be selected by index.
///
/// # Example
/// ```
/// use csvtool::{ColumnSpec, Record, resolve};
///
/// let header = Record::from_fields(["Title", "A", "B"]);
/// let spec = ColumnSpec::Names(vec!["B".into(), "Title".into()]);
/// assert_eq!(resolve(&spec, Some(&header)).unwrap(), vec![2, 0]);
/// ```
pub fn resolve(spec: &ColumnSpec, header: Option<&Record>) -> Result<Vec<usize>> {
    match spec {
        ColumnSpec::Indices(indices) => Ok(indices.clone()),
        ColumnSpec::Names(names) => {
            let header = header.ok_or(CsvToolError::HeaderRequired)?;

            let mut positions = Vec::with_capacity(names.len());
            let mut missing = Vec::new();
            for name in names {
                match header.position(name) {
                    Some(position) => positions.push(position),
                    None => missing.push(name.clone()),
                }
            }

            if let Some(first) = missing.first() {
                return Err(CsvToolError::UnknownColumn {
                    name: first.clone(),
                    missing,
                });
            }

            debug!(?names, ?positions, "resolved named columns");
            Ok(positions)
        }
    }
}
