//! # csvtool
//!
//! Select, reorder and rename the columns of a CSV stream, and keep or drop
//! data rows by position.
//!
//! ## Overview
//!
//! - **Columns** are chosen by 0-based index or, in named mode, by header
//!   name ([`ColumnSpec`], [`resolve`]).
//! - **Rows** are chosen with a range expression such as `0,3-` ([`RangeSet`])
//!   which can be inverted ([`RowFilter`]).
//! - **Streaming**: [`RecordTransformer`] handles one record at a time and
//!   writes it before reading the next.
//!
//! ## Example
//!
//! ```
//! use csvtool::{ColumnSpec, RangeSet, Record, RecordTransformer, RowFilter, TransformConfig};
//!
//! let input = vec![
//!     Record::from_fields(["Title", "A", "B"]),
//!     Record::from_fields(["x", "1", "2"]),
//!     Record::from_fields(["y", "3", "4"]),
//! ];
//!
//! let config = TransformConfig::new(ColumnSpec::Names(vec!["B".into(), "Title".into()]))
//!     .with_rename(vec!["Bee".into(), String::new()])
//!     .with_filter(RowFilter::new(RangeSet::parse("1-").unwrap(), false));
//!
//! let mut output: Vec<Record> = Vec::new();
//! RecordTransformer::new(config)
//!     .unwrap()
//!     .run(input.into_iter().map(Ok), &mut output)
//!     .unwrap();
//!
//! assert_eq!(output, vec![
//!     Record::from_fields(["Bee", "Title"]),
//!     Record::from_fields(["4", "y"]),
//! ]);
//! ```

pub mod columns;
pub mod error;
pub mod io;
pub mod range;
pub mod record;
pub mod runner;
pub mod transform;

pub use columns::{ColumnSpec, resolve};
pub use error::{CsvToolError, ErrorClass, Result};
pub use io::{CsvSink, CsvSource, Dialect, OutputQuoting, RecordSink};
pub use range::{RangeSet, RowFilter};
pub use record::Record;
pub use runner::run_files;
pub use transform::{RecordTransformer, RunSummary, TransformConfig};
