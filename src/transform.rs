//! Streaming record transformer.
//!
//! [`RecordTransformer`] pulls records one at a time and pushes each result
//! to a [`RecordSink`] before the next record is read. Nothing is buffered
//! and output order is input order.
//!
//! Per input record:
//!
//! 1. In named mode the first record is the header. It resolves the column
//!    names and, with `print_header`, yields the (renamed) output header.
//! 2. Every later record is a data row with a 0-based index. The row filter
//!    decides whether it is kept; the index advances either way.
//! 3. Kept rows are projected through the resolved positions.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::columns::{ColumnSpec, resolve};
use crate::error::{CsvToolError, Result};
use crate::io::RecordSink;
use crate::range::RowFilter;
use crate::record::Record;

/// Everything a run needs besides its input and output.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Columns to keep; [`ColumnSpec::Names`] selects named mode.
    pub columns: ColumnSpec,
    /// Output header names, one per selected column.
    pub rename: Option<Vec<String>>,
    pub filter: RowFilter,
    pub print_header: bool,
}

impl TransformConfig {
    /// Keep `columns` from every row and print a header where there is one.
    pub fn new(columns: ColumnSpec) -> Self {
        Self {
            columns,
            rename: None,
            filter: RowFilter::pass_all(),
            print_header: true,
        }
    }

    pub fn with_rename(mut self, rename: Vec<String>) -> Self {
        self.rename = Some(rename);
        self
    }

    pub fn with_filter(mut self, filter: RowFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_print_header(mut self, print_header: bool) -> Self {
        self.print_header = print_header;
        self
    }

    pub fn named(&self) -> bool {
        self.columns.is_named()
    }
}

/// Counters for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Data rows considered by the filter (the header is not a data row).
    pub rows_read: usize,
    /// Data rows written (the header is not counted).
    pub rows_written: usize,
    pub header_written: bool,
    /// Width every row is compared against: the header's in named mode,
    /// otherwise the first data row's.
    pub reference_width: Option<usize>,
    /// Number of data rows seen for each row width.
    pub widths: BTreeMap<usize, usize>,
}

impl RunSummary {
    /// True when every data row had the reference width.
    pub fn is_rectangular(&self) -> bool {
        match self.reference_width {
            Some(width) => self.widths.keys().all(|&w| w == width),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingHeader,
    Streaming,
}

/// Column projection, renaming and row filtering over a record stream.
///
/// Finishing the run consumes the transformer, so a transformer is good for
/// exactly one stream.
#[derive(Debug)]
pub struct RecordTransformer {
    config: TransformConfig,
    phase: Phase,
    positions: Vec<usize>,
    /// Index-mode header waiting to go out ahead of the first row.
    pending_header: Option<Record>,
    row: usize,
    summary: RunSummary,
}

impl RecordTransformer {
    /// Validate `config` and prepare a run.
    ///
    /// Configuration errors (no columns, wrong number of new names) are
    /// reported here, before any input is read.
    pub fn new(config: TransformConfig) -> Result<Self> {
        if config.columns.is_empty() {
            return Err(CsvToolError::NoColumns);
        }
        if let Some(rename) = &config.rename
            && rename.len() != config.columns.len()
        {
            return Err(CsvToolError::RenameLengthMismatch {
                expected: config.columns.len(),
                got: rename.len(),
            });
        }
        if config.filter.invert() && config.filter.is_bypassed() {
            warn!("--invert-filter has no effect without a filter; passing all rows");
        }

        let (phase, positions, pending_header) = if config.named() {
            (Phase::AwaitingHeader, Vec::new(), None)
        } else {
            let positions = resolve(&config.columns, None)?;
            // Without a header row the new names are the only header there is.
            let header = match (&config.rename, config.print_header) {
                (Some(rename), true) => Some(Record::from_fields(rename.iter().cloned())),
                _ => None,
            };
            (Phase::Streaming, positions, header)
        };

        Ok(Self {
            config,
            phase,
            positions,
            pending_header,
            row: 0,
            summary: RunSummary::default(),
        })
    }

    /// Resolved source positions. Empty until the header is seen in named mode.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Drive a whole input stream into `sink` and finish the run.
    ///
    /// Stops at the first error; rows already written stay written.
    pub fn run<I, S>(mut self, input: I, sink: &mut S) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<Record>>,
        S: RecordSink + ?Sized,
    {
        for record in input {
            self.process(record?, sink)?;
        }
        self.finish(sink)
    }

    /// Feed one input record.
    pub fn process<S>(&mut self, record: Record, sink: &mut S) -> Result<()>
    where
        S: RecordSink + ?Sized,
    {
        match self.phase {
            Phase::AwaitingHeader => self.accept_header(record, sink),
            Phase::Streaming => self.accept_row(record, sink),
        }
    }

    /// End of input: emit anything still pending, flush, and report.
    pub fn finish<S>(mut self, sink: &mut S) -> Result<RunSummary>
    where
        S: RecordSink + ?Sized,
    {
        if self.phase == Phase::AwaitingHeader {
            return Err(CsvToolError::HeaderRequired);
        }
        self.emit_pending_header(sink)?;
        sink.flush()?;

        if !self.summary.is_rectangular() {
            warn!(
                "row width histogram shows {} distinct widths: {:?}",
                self.summary.widths.len(),
                self.summary.widths
            );
        }
        info!(
            rows_read = self.summary.rows_read,
            rows_written = self.summary.rows_written,
            "run complete"
        );
        Ok(self.summary)
    }

    fn accept_header<S>(&mut self, header: Record, sink: &mut S) -> Result<()>
    where
        S: RecordSink + ?Sized,
    {
        info!("header has {} columns", header.len());
        self.positions = resolve(&self.config.columns, Some(&header))?;
        self.summary.reference_width = Some(header.len());
        info!(positions = ?self.positions, "working on columns");

        if self.config.print_header {
            let projected = header.project(&self.positions, 0)?;
            let out = match &self.config.rename {
                Some(rename) => rename_header(projected, rename),
                None => projected,
            };
            sink.write_record(&out)?;
            self.summary.header_written = true;
        }

        self.phase = Phase::Streaming;
        Ok(())
    }

    fn accept_row<S>(&mut self, record: Record, sink: &mut S) -> Result<()>
    where
        S: RecordSink + ?Sized,
    {
        self.emit_pending_header(sink)?;

        let row = self.row;
        self.row += 1;
        self.summary.rows_read += 1;
        self.track_width(row, record.len());

        if !self.config.filter.keeps(row as u64) {
            return Ok(());
        }

        let out = record.project(&self.positions, row)?;
        sink.write_record(&out)?;
        self.summary.rows_written += 1;
        Ok(())
    }

    fn emit_pending_header<S>(&mut self, sink: &mut S) -> Result<()>
    where
        S: RecordSink + ?Sized,
    {
        if let Some(header) = self.pending_header.take() {
            sink.write_record(&header)?;
            self.summary.header_written = true;
        }
        Ok(())
    }

    fn track_width(&mut self, row: usize, width: usize) {
        *self.summary.widths.entry(width).or_insert(0) += 1;
        match self.summary.reference_width {
            None => self.summary.reference_width = Some(width),
            Some(expected) if expected != width => {
                warn!(row, width, expected, "row width differs from reference width");
            }
            Some(_) => {}
        }
    }
}

/// Substitute new names into a projected header; an empty name keeps the
/// original cell.
fn rename_header(projected: Record, rename: &[String]) -> Record {
    Record::from_fields(
        projected
            .into_fields()
            .into_iter()
            .zip(rename)
            .map(|(original, new)| if new.is_empty() { original } else { new.clone() }),
    )
}
