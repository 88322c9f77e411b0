//! CSV sources and sinks.
//!
//! The transformer only sees [`Record`]s. This module adapts files and
//! stdio to that view using the `csv` crate, configured by an explicit
//! [`Dialect`].

use crate::error::{CsvToolError, Result};
use crate::record::Record;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Path value meaning stdin (input) or stdout (output).
pub const STDIO: &str = "-";

/// CSV dialect shared by the reader and writer of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    /// Quoting applied when writing. Reading always honours quotes.
    pub quote_style: OutputQuoting,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            quote_style: OutputQuoting::Necessary,
        }
    }
}

impl Dialect {
    /// Build a dialect from a single-character delimiter such as `;` or `\t`.
    pub fn with_delimiter(delimiter: char, quote_style: OutputQuoting) -> Result<Self> {
        let delimiter = match delimiter {
            '\t' => b'\t',
            c if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => c as u8,
            c => {
                return Err(CsvToolError::InvalidDialect(format!(
                    "delimiter {c:?} must be a single ASCII character other than a quote or newline"
                )));
            }
        };
        Ok(Self {
            delimiter,
            quote_style,
            ..Self::default()
        })
    }

    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote);
        builder
    }

    fn writer_builder(&self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .quote_style(self.quote_style.into());
        builder
    }
}

/// When the writer quotes a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputQuoting {
    /// Only fields containing the delimiter, a quote or a line break.
    #[default]
    Necessary,
    Always,
    /// Every field that does not parse as a number.
    NonNumeric,
    Never,
}

impl From<OutputQuoting> for QuoteStyle {
    fn from(q: OutputQuoting) -> Self {
        match q {
            OutputQuoting::Necessary => QuoteStyle::Necessary,
            OutputQuoting::Always => QuoteStyle::Always,
            OutputQuoting::NonNumeric => QuoteStyle::NonNumeric,
            OutputQuoting::Never => QuoteStyle::Never,
        }
    }
}

/// Destination for transformed records.
pub trait RecordSink {
    fn write_record(&mut self, record: &Record) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl RecordSink for Vec<Record> {
    fn write_record(&mut self, record: &Record) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Lazy, single-pass reader of CSV records.
pub struct CsvSource {
    reader: csv::Reader<Box<dyn Read>>,
    buffer: StringRecord,
}

impl CsvSource {
    /// Open `path`, or stdin when `path` is `-`.
    pub fn open(path: &str, dialect: &Dialect) -> Result<Self> {
        let input: Box<dyn Read> = if path == STDIO {
            Box::new(io::stdin().lock())
        } else {
            Box::new(BufReader::new(File::open(Path::new(path))?))
        };
        Ok(Self::from_reader(input, dialect))
    }

    pub fn from_reader(input: Box<dyn Read>, dialect: &Dialect) -> Self {
        Self {
            reader: dialect.reader_builder().from_reader(input),
            buffer: StringRecord::new(),
        }
    }
}

impl Iterator for CsvSource {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.buffer) {
            Ok(true) => Some(Ok(Record::from(&self.buffer))),
            Ok(false) => None,
            Err(e) => Some(Err(CsvToolError::Csv(e))),
        }
    }
}

/// CSV writer over a file or stdout.
pub struct CsvSink {
    writer: csv::Writer<Box<dyn Write>>,
    rows_written: usize,
}

impl CsvSink {
    /// Create `path` (truncating it), or write to stdout when `path` is `-`.
    pub fn create(path: &str, dialect: &Dialect) -> Result<Self> {
        let output: Box<dyn Write> = if path == STDIO {
            Box::new(io::stdout().lock())
        } else {
            Box::new(BufWriter::new(File::create(Path::new(path))?))
        };
        Ok(Self::from_writer(output, dialect))
    }

    pub fn from_writer(output: Box<dyn Write>, dialect: &Dialect) -> Self {
        Self {
            writer: dialect.writer_builder().from_writer(output),
            rows_written: 0,
        }
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

impl RecordSink for CsvSink {
    fn write_record(&mut self, record: &Record) -> Result<()> {
        self.writer.write_record(record)?;
        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
