//! One complete run: open the input and output, stream, close.

use tracing::info;

use crate::error::Result;
use crate::io::{CsvSink, CsvSource, Dialect};
use crate::transform::{RecordTransformer, RunSummary, TransformConfig};

/// Transform the CSV at `input` into `output` (`-` for stdin/stdout).
///
/// The configuration is validated before either file is opened. Both files
/// are closed on every return path; on error, rows already written remain
/// in the output.
pub fn run_files(
    input: &str,
    output: &str,
    dialect: &Dialect,
    config: TransformConfig,
) -> Result<RunSummary> {
    let transformer = RecordTransformer::new(config)?;

    info!(
        input = display_path(input),
        output = display_path(output),
        delimiter = %char::from(dialect.delimiter).escape_default(),
        "starting run"
    );

    let source = CsvSource::open(input, dialect)?;
    let mut sink = CsvSink::create(output, dialect)?;
    transformer.run(source, &mut sink)
}

fn display_path(path: &str) -> &str {
    if path == crate::io::STDIO { "(stdio)" } else { path }
}
