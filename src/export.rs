use std::io::Write;

use crate::models::Listing;

/// Output encodings supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// One compact JSON object per line
    Jsonl,
}

/// Errors that can occur while writing listings
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Write listings as one pretty-printed JSON array followed by a newline.
///
/// Uses two-space indentation. Empty optional fields are omitted and no
/// HTML escaping is applied to the values.
///
/// # Errors
/// Returns an error if serialization or writing fails
pub fn write_json<W: Write>(listings: &[Listing], writer: &mut W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut *writer, listings)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Export listings to JSONL format
/// Each listing is written as a single line of JSON followed by a newline
///
/// # Errors
/// Returns an error if JSON serialization or writing fails
pub fn export_to_jsonl<'a, W: Write, I: IntoIterator<Item = &'a Listing>>(
    listings: I,
    writer: &mut W,
) -> Result<(), ExportError> {
    for listing in listings {
        serde_json::to_writer(&mut *writer, listing)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Write listings in the requested format and flush the writer
pub fn write_listings<W: Write>(
    listings: &[Listing],
    format: OutputFormat,
    writer: &mut W,
) -> Result<(), ExportError> {
    match format {
        OutputFormat::Json => write_json(listings, writer)?,
        OutputFormat::Jsonl => export_to_jsonl(listings, writer)?,
    }
    writer.flush()?;
    Ok(())
}
