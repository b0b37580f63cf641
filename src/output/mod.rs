//! CSV export of finished records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{COLUMNS, Record};

/// UTF-8 byte-order mark, so spreadsheet tools pick the right encoding for Persian text.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write `records` to `path`, replacing any existing file.
pub fn save_csv(path: &Path, records: &[Record]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(BufWriter::new(file), records)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Header row plus one row per record. The header is written even when
/// there are no records.
pub fn write_csv<W: Write>(mut out: W, records: &[Record]) -> Result<()> {
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
