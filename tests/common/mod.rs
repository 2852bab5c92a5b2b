use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str = "op, item, name, price, qty, vendor, method, code";

/// Writes a cart-event CSV with the standard header and the given rows.
pub fn events_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}
