//! CSV encoding of the flattened attendance export.

use crate::error::Result;
use crate::models::AttendanceRow;
use crate::store::AttendanceStore;
use csv::WriterBuilder;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::info;

/// The file name the export is offered under.
pub const DEFAULT_EXPORT_FILE: &str = "attendance_record.csv";

/// The export's header row, in column order.
pub const COLUMNS: [&str; 6] = ["Date", "ID", "Name", "Year", "Branch", "Status"];

/// Writes `rows` as CSV with a header row. The header is written even when there are no rows.
pub fn write_csv<W: io::Write>(rows: &[AttendanceRow], writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Encodes `rows` as UTF-8 CSV bytes.
pub fn to_csv_bytes(rows: &[AttendanceRow]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(buf)
}

/// Exports every saved attendance record in `store` to the file at `path`, replacing it if it
/// exists.
///
/// Returns the number of records written, not counting the header.
pub fn export_to_path(store: &AttendanceStore, path: &Path) -> Result<usize> {
    let rows = store.export_flat();
    let file = File::create(path)?;
    write_csv(&rows, file)?;

    info!(path = %path.display(), rows = rows.len(), "exported attendance");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StudentId, Year};

    #[test]
    fn single_record_export() {
        let mut store = AttendanceStore::new();
        store.add_student("A", Year::Fe, "X");
        store.save_attendance("2024-01-01".parse().unwrap(), [(StudentId(1), true)]);

        let bytes = to_csv_bytes(&store.export_flat()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Date,ID,Name,Year,Branch,Status\n2024-01-01,1,A,FE,X,Present\n"
        );
    }

    #[test]
    fn missing_student_details_are_blank() {
        let mut store = AttendanceStore::new();
        store.save_attendance("2024-01-01".parse().unwrap(), [(StudentId(4), false)]);

        let bytes = to_csv_bytes(&store.export_flat()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Date,ID,Name,Year,Branch,Status\n2024-01-01,4,,,,Absent\n"
        );
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let mut store = AttendanceStore::new();
        store.add_student("Doe, Jane", Year::Be, "Électronique");
        store.save_attendance("2024-05-06".parse().unwrap(), [(StudentId(1), false)]);

        let text = String::from_utf8(to_csv_bytes(&store.export_flat()).unwrap()).unwrap();
        assert!(text.ends_with("2024-05-06,1,\"Doe, Jane\",BE,Électronique,Absent\n"));
    }

    #[test]
    fn empty_export_has_only_the_header() {
        let bytes = to_csv_bytes(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Date,ID,Name,Year,Branch,Status\n"
        );
    }

    #[test]
    fn export_to_path_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);

        let mut store = AttendanceStore::new();
        store.add_student("A", Year::Se, "Civil");
        store.add_student("B", Year::Se, "Civil");
        let date = "2024-01-01".parse().unwrap();
        store.save_attendance(date, store.get_attendance_for_date(date));

        assert_eq!(export_to_path(&store, &path).unwrap(), 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);
    }
}
