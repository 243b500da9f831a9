use crate::models::{AttendanceRow, Status, Student, StudentId};
use crate::settings::TableStyle;
use crate::store::AttendanceStore;
use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Shown instead of the roster or the attendance sheet while nobody is enrolled.
pub const NO_STUDENTS: &str = "No students added yet.";

/// Shown instead of the export preview while no attendance has been saved.
pub const NO_RECORDS: &str = "No attendance records to display or download yet.";

fn styled(mut table: Table, style: TableStyle) -> Table {
    match style {
        TableStyle::Modern => table.with(Style::modern()),
        TableStyle::Ascii => table.with(Style::ascii()),
        TableStyle::Markdown => table.with(Style::markdown()),
    };
    table
}

/// Renders the current roster.
pub fn roster_table(roster: &[Student], style: TableStyle) -> Table {
    styled(Table::new(roster), style)
}

/// Renders the attendance sheet for `date`, with unsaved students shown as present.
pub fn sheet_table(store: &AttendanceStore, date: NaiveDate, style: TableStyle) -> Table {
    #[derive(Tabled)]
    struct SheetRow<'a> {
        #[tabled(rename = "ID")]
        id: StudentId,
        #[tabled(rename = "Name")]
        name: &'a str,
        #[tabled(rename = "Status")]
        status: Status,
    }

    let rows: Vec<SheetRow> = store
        .get_attendance_for_date(date)
        .into_iter()
        .filter_map(|(id, present)| {
            store.get_student(id).map(|student| SheetRow {
                id,
                name: &student.name,
                status: Status::from(present),
            })
        })
        .collect();

    styled(Table::new(rows), style)
}

/// Renders the flattened export the way it will be written to CSV.
pub fn export_table(rows: &[AttendanceRow], style: TableStyle) -> Table {
    #[derive(Tabled)]
    struct PreviewRow {
        #[tabled(rename = "Date")]
        date: NaiveDate,
        #[tabled(rename = "ID")]
        id: StudentId,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Year")]
        year: String,
        #[tabled(rename = "Branch")]
        branch: String,
        #[tabled(rename = "Status")]
        status: Status,
    }

    let preview: Vec<PreviewRow> = rows
        .iter()
        .map(|row| PreviewRow {
            date: row.date,
            id: row.id,
            name: row.name.clone().unwrap_or_default(),
            year: row.year.map(|y| y.to_string()).unwrap_or_default(),
            branch: row.branch.clone().unwrap_or_default(),
            status: row.status,
        })
        .collect();

    styled(Table::new(preview), style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Year;

    #[test]
    fn sheet_shows_defaults_and_saved_status() {
        let mut store = AttendanceStore::new();
        store.add_student("Asha", Year::Fe, "IT");
        store.add_student("Ben", Year::Fe, "IT");
        let date = "2024-01-01".parse().unwrap();
        store.save_attendance(date, [(StudentId(2), false)]);

        let rendered = sheet_table(&store, date, TableStyle::Markdown).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].contains("ID") && lines[0].contains("Status"));
        assert!(lines[2].contains("Asha") && lines[2].contains("Present"));
        assert!(lines[3].contains("Ben") && lines[3].contains("Absent"));
    }

    #[test]
    fn preview_leaves_missing_details_blank() {
        let mut store = AttendanceStore::new();
        store.save_attendance("2024-01-01".parse().unwrap(), [(StudentId(3), true)]);

        let rendered = export_table(&store.export_flat(), TableStyle::Ascii).to_string();
        assert!(rendered.contains("2024-01-01"));
        assert!(rendered.contains("Present"));
        assert!(rendered.contains("Branch"));
    }
}
