//! The interactive session that hosts an [`AttendanceStore`] for one run.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use clap::error::ErrorKind;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::cli::{SessionCommand, SessionLine};
use crate::display::{self, NO_RECORDS, NO_STUDENTS};
use crate::error::AttendanceError;
use crate::export;
use crate::models::StudentId;
use crate::settings::Settings;
use crate::store::AttendanceStore;

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One user's session: the store, the selected date, and where output goes.
pub struct Session<W: Write> {
    store: AttendanceStore,
    selected_date: NaiveDate,
    settings: Settings,
    out: W,
    prompt: bool,
}

impl<W: Write> Session<W> {
    pub fn new(settings: Settings, selected_date: NaiveDate, out: W) -> Self {
        Self {
            store: AttendanceStore::new(),
            selected_date,
            settings,
            out,
            prompt: false,
        }
    }

    /// Prints a prompt before reading each command.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn store(&self) -> &AttendanceStore {
        &self.store
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// Reads and executes commands until `quit` or the end of input.
    ///
    /// A line that fails to parse or execute is reported and the session carries on. Only
    /// failures to read input or write output end the session early.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();

        loop {
            if self.prompt {
                write!(self.out, "[{}]> ", self.selected_date)?;
                self.out.flush()?;
            }

            let Some(line) = lines.next() else {
                break;
            };

            if self.execute_line(&line?)? == Flow::Quit {
                break;
            }
        }

        debug!("session ended");
        Ok(())
    }

    /// Parses and executes a single line of input.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let tokens = match split_line(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                writeln!(self.out, "Error: {e}")?;
                return Ok(Flow::Continue);
            }
        };

        let command = match SessionLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                if !matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                    warn!(line, "could not parse command");
                }
                write!(self.out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };

        debug!(?command, "executing command");
        match self.execute(command) {
            Ok(flow) => Ok(flow),
            Err(e) if e.downcast_ref::<std::io::Error>().is_some() => Err(e),
            Err(e) => {
                writeln!(self.out, "Error: {e:#}")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Executes a parsed command against the store.
    pub fn execute(&mut self, command: SessionCommand) -> Result<Flow> {
        let style = self.settings.table_style;

        match command {
            SessionCommand::SelectDate { date } => {
                self.selected_date = date;
                writeln!(self.out, "Selected {date}.")?;
            }
            SessionCommand::Show => {
                if self.store.num_students() == 0 {
                    writeln!(self.out, "{NO_STUDENTS}")?;
                } else {
                    let table = display::sheet_table(&self.store, self.selected_date, style);
                    let saved = if self.store.is_saved(self.selected_date) {
                        "saved"
                    } else {
                        "not saved"
                    };
                    let date = self.selected_date;
                    writeln!(self.out, "Attendance for {date} ({saved}):\n{table}")?;
                }
            }
            SessionCommand::Save { absent, present } => {
                if self.store.num_students() == 0 {
                    writeln!(self.out, "{NO_STUDENTS}")?;
                } else {
                    let absent: Vec<StudentId> = absent.into_iter().map(StudentId).collect();
                    let present: Vec<StudentId> = present.into_iter().map(StudentId).collect();
                    let statuses =
                        self.store.draft_attendance(self.selected_date, &absent, &present)?;

                    self.store.save_attendance(self.selected_date, statuses);
                    writeln!(
                        self.out,
                        "Attendance for {} saved successfully!",
                        self.selected_date
                    )?;
                }
            }
            SessionCommand::AddStudent { name, year, branch } => {
                if let Some(student) = self.store.add_student(&name, year, &branch) {
                    writeln!(
                        self.out,
                        "Student {} added successfully! (ID {})",
                        student.name, student.id
                    )?;
                }
            }
            SessionCommand::Roster => {
                if self.store.num_students() == 0 {
                    writeln!(self.out, "{NO_STUDENTS}")?;
                } else {
                    let table = display::roster_table(self.store.roster(), style);
                    writeln!(self.out, "Current students:\n{table}")?;
                }
            }
            SessionCommand::DeleteStudents { names } => {
                let removed = self.store.delete_students(&names);
                writeln!(self.out, "Deleted {removed} student(s).")?;
            }
            SessionCommand::Preview => {
                let rows = self.store.export_flat();
                if rows.is_empty() {
                    writeln!(self.out, "{NO_RECORDS}")?;
                } else {
                    writeln!(self.out, "{}", display::export_table(&rows, style))?;
                }
            }
            SessionCommand::Export { path } => {
                let path: PathBuf = path.unwrap_or_else(|| self.settings.export_path.clone());
                let written = export::export_to_path(&self.store, &path)?;
                writeln!(
                    self.out,
                    "Exported {written} record(s) to {}.",
                    path.display()
                )?;
            }
            SessionCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }
}

/// Splits a command line into words. Single or double quotes group words containing spaces,
/// and `""` yields an empty word.
pub fn split_line(line: &str) -> Result<Vec<String>, AttendanceError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(AttendanceError::UnterminatedQuote(line.to_string()));
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TableStyle;

    fn session() -> Session<Vec<u8>> {
        let settings = Settings {
            table_style: TableStyle::Ascii,
            ..Settings::default()
        };
        Session::new(settings, "2024-01-01".parse().unwrap(), Vec::new())
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8(session.out.clone()).unwrap()
    }

    #[test]
    fn split_handles_quotes() {
        assert_eq!(
            split_line(r#"add-student "Asha Rao" --branch 'Comp Sci'"#).unwrap(),
            vec!["add-student", "Asha Rao", "--branch", "Comp Sci"]
        );
        assert_eq!(split_line(r#"add-student """#).unwrap(), vec!["add-student", ""]);
        assert_eq!(split_line("  roster  ").unwrap(), vec!["roster"]);
        assert!(matches!(
            split_line(r#"add-student "Asha"#),
            Err(AttendanceError::UnterminatedQuote(_))
        ));
    }

    #[test]
    fn mark_and_save_flow() {
        let mut session = session();
        let script = "\
add-student \"Asha Rao\" --year SE --branch IT
add-student Ben --year se --branch IT
# Ben is out sick
save --absent 2
quit
add-student Never
";
        session.run(script.as_bytes()).unwrap();

        assert_eq!(session.store().num_students(), 2);
        let rows = session.store().export_flat();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].status.is_present());
        assert!(!rows[1].status.is_present());

        let out = output(&session);
        assert!(out.contains("Student Asha Rao added successfully!"));
        assert!(out.contains("Attendance for 2024-01-01 saved successfully!"));
    }

    #[test]
    fn empty_name_is_silently_ignored() {
        let mut session = session();
        session.execute_line(r#"add-student """#).unwrap();

        assert_eq!(session.store().num_students(), 0);
        assert_eq!(output(&session), "");
    }

    #[test]
    fn show_does_not_save() {
        let mut session = session();
        session.execute_line("add-student Asha").unwrap();
        session.execute_line("show").unwrap();

        assert!(output(&session).contains("(not saved)"));
        assert!(!session.store().is_saved(session.selected_date()));
    }

    #[test]
    fn save_with_unknown_id_saves_nothing() {
        let mut session = session();
        session.execute_line("add-student Asha").unwrap();

        let flow = session.execute_line("save --absent 5").unwrap();

        assert_eq!(flow, Flow::Continue);
        assert!(output(&session).contains("no student with ID 5"));
        assert!(!session.store().is_saved(session.selected_date()));
    }

    #[test]
    fn save_without_students_reports_empty_roster() {
        let mut session = session();
        session.execute_line("save").unwrap();

        assert!(output(&session).contains(NO_STUDENTS));
        assert!(session.store().export_flat().is_empty());
    }

    #[test]
    fn delete_cascades_and_reports_count() {
        let mut session = session();
        for line in [
            "add-student A",
            "add-student B",
            "save --absent 2",
            "delete-students A",
        ] {
            session.execute_line(line).unwrap();
        }

        assert!(output(&session).contains("Deleted 1 student(s)."));
        let rows = session.store().export_flat();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, StudentId(2));
    }

    #[test]
    fn select_date_moves_the_sheet() {
        let mut session = session();
        session.execute_line("add-student A").unwrap();
        session.execute_line("select-date 2024-02-29").unwrap();
        session.execute_line("save").unwrap();

        let dates: Vec<NaiveDate> = session.store().saved_dates().collect();
        assert_eq!(dates, vec!["2024-02-29".parse().unwrap()]);
    }

    #[test]
    fn bad_command_keeps_session_alive() {
        let mut session = session();
        assert_eq!(session.execute_line("frobnicate").unwrap(), Flow::Continue);
        assert_eq!(session.execute_line("preview").unwrap(), Flow::Continue);

        assert!(output(&session).contains(NO_RECORDS));
    }
}
