//! This module contains the command-line interface [`Cli`] parser for the binary, and the
//! [`SessionCommand`] parser for the commands typed during a session.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::Year;

/// Tracks student attendance for one session. Nothing is kept after the session ends, so export
/// the records before quitting.
#[derive(Parser, Debug)]
#[command(name = "attendance", version)]
pub struct Cli {
    /// Settings file to load instead of `config.toml`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read session commands from this file instead of standard input.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// The date selected when the session starts. Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// A single line typed during a session.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Select the date to mark attendance for.
    SelectDate { date: NaiveDate },

    /// Show the attendance sheet for the selected date.
    Show,

    /// Save attendance for the selected date. Students start from their saved status, or present.
    Save {
        /// Comma-separated IDs of students to mark absent.
        #[arg(long, value_delimiter = ',')]
        absent: Vec<u32>,

        /// Comma-separated IDs of students to mark present.
        #[arg(long, value_delimiter = ',')]
        present: Vec<u32>,
    },

    /// Add a new student to the roster.
    AddStudent {
        name: String,

        #[arg(long, value_enum, ignore_case = true, default_value = "FE")]
        year: Year,

        #[arg(long, default_value = "")]
        branch: String,
    },

    /// Show the current roster.
    Roster,

    /// Remove every student with one of the given names, along with their attendance.
    DeleteStudents {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show every saved attendance record.
    Preview,

    /// Write every saved attendance record to a CSV file.
    Export {
        /// Defaults to the configured export path.
        path: Option<PathBuf>,
    },

    /// End the session.
    #[command(alias = "exit")]
    Quit,
}
