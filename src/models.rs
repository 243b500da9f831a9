use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

use crate::error::AttendanceError;

/// A student's roster ID. IDs are handed out by the store and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u32);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The year of study a student is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Year {
    #[serde(rename = "FE")]
    #[value(name = "FE")]
    Fe,
    #[serde(rename = "SE")]
    #[value(name = "SE")]
    Se,
    #[serde(rename = "TE")]
    #[value(name = "TE")]
    Te,
    #[serde(rename = "BE")]
    #[value(name = "BE")]
    Be,
}

impl Year {
    /// Every year, in the order they are offered when adding a student.
    pub const ALL: [Year; 4] = [Year::Fe, Year::Se, Year::Te, Year::Be];

    pub fn as_str(&self) -> &'static str {
        match self {
            Year::Fe => "FE",
            Year::Se => "SE",
            Year::Te => "TE",
            Year::Be => "BE",
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Year {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Year::ALL
            .into_iter()
            .find(|year| year.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AttendanceError::InvalidYear(s.to_string()))
    }
}

/// Whether a student was in class on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Present,
    Absent,
}

impl Status {
    pub fn is_present(&self) -> bool {
        matches!(self, Status::Present)
    }
}

impl From<bool> for Status {
    fn from(present: bool) -> Self {
        if present {
            Status::Present
        } else {
            Status::Absent
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Present => write!(f, "Present"),
            Status::Absent => write!(f, "Absent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct Student {
    #[tabled(rename = "ID")]
    pub id: StudentId,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Year")]
    pub year: Year,
    #[tabled(rename = "Branch")]
    pub branch: String,
}

/// One line of the flattened attendance export.
///
/// The student columns are optional because the export left-joins saved attendance against the
/// current roster: a record whose student is gone keeps its row but loses the details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRow {
    #[serde(rename = "Date")]
    pub date: chrono::NaiveDate,
    #[serde(rename = "ID")]
    pub id: StudentId,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<Year>,
    #[serde(rename = "Branch")]
    pub branch: Option<String>,
    #[serde(rename = "Status")]
    pub status: Status,
}
