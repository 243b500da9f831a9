use crate::error::{AttendanceError, Result};
use crate::models::{AttendanceRow, Status, Student, StudentId, Year};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// The attendance saved for a single day, keyed by student.
pub type DayAttendance = BTreeMap<StudentId, bool>;

/// The store for recording, modifying, and retrieving attendance data over one session.
///
/// Nothing here outlives the store: it is created when a session starts and dropped when the
/// session ends.
#[derive(Debug)]
pub struct AttendanceStore {
    students: Vec<Student>,
    attendance: BTreeMap<NaiveDate, DayAttendance>,
    /// The ID the next added student receives. Never decreases, even after deletions.
    next_id: u32,
}

impl AttendanceStore {
    /// Creates an empty store with no students and no saved attendance.
    pub fn new() -> Self {
        Self {
            students: Vec::new(),
            attendance: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Returns the total number of students on the roster.
    pub fn num_students(&self) -> usize {
        self.students.len()
    }

    /// Retrieves all students on the roster, in the order they were added.
    pub fn roster(&self) -> &[Student] {
        &self.students
    }

    /// Retrieves the names of every student on the roster.
    pub fn roster_names(&self) -> Vec<&str> {
        self.students.iter().map(|s| s.name.as_str()).collect()
    }

    /// Retrieves a specific student from the roster based on their ID.
    pub fn get_student(&self, student_id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    /// Adds a student to the roster and returns the new record.
    ///
    /// An empty name is ignored and returns `None`. Names are not required to be unique.
    pub fn add_student(&mut self, name: &str, year: Year, branch: &str) -> Option<Student> {
        if name.is_empty() {
            debug!("ignoring student with an empty name");
            return None;
        }

        let student = Student {
            id: StudentId(self.next_id),
            name: name.to_string(),
            year,
            branch: branch.to_string(),
        };
        self.next_id += 1;

        info!(id = %student.id, name, %year, branch, "added student");
        self.students.push(student.clone());

        Some(student)
    }

    /// Removes every student whose name is in `names`, then prunes their attendance from every
    /// saved day.
    ///
    /// Returns the number of students removed.
    pub fn delete_students<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: HashSet<String> = names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();

        let before = self.students.len();
        self.students.retain(|student| !names.contains(&student.name));
        let removed = before - self.students.len();

        let remaining: HashSet<StudentId> = self.students.iter().map(|s| s.id).collect();
        for day in self.attendance.values_mut() {
            day.retain(|id, _| remaining.contains(id));
        }

        info!(removed, "deleted students");
        removed
    }

    /// Returns the attendance sheet for `date`: each student's saved status, or present if the
    /// day has no saved status for them.
    ///
    /// This never writes the defaults back into the store.
    pub fn get_attendance_for_date(&self, date: NaiveDate) -> DayAttendance {
        let saved = self.attendance.get(&date);

        self.students
            .iter()
            .map(|student| {
                let present = saved
                    .and_then(|day| day.get(&student.id))
                    .copied()
                    .unwrap_or(true);
                (student.id, present)
            })
            .collect()
    }

    /// Starts from the attendance sheet for `date` and applies the given overrides.
    ///
    /// Fails if either list names a student that is not on the roster. A student listed in both
    /// ends up present.
    pub fn draft_attendance(
        &self,
        date: NaiveDate,
        absent: &[StudentId],
        present: &[StudentId],
    ) -> Result<DayAttendance> {
        let mut sheet = self.get_attendance_for_date(date);

        for (ids, status) in [(absent, false), (present, true)] {
            for id in ids {
                let entry = sheet
                    .get_mut(id)
                    .ok_or(AttendanceError::UnknownStudent(*id))?;
                *entry = status;
            }
        }

        Ok(sheet)
    }

    /// Saves the attendance for `date`, replacing whatever was previously saved for that day.
    pub fn save_attendance<I>(&mut self, date: NaiveDate, statuses: I)
    where
        I: IntoIterator<Item = (StudentId, bool)>,
    {
        let day: DayAttendance = statuses.into_iter().collect();
        info!(%date, students = day.len(), "saved attendance");
        self.attendance.insert(date, day);
    }

    /// Returns whether attendance has ever been saved for `date`.
    pub fn is_saved(&self, date: NaiveDate) -> bool {
        self.attendance.contains_key(&date)
    }

    /// Returns every day with saved attendance, earliest first.
    pub fn saved_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.attendance.keys().copied()
    }

    /// Flattens all saved attendance into one row per day and student, joined with the student's
    /// roster details. Rows are ordered by date, then by student ID.
    pub fn export_flat(&self) -> Vec<AttendanceRow> {
        let by_id: HashMap<StudentId, &Student> =
            self.students.iter().map(|s| (s.id, s)).collect();

        self.attendance
            .iter()
            .flat_map(|(&date, day)| {
                let by_id = &by_id;
                day.iter().map(move |(&id, &present)| {
                    let student = by_id.get(&id);
                    AttendanceRow {
                        date,
                        id,
                        name: student.map(|s| s.name.clone()),
                        year: student.map(|s| s.year),
                        branch: student.map(|s| s.branch.clone()),
                        status: Status::from(present),
                    }
                })
            })
            .collect()
    }
}

impl Default for AttendanceStore {
    fn default() -> Self {
        Self::new()
    }
}
