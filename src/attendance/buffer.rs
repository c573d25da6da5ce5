use std::collections::BTreeMap;
use std::future::Future;

use super::clock::{Clock, SystemClock};
use super::csv::push_row;
use super::{
    AttendanceStatus, AttendanceUpdate, EditRejected, RosterEntry, CHECK_IN_FORMAT, DATE_FORMAT,
};
use crate::domain::Id;
use crate::error::{ApiError, ApiResult};

/// Backend calls the buffer depends on
pub trait AttendanceBackend: Send + Sync {
    /// Students enrolled in `course_id`
    fn roster(&self, course_id: Id) -> impl Future<Output = ApiResult<Vec<RosterEntry>>> + Send;

    /// Writes the whole batch in one call
    fn bulk_write(&self, batch: &[AttendanceUpdate]) -> impl Future<Output = ApiResult<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterStatus {
    NotSelected,
    Loaded,
    /// Fetch failed; the roster is empty
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Pending was empty, nothing was sent
    NothingToSave,
    Saved { count: usize },
}

/// Roster of the selected course plus unsaved status edits.
///
/// Every mutating operation takes `&mut self`, so a second `commit` cannot
/// start while one is still awaiting the backend.
pub struct AttendanceBuffer<B, C = SystemClock> {
    backend: B,
    clock: C,
    selected_course: Option<Id>,
    roster: Vec<RosterEntry>,
    /// Keys are always ids from `roster`
    pending: BTreeMap<Id, AttendanceStatus>,
    roster_status: RosterStatus,
}

impl<B: AttendanceBackend> AttendanceBuffer<B, SystemClock> {
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<B: AttendanceBackend, C: Clock> AttendanceBuffer<B, C> {
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self {
            backend,
            clock,
            selected_course: None,
            roster: Vec::new(),
            pending: BTreeMap::new(),
            roster_status: RosterStatus::NotSelected,
        }
    }

    /// Switches to `course_id` and loads its roster.
    ///
    /// Pending edits are dropped whether or not the fetch succeeds. A failed
    /// fetch leaves an empty roster and [`RosterStatus::Failed`].
    pub async fn select_course(&mut self, course_id: Id) -> &RosterStatus {
        self.selected_course = Some(course_id);
        self.pending.clear();
        self.roster.clear();

        match self.backend.roster(course_id).await {
            Ok(roster) => {
                tracing::info!(course_id, students = roster.len(), "Roster loaded");
                self.roster = roster;
                self.roster_status = RosterStatus::Loaded;
            }
            Err(e) => {
                tracing::error!(course_id, error = %e, "Failed to load roster");
                self.roster_status = RosterStatus::Failed(e.to_string());
            }
        }

        &self.roster_status
    }

    /// Records a status edit from its wire spelling.
    ///
    /// Returns the new number of pending edits.
    pub fn set_status(&mut self, student_id: Id, status: &str) -> Result<usize, EditRejected> {
        let status = status.parse::<AttendanceStatus>()?;
        self.mark(student_id, status)
    }

    pub fn mark(&mut self, student_id: Id, status: AttendanceStatus) -> Result<usize, EditRejected> {
        if !self.roster.iter().any(|entry| entry.id == student_id) {
            return Err(EditRejected::NotInRoster(student_id));
        }
        self.pending.insert(student_id, status);
        tracing::debug!(student_id, status = %status, pending = self.pending.len(), "Status marked");
        Ok(self.pending.len())
    }

    /// Save records for every pending edit, stamped with the current date and time
    pub fn batch(&self) -> Vec<AttendanceUpdate> {
        let Some(course_id) = self.selected_course else {
            return Vec::new();
        };
        let now = self.clock.now();
        let check_in_time = now.format(CHECK_IN_FORMAT).to_string();

        self.pending
            .iter()
            .map(|(&student_id, &status)| AttendanceUpdate {
                student_id,
                course_id,
                attendance_date: now.date(),
                status,
                check_in_time: check_in_time.clone(),
            })
            .collect()
    }

    /// Flushes pending edits as one bulk write.
    ///
    /// On success pending is cleared in full; on failure it is left exactly
    /// as it was so the user can retry.
    pub async fn commit(&mut self) -> Result<CommitOutcome, ApiError> {
        let batch = self.batch();
        if batch.is_empty() {
            tracing::info!("No attendance changes to save");
            return Ok(CommitOutcome::NothingToSave);
        }

        match self.backend.bulk_write(&batch).await {
            Ok(()) => {
                let count = batch.len();
                self.pending.clear();
                tracing::info!(course_id = ?self.selected_course, count, "Attendance saved");
                Ok(CommitOutcome::Saved { count })
            }
            Err(e) => {
                tracing::error!(
                    course_id = ?self.selected_course,
                    pending = self.pending.len(),
                    error = %e,
                    "Failed to save attendance"
                );
                Err(e)
            }
        }
    }

    /// CSV of the whole roster in roster order; unmarked students included
    pub fn export_csv(&self) -> String {
        let time = self.clock.now().format(CHECK_IN_FORMAT).to_string();
        let mut out = String::new();
        push_row(&mut out, &["Student ID", "Name", "Status", "Time"]);

        for entry in &self.roster {
            let id = entry.id.to_string();
            let status = self
                .pending
                .get(&entry.id)
                .map(AttendanceStatus::as_str)
                .unwrap_or("Unmarked");
            push_row(&mut out, &[&id, &entry.name, status, &time]);
        }
        out
    }

    /// `attendance_<course>_<date>.csv`
    pub fn export_file_name(&self) -> Option<String> {
        let course_id = self.selected_course?;
        Some(format!(
            "attendance_{}_{}.csv",
            course_id,
            self.clock.now().format(DATE_FORMAT)
        ))
    }

    pub fn selected_course(&self) -> Option<Id> {
        self.selected_course
    }

    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn roster_status(&self) -> &RosterStatus {
        &self.roster_status
    }

    pub fn pending(&self) -> &BTreeMap<Id, AttendanceStatus> {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn status_of(&self, student_id: Id) -> Option<AttendanceStatus> {
        self.pending.get(&student_id).copied()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::FixedClock;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeBackend {
        rosters: HashMap<Id, Vec<RosterEntry>>,
        fail_roster: bool,
        fail_writes: bool,
        writes: Arc<Mutex<Vec<Vec<AttendanceUpdate>>>>,
        write_calls: Arc<AtomicUsize>,
    }

    impl FakeBackend {
        fn with_course(course_id: Id, names: &[(Id, &str)]) -> Self {
            let roster = names
                .iter()
                .map(|(id, name)| RosterEntry {
                    id: *id,
                    name: name.to_string(),
                    course_id,
                })
                .collect();
            let mut backend = FakeBackend::default();
            backend.rosters.insert(course_id, roster);
            backend
        }
    }

    impl AttendanceBackend for FakeBackend {
        async fn roster(&self, course_id: Id) -> ApiResult<Vec<RosterEntry>> {
            if self.fail_roster {
                return Err(ApiError::Transport("connection refused".to_string()));
            }
            Ok(self.rosters.get(&course_id).cloned().unwrap_or_default())
        }

        async fn bulk_write(&self, batch: &[AttendanceUpdate]) -> ApiResult<()> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(ApiError::Status {
                    status: 500,
                    body: "db down".to_string(),
                });
            }
            self.writes.lock().unwrap().push(batch.to_vec());
            Ok(())
        }
    }

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2026, 10, 17)
                .unwrap()
                .and_hms_opt(17, 21, 24)
                .unwrap(),
        )
    }

    async fn loaded(backend: FakeBackend, course_id: Id) -> AttendanceBuffer<FakeBackend, FixedClock> {
        let mut buffer = AttendanceBuffer::with_clock(backend, clock());
        buffer.select_course(course_id).await;
        buffer
    }

    #[tokio::test]
    async fn test_export_scenario() {
        let backend = FakeBackend::with_course(1, &[(1, "A"), (2, "B")]);
        let mut buffer = loaded(backend, 1).await;

        assert_eq!(buffer.set_status(1, "Present"), Ok(1));

        let csv = buffer.export_csv();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert_eq!(rows, vec!["1,A,Present,17:21:24", "2,B,Unmarked,17:21:24"]);
    }

    #[tokio::test]
    async fn test_export_has_one_row_per_roster_entry() {
        let names: Vec<(Id, String)> = (1..=25).map(|i| (i, format!("Student {}", i))).collect();
        let refs: Vec<(Id, &str)> = names.iter().map(|(i, n)| (*i, n.as_str())).collect();
        let mut buffer = loaded(FakeBackend::with_course(9, &refs), 9).await;
        buffer.set_status(3, "Late").unwrap();
        buffer.set_status(7, "Absent").unwrap();

        let csv = buffer.export_csv();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert_eq!(rows.len(), 25);
        for (row, (id, _)) in rows.iter().zip(&names) {
            assert!(row.starts_with(&format!("{},", id)));
            let status = row.split(',').nth(2).unwrap();
            assert!(["Late", "Absent", "Unmarked"].contains(&status));
        }
        assert_eq!(rows.iter().filter(|r| r.contains(",Unmarked,")).count(), 23);
    }

    #[tokio::test]
    async fn test_set_status_rejects_unknown_values() {
        let mut buffer = loaded(FakeBackend::with_course(1, &[(1, "A")]), 1).await;
        buffer.set_status(1, "Absent").unwrap();
        let before = buffer.pending().clone();

        assert_eq!(buffer.set_status(1, ""), Err(EditRejected::EmptyStatus));
        assert!(matches!(buffer.set_status(1, "Excused"), Err(EditRejected::UnknownStatus(_))));
        assert!(matches!(buffer.set_status(1, "present"), Err(EditRejected::UnknownStatus(_))));

        assert_eq!(buffer.pending(), &before);
    }

    #[tokio::test]
    async fn test_set_status_requires_roster_membership() {
        let mut buffer = loaded(FakeBackend::with_course(1, &[(1, "A")]), 1).await;
        assert_eq!(buffer.set_status(99, "Present"), Err(EditRejected::NotInRoster(99)));
        assert!(buffer.pending().is_empty());
    }

    #[tokio::test]
    async fn test_set_status_overwrites() {
        let mut buffer = loaded(FakeBackend::with_course(1, &[(1, "A"), (2, "B")]), 1).await;
        assert_eq!(buffer.set_status(1, "Present"), Ok(1));
        assert_eq!(buffer.set_status(1, "Late"), Ok(1));
        assert_eq!(buffer.set_status(2, "Absent"), Ok(2));
        assert_eq!(buffer.status_of(1), Some(AttendanceStatus::Late));
    }

    #[tokio::test]
    async fn test_commit_empty_makes_no_call() {
        let backend = FakeBackend::with_course(1, &[(1, "A")]);
        let calls = backend.write_calls.clone();
        let mut buffer = loaded(backend, 1).await;

        assert_eq!(buffer.commit().await, Ok(CommitOutcome::NothingToSave));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(buffer.pending().is_empty());
        assert_eq!(buffer.roster().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_success_clears_pending() {
        let backend = FakeBackend::with_course(5, &[(1, "A"), (2, "B"), (3, "C")]);
        let writes = backend.writes.clone();
        let mut buffer = loaded(backend, 5).await;
        buffer.set_status(1, "Present").unwrap();
        buffer.set_status(3, "Late").unwrap();

        assert_eq!(buffer.commit().await, Ok(CommitOutcome::Saved { count: 2 }));
        assert!(buffer.pending().is_empty());

        let writes = writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        let batch = &writes[0];
        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch[0],
            AttendanceUpdate {
                student_id: 1,
                course_id: 5,
                attendance_date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
                status: AttendanceStatus::Present,
                check_in_time: "17:21:24".to_string(),
            }
        );
        assert_eq!(batch[1].student_id, 3);
        assert_eq!(batch[1].status, AttendanceStatus::Late);
    }

    #[tokio::test]
    async fn test_commit_failure_keeps_pending() {
        let mut backend = FakeBackend::with_course(1, &[(1, "A"), (2, "B")]);
        backend.fail_writes = true;
        let mut buffer = loaded(backend, 1).await;
        buffer.set_status(1, "Present").unwrap();
        buffer.set_status(2, "Absent").unwrap();
        let before = buffer.pending().clone();

        let result = buffer.commit().await;
        assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
        assert_eq!(buffer.pending(), &before);

        // Retry sends the same batch again
        let result = buffer.commit().await;
        assert!(result.is_err());
        assert_eq!(buffer.pending(), &before);
    }

    #[tokio::test]
    async fn test_select_course_clears_pending() {
        let mut backend = FakeBackend::with_course(1, &[(1, "A")]);
        backend.rosters.insert(
            2,
            vec![RosterEntry {
                id: 10,
                name: "Z".to_string(),
                course_id: 2,
            }],
        );
        let mut buffer = loaded(backend, 1).await;
        buffer.set_status(1, "Late").unwrap();

        buffer.select_course(2).await;

        assert!(buffer.pending().is_empty());
        assert_eq!(buffer.selected_course(), Some(2));
        assert_eq!(buffer.roster()[0].id, 10);
        // Old roster ids are no longer accepted
        assert_eq!(buffer.set_status(1, "Present"), Err(EditRejected::NotInRoster(1)));
    }

    #[tokio::test]
    async fn test_select_course_failure_yields_empty_roster() {
        let mut backend = FakeBackend::with_course(1, &[(1, "A")]);
        backend.fail_roster = true;
        let mut buffer = AttendanceBuffer::with_clock(backend, clock());

        let status = buffer.select_course(1).await.clone();

        assert!(matches!(status, RosterStatus::Failed(_)));
        assert!(buffer.roster().is_empty());
        assert!(buffer.pending().is_empty());
        assert_eq!(buffer.export_csv().lines().count(), 1);
    }

    #[tokio::test]
    async fn test_export_file_name() {
        let buffer = loaded(FakeBackend::with_course(4, &[(1, "A")]), 4).await;
        assert_eq!(
            buffer.export_file_name().as_deref(),
            Some("attendance_4_2026-10-17.csv")
        );

        let fresh = AttendanceBuffer::with_clock(FakeBackend::default(), clock());
        assert!(fresh.export_file_name().is_none());
    }

    #[test]
    fn test_update_serializes_for_backend() {
        let update = AttendanceUpdate {
            student_id: 1,
            course_id: 2,
            attendance_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            status: AttendanceStatus::Absent,
            check_in_time: "08:05:00".to_string(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["studentId"], 1);
        assert_eq!(json["courseId"], 2);
        assert_eq!(json["attendanceDate"], "2026-01-05");
        assert_eq!(json["status"], "Absent");
        assert_eq!(json["checkInTime"], "08:05:00");
    }
}
