//! In-memory timesheet store.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::{ApprovalRecord, NewTimesheet, PayQuote, Timesheet};

use super::{TimesheetStore, TransitionCommit};

#[derive(Debug, Default)]
struct Inner {
    timesheets: BTreeMap<u64, Timesheet>,
    records: Vec<ApprovalRecord>,
    last_timesheet_id: u64,
    last_record_id: u64,
}

/// A [`TimesheetStore`] backed by a single lock.
///
/// Every write takes the write lock for its whole duration, so the version
/// check, the status change and the audit append cannot interleave with
/// another writer.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| EngineError::StorageUnavailable {
            message: "timesheet store lock poisoned".to_string(),
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| EngineError::StorageUnavailable {
            message: "timesheet store lock poisoned".to_string(),
        })
    }
}

impl TimesheetStore for InMemoryStore {
    fn insert(
        &self,
        new: NewTimesheet,
        pay: PayQuote,
        now: DateTime<Utc>,
    ) -> EngineResult<Timesheet> {
        let mut inner = self.write()?;

        let duplicate = inner.timesheets.values().any(|existing| {
            existing.tutor_id() == new.tutor_id
                && existing.course_id() == new.course_id
                && existing.week_start_date() == new.week_start_date
        });
        if duplicate {
            return Err(EngineError::duplicate_timesheet(
                new.tutor_id,
                new.course_id,
                new.week_start_date,
            ));
        }

        inner.last_timesheet_id += 1;
        let id = inner.last_timesheet_id;
        let timesheet = Timesheet::draft(id, new, pay, now);
        inner.timesheets.insert(id, timesheet.clone());

        Ok(timesheet)
    }

    fn get(&self, id: u64) -> EngineResult<Option<Timesheet>> {
        Ok(self.read()?.timesheets.get(&id).cloned())
    }

    fn find_by_week(
        &self,
        tutor_id: u64,
        course_id: u64,
        week_start_date: NaiveDate,
    ) -> EngineResult<Option<Timesheet>> {
        Ok(self
            .read()?
            .timesheets
            .values()
            .find(|t| {
                t.tutor_id() == tutor_id
                    && t.course_id() == course_id
                    && t.week_start_date() == week_start_date
            })
            .cloned())
    }

    fn list(&self) -> EngineResult<Vec<Timesheet>> {
        Ok(self.read()?.timesheets.values().cloned().collect())
    }

    fn commit_transition(
        &self,
        commit: TransitionCommit,
    ) -> EngineResult<(Timesheet, ApprovalRecord)> {
        let mut inner = self.write()?;
        let next_record_id = inner.last_record_id + 1;

        let timesheet = inner
            .timesheets
            .get_mut(&commit.timesheet_id)
            .ok_or(EngineError::TimesheetNotFound {
                id: commit.timesheet_id,
            })?;

        if timesheet.version() != commit.expected_version
            || timesheet.status() != commit.previous_status
        {
            return Err(EngineError::ConcurrentModification {
                timesheet_id: commit.timesheet_id,
                expected_version: commit.expected_version,
                actual_version: timesheet.version(),
            });
        }

        timesheet.apply_status(commit.new_status, commit.timestamp);
        let updated = timesheet.clone();

        let record = ApprovalRecord {
            id: next_record_id,
            timesheet_id: commit.timesheet_id,
            actor_id: commit.actor.id,
            actor_role: commit.actor.role,
            action: commit.action,
            previous_status: commit.previous_status,
            new_status: commit.new_status,
            comment: commit.comment,
            timestamp: commit.timestamp,
        };
        inner.last_record_id = next_record_id;
        inner.records.push(record.clone());

        Ok((updated, record))
    }

    fn history(&self, timesheet_id: u64) -> EngineResult<Vec<ApprovalRecord>> {
        Ok(self
            .read()?
            .records
            .iter()
            .filter(|record| record.timesheet_id == timesheet_id)
            .cloned()
            .collect())
    }
}
