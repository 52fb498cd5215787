//! The working set of job records shown on the dashboard.
//!
//! A `JobStore` is owned by whoever drives the UI and passed explicitly; it
//! holds no connection to persistence. Jobs with a status change in flight
//! are marked busy and refuse further status mutations until settled.

use crate::jobs::filter::{self, JobQuery};
use crate::jobs::types::job::{Job, JobPatch, JobStatus};
use crate::jobs::types::stats::{self, JobStats, KanbanColumn};

use chrono::NaiveDateTime;
use std::collections::HashSet;
use thiserror::Error;

/// Local-only ids are handed out above this so they never collide with
/// rows from the database
pub const TEMP_ID_START: i32 = 1000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Job not found: {0}")]
    NotFound(i32),

    #[error("Job {0} already has a change in progress")]
    Busy(i32),
}

#[derive(Clone, Debug, Default)]
pub struct JobStore {
    jobs: Vec<Job>,
    last_temp_id: i32,
    busy: HashSet<i32>
}

impl JobStore {
    pub fn new(jobs: Vec<Job>) -> JobStore {
        let highest = jobs.iter().map(|j| j.id).max().unwrap_or(0);
        JobStore {
            jobs,
            last_temp_id: std::cmp::max(TEMP_ID_START, highest),
            busy: HashSet::new()
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn get(&self, id: i32) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    fn get_mut(&mut self, id: i32) -> Result<&mut Job, StoreError> {
        self.jobs.iter_mut().find(|j| j.id == id).ok_or(StoreError::NotFound(id))
    }

    pub fn next_temp_id(&mut self) -> i32 {
        self.last_temp_id += 1;
        self.last_temp_id
    }

    /// New jobs go to the front
    pub fn prepend(&mut self, job: Job) {
        self.last_temp_id = std::cmp::max(self.last_temp_id, job.id);
        self.jobs.insert(0, job);
    }

    /// Swap in a record returned by persistence, keeping its position.
    /// A busy job keeps its local status until the gesture settles
    pub fn replace(&mut self, mut job: Job) -> Result<(), StoreError> {
        let busy = self.is_busy(job.id);
        let existing = self.get_mut(job.id)?;
        if busy {
            job.status = existing.status;
        }
        *existing = job;
        Ok(())
    }

    pub fn edit_local(&mut self, id: i32, patch: JobPatch, now: NaiveDateTime) -> Result<Job, StoreError> {
        if patch.status.is_some() {
            self.ensure_idle(id)?;
        }
        let job = self.get_mut(id)?;
        job.apply_patch(patch);
        job.updated_at = now;
        Ok(job.clone())
    }

    pub fn remove(&mut self, id: i32) -> Result<Job, StoreError> {
        self.ensure_idle(id)?;
        let index = self.jobs.iter().position(|j| j.id == id).ok_or(StoreError::NotFound(id))?;
        Ok(self.jobs.remove(index))
    }

    /// Overwrite the status without any bookkeeping. Returns the previous one
    pub(crate) fn write_status(&mut self, id: i32, status: JobStatus) -> Result<JobStatus, StoreError> {
        let job = self.get_mut(id)?;
        Ok(std::mem::replace(&mut job.status, status))
    }

    pub fn is_busy(&self, id: i32) -> bool {
        self.busy.contains(&id)
    }

    pub fn ensure_idle(&self, id: i32) -> Result<(), StoreError> {
        match self.is_busy(id) {
            true => Err(StoreError::Busy(id)),
            false => Ok(())
        }
    }

    pub(crate) fn mark_busy(&mut self, id: i32) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        match self.busy.insert(id) {
            true => Ok(()),
            false => Err(StoreError::Busy(id))
        }
    }

    pub(crate) fn clear_busy(&mut self, id: i32) {
        self.busy.remove(&id);
    }

    pub fn filter(&self, query: &JobQuery, now: NaiveDateTime) -> Vec<Job> {
        filter::filter_jobs(&self.jobs, query, now)
    }

    pub fn stats(&self) -> JobStats {
        JobStats::from_jobs(&self.jobs)
    }

    pub fn columns(&self) -> Vec<KanbanColumn> {
        stats::columns(&self.jobs)
    }
}
