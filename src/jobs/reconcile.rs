//! Optimistic status changes.
//!
//! A status change is a two-phase commit. Phase one writes the new status
//! into the store right away and returns a `PendingChange`. Phase two settles
//! that change once the remote call resolves: `confirm` keeps it, `revert`
//! restores the status the job had before the gesture started. While a change
//! (or a drag) is open the job is busy and other status gestures on it are
//! rejected.

use crate::jobs::store::{JobStore, StoreError};
use crate::jobs::types::job::{Job, JobStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Applied,
    Confirmed,
    Reverted
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendingChange {
    pub job_id: i32,
    pub original: JobStatus,
    pub target: JobStatus,
    phase: Phase
}

impl PendingChange {
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

/// What a dragged card is currently over
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    Column(JobStatus),
    /// Another job's card; stands for the column that job is in
    Card(i32)
}

#[derive(Clone, Debug)]
pub struct DragSession {
    job_id: i32,
    original: JobStatus,
    trail: Vec<JobStatus>
}

impl DragSession {
    pub fn job_id(&self) -> i32 {
        self.job_id
    }

    pub fn original(&self) -> JobStatus {
        self.original
    }

    /// Every status the job passed through during the drag, starting with
    /// the original one
    pub fn trail(&self) -> &[JobStatus] {
        &self.trail
    }
}

/// How a gesture ended
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Target equals the current status, nothing sent
    Unchanged,
    /// Dropped outside any column
    Cancelled,
    Confirmed(Job),
    Reverted(JobStatus),
    Rejected(StoreError)
}

pub fn resolve_target(store: &JobStore, target: DropTarget) -> Option<JobStatus> {
    match target {
        DropTarget::Column(status) => Some(status),
        DropTarget::Card(id) => store.get(id).map(|job| job.status)
    }
}

/// Phase one of a picker driven change. `Ok(None)` when the job is already
/// in `target`
pub fn begin(store: &mut JobStore, job_id: i32, target: JobStatus) -> Result<Option<PendingChange>, StoreError> {
    let current = store.get(job_id).ok_or(StoreError::NotFound(job_id))?.status;
    store.ensure_idle(job_id)?;
    if current == target {
        return Ok(None);
    }

    store.mark_busy(job_id)?;
    store.write_status(job_id, target)?;
    Ok(Some(PendingChange { job_id, original: current, target, phase: Phase::Applied }))
}

/// Keep the optimistic status. `record` is the row persistence returned, if
/// any, and replaces the local copy
pub fn confirm(store: &mut JobStore, mut change: PendingChange, record: Option<Job>) -> PendingChange {
    store.clear_busy(change.job_id);
    if let Some(record) = record {
        if let Err(err) = store.replace(record) {
            log::warn!("Confirmed change for a job no longer in the store: {}", err);
        }
    }
    change.phase = Phase::Confirmed;
    change
}

/// Restore the status from before the gesture
pub fn revert(store: &mut JobStore, mut change: PendingChange) -> PendingChange {
    if let Err(err) = store.write_status(change.job_id, change.original) {
        log::warn!("Could not revert job status: {}", err);
    }
    store.clear_busy(change.job_id);
    change.phase = Phase::Reverted;
    change
}

pub fn start_drag(store: &mut JobStore, job_id: i32) -> Result<DragSession, StoreError> {
    let original = store.get(job_id).ok_or(StoreError::NotFound(job_id))?.status;
    store.mark_busy(job_id)?;
    Ok(DragSession { job_id, original, trail: vec![original] })
}

/// Move the dragged job into the hovered column immediately
pub fn drag_over(store: &mut JobStore, session: &mut DragSession, target: DropTarget) {
    let Some(column) = resolve_target(store, target) else { return; };
    let Some(current) = store.get(session.job_id).map(|j| j.status) else { return; };

    if current != column && store.write_status(session.job_id, column).is_ok() {
        session.trail.push(column);
    }
}

/// Finish a drag. A change to a different column comes back as a
/// `PendingChange` that still has to be confirmed or reverted; every other
/// ending settles the drag here
pub fn end_drag(store: &mut JobStore, session: DragSession, target: Option<DropTarget>)
        -> Result<Option<PendingChange>, Outcome> {
    let column = target.and_then(|t| resolve_target(store, t));

    let Some(column) = column else {
        let _ = store.write_status(session.job_id, session.original);
        store.clear_busy(session.job_id);
        return Err(Outcome::Cancelled);
    };

    let _ = store.write_status(session.job_id, column);
    if column == session.original {
        store.clear_busy(session.job_id);
        return Ok(None);
    }

    Ok(Some(PendingChange {
        job_id: session.job_id,
        original: session.original,
        target: column,
        phase: Phase::Applied
    }))
}
