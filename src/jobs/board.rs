//! Dashboard state: the job store plus the collaborators it needs.
//!
//! Every mutation goes through a `Board`. In local-only (demo) mode nothing
//! reaches the `JobApi`; otherwise each mutation waits for persistence and
//! status changes are reverted when it fails.

use crate::jobs::filter::JobQuery;
use crate::jobs::reconcile::{self, DragSession, DropTarget, Outcome, PendingChange};
use crate::jobs::store::{JobStore, StoreError};
use crate::jobs::types::api::{ApiError, JobApi, Notifier};
use crate::jobs::types::job::{Job, JobForm, JobPatch, JobStatus};

use chrono::{NaiveDateTime, Utc};

pub struct Board<A: JobApi, N: Notifier> {
    store: JobStore,
    api: A,
    notifier: N,
    local_only: bool
}

impl<A: JobApi, N: Notifier> Board<A, N> {
    pub fn new(jobs: Vec<Job>, api: A, notifier: N, local_only: bool) -> Board<A, N> {
        Board { store: JobStore::new(jobs), api, notifier, local_only }
    }

    /// Start from whatever persistence currently holds
    pub async fn load(api: A, notifier: N, local_only: bool) -> Result<Board<A, N>, ApiError> {
        let jobs = api.list().await?;
        Ok(Board::new(jobs, api, notifier, local_only))
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn is_local_only(&self) -> bool {
        self.local_only
    }

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn demo_suffix(&self) -> &'static str {
        if self.local_only { " (demo mode)" } else { "" }
    }

    pub async fn add(&mut self, form: JobForm) -> Option<Job> {
        if self.local_only {
            let id = self.store.next_temp_id();
            let job = Job::from_form(id, form, Self::now());
            self.store.prepend(job.clone());
            self.notifier.notify_success("Job added (demo mode)");
            return Some(job);
        }

        match self.api.create(&form.normalized()).await {
            Ok(job) => {
                self.store.prepend(job.clone());
                self.notifier.notify_success("Job added successfully");
                Some(job)
            },
            Err(err) => {
                log::error!("Error creating job: {}", err);
                self.notifier.notify_error("Failed to add job");
                None
            }
        }
    }

    pub async fn edit(&mut self, id: i32, patch: JobPatch) -> Option<Job> {
        if let Err(err) = self.check_editable(id, &patch) {
            self.notifier.notify_error(&err.to_string());
            return None;
        }

        if self.local_only {
            return match self.store.edit_local(id, patch, Self::now()) {
                Ok(job) => {
                    self.notifier.notify_success("Job updated (demo mode)");
                    Some(job)
                },
                Err(err) => {
                    self.notifier.notify_error(&err.to_string());
                    None
                }
            };
        }

        let result = match self.api.update(id, &patch).await {
            Ok(job) => self.store.replace(job.clone()).map(|_| job).map_err(|e| e.to_string()),
            Err(err) => Err(err.to_string())
        };
        match result {
            Ok(job) => {
                self.notifier.notify_success("Job updated successfully");
                Some(job)
            },
            Err(err) => {
                log::error!("Error updating job {}: {}", id, err);
                self.notifier.notify_error("Failed to update job");
                None
            }
        }
    }

    fn check_editable(&self, id: i32, patch: &JobPatch) -> Result<(), StoreError> {
        if self.store.get(id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        if patch.status.is_some() {
            self.store.ensure_idle(id)?;
        }
        Ok(())
    }

    pub async fn remove(&mut self, id: i32) -> bool {
        let removable = match self.store.get(id) {
            Some(_) => self.store.ensure_idle(id),
            None => Err(StoreError::NotFound(id))
        };
        if let Err(err) = removable {
            self.notifier.notify_error(&err.to_string());
            return false;
        }

        if !self.local_only {
            if let Err(err) = self.api.delete(id).await {
                log::error!("Error deleting job {}: {}", id, err);
                self.notifier.notify_error("Failed to delete job");
                return false;
            }
        }

        match self.store.remove(id) {
            Ok(_) => {
                self.notifier.notify_success(&format!("Job deleted{}", match self.local_only {
                    true => " (demo mode)",
                    false => " successfully"
                }));
                true
            },
            Err(err) => {
                self.notifier.notify_error(&err.to_string());
                false
            }
        }
    }

    /// Status picker: apply now, confirm with persistence, revert on failure
    pub async fn set_status(&mut self, id: i32, status: JobStatus) -> Outcome {
        let change = match reconcile::begin(&mut self.store, id, status) {
            Ok(Some(change)) => change,
            Ok(None) => return Outcome::Unchanged,
            Err(err) => {
                self.notifier.notify_error(&err.to_string());
                return Outcome::Rejected(err);
            }
        };

        let success = format!("Status updated to {}{}", status, self.demo_suffix());
        self.settle(change, &success, "Failed to update status").await
    }

    pub fn start_drag(&mut self, id: i32) -> Result<DragSession, StoreError> {
        reconcile::start_drag(&mut self.store, id)
    }

    pub fn drag_over(&mut self, session: &mut DragSession, target: DropTarget) {
        reconcile::drag_over(&mut self.store, session, target)
    }

    /// `target` is `None` when the card was released outside every column
    pub async fn drop(&mut self, session: DragSession, target: Option<DropTarget>) -> Outcome {
        let change = match reconcile::end_drag(&mut self.store, session, target) {
            Ok(Some(change)) => change,
            Ok(None) => return Outcome::Unchanged,
            Err(outcome) => return outcome
        };

        let success = format!("Moved to {}{}", change.target.title(), self.demo_suffix());
        self.settle(change, &success, "Failed to update job status").await
    }

    /// Phase two. Local-only mode accepts the optimistic state as final
    async fn settle(&mut self, change: PendingChange, success: &str, failure: &str) -> Outcome {
        if self.local_only {
            let change = reconcile::confirm(&mut self.store, change, None);
            self.notifier.notify_success(success);
            return self.confirmed(change.job_id);
        }

        match self.api.update(change.job_id, &JobPatch::status(change.target)).await {
            Ok(record) => {
                let change = reconcile::confirm(&mut self.store, change, Some(record));
                self.notifier.notify_success(success);
                self.confirmed(change.job_id)
            },
            Err(err) => {
                log::error!("Error updating status of job {}: {}", change.job_id, err);
                let change = reconcile::revert(&mut self.store, change);
                self.notifier.notify_error(failure);
                Outcome::Reverted(change.original)
            }
        }
    }

    fn confirmed(&self, id: i32) -> Outcome {
        match self.store.get(id) {
            Some(job) => Outcome::Confirmed(job.clone()),
            None => Outcome::Rejected(StoreError::NotFound(id))
        }
    }

    pub fn view(&self, query: &JobQuery, now: NaiveDateTime) -> Vec<Job> {
        self.store.filter(query, now)
    }
}
