#[cfg(test)]
mod tests {
    use job_tracker_server::jobs::board::Board;
    use job_tracker_server::jobs::filter::{self, DateFilter, JobQuery, PageMarker};
    use job_tracker_server::jobs::reconcile::{DropTarget, Outcome};
    use job_tracker_server::jobs::store::StoreError;
    use job_tracker_server::jobs::types::api::{ApiError, JobApi, Notifier};
    use job_tracker_server::jobs::types::job::{Job, JobForm, JobPatch, JobStatus};

    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory persistence that counts calls and can be told to fail
    #[derive(Default)]
    struct MockApi {
        jobs: Mutex<Vec<Job>>,
        calls: AtomicUsize,
        fail: AtomicBool
    }

    impl MockApi {
        fn with_jobs(jobs: &[Job]) -> MockApi {
            MockApi { jobs: Mutex::new(jobs.to_vec()), ..Default::default() }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        fn record(&self) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail.load(Ordering::SeqCst) {
                true => Err(ApiError::Transport("connection refused".to_string())),
                false => Ok(())
            }
        }
    }

    #[async_trait]
    impl JobApi for MockApi {
        async fn list(&self) -> Result<Vec<Job>, ApiError> {
            self.record()?;
            Ok(self.jobs.lock().unwrap().clone())
        }

        async fn create(&self, form: &JobForm) -> Result<Job, ApiError> {
            self.record()?;
            let mut jobs = self.jobs.lock().unwrap();
            let id = jobs.iter().map(|j| j.id).max().unwrap_or(0) + 1;
            let job = Job::from_form(id, form.clone(), now());
            jobs.push(job.clone());
            Ok(job)
        }

        async fn update(&self, id: i32, patch: &JobPatch) -> Result<Job, ApiError> {
            self.record()?;
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs.iter_mut().find(|j| j.id == id).ok_or(ApiError::NotFound(id))?;
            job.apply_patch(patch.clone());
            job.updated_at = now();
            Ok(job.clone())
        }

        async fn delete(&self, id: i32) -> Result<(), ApiError> {
            self.record()?;
            self.jobs.lock().unwrap().retain(|j| j.id != id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        successes: Mutex<Vec<String>>,
        errors: Mutex<Vec<String>>
    }

    impl RecordingNotifier {
        fn successes(&self) -> Vec<String> {
            self.successes.lock().unwrap().clone()
        }

        fn errors(&self) -> Vec<String> {
            self.errors.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify_success(&self, msg: &str) {
            self.successes.lock().unwrap().push(msg.to_string());
        }

        fn notify_error(&self, msg: &str) {
            self.errors.lock().unwrap().push(msg.to_string());
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn job(id: i32, company: &str, status: JobStatus, days_ago: i64) -> Job {
        let form = JobForm {
            company: company.to_string(),
            title: "Software Engineer".to_string(),
            status,
            date_applied: Some((now() - Duration::days(days_ago)).date()),
            ..Default::default()
        };
        Job::from_form(id, form, now())
    }

    fn sample_jobs() -> Vec<Job> {
        vec![
            job(1, "Acme", JobStatus::Applied, 3),
            job(2, "Deliveroo", JobStatus::Saved, 10),
            job(3, "Monzo", JobStatus::Interviewing, 1),
        ]
    }

    fn remote_board() -> Board<MockApi, RecordingNotifier> {
        let jobs = sample_jobs();
        Board::new(jobs.clone(), MockApi::with_jobs(&jobs), RecordingNotifier::default(), false)
    }

    fn demo_board() -> Board<MockApi, RecordingNotifier> {
        Board::new(sample_jobs(), MockApi::default(), RecordingNotifier::default(), true)
    }

    fn status_of(board: &Board<MockApi, RecordingNotifier>, id: i32) -> JobStatus {
        board.store().get(id).unwrap().status
    }

    #[tokio::test]
    async fn drag_confirmed() {
        let mut board = remote_board();

        let mut session = board.start_drag(1).unwrap();
        board.drag_over(&mut session, DropTarget::Column(JobStatus::Interviewing));
        assert_eq!(status_of(&board, 1), JobStatus::Interviewing, "Hovering moves the card right away");
        board.drag_over(&mut session, DropTarget::Column(JobStatus::Offer));
        assert_eq!(session.trail(), &[JobStatus::Applied, JobStatus::Interviewing, JobStatus::Offer]);

        let outcome = board.drop(session, Some(DropTarget::Column(JobStatus::Offer))).await;
        assert!(matches!(outcome, Outcome::Confirmed(ref j) if j.status == JobStatus::Offer), "Drop is confirmed");
        assert_eq!(status_of(&board, 1), JobStatus::Offer, "Job stays in the drop column");
        assert_eq!(board.api().calls(), 1, "Exactly one remote call for the whole drag");
        assert_eq!(board.notifier().successes(), vec!["Moved to Offer".to_string()]);
        assert!(!board.store().is_busy(1), "Job is free again after the drop settles");
    }

    #[tokio::test]
    async fn drag_reverted_on_failure() {
        let mut board = remote_board();
        board.api().set_fail(true);

        let mut session = board.start_drag(1).unwrap();
        board.drag_over(&mut session, DropTarget::Column(JobStatus::Interviewing));
        board.drag_over(&mut session, DropTarget::Column(JobStatus::Offer));
        let outcome = board.drop(session, Some(DropTarget::Column(JobStatus::Offer))).await;

        assert_eq!(outcome, Outcome::Reverted(JobStatus::Applied), "Reverted to the status before the drag");
        assert_eq!(status_of(&board, 1), JobStatus::Applied, "Not the intermediate hover status");
        assert_eq!(board.notifier().errors(), vec!["Failed to update job status".to_string()]);
        assert!(board.notifier().successes().is_empty());
        assert!(!board.store().is_busy(1));
    }

    #[tokio::test]
    async fn drop_on_card_moves_to_its_column() {
        let mut board = remote_board();

        let session = board.start_drag(2).unwrap();
        let outcome = board.drop(session, Some(DropTarget::Card(3))).await;

        assert!(matches!(outcome, Outcome::Confirmed(_)));
        assert_eq!(status_of(&board, 2), JobStatus::Interviewing, "Card 3 sits in the interviewing column");
    }

    #[tokio::test]
    async fn drop_outside_cancels() {
        let mut board = remote_board();

        let mut session = board.start_drag(1).unwrap();
        board.drag_over(&mut session, DropTarget::Column(JobStatus::Rejected));
        let outcome = board.drop(session, None).await;

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(status_of(&board, 1), JobStatus::Applied, "Status restored");
        assert_eq!(board.api().calls(), 0, "Nothing sent");
    }

    #[tokio::test]
    async fn drop_on_same_column_sends_nothing() {
        let mut board = remote_board();

        let mut session = board.start_drag(1).unwrap();
        board.drag_over(&mut session, DropTarget::Column(JobStatus::Offer));
        let outcome = board.drop(session, Some(DropTarget::Column(JobStatus::Applied))).await;

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(status_of(&board, 1), JobStatus::Applied);
        assert_eq!(board.api().calls(), 0);
        assert!(board.notifier().successes().is_empty());
    }

    #[tokio::test]
    async fn picker_in_demo_mode() {
        let mut board = demo_board();

        let outcome = board.set_status(2, JobStatus::Rejected).await;

        assert!(matches!(outcome, Outcome::Confirmed(ref j) if j.status == JobStatus::Rejected));
        assert_eq!(status_of(&board, 2), JobStatus::Rejected);
        assert_eq!(board.api().calls(), 0, "Demo mode never calls persistence");
        assert_eq!(board.notifier().successes(), vec!["Status updated to rejected (demo mode)".to_string()]);
        assert_eq!(board.store().len(), 3, "Status changes never add or drop jobs");
    }

    #[tokio::test]
    async fn picker_failure_reverts() {
        let mut board = remote_board();
        board.api().set_fail(true);

        let outcome = board.set_status(3, JobStatus::Offer).await;

        assert_eq!(outcome, Outcome::Reverted(JobStatus::Interviewing));
        assert_eq!(status_of(&board, 3), JobStatus::Interviewing);
        assert_eq!(board.notifier().errors(), vec!["Failed to update status".to_string()]);
    }

    #[tokio::test]
    async fn picker_same_status_is_noop() {
        let mut board = remote_board();

        let outcome = board.set_status(1, JobStatus::Applied).await;

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(board.api().calls(), 0);
        assert!(board.notifier().successes().is_empty());
        assert!(board.notifier().errors().is_empty());
    }

    #[tokio::test]
    async fn busy_job_rejects_other_gestures() {
        let mut board = remote_board();

        let session = board.start_drag(1).unwrap();
        assert_eq!(board.set_status(1, JobStatus::Offer).await, Outcome::Rejected(StoreError::Busy(1)),
            "Picker is refused while the card is being dragged");
        assert!(!board.remove(1).await, "Delete is refused while the card is being dragged");
        assert!(board.start_drag(1).is_err(), "A second drag of the same card is refused");
        assert!(matches!(board.set_status(2, JobStatus::Applied).await, Outcome::Confirmed(_)),
            "Other jobs are unaffected");

        board.drop(session, None).await;
        assert!(!board.store().is_busy(1));
        assert!(matches!(board.set_status(1, JobStatus::Offer).await, Outcome::Confirmed(_)));
    }

    #[tokio::test]
    async fn unknown_job() {
        let mut board = remote_board();

        assert_eq!(board.set_status(99, JobStatus::Offer).await, Outcome::Rejected(StoreError::NotFound(99)));
        assert!(board.start_drag(99).is_err());
        assert!(board.edit(99, JobPatch::status(JobStatus::Offer)).await.is_none());
        assert_eq!(board.api().calls(), 0);
    }

    #[tokio::test]
    async fn remove_unknown_job_sends_nothing() {
        let mut board = remote_board();

        assert!(!board.remove(99).await);
        assert_eq!(board.api().calls(), 0, "Persistence is never asked to delete a job the board does not hold");
        assert_eq!(board.notifier().errors(), vec!["Job not found: 99".to_string()]);
        assert_eq!(board.store().len(), 3);
    }

    #[tokio::test]
    async fn edit_during_drag_keeps_hover_status() {
        let mut board = remote_board();

        let mut session = board.start_drag(1).unwrap();
        board.drag_over(&mut session, DropTarget::Column(JobStatus::Offer));

        let patch: JobPatch = serde_json::from_str(r#"{"notes": "Call back Friday"}"#).unwrap();
        let edited = board.edit(1, patch).await.unwrap();
        assert_eq!(edited.notes.as_deref(), Some("Call back Friday"));
        assert_eq!(status_of(&board, 1), JobStatus::Offer, "Card stays in the hovered column");
        assert_eq!(board.store().get(1).unwrap().notes.as_deref(), Some("Call back Friday"));

        let outcome = board.drop(session, Some(DropTarget::Column(JobStatus::Offer))).await;
        assert!(matches!(outcome, Outcome::Confirmed(ref j) if j.status == JobStatus::Offer));
        assert_eq!(board.store().get(1).unwrap().notes.as_deref(), Some("Call back Friday"));
    }

    #[tokio::test]
    async fn add_and_remove() {
        let mut board = remote_board();
        let form = JobForm { company: "Initech".to_string(), title: "Engineer".to_string(), ..Default::default() };

        let added = board.add(form).await.unwrap();
        assert_eq!(added.id, 4, "Id comes from persistence");
        assert_eq!(board.store().jobs()[0].id, 4, "New jobs go first");
        assert_eq!(board.notifier().successes(), vec!["Job added successfully".to_string()]);

        assert!(board.remove(4).await);
        assert!(board.store().get(4).is_none());
        assert_eq!(board.api().calls(), 2);
    }

    #[tokio::test]
    async fn add_failure_keeps_store() {
        let mut board = remote_board();
        board.api().set_fail(true);
        let form = JobForm { company: "Initech".to_string(), title: "Engineer".to_string(), ..Default::default() };

        assert!(board.add(form).await.is_none());
        assert_eq!(board.store().len(), 3);
        assert_eq!(board.notifier().errors(), vec!["Failed to add job".to_string()]);
    }

    #[tokio::test]
    async fn demo_mode_temp_ids() {
        let mut board = demo_board();
        let form = |company: &str| JobForm { company: company.to_string(), title: "Engineer".to_string(), ..Default::default() };

        let first = board.add(form("Initech")).await.unwrap();
        let second = board.add(form("Hooli")).await.unwrap();

        assert_eq!(first.id, 1001, "Temp ids start above 1000");
        assert_eq!(second.id, 1002);
        assert_eq!(board.api().calls(), 0);
        assert_eq!(board.notifier().successes(), vec!["Job added (demo mode)".to_string(), "Job added (demo mode)".to_string()]);

        assert!(board.remove(1001).await);
        assert_eq!(board.notifier().successes().last().unwrap(), "Job deleted (demo mode)");
    }

    #[tokio::test]
    async fn edit_with_null_clears_field() {
        let mut board = remote_board();
        let patch: JobPatch = serde_json::from_str(r#"{"location": "Berlin"}"#).unwrap();
        let edited = board.edit(1, patch).await.unwrap();
        assert_eq!(edited.location.as_deref(), Some("Berlin"));

        let patch: JobPatch = serde_json::from_str(r#"{"location": null}"#).unwrap();
        let edited = board.edit(1, patch).await.unwrap();
        assert_eq!(edited.location, None, "Explicit null clears the field");
        assert_eq!(edited.company, "Acme", "Absent fields are left alone");
        assert_eq!(board.store().get(1).unwrap(), &edited);
    }

    #[tokio::test]
    async fn load_from_api() {
        let jobs = sample_jobs();
        let board = Board::load(MockApi::with_jobs(&jobs), RecordingNotifier::default(), false).await.unwrap();
        assert_eq!(board.store().jobs(), jobs.as_slice());

        let api = MockApi::default();
        api.set_fail(true);
        assert!(Board::load(api, RecordingNotifier::default(), false).await.is_err());
    }

    #[test]
    fn search_and_date_filters() {
        let board = demo_board();

        let query = JobQuery { search: "mon".to_string(), date: DateFilter::All };
        let found = board.view(&query, now());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company, "Monzo");

        let query = JobQuery { search: String::new(), date: DateFilter::Week };
        let ids: Vec<i32> = board.view(&query, now()).iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![3, 1], "10 day old job is out, newest first");

        let query = JobQuery { search: "ACME".to_string(), date: DateFilter::Today };
        assert!(board.view(&query, now()).is_empty(), "Search and date must both match");

        let query = JobQuery {
            search: String::new(),
            date: DateFilter::Custom { start: Some(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()), end: None }
        };
        assert_eq!(board.view(&query, now()).len(), 3, "Start bound is inclusive");
    }

    #[test]
    fn date_filter_edges() {
        let board = demo_board();
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();

        let query = JobQuery { search: String::new(), date: DateFilter::Today };
        let mut today = board.store().jobs().to_vec();
        today.push(job(4, "Hooli", JobStatus::Saved, 0));
        let ids: Vec<i32> = filter::filter_jobs(&today, &query, now()).iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![4], "Job applied today matches");

        let month = vec![
            job(1, "Acme", JobStatus::Applied, 31),
            job(2, "Deliveroo", JobStatus::Applied, 32),
        ];
        let query = JobQuery { search: String::new(), date: DateFilter::Month };
        let ids: Vec<i32> = filter::filter_jobs(&month, &query, now()).iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![1], "May 15 is kept, May 14 is not");

        let query = JobQuery { search: String::new(), date: DateFilter::Custom { start: None, end: Some(day(12)) } };
        let ids: Vec<i32> = board.view(&query, now()).iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![1, 2], "End day is inclusive, later jobs are out");

        let end_of_day = day(12).and_hms_milli_opt(23, 59, 59, 999).unwrap();
        let filter = DateFilter::Custom { start: Some(day(12)), end: Some(day(12)) };
        assert!(filter.matches(end_of_day, now()), "Last millisecond of the end day matches");
        assert!(!filter.matches(day(13).and_hms_opt(0, 0, 0).unwrap(), now()));

        let query = JobQuery { search: String::new(), date: DateFilter::Custom { start: None, end: None } };
        assert_eq!(board.view(&query, now()).len(), 3, "Custom range with no bounds keeps everything");

        assert!("yesterday".parse::<DateFilter>().is_err());
    }

    #[test]
    fn stats_and_columns() {
        let board = demo_board();
        let stats = board.store().stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.interviewing, 1);
        assert_eq!(stats.response_rate, 33);

        let columns = board.store().columns();
        assert_eq!(columns.len(), 6);
        assert_eq!(columns[0].title, "Saved");
        assert_eq!(columns[2].jobs[0].company, "Monzo");
    }

    #[test]
    fn pagination() {
        let jobs: Vec<Job> = (1..=23).map(|id| job(id, "Acme", JobStatus::Applied, 0)).collect();

        let page = filter::paginate(&jobs, 3, 10);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 3);

        let page = filter::paginate(&jobs, 9, 10);
        assert_eq!(page.current, 3, "Out of range pages clamp to the last one");

        let page = filter::paginate(&jobs, 1, 20);
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.total_pages, 2);

        let page = filter::paginate(&jobs, 1, 7);
        assert_eq!(page.items.len(), 10, "Unsupported page sizes fall back to 10");
        assert_eq!(filter::items_per_page(50), 50);
        assert_eq!(filter::items_per_page(0), 10);

        let page = filter::paginate(&[], 1, 10);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());

        use PageMarker::{Ellipsis, Number};
        assert_eq!(filter::page_numbers(1, 3), vec![Number(1), Number(2), Number(3)]);
        assert_eq!(filter::page_numbers(2, 10), vec![Number(1), Number(2), Number(3), Number(4), Ellipsis, Number(10)]);
        assert_eq!(filter::page_numbers(9, 10), vec![Number(1), Ellipsis, Number(7), Number(8), Number(9), Number(10)]);
        assert_eq!(filter::page_numbers(5, 10), vec![Number(1), Ellipsis, Number(4), Number(5), Number(6), Ellipsis, Number(10)]);
    }
}
