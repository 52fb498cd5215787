//! Search, date range filtering, sorting and pagination over the working set.
//! Everything here is pure: the current time is always passed in

use crate::jobs::types::job::Job;

use chrono::{Duration, Months, NaiveDate, NaiveDateTime};

pub const ITEMS_PER_PAGE_OPTIONS: [usize; 3] = [10, 20, 50];
const MAX_VISIBLE_PAGES: usize = 5;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    /// Since the start of the day one week ago
    Week,
    /// Since the start of the same day last month
    Month,
    /// Inclusive range. A missing start is unbounded, a missing end is `now`
    Custom { start: Option<NaiveDate>, end: Option<NaiveDate> }
}

impl DateFilter {
    pub fn matches(&self, date: NaiveDateTime, now: NaiveDateTime) -> bool {
        let start_of_today = now.date().and_hms_opt(0, 0, 0).unwrap_or(now);

        match self {
            DateFilter::All => true,
            DateFilter::Today => date >= start_of_today,
            DateFilter::Week => date >= start_of_today - Duration::days(7),
            DateFilter::Month => date >= start_of_today
                .checked_sub_months(Months::new(1))
                .unwrap_or(start_of_today),
            DateFilter::Custom { start: None, end: None } => true,
            DateFilter::Custom { start, end } => {
                let after_start = match start {
                    Some(start) => date >= start.and_hms_opt(0, 0, 0).unwrap_or_default(),
                    None => true
                };
                let end = match end {
                    Some(end) => end.and_hms_milli_opt(23, 59, 59, 999).unwrap_or(now),
                    None => now
                };
                after_start && date <= end
            }
        }
    }
}

impl std::str::FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(DateFilter::All),
            "today" => Ok(DateFilter::Today),
            "week" => Ok(DateFilter::Week),
            "month" => Ok(DateFilter::Month),
            "custom" => Ok(DateFilter::Custom { start: None, end: None }),
            _ => Err(format!("Unknown date filter `{s}`"))
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct JobQuery {
    /// Case-insensitive substring over company, title and location
    pub search: String,
    pub date: DateFilter
}

impl JobQuery {
    pub fn matches(&self, job: &Job, now: NaiveDateTime) -> bool {
        let search = self.search.trim().to_lowercase();
        let search_ok = search.is_empty() ||
            job.company.to_lowercase().contains(&search) ||
            job.title.to_lowercase().contains(&search) ||
            job.location.as_ref().is_some_and(|l| l.to_lowercase().contains(&search));

        search_ok && self.date.matches(job.effective_date(), now)
    }
}

/// Matching jobs, most recent effective date first
pub fn filter_jobs(jobs: &[Job], query: &JobQuery, now: NaiveDateTime) -> Vec<Job> {
    let mut result: Vec<Job> = jobs.iter()
        .filter(|job| query.matches(job, now))
        .cloned()
        .collect();
    result.sort_by(|a, b| b.effective_date().cmp(&a.effective_date()));
    result
}

pub struct Page<'a> {
    pub items: &'a [Job],
    /// 1-based
    pub current: usize,
    pub total_pages: usize,
    pub total_items: usize
}

/// Page sizes the list offers. Anything else falls back to the first one
pub fn items_per_page(requested: usize) -> usize {
    match ITEMS_PER_PAGE_OPTIONS.contains(&requested) {
        true => requested,
        false => ITEMS_PER_PAGE_OPTIONS[0]
    }
}

pub fn paginate(jobs: &[Job], page: usize, per_page: usize) -> Page<'_> {
    let per_page = items_per_page(per_page);
    let total_pages = jobs.len().div_ceil(per_page);
    let current = page.clamp(1, total_pages.max(1));

    let start = std::cmp::min((current - 1) * per_page, jobs.len());
    let end = std::cmp::min(start + per_page, jobs.len());

    Page {
        items: &jobs[start..end],
        current,
        total_pages,
        total_items: jobs.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageMarker {
    Number(usize),
    Ellipsis
}

/// Page buttons for a pager that shows at most five numbers
pub fn page_numbers(current: usize, total: usize) -> Vec<PageMarker> {
    use PageMarker::{Ellipsis, Number};

    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(Number).collect();
    }

    let mut pages = Vec::new();
    if current <= 3 {
        pages.extend((1..=4).map(Number));
        pages.push(Ellipsis);
        pages.push(Number(total));
    } else if current >= total - 2 {
        pages.push(Number(1));
        pages.push(Ellipsis);
        pages.extend((total - 3..=total).map(Number));
    } else {
        pages.push(Number(1));
        pages.push(Ellipsis);
        pages.extend([Number(current - 1), Number(current), Number(current + 1)]);
        pages.push(Ellipsis);
        pages.push(Number(total));
    }
    pages
}
