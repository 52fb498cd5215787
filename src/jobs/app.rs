use crate::jobs::filter::{self, DateFilter, JobQuery};
use crate::jobs::handlers::postgres_handler::PostgresHandler;
use crate::jobs::logo;
use crate::jobs::types::job::{JobForm, JobPatch};
use crate::jobs::types::stats::JobStats;
use crate::shared::types::app::{ErrorResponse, Response, login_fail, demo_mode_read_only, job_not_found};
use crate::shared::util::config;

use actix_identity::Identity;
use actix_web::{
    get, post, put, delete, HttpResponse, web::{self, Data}, Result
};
use chrono::{NaiveDate, Utc};
use serde::{Serialize, Deserialize};


// Logged in, or anyone at all when the server is a read-only demo
fn can_view(identity: &Option<Identity>) -> bool {
    identity.is_some() || config::get_config().server.demo_mode
}

fn is_demo() -> bool {
    config::get_config().server.demo_mode
}

fn server_error(msg: &str) -> Result<HttpResponse> {
    Ok(HttpResponse::InternalServerError().json(ErrorResponse{ error: msg.to_string() }))
}


// List jobs
#[derive(Deserialize)]
struct ListJobsParams {
    search: Option<String>,
    date: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>
}

impl ListJobsParams {
    fn query(&self) -> Result<Option<JobQuery>, String> {
        if self.search.is_none() && self.date.is_none() {
            return Ok(None);
        }
        let date = match self.date.as_deref() {
            None => DateFilter::All,
            Some(d) => match d.parse::<DateFilter>()? {
                DateFilter::Custom { .. } => DateFilter::Custom { start: self.start, end: self.end },
                other => other
            }
        };
        Ok(Some(JobQuery { search: self.search.clone().unwrap_or_default(), date }))
    }
}

// An unknown date filter answers 400
fn list_query(params: &ListJobsParams) -> std::result::Result<Option<JobQuery>, HttpResponse> {
    params.query().map_err(|err| HttpResponse::BadRequest().json(ErrorResponse{ error: err }))
}

/// All jobs by last update. With `search` / `date` the result is filtered
/// and ordered by date applied instead
#[get("/v1/jobs")]
async fn get_jobs(handler: Data<PostgresHandler>, identity: Option<Identity>, params: web::Query<ListJobsParams>) -> Result<HttpResponse> {
    if !can_view(&identity) { login_fail!(); }

    let query = match list_query(&params) {
        Ok(q) => q,
        Err(response) => return Ok(response)
    };

    match handler.get_jobs().await {
        Ok(jobs) => Ok(HttpResponse::Ok().json(match query {
            Some(query) => filter::filter_jobs(&jobs, &query, Utc::now().naive_utc()),
            None => jobs
        })),
        Err(err) => {
            log::error!("Error fetching jobs: {}", err);
            server_error("Failed to fetch jobs")
        }
    }
}


// Single job, with its interviews
#[derive(Deserialize)]
struct JobIdForm { id: i32 }

#[get("/v1/jobs/single")]
async fn get_job(handler: Data<PostgresHandler>, identity: Option<Identity>, params: web::Query<JobIdForm>) -> Result<HttpResponse> {
    if !can_view(&identity) { login_fail!(); }

    match handler.get_job_with_interviews(params.id).await {
        Ok(Some(job)) => Ok(HttpResponse::Ok().json(job)),
        Ok(None) => job_not_found!(),
        Err(err) => {
            log::error!("Error fetching job {}: {}", params.id, err);
            server_error("Failed to fetch job")
        }
    }
}

#[get("/v1/jobs/activities")]
async fn get_activities(handler: Data<PostgresHandler>, identity: Option<Identity>, params: web::Query<JobIdForm>) -> Result<HttpResponse> {
    if !can_view(&identity) { login_fail!(); }

    match handler.get_activities(params.id).await {
        Ok(activities) => Ok(HttpResponse::Ok().json(activities)),
        Err(err) => {
            log::error!("Error fetching activities for job {}: {}", params.id, err);
            server_error("Failed to fetch activities")
        }
    }
}


// Create a job
#[post("/v1/jobs")]
async fn create_job(handler: Data<PostgresHandler>, identity: Option<Identity>, params: web::Json<JobForm>) -> Result<HttpResponse> {
    if is_demo() { demo_mode_read_only!(); }
    if identity.is_none() { login_fail!(); }

    if params.company.trim().is_empty() || params.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse{ error: "Company and title are required".to_string() }));
    }

    match handler.create_job(params.into_inner()).await {
        Ok(job) => Ok(HttpResponse::Created().json(job)),
        Err(err) => {
            log::error!("Error creating job: {}", err);
            server_error("Failed to create job")
        }
    }
}


// Update a job. Only fields present in the body change
#[put("/v1/jobs")]
async fn update_job(handler: Data<PostgresHandler>, identity: Option<Identity>,
        id: web::Query<JobIdForm>, params: web::Json<JobPatch>) -> Result<HttpResponse> {
    if is_demo() { demo_mode_read_only!(); }
    if identity.is_none() { login_fail!(); }

    match handler.update_job(id.id, params.into_inner()).await {
        Ok(Some(job)) => Ok(HttpResponse::Ok().json(job)),
        Ok(None) => job_not_found!(),
        Err(err) => {
            log::error!("Error updating job {}: {}", id.id, err);
            server_error("Failed to update job")
        }
    }
}


// Delete a job
#[delete("/v1/jobs")]
async fn delete_job(handler: Data<PostgresHandler>, identity: Option<Identity>, params: web::Json<JobIdForm>) -> Result<HttpResponse> {
    if is_demo() { demo_mode_read_only!(); }
    if identity.is_none() { login_fail!(); }

    match handler.delete_job(params.id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(Response { msg: "Job deleted".to_string() })),
        Err(err) => {
            log::error!("Error deleting job {}: {}", params.id, err);
            server_error("Failed to delete job")
        }
    }
}


#[get("/v1/jobs/resumes")]
async fn get_resumes(handler: Data<PostgresHandler>, identity: Option<Identity>) -> Result<HttpResponse> {
    if !can_view(&identity) { login_fail!(); }

    match handler.get_resumes().await {
        Ok(resumes) => Ok(HttpResponse::Ok().json(resumes)),
        Err(err) => {
            log::error!("Failed to fetch resumes: {}", err);
            server_error("Failed to fetch resumes")
        }
    }
}

#[get("/v1/jobs/stats")]
async fn get_stats(handler: Data<PostgresHandler>, identity: Option<Identity>) -> Result<HttpResponse> {
    if !can_view(&identity) { login_fail!(); }

    match handler.get_jobs().await {
        Ok(jobs) => Ok(HttpResponse::Ok().json(JobStats::from_jobs(&jobs))),
        Err(err) => {
            log::error!("Error fetching jobs for stats: {}", err);
            server_error("Failed to fetch stats")
        }
    }
}


// Logo for a company
#[derive(Deserialize)]
struct LogoParams {
    company: String,
    domain: Option<String>
}

#[derive(Serialize)]
struct LogoReturn {
    domain: Option<String>,
    url: String
}

#[get("/v1/jobs/logo")]
async fn get_logo(params: web::Query<LogoParams>) -> Result<HttpResponse> {
    let domain = params.domain.clone()
        .filter(|d| !d.trim().is_empty())
        .or_else(|| logo::guess_domain(&params.company));
    Ok(HttpResponse::Ok().json(LogoReturn {
        url: logo::logo_url(&params.company, domain.as_deref()),
        domain
    }))
}
