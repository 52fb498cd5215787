use crate::jobs::logo;
use crate::jobs::types::api::{ApiError, JobApi};
use crate::jobs::types::job::{Activity, Interview, Job, JobForm, JobPatch, JobStatus, JobWithInterviews, WorkType, start_of_day};
use crate::shared::util::config;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

#[derive(Clone)]
pub struct PostgresHandler {
    pool: PgPool
}

impl PostgresHandler {
    pub async fn new() -> Result<PostgresHandler, sqlx::Error> {
        Ok(PostgresHandler { pool: config::get_pool().await })
    }
}

fn job_from_row(row: &PgRow) -> Job {
    Job {
        id: row.get::<i32, &str>("id"),
        company: row.get::<String, &str>("company"),
        title: row.get::<String, &str>("title"),
        link: row.get::<Option<String>, &str>("link"),
        company_logo: row.get::<Option<String>, &str>("company_logo"),
        company_domain: row.get::<Option<String>, &str>("company_domain"),
        expected_salary: row.get::<Option<String>, &str>("expected_salary"),
        location: row.get::<Option<String>, &str>("location"),
        work_type: row.get::<Option<WorkType>, &str>("work_type"),
        date_applied: row.get::<Option<NaiveDateTime>, &str>("date_applied"),
        status: row.get::<JobStatus, &str>("status"),
        resume_used: row.get::<Option<String>, &str>("resume_used"),
        pay_range: row.get::<Option<String>, &str>("pay_range"),
        current_salary: row.get::<Option<String>, &str>("current_salary"),
        offer_amount: row.get::<Option<String>, &str>("offer_amount"),
        notes: row.get::<Option<String>, &str>("notes"),
        priority: row.get::<Option<i32>, &str>("priority"),
        created_at: row.get::<NaiveDateTime, &str>("created_at"),
        updated_at: row.get::<NaiveDateTime, &str>("updated_at")
    }
}

impl PostgresHandler {
    // Called on first launch for setup
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        // Enum types have no IF NOT EXISTS
        sqlx::query(r#"DO $$ BEGIN
            CREATE TYPE job_status AS ENUM ('saved', 'applied', 'interviewing', 'offer', 'rejected', 'withdrawn');
        EXCEPTION WHEN duplicate_object THEN null;
        END $$;"#).execute(&self.pool).await?;

        sqlx::query(r#"DO $$ BEGIN
            CREATE TYPE work_type AS ENUM ('remote', 'hybrid', 'in-person');
        EXCEPTION WHEN duplicate_object THEN null;
        END $$;"#).execute(&self.pool).await?;

        sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id SERIAL PRIMARY KEY,
            company varchar(255) NOT NULL,
            title varchar(255) NOT NULL,
            link text,
            company_logo text,
            company_domain varchar(255),
            expected_salary varchar(100),
            location varchar(255),
            work_type work_type DEFAULT 'hybrid',
            date_applied timestamp,
            status job_status NOT NULL DEFAULT 'saved',
            resume_used varchar(255),
            pay_range varchar(100),
            current_salary varchar(100),
            offer_amount varchar(100),
            notes text,
            priority integer DEFAULT 0,
            created_at timestamp NOT NULL DEFAULT now(),
            updated_at timestamp NOT NULL DEFAULT now()
        );"#).execute(&self.pool).await?;

        sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS interviews (
            id SERIAL PRIMARY KEY,
            job_id integer NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
            interview_number integer NOT NULL,
            person varchar(255),
            date_time timestamp,
            completed boolean DEFAULT false,
            follow_up_sent boolean DEFAULT false,
            notes text,
            created_at timestamp NOT NULL DEFAULT now()
        );"#).execute(&self.pool).await?;

        // status_change, job_created, ...
        sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS activities (
            id SERIAL PRIMARY KEY,
            job_id integer NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
            type varchar(50) NOT NULL,
            description text NOT NULL,
            created_at timestamp NOT NULL DEFAULT now()
        );"#).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn get_jobs(&self) -> Result<Vec<Job>, sqlx::Error> {
        Ok(sqlx::query("SELECT * FROM jobs ORDER BY updated_at DESC;")
            .map(|row: PgRow| job_from_row(&row))
            .fetch_all(&self.pool).await?)
    }

    pub async fn get_job(&self, id: i32) -> Result<Option<Job>, sqlx::Error> {
        Ok(sqlx::query("SELECT * FROM jobs WHERE id = $1 LIMIT 1;")
            .bind(id)
            .map(|row: PgRow| job_from_row(&row))
            .fetch_optional(&self.pool).await?)
    }

    pub async fn get_job_with_interviews(&self, id: i32) -> Result<Option<JobWithInterviews>, sqlx::Error> {
        let job = match self.get_job(id).await? {
            Some(job) => job,
            None => return Ok(None)
        };
        let interviews = sqlx::query("SELECT * FROM interviews WHERE job_id = $1 ORDER BY interview_number ASC;")
            .bind(id)
            .map(|row: PgRow| Interview {
                id: row.get::<i32, &str>("id"),
                job_id: row.get::<i32, &str>("job_id"),
                interview_number: row.get::<i32, &str>("interview_number"),
                person: row.get::<Option<String>, &str>("person"),
                date_time: row.get::<Option<NaiveDateTime>, &str>("date_time"),
                completed: row.get::<Option<bool>, &str>("completed"),
                follow_up_sent: row.get::<Option<bool>, &str>("follow_up_sent"),
                notes: row.get::<Option<String>, &str>("notes"),
                created_at: row.get::<NaiveDateTime, &str>("created_at")
            })
            .fetch_all(&self.pool).await?;
        Ok(Some(JobWithInterviews { job, interviews }))
    }

    pub async fn get_activities(&self, job_id: i32) -> Result<Vec<Activity>, sqlx::Error> {
        Ok(sqlx::query("SELECT * FROM activities WHERE job_id = $1 ORDER BY created_at DESC;")
            .bind(job_id)
            .map(|row: PgRow| Activity {
                id: row.get::<i32, &str>("id"),
                job_id: row.get::<i32, &str>("job_id"),
                activity_type: row.get::<String, &str>("type"),
                description: row.get::<String, &str>("description"),
                created_at: row.get::<NaiveDateTime, &str>("created_at")
            })
            .fetch_all(&self.pool).await?)
    }

    pub async fn create_job(&self, form: JobForm) -> Result<Job, sqlx::Error> {
        let form = form.normalized();
        let mut tx = self.pool.begin().await?;

        let domain = logo::guess_domain(&form.company);
        let logo_url = logo::logo_url(&form.company, domain.as_deref());

        let job = sqlx::query(r#"INSERT INTO jobs(company, title, link, expected_salary, location, work_type,
                date_applied, status, resume_used, pay_range, notes, priority, company_domain, company_logo)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING *;"#)
            .bind(&form.company).bind(&form.title).bind(&form.link).bind(&form.expected_salary)
            .bind(&form.location).bind(form.work_type.unwrap_or_default())
            .bind(form.date_applied.map(start_of_day)).bind(form.status)
            .bind(&form.resume_used).bind(&form.pay_range).bind(&form.notes)
            .bind(form.priority.unwrap_or(0)).bind(&domain).bind(&logo_url)
            .map(|row: PgRow| job_from_row(&row))
            .fetch_one(&mut *tx).await?;

        sqlx::query("INSERT INTO activities(job_id, type, description) VALUES($1, $2, $3);")
            .bind(job.id).bind("job_created")
            .bind(format!("Job application for {} at {} created", job.title, job.company))
            .execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(job)
    }

    /// `None` when no job has this id
    pub async fn update_job(&self, id: i32, patch: JobPatch) -> Result<Option<Job>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let current = sqlx::query("SELECT * FROM jobs WHERE id = $1 FOR UPDATE;")
            .bind(id)
            .map(|row: PgRow| job_from_row(&row))
            .fetch_optional(&mut *tx).await?;
        let Some(mut job) = current else {
            tx.rollback().await?;
            return Ok(None);
        };

        let old_status = job.status;
        job.apply_patch(patch);

        let job = sqlx::query(r#"UPDATE jobs SET company = $2, title = $3, link = $4, expected_salary = $5,
                location = $6, work_type = $7, date_applied = $8, status = $9, resume_used = $10,
                pay_range = $11, current_salary = $12, offer_amount = $13, notes = $14, priority = $15,
                updated_at = now()
            WHERE id = $1 RETURNING *;"#)
            .bind(id).bind(&job.company).bind(&job.title).bind(&job.link).bind(&job.expected_salary)
            .bind(&job.location).bind(job.work_type).bind(job.date_applied).bind(job.status)
            .bind(&job.resume_used).bind(&job.pay_range).bind(&job.current_salary)
            .bind(&job.offer_amount).bind(&job.notes).bind(job.priority)
            .map(|row: PgRow| job_from_row(&row))
            .fetch_one(&mut *tx).await?;

        if job.status != old_status {
            sqlx::query("INSERT INTO activities(job_id, type, description) VALUES($1, $2, $3);")
                .bind(id).bind("status_change")
                .bind(format!("Status changed from \"{}\" to \"{}\"", old_status, job.status))
                .execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(Some(job))
    }

    pub async fn delete_job(&self, id: i32) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM jobs WHERE id = $1;")
            .bind(id).execute(&self.pool).await?;
        Ok(())
    }

    /// Distinct resume names that have been used, alphabetically
    pub async fn get_resumes(&self) -> Result<Vec<String>, sqlx::Error> {
        Ok(sqlx::query("SELECT DISTINCT resume_used FROM jobs WHERE resume_used IS NOT NULL AND resume_used != '' ORDER BY resume_used;")
            .map(|row: PgRow| row.get::<String, &str>("resume_used"))
            .fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl JobApi for PostgresHandler {
    async fn list(&self) -> Result<Vec<Job>, ApiError> {
        Ok(self.get_jobs().await?)
    }

    async fn create(&self, form: &JobForm) -> Result<Job, ApiError> {
        Ok(self.create_job(form.clone()).await?)
    }

    async fn update(&self, id: i32, patch: &JobPatch) -> Result<Job, ApiError> {
        self.update_job(id, patch.clone()).await?.ok_or(ApiError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        Ok(self.delete_job(id).await?)
    }
}
