//! `JobApi` over HTTP, talking to the `/v1/jobs` routes of this server

use crate::jobs::types::api::{ApiError, JobApi};
use crate::jobs::types::job::{Job, JobForm, JobPatch};

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str
}

#[derive(Serialize)]
struct JobIdForm { id: i32 }

#[derive(Deserialize)]
struct ErrorBody { error: String }

#[derive(Clone)]
pub struct HttpJobApi {
    client: Client,
    base_url: String
}

impl HttpJobApi {
    pub fn new(base_url: &str) -> Result<HttpJobApi, ApiError> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(HttpJobApi { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a session; the cookie is kept for later calls
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let response = self.client.post(self.url("/v1/login"))
            .json(&LoginForm { username, password })
            .send().await?;
        check(response).await.map(|_| ())
    }
}

// Anything but 2xx is a failure, with the server's message when it sent one
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string()
    };
    Err(ApiError::Status { status: status.as_u16(), message })
}

#[async_trait]
impl JobApi for HttpJobApi {
    async fn list(&self) -> Result<Vec<Job>, ApiError> {
        let response = self.client.get(self.url("/v1/jobs")).send().await?;
        Ok(check(response).await?.json::<Vec<Job>>().await?)
    }

    async fn create(&self, form: &JobForm) -> Result<Job, ApiError> {
        let response = self.client.post(self.url("/v1/jobs")).json(form).send().await?;
        Ok(check(response).await?.json::<Job>().await?)
    }

    async fn update(&self, id: i32, patch: &JobPatch) -> Result<Job, ApiError> {
        let response = self.client.put(self.url("/v1/jobs"))
            .query(&[("id", id)])
            .json(patch)
            .send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(id));
        }
        Ok(check(response).await?.json::<Job>().await?)
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let response = self.client.delete(self.url("/v1/jobs"))
            .json(&JobIdForm { id })
            .send().await?;
        check(response).await.map(|_| ())
    }
}
