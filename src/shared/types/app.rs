use serde::Serialize;

#[derive(Serialize)]
pub struct Response {
    pub msg: String
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String
}

macro_rules! login_fail {
    () => {
        return Ok(HttpResponse::Unauthorized().json(ErrorResponse { error: "Unauthorized".to_string() })) }
}

macro_rules! demo_mode_read_only {
    () => { return Ok(HttpResponse::Forbidden().json(
            ErrorResponse{ error: "Demo mode: changes are not saved on the server".to_string() })) }
}

macro_rules! job_not_found {
    () => { return Ok(HttpResponse::NotFound().json(
            ErrorResponse{ error: "Job not found".to_string() })) }
}

pub(crate) use login_fail;
pub(crate) use demo_mode_read_only;
pub(crate) use job_not_found;
