use crate::shared::handlers::postgres_handler::PostgresHandler;
use crate::shared::types::app::{ErrorResponse, Response, login_fail};

use actix_identity::Identity;
use actix_web::{
    get, post, HttpResponse, web::{self, Data},
    HttpMessage as _, HttpRequest, Result
};

use serde::{Serialize, Deserialize};


#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String
}

#[post("/v1/login")]
async fn login(handler: Data<PostgresHandler>, req: HttpRequest, info: web::Json<LoginForm>) -> Result<HttpResponse> {
    match handler.can_login(info.username.as_str(), info.password.as_str()).await {
        Ok(true) => (),
        Ok(false) => login_fail!(),
        Err(err) => {
            log::error!("Error checking login for {}: {}", info.username, err);
            login_fail!();
        }
    }
    if let Err(err) = Identity::login(&req.extensions(), info.username.to_lowercase()) {
        log::error!("Could not attach identity: {}", err);
        return Ok(HttpResponse::InternalServerError().json(ErrorResponse{ error: "Failed to log in".to_string() }));
    }
    Ok(HttpResponse::Ok().json(Response { msg: "You logged in".to_string() }))
}

#[post("/v1/logout")]
async fn logout(id: Option<Identity>) -> Result<HttpResponse> {
    if let Some(id) = id { id.logout(); }
    Ok(HttpResponse::Ok().json(Response { msg: "You logged out".to_string() }))
}

#[derive(Serialize)]
struct WhoAmIReturn {
    id: String,
    name: String
}

#[get("/v1/whoami")]
async fn whoami(handler: Data<PostgresHandler>, identity: Option<Identity>) -> Result<HttpResponse> {
    if let Some(identity) = identity {
        let Ok(id) = identity.id() else { login_fail!() };
        return match handler.get_user(id.as_str()).await {
            Ok(user) => Ok(HttpResponse::Ok().json(WhoAmIReturn { id: user.id, name: user.name })),
            Err(_err) => Ok(HttpResponse::Forbidden().json(ErrorResponse{ error: "Could not get user".to_string() }))
        };
    }
    login_fail!();
}
