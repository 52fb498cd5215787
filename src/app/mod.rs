use actix_identity::IdentityMiddleware;
use actix_session::{config::PersistentSession, storage::CookieSessionStore, SessionMiddleware};
use actix_web::{
    HttpResponse, web::{self, Data},
    cookie::{time::Duration, Key},
    middleware, App, HttpServer, Result
};
use actix_cors::Cors;
use std::time;

use crate::shared::util::config;

use crate::shared::handlers::postgres_handler::PostgresHandler as SharedPostgresHandler;
use crate::jobs::handlers::postgres_handler::PostgresHandler as JobsPostgresHandler;

use crate::shared::app as shared_app;
use crate::jobs::app as jobs_app;

use crate::shared::types::app as app_types;


async fn not_found() -> Result<HttpResponse> {
    let response = app_types::ErrorResponse{ error: "Resource not found".to_string() };
    Ok(HttpResponse::NotFound().json(response))
}

pub fn routes(app: &mut web::ServiceConfig) {
    app
        // User handling
        .service(shared_app::login)
        .service(shared_app::logout)
        .service(shared_app::whoami)

        // Jobs
        .service(jobs_app::get_jobs)
        .service(jobs_app::get_job)
        .service(jobs_app::get_activities)
        .service(jobs_app::create_job)
        .service(jobs_app::update_job)
        .service(jobs_app::delete_job)
        .service(jobs_app::get_resumes)
        .service(jobs_app::get_stats)
        .service(jobs_app::get_logo);
}

pub async fn start() -> std::io::Result<()> {
    let config = config::get_config();
    if config.server.log {
        std::env::set_var("RUST_LOG", "debug");
        env_logger::init();
    }

    let secret_key = Key::generate(); // For sessions

    let to_io = |err: sqlx::Error| std::io::Error::new(std::io::ErrorKind::Other, err);
    let handler1 = SharedPostgresHandler::new().await.map_err(to_io)?;
    let handler2 = JobsPostgresHandler::new().await.map_err(to_io)?;

    handler1.init().await.map_err(to_io)?;
    handler2.init().await.map_err(to_io)?;

    if config.server.demo_mode {
        log::warn!("Demo mode: jobs are readable without login and no changes are saved");
    }
    log::info!("starting HTTP server at http://localhost:{}", config.server.port);

    let session_ttl = Duration::seconds(
        i64::try_from(config.server.login_cookie_valid_duration_seconds).unwrap_or(i64::MAX));

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(handler1.clone()))
            .app_data(Data::new(handler2.clone()))
            .configure(routes)
            .wrap(IdentityMiddleware::default())
            .wrap(Cors::permissive())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_name("login".to_owned())
                    .cookie_secure(false)
                    .cookie_http_only(true)
                    .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
                    .build(),
            )
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::Logger::default())
            .default_service(web::route().to(not_found))
    })
        .keep_alive(time::Duration::from_secs(30))
        .bind(("127.0.0.1", config.server.port))?
        .run().await
}
