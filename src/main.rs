use job_tracker_server::app;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    app::start().await
}
