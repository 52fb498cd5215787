use clap::{arg, Parser, Subcommand};
use job_tracker_server::shared::util::config;
use job_tracker_server::shared::handlers::postgres_handler::PostgresHandler as SharedPostgresHandler;
use std::process::exit;

#[derive(Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new user
    Add {
        id: String,
        name: String,
        #[arg(value_parser = validate_password)]
        password: String,
    },
    /// Delete a user
    Delete { id: String },
    /// Reset a user's password
    Password {
        id: String,
        #[arg(value_parser = validate_password)]
        password: String,
    },
}

fn validate_password(password: &str) -> Result<String, String> {
    let count = &config::get_config().count;
    if password.len() < count.min_password_length || password.len() > count.max_password_length {
        return Err(format!("Password must be {} - {} characters (inclusive) in length",
            count.min_password_length, count.max_password_length));
    }
    Ok(password.to_string())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let postgres_handler = match SharedPostgresHandler::new().await {
        Ok(handler) => handler,
        Err(err) => {
            eprintln!("Could not open the database: {}", err);
            exit(1);
        }
    };
    if let Err(err) = postgres_handler.init().await {
        eprintln!("Could not create the users table: {}", err);
        exit(1);
    }

    match &cli.command {
        Commands::Add { name, id, password } => match postgres_handler.get_user(id).await {
            Ok(_) => println!("Error: User with id `{id}` and name `{name}` already exists"),
            Err(_) => match postgres_handler.create_account(id, name, password).await {
                Ok(_) => println!("Successfully created account"),
                Err(err) => println!("db error: {}", err),
            },
        },
        Commands::Delete { id } => match postgres_handler.delete_account(id).await {
            Ok(_) => println!("Successfully deleted account"),
            Err(err) => println!("db error: {}", err),
        },
        Commands::Password { id, password } => match postgres_handler.get_user(id).await {
            Ok(_) => match postgres_handler.change_password(id, password).await {
                Ok(_) => println!("Successfully changed password"),
                Err(err) => println!("db error: {}", err),
            },
            Err(_) => println!("Error: No user with id `{id}`"),
        },
    }
}
