//! services/admin-api/src/bin/console.rs
//!
//! An interactive terminal menu over the same data-access port the HTTP
//! server uses. Each menu choice maps to exactly one port operation;
//! failures are printed and the menu loops instead of aborting.

use admin_api_lib::{
    adapters::{JsonExporter, PgAdminStore},
    config::Config,
    error::ApiError,
};
use connectia_core::domain::{CourseScope, CourseStatus, NewUser, Page, UserUpdate};
use connectia_core::ports::AdminDatabase;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::io::Write as _;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_pool = PgPoolOptions::new()
        .min_connections(config.pool_min_connections)
        .max_connections(config.pool_max_connections)
        .connect(&config.database_url)
        .await?;
    let store = PgAdminStore::new(db_pool);
    store.run_migrations().await?;
    let exporter = JsonExporter::new(config.export_dir.clone());

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!();
        println!("=== Connectia Admin Console ===");
        println!("1 - Create user");
        println!("2 - List users");
        println!("3 - Update user");
        println!("4 - Delete user");
        println!("5 - List courses");
        println!("6 - Update course status");
        println!("7 - Reporting queries");
        println!("0 - Quit");

        let Some(choice) = prompt(&mut input, "Choose an option: ").await? else {
            break;
        };
        match choice.as_str() {
            "1" => create_user(&store, &mut input).await?,
            "2" => list_users(&store, &mut input).await?,
            "3" => update_user(&store, &mut input).await?,
            "4" => delete_user(&store, &mut input).await?,
            "5" => list_courses(&store, &mut input).await?,
            "6" => update_course_status(&store, &mut input).await?,
            "7" => reporting_queries(&store, &exporter, &mut input).await?,
            "0" => {
                println!("Bye.");
                break;
            }
            other => println!("Unknown option '{}'", other),
        }
    }

    Ok(())
}

/// Prints a label, flushes, and reads the next trimmed line. `None` means
/// end of input (the caller should quit).
async fn prompt(input: &mut Input, label: &str) -> Result<Option<String>, std::io::Error> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|line| line.trim().to_string()))
}

/// Prompts for an integer; an empty answer yields `default`.
async fn prompt_i64(
    input: &mut Input,
    label: &str,
    default: Option<i64>,
) -> Result<Option<i64>, std::io::Error> {
    loop {
        let Some(raw) = prompt(input, label).await? else {
            return Ok(None);
        };
        if raw.is_empty() {
            if let Some(d) = default {
                return Ok(Some(d));
            }
        }
        match raw.parse::<i64>() {
            Ok(v) => return Ok(Some(v)),
            Err(_) => println!("'{}' is not a number, try again", raw),
        }
    }
}

fn print_rows<T: Serialize>(rows: &T) {
    match serde_json::to_string_pretty(rows) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("Failed to render result: {}", e),
    }
}

/// Runs one port operation and prints either the result or the error.
macro_rules! report {
    ($op:expr) => {
        match $op.await {
            Ok(value) => print_rows(&value),
            Err(e) => println!("Error: {}", e),
        }
    };
}

async fn create_user(store: &PgAdminStore, input: &mut Input) -> Result<(), std::io::Error> {
    let Some(nm_usuario) = prompt(input, "Name: ").await? else { return Ok(()) };
    let Some(ds_email) = prompt(input, "Email: ").await? else { return Ok(()) };
    let Some(ds_senha) = prompt(input, "Password: ").await? else { return Ok(()) };
    let Some(id_carreira) = prompt_i64(input, "Career id: ", None).await? else { return Ok(()) };
    let Some(tp_plano) = prompt(input, "Plan type: ").await? else { return Ok(()) };
    let Some(area) = prompt_i64(input, "Area id: ", None).await? else { return Ok(()) };

    let new_user = NewUser {
        nm_usuario,
        ds_email,
        ds_senha,
        id_carreira,
        tp_plano,
        t_con_carreira_id_area: area,
    };
    report!(store.create_user(new_user));
    Ok(())
}

async fn list_users(store: &PgAdminStore, input: &mut Input) -> Result<(), std::io::Error> {
    let Some(limit) = prompt_i64(input, "Limit [100]: ", Some(Page::DEFAULT_LIMIT)).await? else {
        return Ok(());
    };
    let Some(offset) = prompt_i64(input, "Offset [0]: ", Some(0)).await? else {
        return Ok(());
    };
    report!(store.list_users(Page::new(limit, offset)));
    Ok(())
}

async fn update_user(store: &PgAdminStore, input: &mut Input) -> Result<(), std::io::Error> {
    let Some(id) = prompt_i64(input, "User id: ", None).await? else { return Ok(()) };
    println!("Leave a field blank to keep its current value.");
    let Some(nm_usuario) = prompt(input, "New name: ").await? else { return Ok(()) };
    let Some(ds_email) = prompt(input, "New email: ").await? else { return Ok(()) };
    let Some(ds_senha) = prompt(input, "New password: ").await? else { return Ok(()) };
    let Some(tp_plano) = prompt(input, "New plan type: ").await? else { return Ok(()) };

    let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
    let changes = UserUpdate {
        nm_usuario: non_empty(nm_usuario),
        ds_email: non_empty(ds_email),
        ds_senha: non_empty(ds_senha),
        tp_plano: non_empty(tp_plano),
        ..UserUpdate::default()
    };
    report!(store.update_user(id, changes));
    Ok(())
}

async fn delete_user(store: &PgAdminStore, input: &mut Input) -> Result<(), std::io::Error> {
    let Some(id) = prompt_i64(input, "User id: ", None).await? else { return Ok(()) };
    match store.delete_user(id).await {
        Ok(()) => println!("User {} deleted", id),
        Err(e) => println!("Error: {}", e),
    }
    Ok(())
}

async fn list_courses(store: &PgAdminStore, input: &mut Input) -> Result<(), std::io::Error> {
    let Some(limit) = prompt_i64(input, "Limit [100]: ", Some(Page::DEFAULT_LIMIT)).await? else {
        return Ok(());
    };
    let Some(offset) = prompt_i64(input, "Offset [0]: ", Some(0)).await? else {
        return Ok(());
    };
    report!(store.list_courses(Page::new(limit, offset)));
    Ok(())
}

async fn update_course_status(
    store: &PgAdminStore,
    input: &mut Input,
) -> Result<(), std::io::Error> {
    let Some(id) = prompt_i64(input, "Course id: ", None).await? else { return Ok(()) };
    let Some(raw) = prompt(input, "New status (C/N/E): ").await? else { return Ok(()) };
    let status = match CourseStatus::from_str(&raw) {
        Ok(s) => s,
        Err(e) => {
            println!("Error: {}", e);
            return Ok(());
        }
    };
    println!("Optionally narrow by career and area (blank to skip).");
    let Some(raw_career) = prompt(input, "Career id: ").await? else { return Ok(()) };
    let scope = if raw_career.is_empty() {
        None
    } else {
        let Ok(id_carreira) = raw_career.parse::<i64>() else {
            println!("'{}' is not a number", raw_career);
            return Ok(());
        };
        let Some(id_area) = prompt_i64(input, "Area id: ", None).await? else { return Ok(()) };
        Some(CourseScope {
            id_carreira,
            id_area,
        })
    };
    report!(store.update_course_status(id, status, scope));
    Ok(())
}

async fn reporting_queries(
    store: &PgAdminStore,
    exporter: &JsonExporter,
    input: &mut Input,
) -> Result<(), std::io::Error> {
    println!("1 - Users by career");
    println!("2 - Courses by status");
    println!("3 - Courses of a user");
    let Some(choice) = prompt(input, "Choose a query: ").await? else { return Ok(()) };

    let (query, filter, rows) = match choice.as_str() {
        "1" => {
            let Some(id) = prompt_i64(input, "Career id: ", None).await? else { return Ok(()) };
            match store.users_by_career(id).await {
                Ok(rows) => (
                    "users_by_career",
                    id.to_string(),
                    serde_json::to_value(rows),
                ),
                Err(e) => {
                    println!("Error: {}", e);
                    return Ok(());
                }
            }
        }
        "2" => {
            let Some(raw) = prompt(input, "Status (C/N/E): ").await? else { return Ok(()) };
            let status = match CourseStatus::from_str(&raw) {
                Ok(s) => s,
                Err(e) => {
                    println!("Error: {}", e);
                    return Ok(());
                }
            };
            match store.courses_by_status(status).await {
                Ok(rows) => (
                    "courses_by_status",
                    status.to_string(),
                    serde_json::to_value(rows),
                ),
                Err(e) => {
                    println!("Error: {}", e);
                    return Ok(());
                }
            }
        }
        "3" => {
            let Some(id) = prompt_i64(input, "User id: ", None).await? else { return Ok(()) };
            match store.courses_by_user(id).await {
                Ok(rows) => ("user_courses", id.to_string(), serde_json::to_value(rows)),
                Err(e) => {
                    println!("Error: {}", e);
                    return Ok(());
                }
            }
        }
        other => {
            println!("Unknown query '{}'", other);
            return Ok(());
        }
    };

    let rows = match rows {
        Ok(rows) => rows,
        Err(e) => {
            println!("Failed to render result: {}", e);
            return Ok(());
        }
    };
    print_rows(&rows);

    let Some(answer) = prompt(input, "Export to JSON file? (y/N): ").await? else {
        return Ok(());
    };
    if answer.eq_ignore_ascii_case("y") {
        let file_name = JsonExporter::file_name(query, &filter);
        match exporter.export(&file_name, &rows).await {
            Ok(exported) => println!("Exported to {}", exported.path.display()),
            Err(e) => println!("Error: {}", e),
        }
    }
    Ok(())
}
