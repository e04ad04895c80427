//! Interactive shell over the TidyTask core.
//!
//! # Responsibility
//! - Map line commands onto the core form handlers and row controls.
//! - Render the active region (auth forms vs task list) after each step.
//! - Surface queued notices the way the original surfaced alerts.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tidytask_core::db::{open_db, open_db_in_memory};
use tidytask_core::{default_log_level, init_logging, App, Screen, TaskId};

#[derive(Parser)]
#[command(name = "tidytask", about = "Personal task list with accounts")]
struct Args {
    /// Database file; an in-memory database is used when omitted.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Directory for rolling log files; logging is disabled when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let args = Args::parse();

    if let Some(log_dir) = &args.log_dir {
        let level = args
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        if let Err(err) = init_logging(&level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    let conn = match &args.db {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open database: {err}");
            std::process::exit(1);
        }
    };

    let mut app = match App::try_new(&conn) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("failed to start: {err}");
            std::process::exit(1);
        }
    };

    println!("tidytask {} - type `help` for commands", tidytask_core::core_version());
    render(&mut app);

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("input error: {err}");
                break;
            }
        }

        if !dispatch(&mut app, line.trim()) {
            break;
        }
        app.process_events();
        render(&mut app);
    }
}

/// Runs one command. Returns `false` when the shell should exit.
fn dispatch(app: &mut App<'_>, line: &str) -> bool {
    let (command, rest) = split_command(line);
    match command {
        "" => {}
        "help" => print_help(),
        "signup" => with_credentials(rest, |email, password| app.sign_up(email, password)),
        "login" => with_credentials(rest, |email, password| app.log_in(email, password)),
        "logout" => app.log_out(),
        "add" => app.add_task(rest),
        "list" => {}
        "del" => with_row_id(app, rest, |app, id| app.delete_task(id)),
        "edit" => with_row_id(app, rest, |app, id| app.begin_edit(id)),
        "cancel" => with_row_id(app, rest, |app, id| app.cancel_edit(id)),
        "submit" => {
            let (index, text) = split_command(rest);
            match row_id(app, index) {
                Some(id) => app.submit_edit(id, text),
                None => println!("unknown row: {index}"),
            }
        }
        "quit" | "exit" => return false,
        other => println!("unknown command: {other} (try `help`)"),
    }
    true
}

fn with_credentials(rest: &str, handler: impl FnOnce(&str, &str)) {
    let (email, password) = split_command(rest);
    handler(email, password);
}

fn with_row_id(app: &mut App<'_>, rest: &str, action: impl FnOnce(&mut App<'_>, TaskId)) {
    match row_id(app, rest.trim()) {
        Some(id) => action(app, id),
        None => println!("unknown row: {}", rest.trim()),
    }
}

/// Resolves a 1-based row index from the rendered list to a record id.
fn row_id(app: &App<'_>, index: &str) -> Option<TaskId> {
    let position: usize = index.parse().ok()?;
    app.rows().get(position.checked_sub(1)?).map(|row| row.id)
}

fn render(app: &mut App<'_>) {
    for notice in app.take_notices() {
        if notice.is_error() {
            println!("! {}", notice.message());
        } else {
            println!("* {}", notice.message());
        }
    }

    match app.screen() {
        Screen::Auth => {
            println!("[not signed in] commands: signup <email> <password>, login <email> <password>");
        }
        Screen::Tasks => {
            let email = app
                .current_session()
                .map(|session| session.email.clone())
                .unwrap_or_default();
            println!("[{email}] tasks:");
            if app.rows().is_empty() {
                println!("  (no tasks)");
            }
            for (position, row) in app.rows().iter().enumerate() {
                let marker = if row.completed { "x" } else { " " };
                match &row.editing {
                    Some(buffer) => println!(
                        "  {}. [{marker}] {}  (editing: `{buffer}`; submit {} <text> | cancel {})",
                        position + 1,
                        row.text,
                        position + 1,
                        position + 1
                    ),
                    None => println!("  {}. [{marker}] {}", position + 1, row.text),
                }
            }
        }
    }
}

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim_start()),
        None => (line, ""),
    }
}

fn print_help() {
    println!("commands:");
    println!("  signup <email> <password>   create an account and sign in");
    println!("  login <email> <password>    sign in");
    println!("  logout                      sign out");
    println!("  add <text>                  add a task");
    println!("  del <n>                     delete task n");
    println!("  edit <n>                    start editing task n");
    println!("  submit <n> <text>           replace text of task n");
    println!("  cancel <n>                  stop editing task n");
    println!("  list                        re-render the list");
    println!("  quit                        exit");
}
