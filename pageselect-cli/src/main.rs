mod commands;
mod config;
mod paths;

use std::fs::File;
use std::time::Duration;

use log::{error, info};
use pageselect_lib::model::ARTWORK_FIELDS;
use pageselect_lib::model::PageNumber;
use pageselect_lib::source::{HttpSource, PagedSource};
use pageselect_lib::{FetchOutcome, TableSession};
use simplelog::{Config, WriteLogger};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{Command, HELP};
use crate::config::AppConfig;

fn init_logging(config: &AppConfig) {
    paths::rotate_logs();

    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent()
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("Cannot create log directory {}: {}", dir.display(), e);
        return;
    }

    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot write log file {}: {}", path.display(), e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(config.log_level, Config::default(), file) {
        eprintln!("Cannot install logger: {}", e);
    }
}

fn report(outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Loaded { discharged: Some(d), .. } => {
            println!("selected first {} of {} requested rows on page {}", d.selected, d.requested, d.page);
        }
        FetchOutcome::Loaded { .. } | FetchOutcome::Stale { .. } => {}
        FetchOutcome::Failed { page, error } => {
            println!("page {} could not be loaded ({}), showing it empty", page, error);
        }
    }
}

fn show<S>(session: &TableSession<S>) {
    let page = session.current_page();
    let first_row = page.first_row(session.page_size());

    println!(
        "[{}] page {} of {} ({} records, {} selected)",
        if session.header_checked() { "x" } else { " " },
        page,
        session.page_count(),
        session.total_count(),
        session.selected_count(),
    );

    for (row, record) in session.records().iter().enumerate() {
        println!(
            "  [{}] {:>4} {:>8}  {}  ({})",
            if session.is_selected(record.id) { "x" } else { " " },
            first_row + row + 1,
            record.id,
            record.display("title"),
            record.display("artist_display").lines().next().unwrap_or(""),
        );
    }
}

/// Run one command. Returns false when the user asked to quit.
async fn dispatch<S: PagedSource>(session: &mut TableSession<S>, command: Command) -> bool {
    match command {
        Command::Page(page) => {
            let outcome = session.navigate(page).await;
            report(&outcome);
            show(session);
        }
        Command::Next => match session.next_page().await {
            Some(outcome) => {
                report(&outcome);
                show(session);
            }
            None => println!("already on the last page"),
        },
        Command::Prev => match session.prev_page().await {
            Some(outcome) => {
                report(&outcome);
                show(session);
            }
            None => println!("already on the first page"),
        },
        Command::Toggle(id, desired) => {
            session.toggle_row(id, desired);
            show(session);
        }
        Command::All(desired) => {
            session.set_page_selected(desired);
            show(session);
        }
        Command::First(n) => {
            let submission = session.submit_bulk(n);
            if !submission.superseded.is_empty() {
                println!("replaced {} pending pages", submission.superseded.len());
            }
            if let Some(d) = submission.applied {
                println!("selected first {} rows on this page", d.selected);
            }
            if !session.pending().is_empty() {
                println!("{} more rows will be selected as their pages load", session.pending().total());
            }
            show(session);
        }
        Command::Clear => {
            session.clear_selection();
            show(session);
        }
        Command::Show => show(session),
        Command::Selected => {
            let ids: Vec<String> = session.selected_ids().iter().map(|id| id.to_string()).collect();
            println!("{} selected: {}", ids.len(), ids.join(", "));
        }
        Command::Pending => {
            if session.pending().is_empty() {
                println!("nothing pending");
            }
            for (page, count) in session.pending().iter() {
                println!("  page {}: first {} rows", page, count);
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    init_logging(&config);
    info!("Starting with provider {}", config.api_url);

    let source = match HttpSource::builder()
        .url(config.api_url.as_str())
        .fields(ARTWORK_FIELDS)
        .timeout(Duration::from_secs(15))
        .connect_timeout(Duration::from_secs(5))
        .build()
    {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let mut session = TableSession::new(source, config.session);
    report(&session.navigate(PageNumber::FIRST).await);
    show(&session);
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        match Command::parse(&line) {
            Ok(Some(command)) => {
                if !dispatch(&mut session, command).await {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => println!("{}", e),
        }
    }

    info!("Exiting with {} rows selected", session.selected_count());
}
