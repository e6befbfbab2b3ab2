#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::fs;
use std::path;
use std::process;

use anyhow::anyhow;
use anyhow::Error;
use anyhow::Result;
use domain::models::Action;
use domain::models::Event;
use tokio::sync::mpsc;
use tokio::task;
use tracing_appender::non_blocking::WorkerGuard;
use yansi::Paint;

use crate::application::cli;
use crate::application::ui;
use crate::domain::services::actions::ActionsService;
use crate::domain::services::Dispatcher;
use crate::infrastructure::transport::HttpTransport;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! Agent Portal has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

fn log_dir() -> String {
    if let Ok(dir) = env::var("AGENT_PORTAL_LOG_DIR") {
        return dir;
    }

    return dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("agent-portal")
        .to_string_lossy()
        .to_string();
}

fn logging_enabled(rust_log: &str) -> bool {
    return rust_log.contains("agent_portal");
}

/// Creates the log directory up front, since the file appender panics when it
/// cannot.
fn prepare_log_dir(dir: &str) -> Result<path::PathBuf> {
    let dir = path::PathBuf::from(dir);
    fs::create_dir_all(&dir)?;

    return Ok(dir);
}

/// The returned guard flushes the log file on drop.
fn init_logging() -> Option<WorkerGuard> {
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| return "".to_string());
    if !logging_enabled(&rust_log) {
        return None;
    }

    let dir = match prepare_log_dir(&log_dir()) {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!(
                "{}",
                Paint::yellow(format!("warning: logging disabled, {err}"))
            );
            return None;
        }
    };

    let file_appender = tracing_appender::rolling::never(dir, "debug.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(writer)
        .init();

    return Some(guard);
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let _guard = init_logging();

    let resolution = match cli::parse().await {
        Ok(Some(resolution)) => resolution,
        Ok(None) => process::exit(0),
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        let dispatcher = Dispatcher::new(Box::<HttpTransport>::default());
        return ActionsService::start(dispatcher, event_tx, &mut action_rx).await;
    });

    let ui_future = ui::start(resolution, action_tx, event_rx);

    let res: Result<()> = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(Ok(res)) => res,
            Some(Err(join_err)) => Err(anyhow!(join_err)),
            None => Ok(()),
        },
        res = ui_future => res,
    );

    if let Err(err) = res {
        ui::destruct_terminal_for_panic();
        handle_error(err);
    }

    process::exit(0);
}
