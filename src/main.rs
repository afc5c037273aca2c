//! `ws` - interactive WebSocket client.
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=wsc=debug`) for internal logging on stderr.

use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use wsc::cli::{Args, version_string};
use wsc::console::output::DIAGNOSTIC_PREFIX;
use wsc::console::{
    DEFAULT_PROMPT, LineSource, PlainReader, PromptReader, TerminalSink, color_enabled,
};
use wsc::error::EXIT_USAGE;
use wsc::session::{Session, watch_os_interrupts};
use wsc::Error;

#[tokio::main]
async fn main() -> ExitCode {
    let code = run().await;
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

async fn run() -> i32 {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { EXIT_USAGE } else { 0 };
        }
    };

    init_tracing();

    if args.version {
        println!("{}", version_string());
        return 0;
    }

    let client = match args.client() {
        Ok(client) => client,
        Err(e) => return fail(&e),
    };

    println!("Connecting to {}", client.url());
    let connection = match client.connect().await {
        Ok(connection) => connection,
        Err(e) => return fail(&e),
    };

    let color = color_enabled(args.no_color);
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let (input, sink): (Box<dyn LineSource>, TerminalSink) = if interactive {
        (
            Box::new(PromptReader::new(DEFAULT_PROMPT, color)),
            TerminalSink::new(color).with_prompt(DEFAULT_PROMPT),
        )
    } else {
        (Box::new(PlainReader::stdin()), TerminalSink::new(color))
    };

    let session = Session::new(
        Arc::new(connection),
        Arc::new(sink),
        client.session_config().clone(),
    );
    let watcher = watch_os_interrupts(session.interrupt());

    let result = session.run(input).await;
    watcher.abort();

    match result {
        Ok(shutdown) => {
            debug!(?shutdown, "Exiting");
            0
        }
        Err(e) => fail(&e),
    }
}

fn fail(err: &Error) -> i32 {
    eprintln!("{DIAGNOSTIC_PREFIX}: {err}");
    err.exit_code()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
