mod app;
mod config;
mod intent;
mod views;

use std::{io::Write, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use todo_core::ListController;
use todo_gateway::HttpGateway;
use todo_observe::logger_init;

use crate::{
    app::{App, Flow},
    config::Cli,
    intent::{Intent, IntentError},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger_init(&cli.logger_config())?;
    info!(api = %cli.api_url, "starting");

    let gateway = Arc::new(
        HttpGateway::new(&cli.gateway_config()).context("invalid task service configuration")?,
    );
    let controller = ListController::new(gateway.clone(), gateway, &cli.controller_config());
    if let Err(err) = controller.ping().await {
        warn!(error = %err, "task service health check failed");
    }

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        }
    });

    let (mut app, mut events) = App::new(controller, cli.rows, shutdown.clone());
    app.start();

    let mut stdout = std::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    flush(&mut stdout, &mut app)?;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("interrupted");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                match line.parse::<Intent>() {
                    Ok(intent) => {
                        if app.handle(intent) == Flow::Quit {
                            break;
                        }
                    }
                    Err(IntentError::Empty) => {}
                    Err(err) => app.reject(&err),
                }
            }
            Some(event) = events.recv() => app.on_event(event),
        }
        flush(&mut stdout, &mut app)?;
    }

    app.shutdown().await;
    info!("bye");
    Ok(())
}

fn flush(stdout: &mut std::io::Stdout, app: &mut App) -> std::io::Result<()> {
    let out = app.take_output();
    if !out.is_empty() {
        write!(stdout, "{out}> ")?;
    }
    stdout.flush()
}
