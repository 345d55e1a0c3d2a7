use std::process;
use std::sync::Arc;

use clap::Parser;
use ponte::application::error::AppError;
use ponte::application::invoker;
use ponte::application::loader::ComponentLoader;
use ponte::config::{self, CliArgs, Command, RenderArgs, ServeArgs, Settings};
use ponte::infra::engine::TemplateEngine;
use ponte::infra::error::InfraError;
use ponte::infra::telemetry;
use ponte_api_types::{RenderEnvelope, RenderRequest};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli = CliArgs::parse();
    let settings = config::load(&cli)?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let command = cli.command.unwrap_or(Command::Serve(ServeArgs::default()));
    match command {
        Command::Serve(_) => run_serve(&settings).await,
        Command::Render(args) => run_render(&settings, &args),
    }
}

fn build_loader(settings: &Settings) -> ComponentLoader {
    let engine = match settings.components.directory.as_ref() {
        Some(directory) => TemplateEngine::with_base_dir(directory),
        None => TemplateEngine::new(),
    };
    ComponentLoader::new(Arc::new(engine), settings.mode)
}

fn run_render(settings: &Settings, args: &RenderArgs) -> Result<(), AppError> {
    let props = read_props(args)?;
    let loader = build_loader(settings);

    let envelope = invoker::render(&loader, &args.component, &props);
    print_envelope(&envelope)
}

/// Parsing the property set is this layer's responsibility: a request that
/// never carried valid JSON is a CLI error, not a render failure.
fn read_props(args: &RenderArgs) -> Result<serde_json::Value, AppError> {
    let text = match (args.props.as_ref(), args.props_file.as_ref()) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|err| AppError::from(InfraError::from(err)))?,
        (None, None) => return Ok(serde_json::Value::Object(serde_json::Map::new())),
    };

    serde_json::from_str(&text)
        .map_err(|err| AppError::validation(format!("props are not valid JSON: {err}")))
}

/// One compact JSON line per envelope; the host consumes stdout line by line.
fn print_envelope(envelope: &RenderEnvelope) -> Result<(), AppError> {
    let line = serde_json::to_string(envelope)
        .map_err(|err| AppError::unexpected(format!("failed to encode envelope: {err}")))?;
    println!("{line}");
    Ok(())
}

async fn run_serve(settings: &Settings) -> Result<(), AppError> {
    let loader = build_loader(settings);
    info!(
        target: "ponte::serve",
        mode = ?settings.mode,
        "bridge ready, reading requests from stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?
    {
        if line.trim().is_empty() {
            continue;
        }

        let envelope = match serde_json::from_str::<RenderRequest>(&line) {
            Ok(request) => invoker::render(&loader, &request.component, &request.props),
            Err(err) => invoker::rejected_request(&err),
        };

        let mut payload = serde_json::to_vec(&envelope)
            .map_err(|err| AppError::unexpected(format!("failed to encode envelope: {err}")))?;
        payload.push(b'\n');
        stdout
            .write_all(&payload)
            .await
            .map_err(|err| AppError::from(InfraError::from(err)))?;
        stdout
            .flush()
            .await
            .map_err(|err| AppError::from(InfraError::from(err)))?;
    }

    info!(target: "ponte::serve", "stdin closed, shutting down");
    Ok(())
}
