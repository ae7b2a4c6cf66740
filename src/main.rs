mod cli;

use clap::Parser;
use cli::{Cli, Commands, RenderArgs};
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use tracing::{error, info, warn};

use funcmap::config::Settings;
use funcmap::errors::HelperError;
use funcmap::functions;
use funcmap::handler::FunctionHandler;
use funcmap::observability::init_logging;
use funcmap::template::TemplateEngine;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();

    let settings = match cli.config {
        Some(path) => Settings::load_from_path(path)?,
        None => Settings::load()?,
    };
    init_logging(&settings.logging);

    match cli.command {
        Commands::Render(args) => render(args, settings).await?,
        Commands::List => list(),
    }

    Ok(())
}

async fn render(args: RenderArgs, mut settings: Settings) -> Result<(), AnyError> {
    if let Some(strategy) = args.strategy {
        settings.errors.strategy = strategy;
    }

    let data: Value = match &args.data {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Value::Object(Default::default()),
    };

    let (options, receiver) = settings.errors.handler_options();
    let handler = Arc::new(FunctionHandler::new(options));
    let engine = TemplateEngine::new(&functions::builtin(&handler), &settings.render);
    info!(
        strategy = %handler.strategy(),
        masked = handler.strategy().masks_errors(),
        template = %args.template.display(),
        "Rendering template"
    );

    let drain = receiver.map(|mut receiver| {
        tokio::spawn(async move {
            let mut forwarded = 0u64;
            while let Some(err) = receiver.recv().await {
                forwarded += 1;
                warn!(error = %err, "Helper error reported");
            }
            forwarded
        })
    });

    let template = args.template.clone();
    let task = tokio::task::spawn_blocking(move || engine.render_file(&template, &data));

    let rendered = match task.await {
        Ok(rendered) => rendered,
        Err(join_error) if join_error.is_panic() => {
            let payload = join_error.into_panic();
            match payload.downcast_ref::<HelperError>() {
                Some(err) => {
                    error!(error = %err, "Render aborted by helper panic");
                    return Err(format!("render aborted: {err}").into());
                }
                None => std::panic::resume_unwind(payload),
            }
        }
        Err(join_error) => return Err(join_error.into()),
    };

    // Last sender goes away with the handler, ending the drain loop
    let stats = handler.stats().snapshot();
    drop(handler);
    if let Some(drain) = drain {
        let forwarded = drain.await?;
        info!(forwarded, "Error channel drained");
    }
    info!(?stats, "Render finished");

    print!("{}", rendered?);
    Ok(())
}

fn list() {
    let handler = Arc::new(FunctionHandler::default());
    for name in functions::builtin(&handler).names() {
        println!("{name}");
    }
}
