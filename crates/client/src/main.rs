use std::io::Read;

use meshlab_client::command::execute_json_batch;
use meshlab_client::state::AppSettings;
use meshlab_client::Session;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meshlab=info,meshlab_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();

    let mut settings = AppSettings::load();
    if let Some(url) = args.server {
        settings.server.url = url;
    }

    let json = match read_commands(args.commands.as_deref()) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to read commands: {e}");
            std::process::exit(2);
        }
    };

    let session = match Session::new(settings) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to start session: {e}");
            std::process::exit(2);
        }
    };
    tracing::info!("Using compute server {}", session.client().base_url());

    match execute_json_batch(&session, &json).await {
        Ok(responses) => {
            let failed = responses.iter().filter(|r| !r.success).count();
            match serde_json::to_string_pretty(&responses) {
                Ok(out) => println!("{out}"),
                Err(e) => tracing::error!("Failed to serialize responses: {e}"),
            }
            if failed > 0 {
                tracing::warn!("{failed} of {} commands failed", responses.len());
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(2);
        }
    }
}

struct Args {
    commands: Option<String>,
    server: Option<String>,
}

/// `meshlab [--commands <path>] [--server <url>]`; commands default to stdin.
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        commands: None,
        server: None,
    };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--commands" if i + 1 < args.len() => {
                parsed.commands = Some(args[i + 1].clone());
                i += 1;
            }
            "--server" if i + 1 < args.len() => {
                parsed.server = Some(args[i + 1].clone());
                i += 1;
            }
            other => tracing::warn!("Ignoring unknown argument `{other}`"),
        }
        i += 1;
    }
    parsed
}

fn read_commands(path: Option<&str>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut json = String::new();
            std::io::stdin().read_to_string(&mut json)?;
            Ok(json)
        }
    }
}
