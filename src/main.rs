// Main CLI entry point for apihub-sync
// Uses clap for argument parsing and tracing-subscriber for log output

use apihub_sync::docs::{self, DocFormat, ProjectDocument};
use apihub_sync::models::Project;
use apihub_sync::remote::{RemoteSource, YapiClient};
use apihub_sync::store::{MemoryStore, ProjectStore};
use apihub_sync::{Error, Reconciler, Result, SyncConfig};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("apihub-sync")
        .version(clap::crate_version!())
        .about("Synchronize YAPI categories and interfaces into APIHub collections and endpoints")
        .after_help("EXAMPLES:\n  apihub-sync --yapi-url http://yapi.local --token TOKEN --project-id 11 test\n  YAPI_TOKEN=TOKEN apihub-sync -u http://yapi.local -p 11 sync --format openapi --out docs/")
        .subcommand_required(true)
        .arg(Arg::new("yapi_url")
            .short('u')
            .long("yapi-url")
            .env("YAPI_URL")
            .global(true)
            .num_args(1)
            .help("Base URL of the YAPI server"))
        .arg(Arg::new("token")
            .short('t')
            .long("token")
            .env("YAPI_TOKEN")
            .global(true)
            .num_args(1)
            .hide_env_values(true)
            .help("YAPI project token"))
        .arg(Arg::new("project_id")
            .short('p')
            .long("project-id")
            .env("YAPI_PROJECT_ID")
            .global(true)
            .num_args(1)
            .value_parser(clap::value_parser!(i64))
            .help("Numeric YAPI project id"))
        .arg(Arg::new("log_level")
            .long("log-level")
            .env("LOG_LEVEL")
            .global(true)
            .num_args(1)
            .default_value("info")
            .help("Log level (RUST_LOG overrides)"))
        .subcommand(Command::new("test")
            .about("Check that the YAPI project is reachable with the given token"))
        .subcommand(Command::new("info")
            .about("Print the YAPI project and its categories as JSON"))
        .subcommand(Command::new("sync")
            .about("Sync the YAPI project into a local project and export documentation")
            .arg(Arg::new("name")
                .short('n')
                .long("name")
                .num_args(1)
                .help("Local project name (defaults to the YAPI project name)"))
            .arg(Arg::new("format")
                .short('f')
                .long("format")
                .num_args(1)
                .default_value("markdown")
                .help("markdown, html, openapi or postman"))
            .arg(Arg::new("out")
                .short('o')
                .long("out")
                .num_args(1)
                .default_value(".")
                .help("Directory for the generated documentation")))
}

fn remote_config(matches: &ArgMatches) -> SyncConfig {
    SyncConfig {
        project_id: String::new(),
        yapi_url: matches.get_one::<String>("yapi_url").cloned().unwrap_or_default(),
        yapi_token: matches.get_one::<String>("token").cloned().unwrap_or_default(),
        yapi_project_id: matches.get_one::<i64>("project_id").copied().unwrap_or_default(),
    }
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling");
            child.cancel();
        }
    });
    token
}

async fn run(matches: ArgMatches) -> Result<()> {
    let mut config = remote_config(&matches);
    config.validate_connection()?;
    let client = YapiClient::from_config(&config)?;
    let cancel = cancel_on_ctrl_c();

    match matches.subcommand() {
        Some(("test", _)) => {
            let overview = client.overview(config.yapi_project_id, &cancel).await?;
            println!("Connection successful: {} ({})", overview.project.name, client.base_url());
            println!("Categories: {}", overview.categories.len());
            println!("Interfaces: {}", overview.total_interfaces);
        }
        Some(("info", _)) => {
            let project = client.get_project(config.yapi_project_id, &cancel).await?;
            let categories = client.get_categories(config.yapi_project_id, &cancel).await?;
            let out = serde_json::json!({ "project": project, "categories": categories });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Some(("sync", sub)) => {
            let format: DocFormat = sub
                .get_one::<String>("format")
                .map(|s| s.as_str())
                .unwrap_or("markdown")
                .parse()?;
            let out_dir = PathBuf::from(sub.get_one::<String>("out").map(|s| s.as_str()).unwrap_or("."));

            let remote_project = client.get_project(config.yapi_project_id, &cancel).await?;
            let name = sub
                .get_one::<String>("name")
                .cloned()
                .unwrap_or_else(|| remote_project.name.clone());

            let store: Arc<dyn ProjectStore> = Arc::new(MemoryStore::new());
            let project = store.create_project(Project::new(name, remote_project.desc.clone())).await?;
            config.project_id = project.id.clone();

            let stats = Reconciler::new(store.clone()).sync(&config, &cancel).await?;
            println!("YAPI sync completed: {}", stats);
            println!("Endpoints synced: {}", stats.total_endpoints());

            let document = ProjectDocument::load(store.as_ref(), &project.id).await?;
            std::fs::create_dir_all(&out_dir)?;
            let path = docs::export(&document, format, &out_dir)?;
            println!("Documentation written to {}", path.display());
        }
        _ => unreachable!("subcommand_required is set"),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let level = matches.get_one::<String>("log_level").map(|s| s.as_str()).unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .init();

    if let Err(e) = run(matches).await {
        error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        let code = match e {
            Error::InvalidConfig(_) => 2,
            Error::Cancelled => 130,
            _ => 1,
        };
        std::process::exit(code);
    }
}
