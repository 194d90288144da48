use crate::demo::{run_demo, DemoArgs};
use crate::infra::load_rubric;
use crate::server;
use clap::{Args, Parser, Subcommand};
use scoresheet::config::AppConfig;
use scoresheet::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Campus Journalist Scoring Sheet",
    about = "Score campus journalist candidates over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk through a scripted scoring session in the terminal
    Demo(DemoArgs),
    /// Print the active rubric tables as JSON
    Rubric(RubricArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RubricArgs {
    /// Rubric file to print instead of the configured one
    #[arg(long)]
    pub(crate) path: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Rubric(args) => print_rubric(args),
    }
}

fn print_rubric(args: RubricArgs) -> Result<(), AppError> {
    let path = match args.path {
        Some(path) => Some(path),
        None => AppConfig::load()?.rubric_path,
    };
    let rubric = load_rubric(path.as_deref())?;
    let rendered = serde_json::to_string_pretty(&*rubric).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}
