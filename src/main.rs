use std::fs::File;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dracula::commands::{self, CatalogOutput, CommandError};
use dracula::core::config::{load_config, resolve};
use dracula::remote::CatalogClient;
use dracula::remote::types::SortKey;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "dracula", about = "Browse the Dracula theme catalog from the terminal")]
struct Args {
    /// GitHub organization to read (default: dracula)
    #[arg(long, global = true)]
    org: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// View all the apps that have a Dracula theme
    All {
        /// Sort by: name, stars, forks, size, watchers, language, issues,
        /// created_at, updated_at, pushed_at
        #[arg(short, long, default_value_t, value_enum)]
        sort: SortKey,
        /// Page the output through $PAGER (default: less -R)
        #[arg(long, conflicts_with = "tui")]
        pager: bool,
        /// Browse the catalog interactively with search
        #[arg(long)]
        tui: bool,
    },
    /// View the documentation for the theme of a specific app
    Show {
        /// The name of the app to view
        app: String,
        /// Also show the repository readme
        #[arg(long)]
        readme: bool,
        /// Skip the installation guide
        #[arg(long)]
        no_installation: bool,
    },
    /// Preview the theme on code samples (←/→ switch language, q quits)
    Demo,
    /// Download files of a theme to a folder
    Download {
        /// The name of the app to download from
        app: String,
    },
}

fn catalog_output(pager: bool, tui: bool) -> CatalogOutput {
    match (pager, tui) {
        (_, true) => CatalogOutput::Browser,
        (true, false) => CatalogOutput::Pager,
        (false, false) => CatalogOutput::Print,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to dracula.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("dracula.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = resolve(&config, args.org.as_deref());
    log::info!("Dracula CLI starting for organization {}", config.organization);

    let mut client = match CatalogClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result: Result<(), CommandError> = match args.command {
        Command::All { sort, pager, tui } => {
            commands::all(&mut client, &config, sort, catalog_output(pager, tui)).await
        }
        Command::Show {
            app,
            readme,
            no_installation,
        } => commands::show(&mut client, &app, readme, !no_installation).await,
        Command::Demo => commands::demo(&mut client).await,
        Command::Download { app } => commands::download(&mut client, &app).await,
    };
    client.flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("Command failed: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
