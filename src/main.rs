use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use menu_walker::session::Session;
use menu_walker::{
    run_walk, Catalog, MockBackend, RunStatus, WalkerConfig, WebDriverBackend, WebDriverConfig,
};

/// Menu Walker - exploratory traversal of two-level app menus
#[derive(Parser, Debug)]
#[command(
    name = "menu-walker",
    about = "Walk every entry of a two-level app menu over WebDriver, with per-node failure isolation",
    after_help = "ENVIRONMENT VARIABLES:\n\
        MENU_WALKER_SERVER_URL        WebDriver server URL\n\
        MENU_WALKER_ACTIVATE_TIMEOUT  Element wait window (seconds)\n\
        MENU_WALKER_POLL_INTERVAL     Element lookup poll interval (ms)\n\
        MENU_WALKER_PAUSE_BETWEEN     Settle delay between nodes (ms)\n\
        MENU_WALKER_SESSION_DIR       Base directory for run artifacts"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Walk a catalog against a live WebDriver session
    Run {
        /// Path to the catalog JSON file (array of menu entries)
        #[arg(short, long)]
        catalog: PathBuf,

        /// WebDriver server URL
        #[arg(
            long,
            env = "MENU_WALKER_SERVER_URL",
            default_value = "http://127.0.0.1:4723"
        )]
        server: String,

        /// Path to a JSON file with session capabilities (alwaysMatch body)
        #[arg(long)]
        caps: Option<PathBuf>,

        /// Element wait window per activation, in seconds
        #[arg(short, long, env = "MENU_WALKER_ACTIVATE_TIMEOUT", default_value = "20")]
        timeout: u64,

        /// Settle delay between nodes, in milliseconds
        #[arg(long, env = "MENU_WALKER_PAUSE_BETWEEN", default_value = "0")]
        pause: u64,

        /// Output directory for report artifacts (default: auto-generated in session dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep report artifacts after completion (default: cleanup unless --output is specified)
        #[arg(long, short = 'k')]
        keep: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse and validate a catalog file
    Validate {
        /// Path to the catalog JSON file
        #[arg(short, long)]
        catalog: PathBuf,
    },

    /// Walk the built-in sample catalog against a scripted mock backend
    Demo {
        /// Entry names whose activation gesture should fail
        #[arg(long)]
        fail: Vec<String>,

        /// Entry names that should be reported as not found
        #[arg(long)]
        missing: Vec<String>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Some(Commands::Run {
            catalog,
            server,
            caps,
            timeout,
            pause,
            output,
            keep,
            json,
        }) => {
            let catalog = Catalog::from_json_file(&catalog)?;

            let capabilities = match caps {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
                None => serde_json::json!({}),
            };

            // Create session - if output specified, use that dir and keep by default
            let session = if let Some(ref dir) = output {
                Session::in_dir(dir).keep(true)
            } else {
                Session::with_name("walk").keep(keep)
            };
            session.init()?;

            let walker_config = WalkerConfig::default()
                .activate_timeout(Duration::from_secs(timeout))
                .pause_between(Duration::from_millis(pause));

            let mut backend =
                WebDriverBackend::connect(WebDriverConfig::new(&server), &capabilities)?;
            let report = run_walk(&catalog, &mut backend, &walker_config);
            if let Err(e) = backend.disconnect() {
                eprintln!("Warning: failed to end session: {}", e);
            }

            session.write_report(&report)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.render_text());
                println!("\nSession: {}", session.dir.display());
            }

            if matches!(report.overall(), RunStatus::Failed | RunStatus::Fatal) {
                drop(session);
                std::process::exit(1);
            }
        }

        Some(Commands::Validate { catalog }) => {
            let catalog = Catalog::from_json_file(&catalog)?;
            println!(
                "Catalog is valid: {} top-level entries, {} entries total",
                catalog.top_level_count(),
                catalog.node_count()
            );
        }

        Some(Commands::Demo { fail, missing, json }) => {
            let catalog = Catalog::sample();

            let mut backend = MockBackend::new();
            for name in fail {
                backend = backend.fail_gesture_on(name);
            }
            for name in missing {
                backend = backend.missing_element(name);
            }

            let walker_config = WalkerConfig::default()
                .activate_timeout(Duration::from_millis(10))
                .pause_between(Duration::ZERO);
            let report = run_walk(&catalog, &mut backend, &walker_config);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.render_text());
            }

            if matches!(report.overall(), RunStatus::Failed | RunStatus::Fatal) {
                std::process::exit(1);
            }
        }

        None => {
            println!("Menu Walker - exploratory traversal of two-level app menus");
            println!();
            println!("Usage: menu-walker <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run       Walk a catalog against a live WebDriver session");
            println!("  validate  Parse and validate a catalog file");
            println!("  demo      Walk the built-in sample catalog against a mock backend");
            println!();
            println!("Run with --help for more information.");
        }
    }

    Ok(())
}
