use anyhow::Context;
use clap::{Parser, Subcommand};
use folio3d::app::{self, RunOptions};
use folio3d::config::Config;
use folio3d::contact::ContactForm;
use folio3d::theme::ThemeMode;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "folio3d.log";

#[derive(Parser, Debug)]
#[command(name = "folio3d", version, about = "A portfolio page with an animated avatar, in the terminal")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging and the debug overlay
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the interactive page (default)
    Run(RunArgs),

    /// Send a message through the contact relay
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },

    /// Inspect or change the stored theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(clap::Args, Debug, Default)]
struct RunArgs {
    /// Rig description (TOML) to render instead of the built-in figure
    #[arg(long)]
    rig: Option<PathBuf>,

    /// Apply and persist this theme before starting
    #[arg(long)]
    theme: Option<ThemeMode>,

    /// Keep preferences in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Seed for the background particles
    #[arg(long)]
    seed: Option<u64>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum ThemeAction {
    Show,
    Toggle,
    Set { mode: ThemeMode },
}

fn log_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }))
}

/// The page owns stdout, so its logs go to a file in the data directory
fn init_file_logging(debug: bool) -> anyhow::Result<()> {
    let Some(dir) = Config::data_dir() else {
        return Ok(());
    };
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(debug))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn init_stderr_logging(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(debug))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    app::load_config(path.map(PathBuf::as_path)).context("loading configuration")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(args) => {
            init_file_logging(cli.debug)?;
            let config = load_config(cli.config.as_ref())?;
            let options = RunOptions {
                rig: args.rig,
                theme: args.theme,
                ephemeral: args.ephemeral,
                seed: args.seed,
                fps: args.fps,
                debug: cli.debug,
            };
            app::run(config, options).context("running the portfolio page")?;
        }
        Command::Contact { name, email, message } => {
            init_stderr_logging(cli.debug);
            let config = load_config(cli.config.as_ref())?;
            let form = ContactForm::new(name, email, message);
            app::send_message(&config, &form).context("sending the message")?;
            println!("Message sent.");
        }
        Command::Theme { action } => {
            init_stderr_logging(cli.debug);
            let mut theme = app::open_theme(false);
            let mode = match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => theme.mode(),
                ThemeAction::Toggle => theme.toggle_theme(),
                ThemeAction::Set { mode } => {
                    theme.apply_theme(mode);
                    mode
                }
            };
            println!("{}", mode);
        }
    }
    Ok(())
}
