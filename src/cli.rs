use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

mod card;
mod countdown;
mod news;
mod terminal;

use anyhow::Context as _;
use card::Card;
use clap::ArgAction;
use countdown::Countdown;
use mmabox::{
    AppState, Config, ContentStore,
    domain::DataSource,
    storage::{Clock, MockStore, PgStore, seed::Seed, system_clock},
};
use news::News;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, default_value = "mmabox.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(&self.config).await
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Serve the site
    Serve(Serve),

    /// Write a default configuration file
    Init,

    /// Print the sitemap
    Sitemap(Sitemap),

    /// Print an event's fight card in running order
    Card(Card),

    /// Count down to an event's start, updating every second
    Countdown(Countdown),

    /// Manage news articles
    #[command(subcommand)]
    News(News),
}

impl Command {
    async fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let state = || build_state(load_config(config_path)?);
        match self {
            Self::Init => init(config_path)?,
            Self::Serve(command) => command.run(state()?).await?,
            Self::Sitemap(command) => command.run(&state()?).await,
            Self::Card(command) => command.run(&state()?).await?,
            Self::Countdown(command) => command.run(&state()?).await?,
            Self::News(command) => command.run(&state()?).await?,
        }
        Ok(())
    }
}

/// Loads the file (or defaults) and applies environment overrides.
fn load_config(path: &Path) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    config
        .apply_env()
        .context("Invalid configuration in environment")?;
    Ok(config)
}

/// Opens the configured content store and assembles the site state.
#[instrument(skip(config), fields(source = ?config.data_source))]
fn build_state(config: Config) -> anyhow::Result<AppState> {
    let clock: Clock = system_clock();
    let seed = match &config.mock_data {
        Some(path) => Seed::load(Path::new(path))
            .with_context(|| format!("Failed to load mock data from {path}"))?,
        None => Seed::builtin(),
    };
    let fighters = seed.fighters.clone();

    let store: Arc<dyn ContentStore> = match config.data_source {
        DataSource::Mock => {
            tracing::info!("Serving built-in mock content");
            Arc::new(MockStore::new(seed, Arc::clone(&clock)))
        }
        DataSource::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("The postgres data source needs DATABASE_URL or database_url")?;
            Arc::new(PgStore::connect_lazy(url)?)
        }
    };

    Ok(AppState::new(config, store, fighters, clock)?)
}

#[instrument]
fn init(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("Configuration already exists at {}", path.display());
    }
    Config::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote default configuration to {}", path.display());
    println!();
    println!("Next steps:");
    println!("  set data_source = \"postgres\" and DATABASE_URL to serve live content");
    println!("  mmabox serve");
    Ok(())
}

#[derive(Debug, clap::Parser)]
pub struct Serve {
    /// Address to listen on, overriding the configuration
    #[arg(long)]
    bind: Option<SocketAddr>,
}

impl Serve {
    async fn run(self, state: AppState) -> anyhow::Result<()> {
        let bind = self.bind.unwrap_or(state.config().bind);
        mmabox::serve(state, bind)
            .await
            .with_context(|| format!("Server on {bind} failed"))
    }
}

#[derive(Debug, clap::Parser)]
pub struct Sitemap {
    /// Print robots.txt instead
    #[arg(long)]
    robots: bool,
}

impl Sitemap {
    async fn run(self, state: &AppState) {
        if self.robots {
            print!("{}", mmabox::seo::robots_txt(state.config()));
            return;
        }
        let entries = mmabox::seo::build_sitemap(
            state.catalog(),
            state.config(),
            chrono::Utc::now(),
            u32::MAX,
        )
        .await;
        print!("{}", mmabox::seo::render_sitemap(&entries));
    }
}
