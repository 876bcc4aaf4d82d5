use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEventKind;
use ptop::app::App;
use ptop::config::{self, Config, load_config, load_config_from_path};
use ptop::event::{Event, EventHandler, shutdown_signal};
use ptop::logging::{self, LogTarget};
use ptop::system::os_release::read_os_name;
use ptop::system::stat::StatSampler;
use ptop::ui;

#[derive(Parser)]
#[command(name = "ptop", about = "Terminal CPU monitor fed by /proc/stat")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Statistics file to sample
    #[arg(long)]
    stat_path: Option<PathBuf>,

    /// Print one summary per tick to stdout instead of the interactive UI.
    #[arg(long, default_value_t = false)]
    print: bool,

    /// Print snapshots as JSON lines (implies --print).
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Stop after this many ticks in print mode.
    #[arg(long)]
    iterations: Option<u64>,

    /// Log file for the interactive UI (print mode logs to stderr).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter directive, overridden by PTOP_LOG.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn headless(&self) -> bool {
        self.print || self.json
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = load_config_for_cli(&cli);
    if config.general.refresh_rate_ms == 0 {
        return Err(eyre!("refresh rate must be greater than 0"));
    }

    let os_name = match read_os_name(&config.general.os_release_path) {
        Ok(name) => name,
        Err(err) => {
            tracing::warn!(%err, "falling back to generic OS name");
            std::env::consts::OS.to_string()
        }
    };

    let sampler = StatSampler::open(&config.general.stat_path)?;
    tracing::info!(
        source = sampler.label(),
        os = %os_name,
        refresh_rate_ms = config.general.refresh_rate_ms,
        "starting ptop"
    );

    if cli.headless() {
        return run_headless(sampler, &config, &cli).await;
    }

    // ratatui::init installs a panic hook that restores the terminal
    let mut terminal = ratatui::init();
    let mut app = App::new(&config, sampler, os_name);
    let result = run(&mut terminal, &mut app, &config).await;

    ratatui::restore();

    let App { sampler, fatal, .. } = app;
    sampler.close();
    tracing::info!("ptop stopped");

    result?;
    match fatal {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

async fn run(terminal: &mut ratatui::DefaultTerminal, app: &mut App, config: &Config) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms);
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = app.map_key(key);
                app.dispatch(action);
            }
            Event::Tick => app.refresh_data(),
            Event::Resize => {}
            Event::Shutdown => app.running = false,
        }
        if app.running {
            terminal.draw(|frame| ui::draw(frame, app))?;
        }
    }

    Ok(())
}

async fn run_headless(
    mut sampler: StatSampler<std::fs::File>,
    config: &Config,
    cli: &Cli,
) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_millis(config.general.refresh_rate_ms));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut ticks = 0u64;
    loop {
        if cli.iterations.is_some_and(|limit| ticks >= limit) {
            break;
        }
        tokio::select! {
            _ = ticker.tick() => {
                ticks += 1;
                match sampler.update() {
                    Ok(()) if cli.json => println!("{}", serde_json::to_string(sampler.snapshot())?),
                    Ok(()) => println!("{}", sampler.snapshot()),
                    Err(err) if err.is_fatal_to_loop() => return Err(err.into()),
                    Err(err) => tracing::warn!(%err, "update cycle failed, waiting for next tick"),
                }
            }
            _ = &mut shutdown => break,
        }
    }

    sampler.close();
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    if cli.headless() {
        return logging::init(LogTarget::Stderr, &cli.log_level);
    }
    let path = cli
        .log_file
        .clone()
        .or_else(config::default_log_path)
        .unwrap_or_else(|| std::env::temp_dir().join("ptop.log"));
    logging::init(LogTarget::File(&path), &cli.log_level)
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref path) = cli.stat_path {
        config.general.stat_path = path.clone();
    }

    config
}
