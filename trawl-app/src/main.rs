use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use trawl_common::observability::{LogConfig, init_logging};
use trawl_config::{
    ConfigError, OutputConfig, SiteConfig, TrawlConfig, TrawlConfigLoader, default_config_path,
};
use trawl_drivers::Browser;
use trawl_drivers::browser::chrome::{BrowserOptions, FantocciniBrowser};
use trawl_pipeline::report::Reporter;
use trawl_pipeline::sink::{SinkOutcome, sink_for};
use trawl_pipeline::{Pipeline, PipelineError};

mod pause;

#[derive(Parser, Debug)]
#[command(name = "trawl")]
#[command(about = "Scrape listing and detail pages through a WebDriver-controlled browser")]
struct Cli {
    /// YAML config file. Defaults to ~/.config/trawl/trawl.yaml when present.
    #[arg(long, env = "TRAWL_CONFIG")]
    config: Option<PathBuf>,

    /// Site adapter to run.
    #[arg(long, default_value = "bloomcare")]
    site: String,

    /// Write the spreadsheet here instead of the site's configured output.
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long)]
    headless: bool,

    /// Close the browser straight away instead of waiting for ENTER.
    #[arg(long)]
    no_pause: bool,

    /// Print the configured site ids and exit.
    #[arg(long)]
    list_sites: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1) Config: defaults < file < env, then CLI flags
    let mut cfg = load_config(cli.config.as_deref())?;

    // 2) Logging, into the configured directory when one is set
    let log_path = init_logging(LogConfig {
        log_dir: cfg.log_dir.clone(),
        ..LogConfig::default()
    })?;
    if cli.list_sites {
        for id in cfg.site_ids() {
            println!("{id}");
        }
        return Ok(ExitCode::SUCCESS);
    }
    apply_overrides(&mut cfg, &cli)?;
    let site = cfg.site(&cli.site)?;
    info!(target: "trawl", site = %site.id, log = %log_path.display(), "starting");

    // 3) Browser session, owned here and closed exactly once below
    let options = BrowserOptions {
        webdriver_url: cfg.webdriver_url.clone(),
        headless: cfg.headless,
        window_size: cfg.window_size,
    };
    let browser = FantocciniBrowser::connect(&options)
        .await
        .with_context(|| format!("failed to start a browser session at {}", cfg.webdriver_url))?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    // 4) Run
    let outcome = scrape(&browser, site, &cancel).await;
    let code = match &outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(PipelineError::Interrupted) => {
            println!("\n Interrupted, closing browser.");
            ExitCode::from(130)
        }
        Err(e) => {
            error!(target: "trawl", error = %e, "scrape failed");
            println!("Error during scraping: {e}");
            ExitCode::FAILURE
        }
    };

    // 5) Optional manual check, then teardown
    if site.pause_before_exit && !cli.no_pause && !cancel.is_cancelled() {
        pause::prompt();
        let end = pause::wait_for_enter(BufReader::new(io::stdin()), &cancel).await;
        info!(target: "trawl", ?end, "pause over");
    }
    if let Err(e) = browser.close().await {
        warn!(target: "trawl", error = %e, "browser did not close cleanly");
    }
    info!(target: "trawl", "done");
    Ok(code)
}

fn load_config(explicit: Option<&std::path::Path>) -> Result<TrawlConfig> {
    let loader = TrawlConfigLoader::new();
    let loader = match (explicit, default_config_path()) {
        (Some(path), _) => loader.with_file(path),
        (None, Some(path)) => loader.with_optional_file(path),
        (None, None) => loader,
    };
    loader.load().context("failed to load configuration")
}

fn apply_overrides(cfg: &mut TrawlConfig, cli: &Cli) -> Result<(), ConfigError> {
    if cli.headless {
        cfg.headless = true;
    }
    if let Some(path) = &cli.output {
        let site = cfg
            .sites
            .iter_mut()
            .find(|s| s.id == cli.site)
            .ok_or_else(|| ConfigError::UnknownSite(cli.site.clone()))?;
        site.output = OutputConfig::Xlsx { path: path.clone() };
    }
    cfg.validate()
}

async fn scrape<B: Browser>(
    browser: &B,
    site: &SiteConfig,
    cancel: &CancellationToken,
) -> Result<SinkOutcome, PipelineError> {
    let mut sink = sink_for(site, io::stdout());
    let mut pipeline = Pipeline::new(browser, site, Reporter::new(io::stdout(), site));
    pipeline.run_to_sink(sink.as_mut(), cancel).await
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!(target: "trawl", "interrupt received");
            cancel.cancel();
        }
        Err(e) => warn!(target: "trawl", error = %e, "cannot listen for ctrl-c"),
    }
}
