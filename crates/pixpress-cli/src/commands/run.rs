use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tokio::sync::Mutex;

use pixpress_core::batch::{BatchObserver, BatchSummary, Coordinator};
use pixpress_core::download;
use pixpress_core::record::OutputFormat;
use pixpress_core::remote::{HttpService, RemoteService};
use pixpress_core::settings::{self, SharedSettings};
use pixpress_core::store::RecordStore;

use crate::summary::print_run_summary;

use super::DEFAULT_SERVER;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Jpeg,
    Png,
    Webp,
    Gif,
    /// Keep each image's source format
    Original,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Webp => OutputFormat::Webp,
            FormatArg::Gif => OutputFormat::Gif,
            FormatArg::Original => OutputFormat::Original,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Image files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Base URL of the transform server (default http://127.0.0.1:5000)
    #[arg(long)]
    pub server: Option<String>,

    /// Job config file (TOML); explicit flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Target width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels (defaults to the width when scaling by ratio)
    #[arg(long)]
    pub height: Option<u32>,

    /// Output quality (1-100)
    #[arg(long)]
    pub quality: Option<u8>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Apply contrast enhancement
    #[arg(long)]
    pub enhance: bool,

    /// Resize to the exact width x height instead of each image's own ratio
    #[arg(long)]
    pub stretch: bool,

    /// Directory the archive is saved into
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Assume yes for confirmation prompts
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// TOML job file: server, output directory, and shared settings.
#[derive(Debug, Default, Deserialize)]
struct JobConfig {
    server: Option<String>,
    out: Option<PathBuf>,
    settings: Option<SharedSettings>,
}

pub async fn run(args: &RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents).context("Invalid job config")?
        }
        None => JobConfig::default(),
    };

    let mut shared = config.settings.unwrap_or_default();
    if let Some(width) = args.width {
        shared.width = width;
    }
    if let Some(height) = args.height {
        shared.height = height;
    }
    if let Some(quality) = args.quality {
        shared.quality = quality;
    }
    if let Some(format) = args.format {
        shared.format = format.into();
    }
    if args.enhance {
        shared.enhance = true;
    }
    if args.stretch {
        shared.keep_ratio = false;
    }
    // Height is required by bulk apply but unused per-record when scaling
    // by ratio, so let the width stand in for it.
    if shared.keep_ratio && shared.height == 0 {
        shared.height = shared.width;
    }

    let server = args
        .server
        .clone()
        .or(config.server)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let out_dir = args
        .out
        .clone()
        .or(config.out)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("Pixpress");
    println!("  Server:   {server}");
    println!("  Files:    {}", args.files.len());
    println!(
        "  Target:   {}x{}{}",
        shared.width,
        shared.height,
        if shared.keep_ratio { " (per-image ratio)" } else { "" }
    );
    println!("  Quality:  {}", shared.quality);
    println!("  Format:   {}", shared.format);
    println!("  Enhance:  {}", if shared.enhance { "yes" } else { "no" });
    println!();

    let service: Arc<dyn RemoteService> = Arc::new(HttpService::connect(&server)?);
    let store = Arc::new(Mutex::new(RecordStore::new()));
    let coordinator = Coordinator::new(store, service);
    let observer = CliObserver::new(args.yes);

    let admitted = coordinator
        .upload(&args.files, &shared, &observer)
        .await
        .context("Upload failed")?;
    if admitted.is_empty() {
        bail!("No images were accepted by the server");
    }
    println!("Uploaded {} image(s)", admitted.len());

    {
        let mut store = coordinator.store().lock().await;
        settings::apply_to_all(&mut store, &shared).context("Invalid shared settings")?;
    }

    let summary = coordinator.process_all(&observer).await;

    let archive = download::download_all(&coordinator, &observer, &out_dir)
        .await
        .context("Download failed")?;

    let records = { coordinator.store().lock().await.records().to_vec() };
    print_run_summary(&records, &summary, archive.as_ref());

    if summary.total() > 0 && summary.succeeded == 0 {
        bail!("All {} transform(s) failed", summary.failed);
    }
    Ok(())
}

/// Progress bar + prompt wiring for batch callbacks.
struct CliObserver {
    assume_yes: bool,
    bar: StdMutex<Option<ProgressBar>>,
}

impl CliObserver {
    fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            bar: StdMutex::new(None),
        }
    }
}

impl BatchObserver for CliObserver {
    fn batch_started(&self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("{msg:14} [{bar:40}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message("Processing");
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn record_settled(&self, filename: &str, succeeded: bool) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                if !succeeded {
                    bar.println(format!("  failed: {filename}"));
                }
                bar.inc(1);
            }
        }
    }

    fn batch_finished(&self, _summary: &BatchSummary) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn notice(&self, message: &str) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                bar.println(message.to_string());
                return;
            }
        }
        println!("{message}");
    }

    fn confirm_process_pending(&self, pending: usize) -> bool {
        if self.assume_yes {
            return true;
        }
        let term = Term::stderr();
        let prompt =
            format!("{pending} image(s) need processing. Process them now to include them? [y/N] ");
        if term.write_str(&prompt).is_err() {
            return false;
        }
        match term.read_line() {
            Ok(line) => {
                let line = line.trim();
                line.eq_ignore_ascii_case("y") || line.eq_ignore_ascii_case("yes")
            }
            Err(_) => false,
        }
    }
}
