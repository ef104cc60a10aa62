use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::Style;

use pixpress_core::intake;
use pixpress_core::remote::{HttpService, RemoteService};

use crate::summary::human_bytes;

use super::DEFAULT_SERVER;

#[derive(Args)]
pub struct InfoArgs {
    /// Image files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Base URL of the transform server
    #[arg(long, default_value = DEFAULT_SERVER)]
    pub server: String,
}

pub async fn run(args: &InfoArgs) -> Result<()> {
    let label = Style::new().dim();
    let value = Style::new().bold().white();
    let error = Style::new().red();

    let (files, rejected) = intake::prepare_uploads(&args.files).await;
    for message in &rejected {
        eprintln!("  {}", error.apply_to(message));
    }
    if files.is_empty() {
        bail!("No supported image files to upload");
    }

    let service = HttpService::connect(&args.server)?;
    let outcome = service.upload(files).await.context("Upload failed")?;

    println!();
    for info in &outcome.uploaded_files {
        println!(
            "  {:<32} {} {} {}",
            value.apply_to(&info.original_filename),
            label.apply_to(format!("{}x{}", info.width, info.height)),
            label.apply_to(human_bytes(info.size_bytes)),
            label.apply_to(info.format.to_uppercase()),
        );
    }
    for message in &outcome.errors {
        println!("  {}", error.apply_to(message));
    }
    println!();

    Ok(())
}
