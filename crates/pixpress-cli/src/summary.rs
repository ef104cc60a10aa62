use console::Style;

use pixpress_core::batch::BatchSummary;
use pixpress_core::download::SavedArchive;
use pixpress_core::record::{ImageRecord, Status};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    ok: Style,
    failed: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            ok: Style::new().green(),
            failed: Style::new().red(),
            path: Style::new().underlined(),
        }
    }
}

/// Render bytes the way the thumbnails did: largest fitting unit, one
/// decimal place.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

pub fn print_run_summary(
    records: &[ImageRecord],
    summary: &BatchSummary,
    archive: Option<&SavedArchive>,
) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Pixpress Batch"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    for record in records {
        let name = &record.source().filename;
        match record.status() {
            Status::Done => {
                let processed = record
                    .output()
                    .map(|o| human_bytes(o.size_bytes))
                    .unwrap_or_default();
                println!(
                    "  {} {:<28} {}  {} -> {}",
                    s.ok.apply_to("[OK]  "),
                    s.value.apply_to(name),
                    s.label
                        .apply_to(format!("{}x{}", record.width(), record.height())),
                    s.label.apply_to(human_bytes(record.source().size_bytes)),
                    s.value.apply_to(processed),
                );
            }
            Status::Error(reason) => {
                println!(
                    "  {} {:<28} {}",
                    s.failed.apply_to("[FAIL]"),
                    s.value.apply_to(name),
                    s.failed.apply_to(reason),
                );
            }
            Status::Pending | Status::Processing => {
                println!(
                    "  {} {:<28}",
                    s.label.apply_to(format!("[{}]", record.status())),
                    s.value.apply_to(name),
                );
            }
        }
    }
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Succeeded"),
        s.ok.apply_to(summary.succeeded)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Failed"),
        if summary.failed > 0 {
            s.failed.apply_to(summary.failed)
        } else {
            s.label.apply_to(summary.failed)
        }
    );

    if let Some(archive) = archive {
        println!(
            "  {:<14}{} ({}, {} file(s))",
            s.label.apply_to("Archive"),
            s.path.apply_to(archive.path.display()),
            s.value.apply_to(human_bytes(archive.size_bytes)),
            archive.included,
        );
    }
    println!();
}
