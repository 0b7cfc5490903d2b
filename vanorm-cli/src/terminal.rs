// ============================================================================
// vanorm-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL RENDERING: Human-Readable Output for Batch Events
//
// TerminalRenderer implements the core EventHandler. A spinner shows the most
// recent ffmpeg progress line while a file is running; everything else is
// printed as styled lines once the spinner is cleared.

use vanorm_core::{BatchSummary, Event, EventHandler, FileFailure, NormalizeResult};
use vanorm_core::{format_duration, format_megabytes};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn heading(title: &str) {
    println!();
    println!("{}", style(title).bold().cyan());
    println!("{}", style("-".repeat(40)).cyan());
}

/// Renders batch events to the terminal.
#[derive(Default)]
pub struct TerminalRenderer {
    spinner: RefCell<Option<ProgressBar>>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn start_spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner} {msg}") {
            pb.set_style(spinner_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(120));
        *self.spinner.borrow_mut() = Some(pb);
    }

    fn finish_spinner(&self) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }

    fn render_batch_started(&self, root: &Path, total: usize) {
        heading("LOUDNESS NORMALIZATION");
        println!("  {:<14} {}", "Directory:", root.display());
        println!("  {:<14} {}", "Video files:", total);
        if total == 0 {
            println!("  {} No video files found", style("⚠").yellow().bold());
        }
    }

    fn render_file_started(
        &self,
        index: usize,
        total: usize,
        path: &Path,
        input_size_mb: f64,
        duration_secs: f64,
    ) {
        println!();
        println!(
            "  {} {}",
            style(format!("[{index}/{total}]")).bold(),
            style(display_name(path)).bold()
        );
        println!(
            "      size {}, duration {}",
            format_megabytes(input_size_mb),
            format_duration(duration_secs)
        );
        self.start_spinner("starting ffmpeg".to_string());
    }

    fn render_completed(&self, result: &NormalizeResult) {
        self.finish_spinner();
        println!(
            "  {} {} in {} ({:.2} MB/s)",
            style("✓").green().bold(),
            display_name(&result.output_path),
            format_duration(result.elapsed.as_secs_f64()),
            result.average_speed
        );
        println!(
            "      {} -> {}",
            format_megabytes(result.input_size_mb),
            format_megabytes(result.output_size_mb)
        );
    }

    fn render_failed(&self, failure: &FileFailure) {
        self.finish_spinner();
        println!(
            "  {} {}",
            style("✗").red().bold(),
            style(failure.path.display()).red().bold()
        );
        for line in failure.detail.lines() {
            println!("      {}", style(line).dim());
        }
    }

    fn render_summary(&self, summary: &BatchSummary) {
        heading("SUMMARY");
        println!("  {:<14} {}", "Found:", summary.total);
        println!(
            "  {:<14} {}",
            "Succeeded:",
            style(summary.succeeded_count()).green().bold()
        );
        let failed = summary.failed_count();
        if failed > 0 {
            println!("  {:<14} {}", "Failed:", style(failed).red().bold());
        } else {
            println!("  {:<14} {}", "Failed:", failed);
        }
        if summary.cancelled {
            println!(
                "  {} Cancelled, {} file(s) not started",
                style("⚠").yellow().bold(),
                summary.skipped_count()
            );
        }
        if summary.succeeded_count() > 0 {
            println!(
                "  {:<14} {} -> {}",
                "Total size:",
                format_megabytes(summary.total_input_mb()),
                format_megabytes(summary.total_output_mb())
            );
        }
        println!(
            "  {:<14} {}",
            "Total time:",
            format_duration(summary.elapsed.as_secs_f64())
        );
    }
}

impl EventHandler for TerminalRenderer {
    fn handle(&self, event: &Event) {
        match event {
            Event::BatchStarted { root, total } => self.render_batch_started(root, *total),
            Event::FileStarted {
                index,
                total,
                path,
                input_size_mb,
                duration_secs,
            } => self.render_file_started(*index, *total, path, *input_size_mb, *duration_secs),
            Event::Progress { line, .. } => {
                if let Some(pb) = self.spinner.borrow().as_ref() {
                    pb.set_message(line.clone());
                }
            }
            Event::FileCompleted { result, .. } => self.render_completed(result),
            Event::FileFailed { failure, .. } => self.render_failed(failure),
            Event::BatchComplete { summary } => {
                self.finish_spinner();
                self.render_summary(summary);
            }
        }
    }
}

/// Swallows per-file rendering when stdout carries JSON; only logs remain.
#[derive(Debug, Default)]
pub struct QuietRenderer;

impl EventHandler for QuietRenderer {
    fn handle(&self, event: &Event) {
        if let Event::FileFailed { failure, .. } = event {
            log::debug!("{} failed ({:?})", failure.path.display(), failure.kind);
        }
    }
}
