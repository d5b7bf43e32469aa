//! Build command implementation.

use anyhow::Result;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::BuildArgs;
use crate::config::Config;
use crate::orchestrator::{Orchestrator, ProjectOutcome, RunSummary};

/// Run the build command.
///
/// Skipped and failed projects are reported but do not fail the command.
pub fn run(mut config: Config, args: BuildArgs, quiet: bool) -> Result<()> {
    apply_overrides(&mut config, &args);

    if !quiet {
        println!(
            "Assembling projects from {} into {}...",
            config.projects_dir().display(),
            config.output_dir().display()
        );
    }

    let progress = (!quiet).then(new_progress_bar);
    let orchestrator = Orchestrator::new(config);
    let summary = orchestrator.run(progress.as_ref());

    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    let summary = summary?;
    if !quiet {
        print_summary(&summary);
    }
    print_problems(&summary);

    Ok(())
}

/// CLI paths override the config; like config paths, relative ones resolve
/// against `paths.root`.
pub fn apply_overrides(config: &mut Config, args: &BuildArgs) {
    if let Some(dir) = &args.projects_dir {
        config.paths.projects_dir = dir.clone();
    }
    if let Some(dir) = &args.output {
        config.paths.output_dir = dir.clone();
    }
    if let Some(jobs) = args.jobs {
        config.build.jobs = jobs;
    }
}

fn new_progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} projects") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

fn print_summary(summary: &RunSummary) {
    let total = summary.total();

    println!("\nResults:");
    println!(
        "  Published: {} project{}",
        summary.published_count(),
        plural(summary.published_count())
    );
    if summary.skipped_count() > 0 {
        println!(
            "  Skipped:   {} project{}",
            summary.skipped_count(),
            plural(summary.skipped_count())
        );
    }
    if summary.failed_count() > 0 {
        println!(
            "  Failed:    {} project{}",
            summary.failed_count(),
            plural(summary.failed_count())
        );
    }
    println!(
        "  Size:      {} in {} files ({} gzip)",
        format_size(total.size, BINARY),
        total.files,
        format_size(total.compressed_size, BINARY)
    );
    println!("  Output:    {}", summary.output_root.display());
}

fn print_problems(summary: &RunSummary) {
    for skipped in &summary.skipped {
        eprintln!("  Skipped {}: {}", skipped.name, skipped.reason);
    }
    for outcome in &summary.failed {
        if let ProjectOutcome::Failed { name, error } = outcome {
            eprintln!("  Error publishing {}: {}", name, error);
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_overrides_replace_config_paths() {
        let mut config = Config::default();
        let args = BuildArgs {
            projects_dir: Some(PathBuf::from("apps")),
            output: Some(PathBuf::from("public")),
            jobs: Some(2),
        };

        apply_overrides(&mut config, &args);

        assert_eq!(config.paths.projects_dir, PathBuf::from("apps"));
        assert_eq!(config.paths.output_dir, PathBuf::from("public"));
        assert_eq!(config.build.jobs, 2);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = Config::default();
        let args = BuildArgs {
            projects_dir: None,
            output: None,
            jobs: None,
        };

        apply_overrides(&mut config, &args);

        assert_eq!(config.paths.projects_dir, PathBuf::from("examples"));
        assert_eq!(config.paths.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1), "");
        assert_eq!(plural(0), "s");
        assert_eq!(plural(2), "s");
    }
}
