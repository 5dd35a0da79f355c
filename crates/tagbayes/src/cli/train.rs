//! The `tagbayes train` command.

use std::path::{Path, PathBuf};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tagbayes_core::config::expand_path;
use tagbayes_core::{Config, TrainEvent, TrainInputs, TrainReport, Trainer};

/// Arguments for the `train` command.
#[derive(Args, Debug, Clone, Default)]
pub struct TrainArgs {
    /// Directory of JSON-lines metadata shards
    pub corpus_dir: PathBuf,

    /// Newline-delimited general tag list [default: config `inputs.general_tags`]
    #[arg(short, long)]
    pub general: Option<PathBuf>,

    /// Newline-delimited character tag list [default: config `inputs.character_tags`]
    #[arg(short, long)]
    pub character: Option<PathBuf>,

    /// Alias/implication mapping JSON [default: config `inputs.mapping`]
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,

    /// Laplace smoothing constant (must be > 0) [default: config `scoring.smoothing`]
    #[arg(short, long)]
    pub smoothing: Option<f64>,

    /// Drop posts that depict more than one character [default: config `counting.solo_heuristic`]
    #[arg(long, overrides_with = "no_solo_heuristic")]
    pub solo_heuristic: bool,

    /// Keep posts that depict more than one character
    #[arg(long, overrides_with = "solo_heuristic")]
    pub no_solo_heuristic: bool,

    /// Divide weights by the mean general tags per post [default: config `scoring.calibrate`]
    #[arg(long, overrides_with = "no_calibration")]
    pub calibration: bool,

    /// Skip dividing weights by the mean general tags per post
    #[arg(long, overrides_with = "calibration")]
    pub no_calibration: bool,

    /// Number of shards counted in parallel [default: config `counting.parallel_workers`]
    #[arg(short, long)]
    pub processes: Option<usize>,

    /// Output model path (.npz)
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Execute the train command.
pub async fn execute(args: TrainArgs, config: Config) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args);
    // Validates smoothing and worker count before touching any input.
    let trainer = Trainer::new(config)?;
    let inputs = resolve_inputs(&args, trainer.config())?;

    let progress = create_progress_bar()?;
    let report = trainer
        .train_with_progress(&inputs, |event| on_event(&progress, event))
        .await;
    progress.finish_and_clear();

    let report = report?;
    print_summary(&report);
    Ok(())
}

/// Layer command-line flags over the loaded configuration.
fn apply_overrides(mut config: Config, args: &TrainArgs) -> Config {
    if let Some(smoothing) = args.smoothing {
        config.scoring.smoothing = smoothing;
    }
    if let Some(calibrate) = switch(args.calibration, args.no_calibration) {
        config.scoring.calibrate = calibrate;
    }
    if let Some(solo) = switch(args.solo_heuristic, args.no_solo_heuristic) {
        config.counting.solo_heuristic = solo;
    }
    if let Some(processes) = args.processes {
        config.counting.parallel_workers = processes;
    }
    config
}

/// Value of a `--flag` / `--no-flag` pair, `None` when neither was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Resolve input paths, falling back to the `[inputs]` config section.
fn resolve_inputs(args: &TrainArgs, config: &Config) -> anyhow::Result<TrainInputs> {
    let pick = |flag: &Option<PathBuf>, configured: &Option<PathBuf>| {
        flag.as_deref()
            .or(configured.as_deref())
            .map(expand_path)
    };

    let general_tags = pick(&args.general, &config.inputs.general_tags).ok_or_else(|| {
        anyhow::anyhow!(
            "No general tag list given.\n\n  Hint: Pass --general <FILE> or set \
             `inputs.general_tags` in the config file."
        )
    })?;
    let character_tags = pick(&args.character, &config.inputs.character_tags).ok_or_else(|| {
        anyhow::anyhow!(
            "No character tag list given.\n\n  Hint: Pass --character <FILE> or set \
             `inputs.character_tags` in the config file."
        )
    })?;

    Ok(TrainInputs {
        corpus_dir: expand_path(&args.corpus_dir),
        general_tags,
        character_tags,
        mapping: pick(&args.mapping, &config.inputs.mapping),
        output: expand_path(&args.output),
    })
}

fn on_event(progress: &ProgressBar, event: TrainEvent) {
    match event {
        TrainEvent::ShardsDiscovered { count, total_bytes } => {
            progress.set_length(count as u64);
            progress.set_message(format!("{:.1} MB of shards", total_bytes as f64 / 1_000_000.0));
        }
        TrainEvent::ShardCounted { path, .. } => {
            progress.inc(1);
            progress.set_message(short_name(&path));
        }
        TrainEvent::Deriving => {
            progress.set_message("deriving scores...");
        }
    }
}

fn short_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Create the shard progress bar; its length is set once shards are discovered.
fn create_progress_bar() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} shards {msg}",
            )?
            .progress_chars("##-"),
    );
    pb.set_message("discovering shards...");
    Ok(pb)
}

/// Print a formatted summary after training.
fn print_summary(report: &TrainReport) {
    let secs = report.elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        report.posts_read as f64 / secs
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Shards:       {:>8}", report.shards);
    eprintln!("    Posts read:   {:>8}", report.posts_read);
    eprintln!("    Retained:     {:>8}", report.posts_retained);
    if report.posts_excluded > 0 {
        eprintln!("    Excluded:     {:>8}", report.posts_excluded);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    General:      {:>8}", report.general_tags);
    eprintln!("    Characters:   {:>8}", report.character_tags);
    eprintln!("    Duration:     {:>7.1}s", secs);
    eprintln!("    Rate:         {:>7.0} posts/sec", rate);
    eprintln!("  ====================================");
    eprintln!("    Model: {}", report.output.display());
}
