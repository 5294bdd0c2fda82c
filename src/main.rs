use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use grooveslicer::analysis::{BeatEstimator, FixedBeatsEstimator, StratumEstimator};
use grooveslicer::audio::OutputFormat;
use grooveslicer::export::{collect_audio_files, EstimatorConfig};
use grooveslicer::validation::validate_slices;
use grooveslicer::{AnalyzeConfig, GroovePipeline, QuantizeConfig, SliceConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "grooveslicer")]
#[command(about = "Slice audio into bar-aligned loops, click tracks and reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Use beat times (seconds, one per line) from this file instead of detecting them
    #[arg(long, global = true)]
    beats: Option<String>,

    /// Tempo to use with --beats (derived from the beat spacing if omitted)
    #[arg(long, global = true)]
    tempo: Option<f64>,

    /// Minimum BPM for tempo folding (0 disables)
    #[arg(long, default_value = "0", global = true)]
    min_bpm: f64,

    /// Maximum BPM for tempo folding (0 disables)
    #[arg(long, default_value = "0", global = true)]
    max_bpm: f64,

    /// Write 32-bit float WAV instead of 16-bit PCM
    #[arg(long, global = true)]
    float: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate tempo and beats
    Analyze {
        /// Audio files or directories
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Write an HTML report per file
        #[arg(long)]
        report: bool,

        /// Directory for HTML reports
        #[arg(long, default_value = "reports")]
        report_dir: String,

        /// Print one JSON object per file
        #[arg(long)]
        json: bool,
    },

    /// Slice audio into bar-aligned loops
    Slice {
        /// Audio file
        input: String,

        /// Bars per loop
        #[arg(long, default_value = "1")]
        bars: usize,

        /// Output directory
        #[arg(long, default_value = "slices")]
        out: String,

        /// Also write click.mid
        #[arg(long)]
        midi_click: bool,

        /// Crossfade at loop edges in seconds
        #[arg(long, default_value = "0.005")]
        crossfade: f64,

        /// Also write an HTML report into the output directory
        #[arg(long)]
        report: bool,
    },

    /// Nudge audio near each beat toward a uniform grid
    Quantize {
        /// Audio file
        input: String,

        /// Correction strength in [0, 1]
        #[arg(long, default_value = "0.5")]
        strength: f64,

        /// Output WAV file
        #[arg(long, default_value = "quantized.wav")]
        out: String,
    },
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let estimator_config = EstimatorConfig {
        beats_file: cli.global.beats.as_deref().map(expand),
        tempo: cli.global.tempo,
        min_bpm: cli.global.min_bpm,
        max_bpm: cli.global.max_bpm,
    };
    estimator_config.validate()?;

    let output_format = if cli.global.float {
        OutputFormat::Float32
    } else {
        OutputFormat::Pcm16
    };

    // Fixed grid from a file, or stratum-dsp detection
    match &estimator_config.beats_file {
        Some(path) => {
            let mut estimator = FixedBeatsEstimator::from_file(path)?;
            if let Some(tempo) = estimator_config.tempo {
                estimator = estimator.with_tempo(tempo);
            }
            run(GroovePipeline::new(estimator), cli.command, output_format)
        }
        None => {
            if estimator_config.tempo.is_some() {
                log::warn!("--tempo only applies together with --beats; ignoring");
            }
            let mut estimator = StratumEstimator::new();
            if estimator_config.min_bpm > 0.0 {
                log::info!(
                    "BPM folding range: {}-{} BPM",
                    estimator_config.min_bpm,
                    estimator_config.max_bpm
                );
                estimator = estimator.with_bpm_range(estimator_config.min_bpm, estimator_config.max_bpm);
            }
            run(GroovePipeline::new(estimator), cli.command, output_format)
        }
    }
}

fn run<E: BeatEstimator>(
    pipeline: GroovePipeline<E>,
    command: Command,
    output_format: OutputFormat,
) -> Result<()> {
    match command {
        Command::Analyze {
            inputs,
            report,
            report_dir,
            json,
        } => {
            let inputs: Vec<PathBuf> = inputs.iter().map(|i| expand(i)).collect();
            let files = collect_audio_files(&inputs)?;
            if files.is_empty() {
                anyhow::bail!("No audio files found in {:?}", inputs);
            }

            let mut config = AnalyzeConfig::new();
            if report {
                config = config.with_reports(expand(&report_dir));
            }

            let mut failures = 0;
            for (path, result) in pipeline.analyze_batch(&files, &config) {
                match result {
                    Ok(summary) if json => println!("{}", serde_json::to_string(&summary)?),
                    Ok(summary) if files.len() > 1 => println!("{}: {}", summary.file, summary.line()),
                    Ok(summary) => println!("{}", summary.line()),
                    Err(e) => {
                        log::error!("{:?}: {:#}", path, e);
                        failures += 1;
                    }
                }
            }

            if failures > 0 {
                anyhow::bail!("{} of {} file(s) failed to analyze", failures, files.len());
            }
        }

        Command::Slice {
            input,
            bars,
            out,
            midi_click,
            crossfade,
            report,
        } => {
            let config = SliceConfig::new(expand(&out))
                .with_bars(bars)
                .with_crossfade(crossfade)
                .with_midi_click(midi_click)
                .with_report(report)
                .with_output_format(output_format);

            let outcome = pipeline.slice(&expand(&input), &config)?;
            println!("BPM: {:.2}, beats: {}", outcome.tempo_bpm, outcome.beats);
            println!("Loops exported: {}", outcome.loops_exported());

            // Auto-validate after slicing
            log::info!("Running post-slice validation...");
            let validated = validate_slices(&config.out_dir)?;
            if !validated.loop_lengths.starts_with(&outcome.loop_lengths) {
                anyhow::bail!("Written loops do not match what was exported");
            }
            if validated.loops > outcome.loops_exported() {
                log::warn!(
                    "{:?} holds {} stale loop(s) from an earlier run",
                    config.out_dir,
                    validated.loops - outcome.loops_exported()
                );
            }
            log::info!("Validation passed");
        }

        Command::Quantize {
            input,
            strength,
            out,
        } => {
            let config = QuantizeConfig::new(expand(&out))
                .with_strength(strength)
                .with_output_format(output_format);

            let outcome = pipeline.quantize(&expand(&input), &config)?;
            println!(
                "Quantized {} samples against {} beats: {}",
                outcome.samples,
                outcome.beats,
                outcome.out_path.display()
            );
        }
    }

    Ok(())
}
