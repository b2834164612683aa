//! SonicBoost command line
//!
//! Usage:
//!   sonicboost analyze <file> --duration 212          - Descriptor for a track
//!   sonicboost master <file> --duration 212           - Parameters and filter chain
//!   sonicboost master <file> ... --emit ffmpeg        - FFmpeg command line instead of JSON
//!   sonicboost review <file> --duration 212 --tips    - Heuristic mix review
//!
//! `RUST_LOG=debug` shows rule firings and fallbacks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sb_master::{
    AudioSource, RevisionSession, Tier, UserAdjustment, analysis_summary, compare_to_reference,
    mixing_tips, pre_mastering_tips,
};
use sb_session::{MasteringPipeline, SessionConfig, decode_parser_reply};
use serde_json::json;

#[derive(Parser)]
#[command(name = "sonicboost", about = "SonicBoost mastering decision engine", version)]
struct Cli {
    /// Session configuration (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the descriptor of a track
    Analyze {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Compute mastering parameters and the filter chain
    Master {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        reference: ReferenceArgs,

        #[command(flatten)]
        adjust: AdjustArgs,

        /// Command-parser reply (JSON) to apply as a revision
        #[arg(long)]
        revision: Option<String>,

        /// Tier governing the revision budget
        #[arg(long, value_enum, default_value = "pro")]
        tier: TierArg,

        /// Output written by the rendered command line
        #[arg(short, long)]
        out: Option<String>,

        /// What to print
        #[arg(long, value_enum, default_value = "json")]
        emit: Emit,
    },
    /// Review a mix before mastering
    Review {
        #[command(flatten)]
        source: SourceArgs,

        /// Include mixing and pre-mastering tips
        #[arg(long)]
        tips: bool,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Audio file
    file: PathBuf,

    /// Duration in seconds (0 = unknown)
    #[arg(short, long, default_value_t = 0.0)]
    duration: f32,

    /// Free-text hint (defaults to the file name)
    #[arg(long)]
    hint: Option<String>,

    /// Encoded bitrate in kbps
    #[arg(long)]
    bitrate: Option<u32>,
}

impl SourceArgs {
    fn to_source(&self) -> Result<AudioSource> {
        source_from(&self.file, self.duration, self.hint.as_deref(), self.bitrate)
    }
}

#[derive(Args)]
struct ReferenceArgs {
    /// Reference master to match
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Reference duration in seconds
    #[arg(long, default_value_t = 0.0)]
    reference_duration: f32,
}

#[derive(Args)]
struct AdjustArgs {
    /// High band (dB, ±6)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    high: f32,

    /// Mid band (dB, ±6)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    mid: f32,

    /// Low band (dB, ±6)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    low: f32,

    /// Pitch (semitones, ±12)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    semitones: f32,
}

impl AdjustArgs {
    fn to_adjustment(&self) -> UserAdjustment {
        UserAdjustment {
            high: self.high,
            mid: self.mid,
            low: self.low,
            tempo: self.semitones,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TierArg {
    Free,
    Pro,
    Unlimited,
}

impl From<TierArg> for Tier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Free => Tier::Free,
            TierArg::Pro => Tier::Pro,
            TierArg::Unlimited => Tier::Unlimited,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Parameters, chain and descriptor as JSON
    Json,
    /// FFmpeg command line
    Ffmpeg,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let pipeline = MasteringPipeline::new(config).context("Invalid session configuration")?;

    match cli.command {
        Commands::Analyze { source } => analyze(&pipeline, &source).await,
        Commands::Master {
            source,
            reference,
            adjust,
            revision,
            tier,
            out,
            emit,
        } => {
            master(
                &pipeline,
                &source,
                &reference,
                &adjust,
                revision.as_deref(),
                tier.into(),
                out,
                emit,
            )
            .await
        }
        Commands::Review { source, tips } => review(&pipeline, &source, tips).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    SessionConfig::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
}

fn source_from(
    file: &Path,
    duration: f32,
    hint: Option<&str>,
    bitrate: Option<u32>,
) -> Result<AudioSource> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .context("File path has no usable name")?;
    let id = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);

    let mut source = AudioSource::new(id, &file.to_string_lossy(), duration)
        .with_hint(hint.unwrap_or(name));
    if let Some(kbps) = bitrate {
        source = source.with_bitrate(kbps);
    }
    Ok(source)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn analyze(pipeline: &MasteringPipeline, args: &SourceArgs) -> Result<()> {
    let source = args.to_source()?;
    let descriptor = pipeline.analyze(&source).await;

    print_json(&json!({
        "descriptor": descriptor,
        "genreName": descriptor.genre.display_name(),
        "summary": analysis_summary(&descriptor),
    }))
}

#[allow(clippy::too_many_arguments)]
async fn master(
    pipeline: &MasteringPipeline,
    args: &SourceArgs,
    reference: &ReferenceArgs,
    adjust: &AdjustArgs,
    revision: Option<&str>,
    tier: Tier,
    out: Option<String>,
    emit: Emit,
) -> Result<()> {
    let source = args.to_source()?;
    let descriptor = pipeline.analyze(&source).await;

    let mut comparison = None;
    let mut outcome = match &reference.reference {
        Some(path) => {
            let ref_source = source_from(path, reference.reference_duration, None, None)?;
            let profile = pipeline.analyze_reference(&ref_source);
            comparison = Some(compare_to_reference(&descriptor, &profile));
            pipeline.master_with_reference(&descriptor, Some(&profile))
        }
        None => pipeline.master(&descriptor),
    };

    let adjustment = adjust.to_adjustment();
    if !adjustment.is_neutral() {
        outcome = pipeline.adjust(&outcome, &adjustment);
    }

    let mut request = pipeline.render_request(&source, &outcome);

    if let Some(reply) = revision {
        let command = decode_parser_reply(reply);
        let mut session = RevisionSession::new(
            source.clone(),
            outcome.genre,
            outcome.params,
            tier.revision_limit(),
        );
        let plan = match session.apply(&command, pipeline.config().output_format) {
            Ok(plan) => plan,
            Err(rejected) => bail!("Revision rejected: {}", rejected),
        };
        log::info!("Applied revision: {}", command.describe());
        outcome.params = plan.params;
        outcome.description = plan.params.description(outcome.genre);
        outcome.chain = plan.chain;
        request = plan.request;
    }

    let output = out.unwrap_or_else(|| {
        format!("{}_mastered.{}", source.id, request.format.extension())
    });

    match emit {
        Emit::Ffmpeg => {
            let args: Vec<String> = request
                .ffmpeg_args(&output)
                .into_iter()
                .map(|a| shell_quote(&a))
                .collect();
            println!("ffmpeg {}", args.join(" "));
            Ok(())
        }
        Emit::Json => print_json(&json!({
            "descriptor": descriptor,
            "outcome": outcome,
            "previewRate": outcome.params.preview_playback_rate(),
            "reference": comparison,
            "filter": request.chain.to_ffmpeg_filter(),
            "estimatedSeconds": request.estimate_processing_secs(),
            "output": output,
        })),
    }
}

async fn review(pipeline: &MasteringPipeline, args: &SourceArgs, tips: bool) -> Result<()> {
    let source = args.to_source()?;
    let descriptor = pipeline.analyze(&source).await;
    let review = pipeline.review(&descriptor).await;

    let mut report = json!({
        "review": review,
        "grade": review.grade(),
        "description": review.description(),
        "summary": review.summary(),
    });
    if tips {
        report["mixingTips"] = json!(mixing_tips(&descriptor, false));
        report["masteringTips"] = json!(mixing_tips(&descriptor, true));
        report["preMasteringTips"] = json!(pre_mastering_tips());
    }
    print_json(&report)
}

fn shell_quote(arg: &str) -> String {
    if arg
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./:=,".contains(c))
    {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "sonicboost",
            "master",
            "song.wav",
            "--duration",
            "200",
            "--low",
            "-3",
            "--tier",
            "unlimited",
            "--emit",
            "ffmpeg",
        ])
        .unwrap();
        match cli.command {
            Commands::Master { adjust, tier, emit, .. } => {
                assert_eq!(adjust.low, -3.0);
                assert_eq!(Tier::from(tier), Tier::Unlimited);
                assert!(emit == Emit::Ffmpeg);
            }
            _ => panic!("expected master"),
        }
    }

    #[test]
    fn test_source_from_path() {
        let src = source_from(Path::new("/music/deep_house_124bpm.wav"), 300.0, None, Some(320)).unwrap();
        assert_eq!(src.id, "deep_house_124bpm");
        assert_eq!(src.hint_text(), "deep_house_124bpm.wav");
        assert_eq!(src.bitrate_kbps, Some(320));
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("highpass=f=30,alimiter=limit=0.99"), "highpass=f=30,alimiter=limit=0.99");
        assert_eq!(shell_quote("my song.wav"), "'my song.wav'");
    }
}
