use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mediascope::{
    FfmpegLogLevel, MediaFile, MediaProbe, MediaReport, Rational, StreamDetails, StreamReport,
};
use serde_json::{Value, json};

const CLI_AFTER_HELP: &str = "Examples:\n  mediascope info input.mp4\n  mediascope info a.mp4 b.mkv c.webm --progress\n  mediascope tags input.mp3 --json\n  mediascope validate input.mkv\n  mediascope completions zsh > _mediascope";

#[derive(Debug, Parser)]
#[command(
    name = "mediascope",
    version,
    about = "Inspect media containers: tags, streams, codecs, frame rates",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Print library diagnostics to stderr (RUST_LOG still applies).
    #[arg(long, global = true)]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<FfmpegLogLevel>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print container and stream properties.
    #[command(
        visible_alias = "probe",
        after_help = "Examples:\n  mediascope info input.mp4\n  mediascope info input.mp4 --json"
    )]
    Info {
        /// Input media paths.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output machine-readable JSON.
        #[arg(long)]
        json: bool,

        /// Show a progress bar while probing several inputs.
        #[arg(long)]
        progress: bool,
    },

    /// Print every container tag.
    Tags {
        input: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Check a file for structural problems. Exits with status 1 if any
    /// errors are found.
    Validate { input: PathBuf },

    /// List every container format FFmpeg supports.
    Formats,

    /// List every codec FFmpeg supports.
    Codecs,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn apply_global_options(global: &GlobalOptions) {
    if global.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .format_timestamp(None)
            .init();
    }

    if let Some(level) = global.log_level {
        mediascope::set_ffmpeg_log_level(level);
    }
}

/// `HH:MM:SS.mmm`, or `unknown` for the negative "no duration" sentinel.
fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "unknown".to_string();
    }
    let millis = (seconds * 1000.0).round() as u64;
    let (hours, rest) = (millis / 3_600_000, millis % 3_600_000);
    let (minutes, rest) = (rest / 60_000, rest % 60_000);
    format!("{hours:02}:{minutes:02}:{:02}.{:03}", rest / 1000, rest % 1000)
}

fn format_bit_rate(bit_rate: i64) -> String {
    match bit_rate {
        ..=0 => "unknown".to_string(),
        1..1_000 => format!("{bit_rate} b/s"),
        1_000..1_000_000 => format!("{:.0} kb/s", bit_rate as f64 / 1e3),
        _ => format!("{:.2} Mb/s", bit_rate as f64 / 1e6),
    }
}

/// A rational as `"num/den"`, with its decimal value when defined.
fn format_rational(value: Rational) -> String {
    if value.is_undefined() {
        return format!("{value} (undefined)");
    }
    format!("{value} ({:.3})", value.to_f64())
}

fn rational_json(value: Rational) -> Value {
    json!({
        "numerator": value.numerator(),
        "denominator": value.denominator(),
    })
}

fn stream_json(stream: &StreamReport) -> Value {
    let mut payload = json!({
        "index": stream.index,
        "kind": stream.kind().to_string(),
        "codec": stream.codec,
        "fourcc": stream.fourcc,
        "bit_rate": stream.bit_rate,
    });

    let details = match &stream.details {
        StreamDetails::Video {
            width,
            height,
            frame_aspect_ratio,
            sample_aspect_ratio,
            real_aspect_ratio,
            frame_rate,
        } => json!({
            "width": width,
            "height": height,
            "frame_aspect_ratio": frame_aspect_ratio.map(rational_json),
            "sample_aspect_ratio": rational_json(*sample_aspect_ratio),
            "real_aspect_ratio": real_aspect_ratio.map(rational_json),
            "frame_rate": frame_rate.map(rational_json),
        }),
        StreamDetails::Audio {
            channels,
            sample_rate,
        } => json!({
            "channels": channels,
            "sample_rate": sample_rate,
        }),
    };

    if let (Value::Object(target), Value::Object(extra)) = (&mut payload, details) {
        target.extend(extra);
    }
    payload
}

fn report_json(report: &MediaReport) -> Value {
    let tags: serde_json::Map<String, Value> = report
        .tags
        .iter()
        .map(|(key, value)| (key.to_string(), Value::from(value)))
        .collect();

    json!({
        "path": report.path.display().to_string(),
        "format": report.format,
        "duration_seconds": report.duration_seconds,
        "bit_rate": report.bit_rate,
        "stream_count": report.stream_count,
        "tags": tags,
        "streams": report.streams.iter().map(stream_json).collect::<Vec<_>>(),
    })
}

fn print_report(report: &MediaReport) {
    println!("{}", report.path.display().to_string().bold());
    println!("  Format:   {}", report.format);
    println!("  Duration: {}", format_duration(report.duration_seconds));
    println!("  Bit rate: {}", format_bit_rate(report.bit_rate));
    for key in ["title", "artist", "album", "date"] {
        if let Some(value) = report.tags.get(key) {
            println!("  {:<9} {value}", format!("{key}:"));
        }
    }

    for stream in &report.streams {
        let codec = stream.codec.as_deref().unwrap_or("?");
        match &stream.details {
            StreamDetails::Video {
                width,
                height,
                sample_aspect_ratio,
                real_aspect_ratio,
                frame_rate,
                ..
            } => {
                println!(
                    "  #{} {} {codec} [{}] {width}x{height}",
                    stream.index,
                    "video".cyan(),
                    stream.fourcc,
                );
                println!("      SAR {sample_aspect_ratio}");
                if let Some(ratio) = real_aspect_ratio {
                    println!("      DAR {}", ratio.reduced());
                }
                match frame_rate {
                    Some(rate) => println!("      {} fps", format_rational(*rate)),
                    None => println!("      {}", "frame rate unavailable".yellow()),
                }
            }
            StreamDetails::Audio {
                channels,
                sample_rate,
            } => {
                println!(
                    "  #{} {} {codec} [{}] {sample_rate} Hz, {channels} ch, {}",
                    stream.index,
                    "audio".magenta(),
                    stream.fourcc,
                    format_bit_rate(stream.bit_rate),
                );
            }
        }
    }

    let hidden = report.stream_count.saturating_sub(report.streams.len());
    if hidden > 0 {
        println!("  ({hidden} other stream(s) not shown)");
    }
}

#[cfg(feature = "rayon")]
fn probe_all(inputs: &[PathBuf]) -> Vec<mediascope::Result<MediaReport>> {
    MediaProbe::probe_many_parallel(inputs)
}

#[cfg(not(feature = "rayon"))]
fn probe_all(inputs: &[PathBuf]) -> Vec<mediascope::Result<MediaReport>> {
    MediaProbe::probe_many(inputs)
}

fn probe_inputs(inputs: &[PathBuf], progress: bool) -> Vec<mediascope::Result<MediaReport>> {
    if !progress {
        return probe_all(inputs);
    }

    let bar = ProgressBar::new(inputs.len() as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("##-"));
    }

    let results = inputs
        .iter()
        .map(|input| {
            bar.set_message(input.display().to_string());
            let result = MediaProbe::probe(input);
            bar.inc(1);
            result
        })
        .collect();

    bar.finish_and_clear();
    results
}

fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global);

    match cli.command {
        Commands::Info {
            inputs,
            json,
            progress,
        } => {
            let mut all_ok = true;
            let mut payloads = Vec::new();

            for (input, result) in inputs.iter().zip(probe_inputs(&inputs, progress)) {
                match result {
                    Ok(report) if json => payloads.push(report_json(&report)),
                    Ok(report) => print_report(&report),
                    Err(error) => {
                        all_ok = false;
                        if json {
                            payloads.push(json!({
                                "path": input.display().to_string(),
                                "error": error.to_string(),
                            }));
                        } else {
                            eprintln!("{} {error}", "error:".red().bold());
                        }
                    }
                }
            }

            if json {
                let payload = match <[Value; 1]>::try_from(payloads) {
                    Ok([single]) => single,
                    Err(many) => Value::Array(many),
                };
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            Ok(all_ok)
        }
        Commands::Tags { input, json } => {
            let file = MediaFile::open(&input)?;
            let tags = file.tags()?;
            if json {
                let payload: serde_json::Map<String, Value> = tags
                    .iter()
                    .map(|(key, value)| (key.to_string(), Value::from(value)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else if tags.is_empty() {
                println!("{}", "no tags".dimmed());
            } else {
                let width = tags.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
                for (key, value) in tags.iter() {
                    println!("{}  {value}", format!("{key:<width$}").bold());
                }
            }
            Ok(true)
        }
        Commands::Validate { input } => {
            let file = MediaFile::open(&input)?;
            let report = file.validate()?;
            print!("{report}");
            if report.is_valid() {
                println!("{}", "valid".green().bold());
            } else {
                println!("{}", "invalid".red().bold());
            }
            Ok(report.is_valid())
        }
        Commands::Formats => {
            for name in mediascope::formats() {
                println!("{name}");
            }
            Ok(true)
        }
        Commands::Codecs => {
            for name in mediascope::codecs() {
                println!("{name}");
            }
            Ok(true)
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "mediascope", &mut std::io::stdout());
            Ok(true)
        }
    }
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}
