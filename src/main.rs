use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use midi_to_rttl::{generate_sketch, Ringtone, Score};

#[derive(Parser, Debug)]
#[command(name = "midi-to-rttl")]
#[command(about = "Convert MIDI files to RTTL ringtone strings", long_about = None)]
struct Args {
    /// Path to the MIDI file (default: uses first .mid file in current directory)
    #[arg(short, long)]
    midi: Option<PathBuf>,

    /// Output file path (default: `<midi-name>` with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output flavor
    #[arg(short, long, value_enum, default_value_t = Format::Sketch)]
    format: Format,

    /// Print output to stdout instead of file
    #[arg(long)]
    stdout: bool,

    /// Suppress informational messages (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Arduino MusicWithoutDelay sketch
    Sketch,
    /// One RTTL string per line
    Rttl,
    /// Token-level JSON
    Json,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Sketch => "ino",
            Format::Rttl => "rttl",
            Format::Json => "json",
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Find MIDI file
    let midi_path = if let Some(path) = args.midi {
        if !path.exists() {
            anyhow::bail!("MIDI file not found: {}", path.display());
        }
        path
    } else {
        find_first_midi_file()?
    };

    // Determine output path from the chosen format
    let output_path = if let Some(path) = args.output {
        path
    } else {
        let stem = midi_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        PathBuf::from(format!("{}.{}", stem, args.format.extension()))
    };

    if !args.quiet {
        eprintln!("Processing MIDI file: {}", midi_path.display());
    }

    // Parse and convert
    let Score { notes, bpm } = Score::from_file(&midi_path)?;
    let ringtones = midi_to_rttl::convert(notes, bpm)?;

    if !args.quiet {
        eprintln!("Encoded {} voice(s) at {:.0} bpm", ringtones.len(), bpm);
    }

    let output = match args.format {
        Format::Sketch => generate_sketch(&render_all(&ringtones)),
        Format::Rttl => render_all(&ringtones).join("\n"),
        Format::Json => to_json(bpm, &ringtones)?,
    };

    // Output handling
    if args.stdout {
        // Print directly to stdout (clean, no logs)
        println!("{}", output);
    } else {
        fs::write(&output_path, format!("{}\n", output))
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        if !args.quiet {
            eprintln!("Output saved to {}", output_path.display());
        }
    }

    Ok(())
}

fn render_all(ringtones: &[Ringtone]) -> Vec<String> {
    ringtones.iter().map(Ringtone::to_rttl).collect()
}

fn to_json(bpm: f64, ringtones: &[Ringtone]) -> Result<String> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        bpm: f64,
        ringtones: &'a [Ringtone],
    }

    Ok(serde_json::to_string_pretty(&JsonOutput { bpm, ringtones })?)
}

fn find_first_midi_file() -> Result<PathBuf> {
    let entries = fs::read_dir(".").context("Failed to read current directory")?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        let ext = path.extension().and_then(|s| s.to_str());
        if matches!(ext, Some("mid") | Some("midi")) {
            return Ok(path);
        }
    }

    anyhow::bail!("No MIDI files found in current directory")
}
