mod static_plot;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pz_core::{DisplayScale, EditorConfig, PoleZeroSet, Preset};
use tracing_subscriber::EnvFilter;

/// Place poles and zeros on the z-plane and watch the frequency response.
#[derive(Parser, Debug)]
#[command(name = "pz-editor", version)]
struct Cli {
    /// Editor configuration (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive editor (default).
    Edit {
        #[command(flatten)]
        source: Source,
    },
    /// Evaluate once and draw the pole-zero plot, magnitude and phase to a PNG.
    Plot {
        #[command(flatten)]
        source: Source,
        #[arg(short, long)]
        output: PathBuf,
        /// Magnitude scale (log or linear); defaults to the configured one.
        #[arg(long)]
        scale: Option<DisplayScale>,
        #[arg(long, default_value_t = 1500)]
        width: u32,
        #[arg(long, default_value_t = 500)]
        height: u32,
    },
    /// Evaluate once and print `omega,magnitude,display,phase` as CSV.
    Table {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        scale: Option<DisplayScale>,
    },
}

/// Where the initial poles and zeros come from.
#[derive(Args, Debug, Default)]
struct Source {
    /// Built-in example: notch, resonator, lowpass, bandpass, composite, editor.
    #[arg(long, conflicts_with = "filter")]
    preset: Option<Preset>,
    /// Filter description (TOML with `poles` and `zeros` arrays of [re, im]).
    #[arg(long)]
    filter: Option<PathBuf>,
}

impl Source {
    fn load(&self, fallback: Preset) -> Result<PoleZeroSet> {
        match (&self.filter, self.preset) {
            (Some(path), _) => PoleZeroSet::load(path)
                .with_context(|| format!("could not load filter from {}", path.display())),
            (None, Some(preset)) => Ok(preset.filter()),
            (None, None) => Ok(fallback.filter()),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path).with_context(|| format!("bad config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match cli.command.unwrap_or(Command::Edit {
        source: Source::default(),
    }) {
        Command::Edit { source } => {
            let filter = source.load(Preset::Editor)?;
            tracing::info!(poles = filter.poles().len(), zeros = filter.zeros().len(), "starting editor");
            pz_render::run(config, filter).context("editor window failed")?;
        }
        Command::Plot {
            source,
            output,
            scale,
            width,
            height,
        } => {
            let filter = source.load(Preset::Composite)?;
            let frame = pz_core::compute(&filter, &config, scale.unwrap_or(config.initial_scale));
            static_plot::draw(&frame, &output, (width, height))
                .with_context(|| format!("could not draw {}", output.display()))?;
            tracing::info!(path = %output.display(), "wrote response plot");
        }
        Command::Table { source, scale } => {
            let filter = source.load(Preset::Composite)?;
            let frame = pz_core::compute(&filter, &config, scale.unwrap_or(config.initial_scale));
            write_table(&frame, &mut io::stdout().lock())?;
        }
    }

    Ok(())
}

fn write_table(frame: &pz_core::Frame, out: &mut impl Write) -> io::Result<()> {
    let display = frame.display_magnitude();
    writeln!(out, "omega,magnitude,display,phase")?;
    for i in 0..frame.response.frequencies.len() {
        writeln!(
            out,
            "{},{},{},{}",
            frame.response.frequencies[i], frame.response.magnitude[i], display[i], frame.response.phase[i]
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_edit() {
        let cli = Cli::try_parse_from(["pz-editor"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_plot_args() {
        let cli = Cli::try_parse_from([
            "pz-editor", "plot", "--preset", "notch", "-o", "out.png", "--scale", "linear",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Plot {
                source, output, scale, ..
            }) => {
                assert_eq!(source.preset, Some(Preset::Notch));
                assert_eq!(output, PathBuf::from("out.png"));
                assert_eq!(scale, Some(DisplayScale::Linear));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_preset_and_filter_conflict() {
        let err = Cli::try_parse_from(["pz-editor", "table", "--preset", "notch", "--filter", "f.toml"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        assert!(Cli::try_parse_from(["pz-editor", "table", "--preset", "shelf"]).is_err());
    }

    #[test]
    fn test_table_rows_and_sentinel_clipping() {
        let config = EditorConfig {
            num_samples: 8,
            ..EditorConfig::default()
        };
        let filter = PoleZeroSet::new(vec![], vec![pz_core::Point::new(1.0, 0.0)]);
        let frame = pz_core::compute(&filter, &config, DisplayScale::Log);

        let mut out = Vec::new();
        write_table(&frame, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "omega,magnitude,display,phase");
        // ω = 0 sits on the zero: magnitude 0, dB floor
        let row: Vec<&str> = lines[1 + 4].split(',').collect();
        assert_eq!(row[0], "0");
        assert_eq!(row[1], "0");
        assert_eq!(row[2], "-60");
    }
}
