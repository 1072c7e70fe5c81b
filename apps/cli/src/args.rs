// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use sketchplan_plan::ExportFormat;
use sketchplan_vision::{CalibrationInput, MergeStrategy};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sketchplan", version)]
#[command(about = "Floor plan sketches to scaled layouts, plans and drawings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Detect the plot, walls, openings and rooms, calibrate and write layout.json
    Process(ProcessArgs),

    /// Label rooms, score placement and write plan.json
    Plan(PlanArgs),

    /// Write a plan download
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Sketch image (PNG or JPEG)
    pub image: PathBuf,

    /// Plot width in meters
    #[arg(long, value_name = "M")]
    pub plot_width: Option<f64>,

    /// Plot height in meters
    #[arg(long, value_name = "M")]
    pub plot_height: Option<f64>,

    /// Scale bar length in pixels
    #[arg(long, value_name = "PX")]
    pub scale_bar_px: Option<f64>,

    /// Scale bar length in meters
    #[arg(long, value_name = "M")]
    pub scale_bar_m: Option<f64>,

    /// Pipeline configuration JSON
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Clustering seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of color clusters for room segmentation
    #[arg(long, value_name = "K", value_parser = clap::value_parser!(u8).range(1..))]
    pub clusters: Option<u8>,

    /// Rectangle merge strategy
    #[arg(long, value_enum)]
    pub merge: Option<MergeArg>,

    /// Output directory (default $SKETCHPLAN_OUTPUT_DIR or ./out)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl ProcessArgs {
    pub fn calibration(&self) -> CalibrationInput {
        CalibrationInput {
            plot_width_m: self.plot_width,
            plot_height_m: self.plot_height,
            scale_bar_px: self.scale_bar_px,
            scale_bar_m: self.scale_bar_m,
        }
    }
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Processed sketch (layout.json from `process`)
    pub sketch: PathBuf,

    /// Requirements JSON; overrides the room flags below
    #[arg(long, value_name = "FILE")]
    pub requirements: Option<PathBuf>,

    /// Bedroom count
    #[arg(long, default_value_t = 2)]
    pub bedrooms: u32,

    /// Bathroom count
    #[arg(long, default_value_t = 1)]
    pub bathrooms: u32,

    /// Include a puja room
    #[arg(long)]
    pub puja: bool,

    /// Additional room, repeatable
    #[arg(long = "room", value_name = "NAME")]
    pub rooms: Vec<String>,

    /// Output directory (default $SKETCHPLAN_OUTPUT_DIR or ./out)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Plan (plan.json from `plan`)
    pub plan: PathBuf,

    /// Download format
    #[arg(long, value_enum)]
    pub format: FormatArg,

    /// Output directory (default $SKETCHPLAN_OUTPUT_DIR or ./out)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MergeArg {
    /// Union into the first overlapping rectangle (default)
    #[value(alias = "first_match")]
    FirstMatch,
    /// Union whole overlap chains
    #[value(alias = "connected_components", alias = "connected")]
    ConnectedComponents,
}

impl From<MergeArg> for MergeStrategy {
    fn from(arg: MergeArg) -> Self {
        match arg {
            MergeArg::FirstMatch => MergeStrategy::FirstMatch,
            MergeArg::ConnectedComponents => MergeStrategy::ConnectedComponents,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Plan as JSON
    Json,
    /// Room diagram
    Svg,
    /// R12 CAD drawing
    Dxf,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Svg => ExportFormat::Svg,
            FormatArg::Dxf => ExportFormat::Dxf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(line: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("sketchplan").chain(line.split_whitespace()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_process_with_calibration() {
        let cli = parse(
            "process sketch.png --plot-width 12.5 --scale-bar-px 100 --merge connected-components --seed 7 --clusters 6",
        )
        .unwrap();

        let p = match cli.command {
            Command::Process(p) => p,
            other => panic!("expected process, got {:?}", other),
        };
        assert_eq!(p.image, PathBuf::from("sketch.png"));
        let calibration = p.calibration();
        assert_eq!(calibration.plot_width_m, Some(12.5));
        assert_eq!(calibration.scale_bar_px, Some(100.0));
        assert_eq!(calibration.scale_bar_m, None);
        assert_eq!(p.merge.map(MergeStrategy::from), Some(MergeStrategy::ConnectedComponents));
        assert_eq!(p.seed, Some(7));
        assert_eq!(p.clusters, Some(6));
    }

    #[test]
    fn test_merge_aliases() {
        for (value, expected) in [
            ("first-match", MergeArg::FirstMatch),
            ("first_match", MergeArg::FirstMatch),
            ("connected_components", MergeArg::ConnectedComponents),
            ("connected", MergeArg::ConnectedComponents),
        ] {
            let cli = parse(&format!("process a.png --merge {}", value)).unwrap();
            match cli.command {
                Command::Process(p) => assert_eq!(p.merge, Some(expected), "{}", value),
                other => panic!("expected process, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_cluster_count_bounds() {
        for bad in ["0", "256", "many"] {
            let err = parse(&format!("process a.png --clusters {}", bad)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{}", bad);
        }
        let cli = parse("process a.png --clusters 255").unwrap();
        match cli.command {
            Command::Process(p) => assert_eq!(p.clusters, Some(255)),
            other => panic!("expected process, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_defaults_and_rooms() {
        let cli = parse("plan out/layout.json --puja --room Study --room Garage").unwrap();

        let p = match cli.command {
            Command::Plan(p) => p,
            other => panic!("expected plan, got {:?}", other),
        };
        assert_eq!(p.bedrooms, 2);
        assert_eq!(p.bathrooms, 1);
        assert!(p.puja);
        assert_eq!(p.rooms, vec!["Study", "Garage"]);
        assert!(p.requirements.is_none());
    }

    #[test]
    fn test_export_requires_format() {
        let err = parse("export plan.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let cli = parse("export plan.json --format svg --output-dir dist").unwrap();
        let e = match cli.command {
            Command::Export(e) => e,
            other => panic!("expected export, got {:?}", other),
        };
        assert_eq!(e.plan, PathBuf::from("plan.json"));
        assert_eq!(ExportFormat::from(e.format), ExportFormat::Svg);
        assert_eq!(e.output_dir, Some(PathBuf::from("dist")));
    }

    #[test]
    fn test_errors() {
        assert!(parse("").is_err());
        assert_eq!(parse("process --help").unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse("render a.png").unwrap_err().kind(), ErrorKind::InvalidSubcommand);
        assert_eq!(parse("process").unwrap_err().kind(), ErrorKind::MissingRequiredArgument);
        assert!(parse("process a.png --plot-width").is_err());
        assert_eq!(
            parse("process a.png --plot-width wide").unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert_eq!(parse("process a.png --bedrooms 3").unwrap_err().kind(), ErrorKind::UnknownArgument);
        assert_eq!(parse("process a.png --merge greedy").unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(parse("export plan.json --format pdf").unwrap_err().kind(), ErrorKind::InvalidValue);
    }
}
