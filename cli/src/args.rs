use cellsim_lib::Config;
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// A simple tool to simulate elementary and Life-like cellular automata.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a new simulation.
    New(NewArgs),

    /// Resume a simulation from a saved file.
    Load(LoadArgs),
}

#[derive(Debug, Args)]
pub struct NewArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// A path to load the simulation from.
    pub load: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Number of generations to run.
    #[arg(short, long, default_value = "100")]
    pub generations: u64,

    /// A path to save the simulation to when it stops.
    #[arg(short, long)]
    pub save: Option<PathBuf>,
}

impl Cli {
    /// Parse and validate the command line arguments.
    pub fn parse_and_validate() -> Self {
        let Self { command } = Self::parse();

        let command = match command {
            Command::New(args) => match args.config.check() {
                Ok(config) => Command::New(NewArgs { config, ..args }),
                Err(e) => Self::command().error(ErrorKind::ValueValidation, e).exit(),
            },
            command => command,
        };

        Self { command }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellsim_lib::{Boundary, Dimensions};

    #[test]
    fn test_parse_new() {
        let cli = Cli::try_parse_from([
            "cellsim", "new", "40", "20", "--rule", "B3/S23", "-b", "bounded", "-d", "0.3",
            "--seed", "7", "-g", "10",
        ])
        .unwrap();

        let Command::New(args) = cli.command else {
            panic!("expected the new command");
        };
        assert_eq!(args.config.dimensions(), Dimensions::Grid { rows: 20, cols: 40 });
        assert_eq!(args.config.rule_str.as_deref(), Some("B3/S23"));
        assert_eq!(args.config.boundary, Boundary::Bounded);
        assert_eq!(args.config.density, Some(0.3));
        assert_eq!(args.config.seed, Some(7));
        assert_eq!(args.config.interval, 50);
        assert_eq!(args.output.generations, 10);
        assert_eq!(args.output.save, None);
    }

    #[test]
    fn test_parse_new_line() {
        let cli = Cli::try_parse_from(["cellsim", "new", "31"]).unwrap();

        let Command::New(args) = cli.command else {
            panic!("expected the new command");
        };
        assert_eq!(args.config.dimensions(), Dimensions::Line(31));
        assert_eq!(args.config.rule_str, None);
        assert_eq!(args.config.boundary, Boundary::Toroidal);
        assert_eq!(args.output.generations, 100);
    }

    #[test]
    fn test_parse_load() {
        let cli =
            Cli::try_parse_from(["cellsim", "load", "state.json", "--save", "next.json"]).unwrap();

        let Command::Load(args) = cli.command else {
            panic!("expected the load command");
        };
        assert_eq!(args.load, PathBuf::from("state.json"));
        assert_eq!(args.output.save, Some(PathBuf::from("next.json")));
    }
}
