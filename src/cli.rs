use lexopt::{Arg, Parser};
use std::path::PathBuf;

const USAGE: &str = "\
Usage: autosnake [options]

Snake game with power-ups and a pathfinding autopilot

Options:
  -c, --config <PATH>   Read configuration from the given file
      --database <PATH> Store high scores in the given SQLite database
      --autopilot       Start games with the autopilot steering
  -h, --help            Show this help message and exit
  -V, --version         Show the program version and exit
";

/// What the command line asks the program to do
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum CliCommand {
    Run(Arguments),
    Help,
    Version,
}

impl CliCommand {
    pub(crate) fn from_env() -> Result<CliCommand, lexopt::Error> {
        CliCommand::from_parser(Parser::from_env())
    }

    #[cfg(test)]
    fn from_args<I>(args: I) -> Result<CliCommand, lexopt::Error>
    where
        I: IntoIterator,
        I::Item: Into<std::ffi::OsString>,
    {
        CliCommand::from_parser(Parser::from_args(args))
    }

    fn from_parser(mut parser: Parser) -> Result<CliCommand, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(CliCommand::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(CliCommand::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("database") => {
                    args.database = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("autopilot") => args.autopilot = true,
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(CliCommand::Run(args))
    }

    pub(crate) fn usage() -> &'static str {
        USAGE
    }

    pub(crate) fn version() -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// Options for a normal run of the game
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Arguments {
    /// Configuration file given on the command line
    pub(crate) config: Option<PathBuf>,
    /// Database path overriding the one in the configuration
    pub(crate) database: Option<PathBuf>,
    pub(crate) autopilot: bool,
}
