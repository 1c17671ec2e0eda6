mod app;
mod clock;
mod command;
mod config;
mod consts;
mod difficulty;
mod game;
mod session;
mod stats;
mod ui;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::difficulty::Difficulty;
use crate::session::Session;
use crate::stats::Stats;
use anyhow::Context;
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use lexopt::{Arg, Parser, ValueExt};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Name of the environment variable used to set the log filter
const LOG_ENV_VAR: &str = "GRIDSNAKE_LOG";

const USAGE: &str = "\
Usage: gridsnake [<options>]

Play Snake in your terminal

Options:
  -c, --config <path>        Read configuration from the given file
  -d, --difficulty <level>   Start at the given difficulty (easy, medium, hard)
  -h, --help                 Display this help message and exit
  -V, --version              Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Arguments {
    Run {
        config: Option<PathBuf>,
        difficulty: Option<Difficulty>,
    },
    Help,
    Version,
}

impl Arguments {
    fn from_parser(mut parser: Parser) -> Result<Arguments, lexopt::Error> {
        let mut config = None;
        let mut difficulty = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('d') | Arg::Long("difficulty") => {
                    difficulty = Some(parser.value()?.parse()?);
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Arguments::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Arguments::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Arguments::Run { config, difficulty })
    }
}

fn main() -> ExitCode {
    match Arguments::from_parser(Parser::from_env()) {
        Ok(Arguments::Run { config, difficulty }) => match run(config.as_deref(), difficulty) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("gridsnake: {e:?}");
                ExitCode::FAILURE
            }
        },
        Ok(Arguments::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Arguments::Version) => {
            println!("gridsnake {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("gridsnake: {e}\n\n{USAGE}");
            ExitCode::from(2)
        }
    }
}

fn run(config_path: Option<&Path>, difficulty: Option<Difficulty>) -> anyhow::Result<ExitCode> {
    let config = match config_path {
        Some(path) => Config::load(path, false),
        None => Config::load(&Config::default_path()?, true),
    }
    .context("failed to load configuration")?;
    if let Some(ref path) = config.files.log_file {
        init_logging(path)?;
    }
    log::info!("Starting gridsnake {}", env!("CARGO_PKG_VERSION"));
    let stats_file = config.stats_file();
    let stats = match stats_file {
        Some(ref path) => match Stats::load(path) {
            Ok(stats) => {
                log::debug!("Loaded stats from {}", path.display());
                stats
            }
            Err(e) => {
                log::warn!("{:#}; starting from zero", anyhow::Error::new(e));
                Stats::default()
            }
        },
        None => Stats::default(),
    };
    let session = Session::new(
        config.game.grid_size,
        difficulty.unwrap_or(config.game.difficulty),
        stats,
    );
    let terminal = ratatui::init();
    let r = crossterm::execute!(io::stdout(), EnableFocusChange)
        .and_then(|()| App::new(session, stats_file).run(terminal));
    if let Err(e) = crossterm::execute!(io::stdout(), DisableFocusChange) {
        log::warn!("Failed to disable focus change reporting: {e}");
    }
    ratatui::restore();
    log::info!("Exiting");
    Ok(io_exit(r))
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("failed to open log file")?;
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV_VAR, "info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}
