mod commands;
mod helpers;

use clap::Parser;
use histcmp_core::HistError;
use std::path::PathBuf;

pub fn run_from_env() -> i32 {
    helpers::init_tracing();
    match run(std::env::args().skip(1)) {
        Ok(code) => code,
        Err(error) => {
            let hist_error = error.as_hist_error();
            eprintln!("{}", hist_error.diagnostic_line());
            eprintln!("{}", hist_error.fatal_exit_line());
            hist_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("histcmp".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();

    match Cli::try_parse_from(&full_args) {
        Ok(cli) => dispatch_parsed(cli),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "histcmp",
    version,
    about = "Match model history files and compare them bit-for-bit"
)]
struct Cli {
    /// Case configuration JSON
    #[arg(long, global = true, default_value = "case.json")]
    case_config: PathBuf,

    /// Write the JSON-serialized result to this path
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Save the latest history files of the run directory under a suffix
    Move(commands::MoveArgs),
    /// Compare two suffixed sets of history files in the run directory
    CompareTest(commands::CompareTestArgs),
    /// Compare the latest history files against a stored baseline
    CompareBaseline(commands::BaselineArgs),
    /// Copy the latest history files into a baseline directory
    GenerateBaseline(commands::BaselineArgs),
}

fn dispatch_parsed(cli: Cli) -> Result<i32, CliError> {
    let context = helpers::load_context(&cli.case_config, cli.report)?;
    match cli.command {
        CliCommand::Move(args) => commands::run_move_command(&context, args),
        CliCommand::CompareTest(args) => commands::run_compare_test_command(&context, args),
        CliCommand::CompareBaseline(args) => {
            commands::run_compare_baseline_command(&context, args)
        }
        CliCommand::GenerateBaseline(args) => {
            commands::run_generate_baseline_command(&context, args)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Hist(#[from] HistError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_hist_error(&self) -> HistError {
        match self {
            Self::Usage(message) => HistError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Hist(error) => error.clone(),
            Self::Internal(error) => HistError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
