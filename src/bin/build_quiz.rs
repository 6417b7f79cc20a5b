#![forbid(unsafe_code)]

//! Turns the fetch cache into the quiz table and checks the result for
//! attribute collisions. With no subcommand both steps run, in that order.

use anyhow::Result;
use chorus_quiz_tools::build::run_build;
use chorus_quiz_tools::config::{Settings, SettingsOverrides, resolve_settings};
use chorus_quiz_tools::consistency::run_check;
use chorus_quiz_tools::init_logging;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "build_quiz", version)]
#[command(about = "Rank, clean and classify cached videos into the quiz table")]
struct BuildArgs {
    #[command(subcommand)]
    command: Option<BuildCommand>,

    /// Env file holding QUIZ_DATA_DIR and the other settings
    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    /// Directory holding the cache, mapping tables and output (defaults to QUIZ_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum BuildCommand {
    /// Build the table, then check it (the default)
    All,
    /// Only build and write the table
    Build,
    /// Only check an existing table
    Check,
}

impl BuildArgs {
    fn command(&self) -> BuildCommand {
        self.command.unwrap_or(BuildCommand::All)
    }

    fn settings(&self) -> Result<Settings> {
        resolve_settings(SettingsOverrides {
            channel_handle: None,
            data_dir: self.data_dir.clone(),
            env_path: Some(self.env_file.clone()),
        })
    }
}

fn main() -> Result<()> {
    init_logging("build_quiz");

    let args = BuildArgs::parse();
    let settings = args.settings()?;
    let command = args.command();

    if matches!(command, BuildCommand::All | BuildCommand::Build) {
        run_build(&settings)?;
    }
    if matches!(command, BuildCommand::All | BuildCommand::Check) {
        run_check(&settings.table_path())?;
    }
    Ok(())
}
