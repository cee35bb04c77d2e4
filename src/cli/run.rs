use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{check::check, fix::fix, init::init, map::map, resolve::resolve},
    exit_status::ExitStatus,
};

/// Dispatch to the command handler. Each handler prints its own output.
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Check(cmd)) => check(cmd),
        Some(Command::Fix(cmd)) => fix(cmd),
        Some(Command::Map(cmd)) => map(cmd),
        Some(Command::Resolve(cmd)) => resolve(cmd),
        Some(Command::Init) => init(),
        Some(Command::Serve) => {
            // Serve command is handled in main.rs before calling run()
            bail!("Serve command should be handled before run()")
        }
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
