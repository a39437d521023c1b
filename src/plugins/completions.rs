use crate::plugins::shell::Shell;
use std::io::Write;

/// Writes the completion script for `shell` generated from `cmd`.
pub fn generate(shell: Shell, cmd: &mut clap::Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(clap_complete::Shell::from(shell), cmd, name, out);
}
