//! `dronemass completions` command - print a completion script to stdout
//!
//! The script covers every subcommand, flag and `--format` value. Install it
//! where your shell looks for completions:
//!
//! ```bash
//! dronemass completions bash > ~/.local/share/bash-completion/completions/dronemass
//! dronemass completions zsh > "${fpath[1]}/_dronemass"
//! dronemass completions fish > ~/.config/fish/completions/dronemass.fish
//! dronemass completions powershell >> $PROFILE
//! dronemass completions elvish > ~/.config/elvish/lib/dronemass.elv
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn io::Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_mention_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let mut buf = Vec::new();
            write_completions(shell, &mut buf);
            let script = String::from_utf8(buf).unwrap();
            assert!(script.contains("dronemass"), "{:?}", shell);
            assert!(script.contains("catalog"), "{:?}", shell);
            assert!(script.contains("history"), "{:?}", shell);
        }
    }
}
