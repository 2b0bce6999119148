//! Shell completions command

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::Shell;
use tracing::info;

use crate::cli::output::{self, Printer};
use crate::cli::Cli;

/// Print a completion script for the given shell
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(shell = %self.shell, output = ?self.output, "executing completions command");

        match &self.output {
            Some(path) => {
                let mut file = std::fs::File::create(path)?;
                self.write_script(&mut file)?;
                Printer::new(cli).success(format!(
                    "{} completions written to {}",
                    self.shell,
                    output::path(path)
                ));
            }
            None => self.write_script(&mut std::io::stdout().lock())?,
        }

        Ok(())
    }

    fn write_script(&self, out: &mut dyn Write) -> std::io::Result<()> {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(self.shell, &mut cmd, name, out);
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use clap::Parser;

    fn parse(shell: &str) -> CompletionsCommand {
        match Cli::try_parse_from(["scopelog", "completions", shell]).unwrap().command {
            Commands::Completions(cmd) => cmd,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_shell_names() {
        assert_eq!(parse("zsh").shell, Shell::Zsh);
        assert_eq!(parse("powershell").shell, Shell::PowerShell);
        assert!(Cli::try_parse_from(["scopelog", "completions", "tcsh"]).is_err());
    }

    #[test]
    fn test_bash_script_lists_subcommands() {
        let mut buffer = Vec::new();
        parse("bash").write_script(&mut buffer).unwrap();

        let script = String::from_utf8(buffer).unwrap();
        assert!(script.contains("_scopelog()"));
        for subcommand in ["changelog", "validate", "init", "completions"] {
            assert!(script.contains(subcommand), "{subcommand}");
        }
    }

    #[test]
    fn test_script_written_to_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("scopelog.fish");
        let cli = Cli::try_parse_from([
            "scopelog",
            "-q",
            "completions",
            "fish",
            "-o",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let Commands::Completions(cmd) = &cli.command else {
            panic!("unexpected command");
        };

        cmd.execute(&cli).unwrap();
        let script = std::fs::read_to_string(&path).unwrap();
        assert!(script.contains("complete -c scopelog"));
    }
}
