//! Runs the external helper scripts: site upload, drop-directory clearing,
//! and the image collaborators.

use anyhow::{anyhow, Context as _, Result};
use log::debug;
use std::process;

pub struct Command {
    name: String,
    arguments: Vec<String>,
}

impl Command {
    pub fn new(name: &str, arguments: &[&str]) -> Command {
        Command {
            name: name.to_owned(),
            arguments: arguments.iter().map(|a| (*a).to_owned()).collect(),
        }
    }

    /// Runs the command and waits for it, failing on a non-zero exit.
    pub fn run(&self) -> Result<()> {
        debug!("running `{} {}`", self.name, self.arguments.join(" "));
        let status = process::Command::new(&self.name)
            .args(&self.arguments)
            .status()
            .with_context(|| format!("Running `{}`", self.name))?;
        match status.success() {
            true => Ok(()),
            false => Err(anyhow!("`{}` exited with {}", self.name, status)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_command() {
        let command = Command::new("testCommand", &["arg1", "arg2"]);
        assert_eq!(command.name, "testCommand");
        assert_eq!(command.arguments, vec!["arg1", "arg2"]);
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let command = Command::new("no-such-program-anywhere", &[]);
        assert!(command.run().is_err());
    }
}
