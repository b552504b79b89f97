//! Share chain for schedule links: native share, then clipboard, then a
//! manual fallback that simply shows the link.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{debug, warn};

use crate::error::ShellError;

/// How a share attempt ended. Every variant gets visible feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    /// Written to the terminal clipboard, which never acknowledges. The host
    /// reports success and shows the link as well.
    Unconfirmed(String),
    /// Nothing worked; the host shows this link for the user to copy.
    Manual(String),
}

pub trait ShareMechanism {
    fn name(&self) -> &'static str;
    fn share(&mut self, url: &str) -> Result<ShareOutcome, ShellError>;
}

/// Hands the link to an external program, e.g. `["xdg-open"]` or a
/// messaging CLI. The url is appended as the last argument.
#[derive(Debug, Clone)]
pub struct CommandShare {
    program: String,
    args: Vec<String>,
}

impl CommandShare {
    /// `None` for an empty command line.
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl ShareMechanism for CommandShare {
    fn name(&self) -> &'static str {
        "native share"
    }

    fn share(&mut self, url: &str) -> Result<ShareOutcome, ShellError> {
        let failure = |reason: String| ShellError::ClipboardFailure {
            mechanism: "native share",
            reason,
        };
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|err| failure(format!("{}: {err}", self.program)))?;
        if status.success() {
            Ok(ShareOutcome::Shared)
        } else {
            Err(failure(format!("{} exited with {status}", self.program)))
        }
    }
}

/// Terminal clipboard write through the OSC 52 escape sequence.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

pub(crate) fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

impl<W: Write> ShareMechanism for Osc52Clipboard<W> {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    fn share(&mut self, url: &str) -> Result<ShareOutcome, ShellError> {
        self.out
            .write_all(osc52_sequence(url).as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|err| ShellError::ClipboardFailure {
                mechanism: "clipboard",
                reason: err.to_string(),
            })?;
        Ok(ShareOutcome::Unconfirmed(url.to_string()))
    }
}

/// Ordered list of mechanisms; the first success wins.
#[derive(Default)]
pub struct ShareChain {
    mechanisms: Vec<Box<dyn ShareMechanism>>,
}

impl ShareChain {
    pub fn new(mechanisms: Vec<Box<dyn ShareMechanism>>) -> Self {
        Self { mechanisms }
    }

    /// The configured native command (if any) followed by the terminal
    /// clipboard on stdout.
    pub fn from_config(share_command: Option<&[String]>) -> Self {
        let mut mechanisms: Vec<Box<dyn ShareMechanism>> = Vec::new();
        if let Some(command) = share_command.and_then(CommandShare::from_command_line) {
            mechanisms.push(Box::new(command));
        }
        mechanisms.push(Box::new(Osc52Clipboard::new(io::stdout())));
        Self::new(mechanisms)
    }

    pub fn share(&mut self, url: &str) -> ShareOutcome {
        for mechanism in &mut self.mechanisms {
            match mechanism.share(url) {
                Ok(outcome) => {
                    debug!(mechanism = mechanism.name(), "link shared");
                    return outcome;
                }
                Err(err) => warn!(error = %err, "share mechanism failed, trying next"),
            }
        }
        ShareOutcome::Manual(url.to_string())
    }
}
