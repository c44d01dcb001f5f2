//! Interactive captcha session.
//!
//! Input and output go through the [`Terminal`] trait so the retry loop
//! can be driven by a script in tests. [`StdinTerminal`] is the real
//! implementation: it races each stdin read against Ctrl+C and reports
//! an interrupt as [`Input::Interrupted`].

use std::io::{self, Write};

use inkblot_common::Result;
use inkblot_common::constants::messages;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::runtime::Runtime;

use super::Captcha;

/// One read from the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl+C during the read
    Interrupted,
}

/// Line-oriented user interaction
pub trait Terminal {
    /// Show `text` and read one line. End of input is an
    /// `UnexpectedEof` error.
    fn prompt(&mut self, text: &str) -> io::Result<Input>;

    /// Print one line of output
    fn show(&mut self, text: &str) -> io::Result<()>;
}

impl Captcha {
    /// Print the art and keep asking until solved or out of attempts.
    ///
    /// An interrupted read counts as an empty attempt. Returns whether
    /// the captcha ended up solved.
    pub fn execute<T: Terminal + ?Sized>(&mut self, terminal: &mut T, prompt: &str) -> Result<bool> {
        terminal.show(self.art())?;
        terminal.show("")?;

        while !self.state().is_terminal() {
            if let Some(remaining) = self.remaining_attempts() {
                terminal.show(&format!("{remaining} {}", messages::ATTEMPTS_LEFT))?;
            }

            let attempt = match terminal.prompt(prompt)? {
                Input::Line(line) => line,
                Input::Interrupted => {
                    terminal.show("")?;
                    String::new()
                }
            };

            if self.check(&attempt) {
                terminal.show(messages::SOLVED)?;
                return Ok(true);
            } else if self.failed() {
                terminal.show(self.solution().as_str())?;
                terminal.show(messages::FAILED)?;
                return Ok(false);
            }

            terminal.show(messages::WRONG)?;
        }

        Ok(self.solved())
    }
}

/// Terminal over process stdin/stdout with Ctrl+C mapped to an interrupt
pub struct StdinTerminal {
    runtime: Option<Runtime>,
    lines: Lines<BufReader<Stdin>>,
}

impl StdinTerminal {
    pub fn new() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let lines = {
            let _guard = runtime.enter();
            BufReader::new(tokio::io::stdin()).lines()
        };

        Ok(Self {
            runtime: Some(runtime),
            lines,
        })
    }
}

impl Terminal for StdinTerminal {
    fn prompt(&mut self, text: &str) -> io::Result<Input> {
        {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }

        let Self { runtime, lines } = self;
        let runtime = runtime
            .as_ref()
            .ok_or_else(|| io::Error::other("terminal runtime already shut down"))?;

        runtime.block_on(async {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => Ok(Input::Line(line)),
                    Ok(None) => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
                    Err(e) => Err(e),
                },
                signal = tokio::signal::ctrl_c() => signal.map(|()| Input::Interrupted),
            }
        })
    }

    fn show(&mut self, text: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{text}")
    }
}

impl Drop for StdinTerminal {
    fn drop(&mut self) {
        // An interrupted read may still be parked on the blocking pool
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
