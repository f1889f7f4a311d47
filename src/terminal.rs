//! Terminal output
//!
//! [`Terminal`] is everything the lifecycle controller can do to the screen.
//! [`ConsoleTerminal`] is the real one: an `indicatif` spinner when stdout is
//! a TTY, plain lines otherwise (CI logs, piped output).

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

use crate::assets::{render_file_sizes, AssetSize};
use crate::hosting::{render_hosting_instructions, HostingInfo};
use crate::urls::{render_urls, Urls};

/// How a spinner ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerState {
    Succeed,
    Fail,
    Warn,
}

impl SpinnerState {
    fn symbol(self) -> String {
        match self {
            SpinnerState::Succeed => style("✔").green().to_string(),
            SpinnerState::Fail => style("✖").red().to_string(),
            SpinnerState::Warn => style("⚠").yellow().to_string(),
        }
    }
}

pub trait Terminal {
    fn start_spinner(&mut self, text: &str) -> io::Result<()>;

    fn stop_spinner(&mut self) -> io::Result<()>;

    /// Replace the spinner (if any) with a final status line.
    fn finish_spinner(&mut self, state: SpinnerState, text: &str) -> io::Result<()>;

    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn clear(&mut self) -> io::Result<()>;

    fn print_urls(&mut self, app_name: &str, urls: &Urls) -> io::Result<()> {
        for line in render_urls(app_name, urls) {
            self.write_line(&line)?;
        }
        Ok(())
    }

    fn print_file_sizes(&mut self, assets: &[AssetSize]) -> io::Result<()> {
        for line in render_file_sizes(assets) {
            self.write_line(&line)?;
        }
        Ok(())
    }

    fn print_hosting_instructions(&mut self, info: &HostingInfo) -> io::Result<()> {
        for line in render_hosting_instructions(info) {
            self.write_line(&line)?;
        }
        Ok(())
    }
}

pub struct ConsoleTerminal {
    term: Term,
    is_tty: bool,
    spinner: Option<ProgressBar>,
}

impl ConsoleTerminal {
    pub fn new(is_tty: bool) -> Self {
        Self {
            term: Term::stdout(),
            is_tty,
            spinner: None,
        }
    }

    fn create_spinner(text: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(text.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

impl Terminal for ConsoleTerminal {
    fn start_spinner(&mut self, text: &str) -> io::Result<()> {
        self.stop_spinner()?;
        if self.is_tty {
            self.spinner = Some(Self::create_spinner(text));
            Ok(())
        } else {
            self.term.write_line(text)?;
            self.term.write_line("")
        }
    }

    fn stop_spinner(&mut self) -> io::Result<()> {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
        Ok(())
    }

    fn finish_spinner(&mut self, state: SpinnerState, text: &str) -> io::Result<()> {
        self.stop_spinner()?;
        if self.is_tty {
            self.term
                .write_line(&format!("{} {}", state.symbol(), text))
        } else {
            self.term.write_line(text)
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match &self.spinner {
            // Keep the spinner on the last line
            Some(pb) => {
                pb.println(line);
                Ok(())
            }
            None => self.term.write_line(line),
        }
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.is_tty {
            self.term.clear_screen()
        } else {
            Ok(())
        }
    }
}

impl Drop for ConsoleTerminal {
    fn drop(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}
