use std::{
    fmt::Display,
    io::{BufRead, Write},
    str::FromStr,
};

use anyhow::Context;
use colored::Colorize;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};

/// Resolves operation parameters: flag value when provided, otherwise asks
/// the user.
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
    interactive: bool,
    terminal: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub(crate) fn new(input: R, output: W, interactive: bool) -> Self {
        Self { input, output, interactive, terminal: false }
    }

    /// Whether the input is a terminal, secrets are then read without echo.
    pub(crate) fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    pub(crate) fn into_input(self) -> R { self.input }

    /// Required value, asked again until it parses.
    pub(crate) fn value<T>(&mut self, flag: Option<T>, message: &str) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        if let Some(value) = flag {
            return Ok(value);
        }
        loop {
            let answer = self.ask(message)?;
            match answer.parse() {
                Ok(value) => return Ok(value),
                Err(err) => writeln!(self.output, "{}", format!("  invalid value: {}", err).red())?,
            }
        }
    }

    /// Optional value, an empty answer means none. Not asked in
    /// non-interactive mode.
    pub(crate) fn optional<T>(&mut self, flag: Option<T>, message: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        if flag.is_some() || !self.interactive {
            return Ok(flag);
        }
        loop {
            let answer = self.ask(message)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(err) => writeln!(self.output, "{}", format!("  invalid value: {}", err).red())?,
            }
        }
    }

    /// Required value typed without echo on a terminal.
    pub(crate) fn secret(&mut self, flag: Option<String>, message: &str) -> anyhow::Result<String> {
        if let Some(value) = flag {
            return Ok(value);
        }
        if !self.terminal {
            return self.ask(message);
        }
        write!(self.output, "{} {} ", "?".cyan().bold(), message.bold())?;
        self.output.flush()?;
        terminal::enable_raw_mode().context("reading secret")?;
        let secret = read_hidden_line();
        terminal::disable_raw_mode().context("reading secret")?;
        writeln!(self.output)?;
        let secret = secret?;
        if secret.is_empty() {
            anyhow::bail!("no answer for: {}", message);
        }
        Ok(secret)
    }

    fn ask(&mut self, message: &str) -> anyhow::Result<String> {
        write!(self.output, "{} {} ", "?".cyan().bold(), message.bold())?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("reading answer")?;
        if read == 0 {
            anyhow::bail!("no answer for: {}", message);
        }
        Ok(line.trim().to_string())
    }
}

fn read_hidden_line() -> anyhow::Result<String> {
    let mut line = String::new();
    loop {
        let Event::Key(KeyEvent { code, modifiers, kind, .. }) = event::read()? else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Enter => return Ok(line.trim().to_string()),
            KeyCode::Backspace => {
                line.pop();
            },
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                anyhow::bail!("interrupted")
            },
            KeyCode::Char(c) => line.push(c),
            _ => {},
        }
    }
}
