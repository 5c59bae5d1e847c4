use chrono::NaiveDate;
use std::error;
use std::fmt;
use std::result;
use std::str::FromStr;

use crate::datetime::DATE_FORMAT;

/// Commands of the `:` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    Noop,
    Today,
    PrevMonth,
    NextMonth,
    Day(NaiveDate),
    Exit,
}

pub type CmdResult = result::Result<Cmd, CmdError>;

#[derive(Debug, Clone, Default)]
pub struct CmdError {
    message: Option<String>,
}

impl CmdError {
    pub fn new(message: String) -> Self {
        CmdError {
            message: Some(message),
        }
    }

    pub fn with_msg(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }
}

impl fmt::Display for CmdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.message.as_deref().unwrap_or("Error parsing command")
        )
    }
}

impl error::Error for CmdError {}

impl FromStr for Cmd {
    type Err = CmdError;

    fn from_str(line: &str) -> CmdResult {
        let mut args = line.split_whitespace();

        let cmd = match args.next() {
            None => return Ok(Cmd::Noop),
            Some(cmd) => cmd,
        };

        let parsed = match cmd {
            "today" => Cmd::Today,
            "prev" => Cmd::PrevMonth,
            "next" => Cmd::NextMonth,
            "day" => {
                let arg = args
                    .next()
                    .ok_or_else(|| CmdError::new("missing argument <yyyy-mm-dd>".to_owned()))?;
                let date = NaiveDate::parse_from_str(arg, DATE_FORMAT)
                    .map_err(|e| CmdError::new(format!("'{}': {}", arg, e)))?;
                Cmd::Day(date)
            }
            "quit" | "q" | "exit" => Cmd::Exit,
            other => return Err(CmdError::new(format!("unknown command '{}'", other))),
        };

        if let Some(extra) = args.next() {
            return Err(CmdError::default().with_msg(format!("unexpected argument '{}'", extra)));
        }

        Ok(parsed)
    }
}
