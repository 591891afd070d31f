//! Masked password input on the controlling terminal.

use std::io::Write;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};

use crate::error::{AppError, Result};

const MAX_ATTEMPTS: usize = 3;

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn notice(message: &str) -> Result<()> {
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

/// Reads one password, echoing `*` per character.
pub fn password(prompt: &str) -> Result<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err(AppError::Terminal("interrupted".to_string()));
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

/// Reads a new password and its confirmation, retrying a few times.
pub fn new_password() -> Result<String> {
    for _ in 0..MAX_ATTEMPTS {
        let first = password("New password: ")?;
        if first.is_empty() {
            notice("Password must not be empty.")?;
            continue;
        }

        let second = password("Confirm password: ")?;
        if first == second {
            return Ok(first);
        }
        notice("Passwords do not match. Try again.")?;
    }

    Err(AppError::Terminal("too many attempts".to_string()))
}
