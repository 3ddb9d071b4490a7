//! Masked password prompt.
//!
//! Key events come from a [`KeySource`]: raw terminal events when stdin is a
//! TTY, or the characters of one stdin line otherwise. What is drawn for each
//! captured character is decided by an explicit [`Mask`].

use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::domain::{ProbeError, SecretSource};

pub const PASSWORD_PROMPT: &str = "Enter UniFi admin password: ";

// What to draw on screen for each captured character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mask {
    Glyph(char),
    Hidden,
}

impl Default for Mask {
    fn default() -> Self {
        Mask::Glyph('*')
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Interrupt,
    Eof,
}

pub trait KeySource {
    fn next_key(&mut self) -> io::Result<Key>;
}

/// Write `prompt`, then capture characters until Enter.
///
/// End of input ends the entry like Enter, so it yields an empty string when
/// nothing was typed. Interrupt (Ctrl-C) yields an
/// [`io::ErrorKind::Interrupted`] error.
pub fn read_masked<K, W>(prompt: &str, mask: Mask, keys: &mut K, out: &mut W) -> io::Result<String>
where
    K: KeySource,
    W: Write,
{
    out.write_all(prompt.as_bytes())?;
    out.flush()?;

    let mut captured = String::new();
    loop {
        match keys.next_key()? {
            Key::Char(c) => {
                captured.push(c);
                if let Mask::Glyph(glyph) = mask {
                    write!(out, "{glyph}")?;
                    out.flush()?;
                }
            }
            Key::Backspace => {
                if captured.pop().is_some() && matches!(mask, Mask::Glyph(_)) {
                    out.write_all(b"\x08 \x08")?;
                    out.flush()?;
                }
            }
            Key::Enter | Key::Eof => break,
            Key::Interrupt => {
                out.write_all(b"\r\n")?;
                out.flush()?;
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "password entry interrupted",
                ));
            }
        }
    }

    out.write_all(b"\r\n")?;
    out.flush()?;
    Ok(captured)
}

// Restores cooked mode when dropped, on success and error paths alike.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::warn!(error = %err, "failed to restore terminal mode.");
        }
    }
}

// Key events from a terminal in raw mode.
pub struct TerminalKeys {
    _guard: RawModeGuard,
}

impl TerminalKeys {
    pub fn open() -> io::Result<Self> {
        Ok(Self {
            _guard: RawModeGuard::enable()?,
        })
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<Key> {
        loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }
            if let Some(key) = map_key(code, modifiers) {
                return Ok(key);
            }
        }
    }
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    // AltGr arrives as Ctrl+Alt on some platforms and still types a character.
    let ctrl = modifiers.contains(KeyModifiers::CONTROL) && !modifiers.contains(KeyModifiers::ALT);
    match code {
        KeyCode::Char('c') if ctrl => Some(Key::Interrupt),
        KeyCode::Char('d') if ctrl => Some(Key::Eof),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Enter => Some(Key::Enter),
        _ => None,
    }
}

// Key events replayed from one line of a reader (piped stdin).
pub struct LineKeys<R> {
    reader: R,
    pending: Option<VecDeque<Key>>,
}

impl<R: BufRead> LineKeys<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
        }
    }

    fn fill(&mut self) -> io::Result<VecDeque<Key>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(VecDeque::from([Key::Eof]));
        }

        // An unterminated final line still counts as a complete entry.
        let text = line.trim_end_matches(['\n', '\r']);
        let mut keys: VecDeque<Key> = text.chars().map(Key::Char).collect();
        keys.push_back(Key::Enter);
        Ok(keys)
    }
}

impl<R: BufRead> KeySource for LineKeys<R> {
    fn next_key(&mut self) -> io::Result<Key> {
        if self.pending.is_none() {
            self.pending = Some(self.fill()?);
        }
        Ok(self
            .pending
            .as_mut()
            .and_then(VecDeque::pop_front)
            .unwrap_or(Key::Eof))
    }
}

// Secret source backed by the process terminal.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalPrompt {
    pub mask: Mask,
}

impl TerminalPrompt {
    fn read_blocking(mask: Mask) -> io::Result<String> {
        let mut out = io::stderr().lock();
        if io::stdin().is_terminal() {
            let mut keys = TerminalKeys::open()?;
            read_masked(PASSWORD_PROMPT, mask, &mut keys, &mut out)
        } else {
            let mut keys = LineKeys::new(io::stdin().lock());
            read_masked(PASSWORD_PROMPT, mask, &mut keys, &mut out)
        }
    }
}

#[async_trait]
impl SecretSource for TerminalPrompt {
    async fn read_secret(&self) -> Result<String, ProbeError> {
        let mask = self.mask;
        tokio::task::spawn_blocking(move || Self::read_blocking(mask))
            .await
            .map_err(|err| ProbeError::Prompt(io::Error::other(err)))?
            .map_err(ProbeError::Prompt)
    }
}

// Secret supplied up front through a flag or the environment.
pub struct ProvidedSecret(String);

impl ProvidedSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

#[async_trait]
impl SecretSource for ProvidedSecret {
    async fn read_secret(&self) -> Result<String, ProbeError> {
        Ok(self.0.clone())
    }
}
