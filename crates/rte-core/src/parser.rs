//! Small text parsers: keyboard combos and CSS pixel lengths.
//!
//! Built on `winnow` 0.7. Key combos use the `Mod+Shift+z` notation, where
//! `Mod` is the platform command key (⌘ on macOS, Ctrl elsewhere).

use crate::model::KeyCombo;
use thiserror::Error;
use winnow::ascii::{Caseless, float, space0};
use winnow::combinator::{alt, opt, repeat, terminated};
use winnow::prelude::*;
use winnow::token::take_while;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid key combo `{input}`: {reason}")]
    KeyCombo { input: String, reason: String },
    #[error("invalid length `{input}`: {reason}")]
    Length { input: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    Primary,
    Ctrl,
    Meta,
    Shift,
    Alt,
}

/// Parse a combo such as `Mod+Shift+z` or `alt+shift+l`.
///
/// Modifier names are case-insensitive. The key is lowercased when it is a
/// single ASCII letter so that `Mod+Z` and `Mod+z` describe the same combo.
pub fn parse_key_combo(input: &str) -> Result<KeyCombo, ParseError> {
    key_combo.parse(input).map_err(|e| ParseError::KeyCombo {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

fn key_combo(input: &mut &str) -> ModalResult<KeyCombo> {
    let modifiers: Vec<Modifier> = repeat(0.., terminated(modifier, '+')).parse_next(input)?;
    let key: &str = take_while(1.., |_c: char| true).parse_next(input)?;

    let mut combo = KeyCombo {
        key: normalize_key(key),
        ..KeyCombo::default()
    };
    for m in modifiers {
        match m {
            Modifier::Primary => combo.primary = true,
            Modifier::Ctrl => combo.ctrl = true,
            Modifier::Meta => combo.meta = true,
            Modifier::Shift => combo.shift = true,
            Modifier::Alt => combo.alt = true,
        }
    }
    Ok(combo)
}

fn modifier(input: &mut &str) -> ModalResult<Modifier> {
    alt((
        Caseless("mod").value(Modifier::Primary),
        Caseless("command").value(Modifier::Meta),
        Caseless("cmd").value(Modifier::Meta),
        Caseless("meta").value(Modifier::Meta),
        Caseless("control").value(Modifier::Ctrl),
        Caseless("ctrl").value(Modifier::Ctrl),
        Caseless("shift").value(Modifier::Shift),
        Caseless("option").value(Modifier::Alt),
        Caseless("alt").value(Modifier::Alt),
    ))
    .parse_next(input)
}

fn normalize_key(key: &str) -> String {
    if key.len() == 1 && key.is_ascii() {
        key.to_ascii_lowercase()
    } else {
        key.to_string()
    }
}

/// Parse a pixel length attribute: `400`, `400px`, `412.5 px`.
///
/// Relative units are rejected; callers fall back to their default width.
pub fn parse_length(input: &str) -> Result<f64, ParseError> {
    let value = length
        .parse(input.trim())
        .map_err(|e| ParseError::Length {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ParseError::Length {
            input: input.to_string(),
            reason: "expected a non-negative number".to_string(),
        });
    }
    Ok(value)
}

fn length(input: &mut &str) -> ModalResult<f64> {
    let value: f64 = float.parse_next(input)?;
    let _ = space0.parse_next(input)?;
    let _ = opt(Caseless("px")).parse_next(input)?;
    Ok(value)
}
