//! Response keys → concrete status code sets.
//!
//! `"200"` is a single code, `"4XX"` is every registered code of that class,
//! and `"default"` is every registered code not claimed by another key.
use std::collections::BTreeSet;

use once_cell::sync::Lazy;

/// The status codes a `"4XX"` class or `"default"` can stand for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRegistry {
    codes: BTreeSet<u16>,
}

/// Standard HTTP status codes (IANA registry, plus 418).
pub static STANDARD: Lazy<StatusRegistry> = Lazy::new(|| {
    StatusRegistry::from_codes([
        100, 101, 102, 103, //
        200, 201, 202, 203, 204, 205, 206, 207, 208, 226, //
        300, 301, 302, 303, 304, 305, 307, 308, //
        400, 401, 402, 403, 404, 405, 406, 407, 408, 409, 410, 411, 412, 413, 414, 415, 416, 417, 418,
        421, 422, 423, 424, 425, 426, 428, 429, 431, 451, //
        500, 501, 502, 503, 504, 505, 506, 507, 508, 510, 511,
    ])
});

impl StatusRegistry {
    pub fn from_codes(codes: impl IntoIterator<Item = u16>) -> Self {
        Self { codes: codes.into_iter().collect() }
    }

    pub fn standard() -> &'static StatusRegistry {
        &STANDARD
    }

    pub fn contains(&self, code: u16) -> bool {
        self.codes.contains(&code)
    }

    fn in_range(&self, low: u16, high: u16) -> impl Iterator<Item = u16> + '_ {
        self.codes.range(low..=high).copied()
    }
}

/// A parsed response key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKey {
    Code(u16),
    /// `"4XX"` → `Class(4)`.
    Class(u8),
    Default,
}

/// Returned for keys that are neither `NNN`, `NXX` (N in 1..=5) nor `default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatusKey(pub String);

impl StatusKey {
    pub fn parse(key: &str) -> Result<Self, InvalidStatusKey> {
        let invalid = || InvalidStatusKey(key.to_string());
        if key == "default" {
            return Ok(StatusKey::Default);
        }
        let bytes = key.as_bytes();
        if bytes.len() != 3 || !bytes[0].is_ascii_digit() {
            return Err(invalid());
        }
        let class = bytes[0] - b'0';
        if !(1..=5).contains(&class) {
            return Err(invalid());
        }
        if &bytes[1..] == b"XX" {
            return Ok(StatusKey::Class(class));
        }
        if bytes[1..].iter().all(u8::is_ascii_digit) {
            return key.parse().map(StatusKey::Code).map_err(|_| invalid());
        }
        Err(invalid())
    }
}

/// Sorted, non-empty unless `default` had nothing left to claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCodeSet(Vec<u16>);

impl StatusCodeSet {
    pub fn codes(&self) -> &[u16] {
        &self.0
    }

    pub fn single(&self) -> Option<u16> {
        match self.0.as_slice() {
            [code] => Some(*code),
            _ => None,
        }
    }

    /// `Some(true)` when every code is 2xx, `Some(false)` when none is,
    /// `None` when the set mixes both.
    pub fn ok(&self) -> Option<bool> {
        let oks = self.0.iter().filter(|code| is_ok(**code)).count();
        if oks == self.0.len() {
            Some(true)
        } else if oks == 0 {
            Some(false)
        } else {
            None
        }
    }
}

pub fn is_ok(code: u16) -> bool {
    (200..300).contains(&code)
}

/// Expand every key of a responses map. Output keeps the input order; the
/// `default` entry gets the complement of everything else.
pub fn expand<'a, T>(
    entries: impl IntoIterator<Item = (&'a str, T)>,
    registry: &StatusRegistry,
) -> Result<Vec<(StatusCodeSet, T)>, InvalidStatusKey> {
    let parsed = entries
        .into_iter()
        .map(|(key, value)| StatusKey::parse(key).map(|key| (key, value)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut claimed = BTreeSet::new();
    for (key, _) in &parsed {
        match key {
            StatusKey::Code(code) => {
                claimed.insert(*code);
            }
            StatusKey::Class(class) => claimed.extend(class_codes(*class, registry)),
            StatusKey::Default => {}
        }
    }

    Ok(parsed
        .into_iter()
        .map(|(key, value)| {
            let codes = match key {
                StatusKey::Code(code) => vec![code],
                StatusKey::Class(class) => class_codes(class, registry),
                StatusKey::Default => registry.in_range(100, 599).filter(|code| !claimed.contains(code)).collect(),
            };
            (StatusCodeSet(codes), value)
        })
        .collect())
}

fn class_codes(class: u8, registry: &StatusRegistry) -> Vec<u16> {
    let low = u16::from(class) * 100;
    registry.in_range(low, low + 99).collect()
}
