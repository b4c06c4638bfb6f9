//! Layer naming: sequential `{Kind}-{n}` names and rename normalization.
//!
//! Counters are per kind and only ever grow, so a deleted layer's number is not reused
//! by the next creation. Every candidate is checked against the caller's `is_taken`
//! predicate, which keeps names unique across the whole session.

#[cfg(test)]
#[path = "naming_test.rs"]
mod naming_test;

use std::collections::HashMap;

use crate::layer::LayerKind;

/// Per-kind name counters.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    counters: HashMap<LayerKind, u32>,
}

impl NameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `{Kind}-{n}` name not rejected by `is_taken`.
    pub fn next_sequential<F>(&mut self, kind: LayerKind, is_taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let counter = self.counters.entry(kind).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{}-{}", kind.label(), counter);
            if !is_taken(&candidate) {
                return candidate;
            }
        }
    }

    /// Resolve a unique name for `kind` carrying the user-chosen `suffix`.
    ///
    /// Tries `{Kind}-{suffix}` first, then `{Kind}-{n} {suffix}`, then
    /// `{Kind}-{n} {suffix} ({k})` for k = 2, 3, .... An empty suffix yields a plain
    /// sequential name.
    pub fn resolve<F>(&mut self, kind: LayerKind, suffix: &str, is_taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let suffix = suffix.trim();
        if !suffix.is_empty() {
            let direct = format!("{}-{suffix}", kind.label());
            if !is_taken(&direct) {
                return direct;
            }
        }

        let base = self.next_sequential(kind, &is_taken);
        if suffix.is_empty() {
            return base;
        }

        let composite = format!("{base} {suffix}");
        if !is_taken(&composite) {
            return composite;
        }
        let mut attempt = 2_u32;
        loop {
            let candidate = format!("{composite} ({attempt})");
            if !is_taken(&candidate) {
                return candidate;
            }
            attempt += 1;
        }
    }

    /// Current counter value for `kind` (0 before the first name is issued).
    #[must_use]
    pub fn counter(&self, kind: LayerKind) -> u32 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }

    /// Forget all counters.
    pub fn reset(&mut self) {
        self.counters.clear();
    }
}

/// Extract the user-chosen part of a proposed layer name.
///
/// Trims whitespace and strips a redundant `{Kind}-` or `{Kind}_` prefix (ASCII
/// case-insensitive). Returns `None` when nothing remains.
#[must_use]
pub fn rename_remainder(kind: LayerKind, proposed: &str) -> Option<String> {
    let trimmed = proposed.trim();
    if trimmed.is_empty() {
        return None;
    }
    let label = kind.label();
    let remainder = [format!("{label}-"), format!("{label}_")]
        .iter()
        .find_map(|prefix| {
            trimmed
                .get(..prefix.len())
                .filter(|head| head.eq_ignore_ascii_case(prefix))
                .map(|_| trimmed[prefix.len()..].trim())
        })
        .unwrap_or(trimmed);
    if remainder.is_empty() {
        None
    } else {
        Some(remainder.to_owned())
    }
}
