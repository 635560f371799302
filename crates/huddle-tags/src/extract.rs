// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate tag derivation from uploaded file names.

use std::collections::HashSet;

use huddle_core::TagName;

/// Derives candidate tags from an uploaded file name.
///
/// The extension is stripped, the stem is split on underscores, hyphens,
/// and whitespace, empty tokens are discarded, and duplicates are removed
/// while preserving first-seen token order. No case folding is applied.
pub fn extract_tags(filename: &str) -> Vec<TagName> {
    let stem = match filename.rfind('.') {
        Some(idx) if idx > 0 => &filename[..idx],
        _ => filename,
    };

    let mut seen = HashSet::new();
    stem.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter(|token| seen.insert(token.to_string()))
        .map(|token| TagName(token.to_string()))
        .collect()
}

/// Merges user-confirmed tags with auto-extracted candidates.
///
/// Confirmed tags come first; duplicates are removed case-sensitively.
/// The result is what gets attached to the archive item at creation time.
pub fn merge_tags(confirmed: &[TagName], extracted: &[TagName]) -> Vec<TagName> {
    let mut seen = HashSet::new();
    confirmed
        .iter()
        .chain(extracted.iter())
        .filter(|tag| seen.insert(tag.0.clone()))
        .cloned()
        .collect()
}
