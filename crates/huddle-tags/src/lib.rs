// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tag pipeline: filename tag extraction and debounced autocomplete.
//!
//! [`extract_tags`] is the pure half, called from the dispatch path for
//! every ARCHIVE upload. [`Autocompleter`] is the interactive half, queried
//! per keystroke with debounce-and-cancel semantics.

pub mod autocomplete;
pub mod extract;

pub use autocomplete::{Autocompleter, Suggestion};
pub use extract::{extract_tags, merge_tags};
