// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in components for chains over `String` values.
//!
//! | kind       | name          | options                          |
//! |------------|---------------|----------------------------------|
//! | executable | `append`      | `text`                           |
//! | executable | `prepend`     | `text`                           |
//! | executable | `uppercase`   |                                  |
//! | executable | `lowercase`   |                                  |
//! | executable | `reverse`     |                                  |
//! | matcher    | `contains`    | `needle`                         |
//! | matcher    | `starts_with` | `prefix`                         |
//! | matcher    | `non_empty`   |                                  |
//! | merger     | `concatenate` | `separator` (defaults to empty)  |
//! | merger     | `first`       |                                  |
//! | merger     | `longest`     |                                  |

pub mod executables;
pub mod matchers;
pub mod mergers;

pub use executables::*;
pub use matchers::*;
pub use mergers::*;

use crate::config::{parse_options, ComponentRegistry};
use crate::traits::{Executable, Matcher, Merger};

impl ComponentRegistry<String> {
    /// A registry holding every built-in text component.
    pub fn with_text_builtins() -> Self {
        let mut registry = Self::new();
        register_text_builtins(&mut registry);
        registry
    }
}

/// Add the built-in text components to `registry`, replacing same-named entries.
pub fn register_text_builtins(registry: &mut ComponentRegistry<String>) {
    registry
        .register_executable("append", |options| {
            Ok(Executable::strategy(AppendText::new(parse_options(options)?)))
        })
        .register_executable("prepend", |options| {
            Ok(Executable::strategy(PrependText::new(parse_options(options)?)))
        })
        .register_executable("uppercase", |_| Ok(Executable::strategy(ChangeTextCase::upper())))
        .register_executable("lowercase", |_| Ok(Executable::strategy(ChangeTextCase::lower())))
        .register_executable("reverse", |_| Ok(Executable::strategy(ReverseText)))
        .register_matcher("contains", |options| {
            Ok(Matcher::strategy(ContainsText::new(parse_options(options)?)))
        })
        .register_matcher("starts_with", |options| {
            Ok(Matcher::strategy(StartsWithText::new(parse_options(options)?)))
        })
        .register_matcher("non_empty", |_| Ok(Matcher::strategy(NonEmptyText)))
        .register_merger("concatenate", |options| {
            Ok(Merger::strategy(Concatenate::new(parse_options(options)?)))
        })
        .register_merger("first", |_| Ok(Merger::strategy(FirstResult)))
        .register_merger("longest", |_| Ok(Merger::strategy(LongestResult)));
}
