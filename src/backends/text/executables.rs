// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::StageResult;
use crate::traits::ExecuteStrategy;

/// Configuration for the append and prepend executables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AffixConfig {
    pub text: String,
}

/// Adds fixed text to the end of the value.
pub struct AppendText {
    config: AffixConfig,
}

impl AppendText {
    pub fn new(config: AffixConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ExecuteStrategy<String> for AppendText {
    async fn execute(&self, input: String) -> StageResult<String> {
        Ok(input + &self.config.text)
    }
}

/// Adds fixed text to the start of the value.
pub struct PrependText {
    config: AffixConfig,
}

impl PrependText {
    pub fn new(config: AffixConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ExecuteStrategy<String> for PrependText {
    async fn execute(&self, input: String) -> StageResult<String> {
        Ok(format!("{}{}", self.config.text, input))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCase {
    Upper,
    Lower,
}

/// Converts the value to upper or lower case.
pub struct ChangeTextCase {
    case: TextCase,
}

impl ChangeTextCase {
    pub fn upper() -> Self {
        Self { case: TextCase::Upper }
    }

    pub fn lower() -> Self {
        Self { case: TextCase::Lower }
    }
}

#[async_trait]
impl ExecuteStrategy<String> for ChangeTextCase {
    async fn execute(&self, input: String) -> StageResult<String> {
        Ok(match self.case {
            TextCase::Upper => input.to_uppercase(),
            TextCase::Lower => input.to_lowercase(),
        })
    }
}

/// Reverses the value character by character.
pub struct ReverseText;

#[async_trait]
impl ExecuteStrategy<String> for ReverseText {
    async fn execute(&self, input: String) -> StageResult<String> {
        Ok(input.chars().rev().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn affix(text: &str) -> AffixConfig {
        AffixConfig {
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn affixes_wrap_the_value() {
        let appended = AppendText::new(affix("-tail")).execute("body".to_string()).await.unwrap();
        let prepended = PrependText::new(affix("head-")).execute("body".to_string()).await.unwrap();

        assert_eq!(appended, "body-tail");
        assert_eq!(prepended, "head-body");
    }

    #[tokio::test]
    async fn case_changes() {
        let cases = vec![
            (ChangeTextCase::upper(), "Hello World", "HELLO WORLD"),
            (ChangeTextCase::lower(), "Hello World", "hello world"),
            (ChangeTextCase::upper(), "straße", "STRASSE"),
            (ChangeTextCase::lower(), "", ""),
        ];

        for (executable, input, expected) in cases {
            assert_eq!(executable.execute(input.to_string()).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn reverse_handles_multibyte_characters() {
        assert_eq!(ReverseText.execute("abc".to_string()).await.unwrap(), "cba");
        assert_eq!(ReverseText.execute("héllo 🦀".to_string()).await.unwrap(), "🦀 olléh");
    }
}
