// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural checks for chain definitions.
//!
//! Validation walks the whole stage tree once and collects every problem it
//! finds instead of stopping at the first one:
//!
//! 1. **Component references**: every executable, matcher and merger named by a
//!    stage must be registered.
//! 2. **Nesting depth**: sub-chains may not nest deeper than
//!    [`MAX_NESTING_DEPTH`]; the walk does not descend past the limit.
//!
//! Filters and parallel stages with no sub-stages are legal (they pass values
//! straight through) and are only logged as warnings.
//!
//! Stage locations are reported as paths such as `stages[2].stages[0]`.

use crate::config::consts::MAX_NESTING_DEPTH;
use crate::config::loader::{ChainConfig, ComponentRef, StageConfig};
use crate::config::registry::ComponentRegistry;
use crate::errors::ValidationError;
use crate::observability::messages::{config::*, StructuredLog};

/// Validate `config` against the components available in `registry`.
///
/// # Returns
///
/// * `Ok(())` - every referenced component exists and nesting is within bounds
/// * `Err(Vec<ValidationError>)` - every problem found, in tree order
pub fn validate_chain<T: Send + 'static>(
    config: &ChainConfig,
    registry: &ComponentRegistry<T>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_stages(&config.stages, "stages", 1, registry, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        ValidationFailed {
            name: &config.name,
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

fn validate_stages<T: Send + 'static>(
    stages: &[StageConfig],
    prefix: &str,
    depth: usize,
    registry: &ComponentRegistry<T>,
    errors: &mut Vec<ValidationError>,
) {
    for (index, stage) in stages.iter().enumerate() {
        let path = format!("{prefix}[{index}]");

        if depth > MAX_NESTING_DEPTH {
            errors.push(ValidationError::NestingTooDeep {
                path,
                max_depth: MAX_NESTING_DEPTH,
            });
            return;
        }

        match stage {
            StageConfig::Task {
                execute_in,
                execute_out,
            } => {
                for executable in [execute_in, execute_out].into_iter().flatten() {
                    check(executable, &path, |name| registry.has_executable(name), errors, |path, name| {
                        ValidationError::UnknownExecutable { path, name }
                    });
                }
            }
            StageConfig::Filter { matcher, stages } => {
                if let Some(matcher) = matcher {
                    check(matcher, &path, |name| registry.has_matcher(name), errors, |path, name| {
                        ValidationError::UnknownMatcher { path, name }
                    });
                }
                warn_if_empty("filter", stages, &path);
            }
            StageConfig::Parallel {
                merge_up,
                merge_down,
                stages,
            } => {
                for merger in [merge_up, merge_down].into_iter().flatten() {
                    check(merger, &path, |name| registry.has_merger(name), errors, |path, name| {
                        ValidationError::UnknownMerger { path, name }
                    });
                }
                warn_if_empty("parallel", stages, &path);
            }
            StageConfig::Pipeline { .. } => {}
        }

        let nested = stage.sub_stages();
        if !nested.is_empty() {
            validate_stages(nested, &format!("{path}.stages"), depth + 1, registry, errors);
        }
    }
}

fn check(
    component: &ComponentRef,
    path: &str,
    registered: impl Fn(&str) -> bool,
    errors: &mut Vec<ValidationError>,
    unknown: impl FnOnce(String, String) -> ValidationError,
) {
    if !registered(&component.name) {
        errors.push(unknown(path.to_string(), component.name.clone()));
    }
}

fn warn_if_empty(kind: &str, stages: &[StageConfig], path: &str) {
    if stages.is_empty() {
        EmptySubChain { kind, path }.log();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::{parse_config, ConfigFormat};
    use crate::traits::{Executable, Matcher, Merger, Settle};

    fn registry() -> ComponentRegistry<String> {
        let mut registry = ComponentRegistry::new();
        registry
            .register_executable("noop", |_| Ok(Executable::callback(|input: String, settle: Settle<String>| settle.resolve(input))))
            .register_matcher("always", |_| Ok(Matcher::callback(|_: &String| true)))
            .register_merger("keep", |_| Ok(Merger::callback(|input: String, _: Vec<String>| input)));
        registry
    }

    fn chain(yaml: &str) -> ChainConfig {
        parse_config(yaml, ConfigFormat::Yaml).unwrap()
    }

    fn nested_pipelines(depth: usize) -> ChainConfig {
        let mut stage = StageConfig::Task {
            execute_in: None,
            execute_out: None,
        };
        for _ in 1..depth {
            stage = StageConfig::Pipeline {
                name: None,
                stages: vec![stage],
            };
        }
        ChainConfig {
            name: "deep".to_string(),
            stages: vec![stage],
        }
    }

    #[test]
    fn valid_chain_passes() {
        let config = chain(
            r#"
stages:
  - type: task
    execute_in: { name: noop }
  - type: filter
    matcher: { name: always }
    stages:
      - type: parallel
        merge_up: { name: keep }
        merge_down: { name: keep }
        stages:
          - type: task
            execute_out: { name: noop }
"#,
        );

        assert!(validate_chain(&config, &registry()).is_ok());
    }

    #[test]
    fn empty_sub_chains_are_not_errors() {
        let config = chain(
            r#"
stages:
  - type: filter
  - type: parallel
  - type: pipeline
"#,
        );

        assert!(validate_chain(&config, &registry()).is_ok());
    }

    #[test]
    fn every_unknown_component_is_reported_with_its_path() {
        let config = chain(
            r#"
stages:
  - type: task
    execute_in: { name: missing_in }
    execute_out: { name: missing_out }
  - type: pipeline
    stages:
      - type: filter
        matcher: { name: never }
        stages:
          - type: parallel
            merge_down: { name: mash }
            stages:
              - type: task
"#,
        );

        let errors = validate_chain(&config, &registry()).unwrap_err();

        assert_eq!(
            errors,
            vec![
                ValidationError::UnknownExecutable {
                    path: "stages[0]".to_string(),
                    name: "missing_in".to_string(),
                },
                ValidationError::UnknownExecutable {
                    path: "stages[0]".to_string(),
                    name: "missing_out".to_string(),
                },
                ValidationError::UnknownMatcher {
                    path: "stages[1].stages[0]".to_string(),
                    name: "never".to_string(),
                },
                ValidationError::UnknownMerger {
                    path: "stages[1].stages[0].stages[0]".to_string(),
                    name: "mash".to_string(),
                },
            ]
        );
    }

    #[test]
    fn nesting_at_the_limit_is_allowed() {
        assert!(validate_chain(&nested_pipelines(MAX_NESTING_DEPTH), &registry()).is_ok());
    }

    #[test]
    fn nesting_past_the_limit_is_rejected() {
        let errors = validate_chain(&nested_pipelines(MAX_NESTING_DEPTH + 1), &registry()).unwrap_err();

        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ValidationError::NestingTooDeep { path, max_depth } => {
                assert_eq!(*max_depth, MAX_NESTING_DEPTH);
                assert_eq!(path.matches("stages[0]").count(), MAX_NESTING_DEPTH + 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
