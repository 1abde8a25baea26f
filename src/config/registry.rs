// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::config::loader::ComponentRef;
use crate::errors::{BoxError, ConfigError};
use crate::traits::{Executable, Matcher, Merger};

/// Free-form options attached to a component reference in a chain definition.
pub type Options = BTreeMap<String, serde_json::Value>;

type Factory<C> = Arc<dyn Fn(&Options) -> Result<C, BoxError> + Send + Sync>;

/// Named factories for the components a chain definition refers to.
///
/// Chain definitions name executables, matchers and mergers; the registry
/// resolves each name plus its options into a live component.
pub struct ComponentRegistry<T: Send + 'static> {
    executables: HashMap<String, Factory<Executable<T>>>,
    matchers: HashMap<String, Factory<Matcher<T>>>,
    mergers: HashMap<String, Factory<Merger<T>>>,
}

impl<T: Send + 'static> ComponentRegistry<T> {
    pub fn new() -> Self {
        Self {
            executables: HashMap::new(),
            matchers: HashMap::new(),
            mergers: HashMap::new(),
        }
    }

    pub fn register_executable<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Options) -> Result<Executable<T>, BoxError> + Send + Sync + 'static,
    {
        self.executables.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn register_matcher<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Options) -> Result<Matcher<T>, BoxError> + Send + Sync + 'static,
    {
        self.matchers.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn register_merger<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Options) -> Result<Merger<T>, BoxError> + Send + Sync + 'static,
    {
        self.mergers.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn has_executable(&self, name: &str) -> bool {
        self.executables.contains_key(name)
    }

    pub fn has_matcher(&self, name: &str) -> bool {
        self.matchers.contains_key(name)
    }

    pub fn has_merger(&self, name: &str) -> bool {
        self.mergers.contains_key(name)
    }

    pub fn build_executable(&self, component: &ComponentRef) -> Result<Executable<T>, ConfigError> {
        build("executable", &self.executables, component)
    }

    pub fn build_matcher(&self, component: &ComponentRef) -> Result<Matcher<T>, ConfigError> {
        build("matcher", &self.matchers, component)
    }

    pub fn build_merger(&self, component: &ComponentRef) -> Result<Merger<T>, ConfigError> {
        build("merger", &self.mergers, component)
    }
}

fn build<C>(
    kind: &'static str,
    factories: &HashMap<String, Factory<C>>,
    component: &ComponentRef,
) -> Result<C, ConfigError> {
    let factory = factories.get(&component.name).ok_or_else(|| ConfigError::Component {
        kind,
        name: component.name.clone(),
        reason: "not registered".to_string(),
    })?;

    factory(&component.options).map_err(|e| ConfigError::Component {
        kind,
        name: component.name.clone(),
        reason: e.to_string(),
    })
}

/// Deserialize a component's options into its typed configuration.
pub fn parse_options<C: DeserializeOwned>(options: &Options) -> Result<C, BoxError> {
    let object = options.clone().into_iter().collect::<serde_json::Map<_, _>>();
    Ok(serde_json::from_value(serde_json::Value::Object(object))?)
}

impl<T: Send + 'static> Default for ComponentRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> fmt::Debug for ComponentRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut executables: Vec<_> = self.executables.keys().collect();
        let mut matchers: Vec<_> = self.matchers.keys().collect();
        let mut mergers: Vec<_> = self.mergers.keys().collect();
        executables.sort();
        matchers.sort();
        mergers.sort();

        f.debug_struct("ComponentRegistry")
            .field("executables", &executables)
            .field("matchers", &matchers)
            .field("mergers", &mergers)
            .finish()
    }
}
