// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod builder;
pub mod loader;
pub mod registry;
pub mod validation;

pub mod consts;

pub use builder::ChainBuilder;
pub use loader::{
    load_and_validate_config, load_config, parse_config, ChainConfig, ComponentRef, ConfigFormat, StageConfig,
};
pub use registry::{parse_options, ComponentRegistry, Options};
pub use validation::validate_chain;
