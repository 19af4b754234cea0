/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Configuration loading and validation.
//!
//! Configuration comes from a TOML file discovered through a search
//! path (current directory, user config directory, `/etc/forgefit`),
//! overridable with `FORGEFIT_CONFIG` or an explicit path. Values
//! support `${VAR}`, `${VAR:-default}` and `${VAR:?message}`
//! environment substitution so secrets stay out of the file.

mod defaults;
mod error;
mod loader;
mod types;
mod validation;

pub use defaults::generate_default_config_toml;
pub use error::{ConfigError, ValidationError};
pub use loader::ConfigLoader;
pub use types::{
    AuthConfig, CacheConfig, CmsConfig, ForgeFitConfig, ServerConfig, UploadsConfig,
};
pub use validation::Validate;
