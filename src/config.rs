// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration file support

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::diagnostics::Format;
use crate::rewrite::{IndentStyle, RewriteOptions};

/// Configuration loaded from ~/.lamdefrc or .lamdefrc
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Keyword introducing a block
    #[serde(default)]
    pub keyword: Option<String>,

    /// Prefix of generated function names
    #[serde(default)]
    pub name_prefix: Option<String>,

    /// Indentation of expanded bodies
    #[serde(default)]
    pub indent: Option<IndentStyle>,

    /// Expand `name = lamdef(...):` into `def name(...):`
    #[serde(default)]
    pub direct_assignment: Option<bool>,

    /// Default diagnostic format
    #[serde(default)]
    pub output_format: Option<Format>,

    /// Disable colored output by default
    #[serde(default)]
    pub no_color: bool,
}

impl Config {
    /// Load configuration from standard locations
    ///
    /// Search order:
    /// 1. ./.lamdefrc (current directory)
    /// 2. ~/.lamdefrc (home directory)
    /// 3. ~/.config/lamdef/config.toml
    pub fn load() -> anyhow::Result<Self> {
        let local = Path::new(".lamdefrc");
        if local.exists() {
            return Self::load_from_file(local);
        }

        if let Some(home) = dirs::home_dir() {
            let home_rc = home.join(".lamdefrc");
            if home_rc.exists() {
                return Self::load_from_file(&home_rc);
            }

            let config_file = home.join(".config").join("lamdef").join("config.toml");
            if config_file.exists() {
                return Self::load_from_file(&config_file);
            }
        }

        log::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Rewrite options with the configured values applied over the defaults
    pub fn rewrite_options(&self) -> RewriteOptions {
        let mut options = RewriteOptions::default();
        if let Some(keyword) = &self.keyword {
            options.keyword = keyword.clone();
        }
        if let Some(prefix) = &self.name_prefix {
            options.name_prefix = prefix.clone();
        }
        if let Some(indent) = self.indent {
            options.indent = indent;
        }
        if let Some(direct) = self.direct_assignment {
            options.direct_assignment = direct;
        }
        options
    }

    /// A sample configuration file with comments
    pub fn sample_config() -> String {
        r#"# lamdef configuration
# This file can be placed at:
#   - ./.lamdefrc (current directory)
#   - ~/.lamdefrc (home directory)
#   - ~/.config/lamdef/config.toml

# Keyword introducing a multiline lambda
keyword = "lamdef"

# Prefix of generated function names
name_prefix = "_lamdef_"

# Indentation of expanded bodies: a number of spaces or "tabs"
indent = 4

# Turn `name = lamdef(...):` into `def name(...):`
direct_assignment = true

# Diagnostic format (text, json, compact)
output_format = "text"

# Disable colored output
no_color = false
"#
        .to_string()
    }
}
