//! Configuration loading
//!
//! Settings are layered: defaults, then an optional TOML file, then
//! environment variables with the `VTTD_` prefix (e.g. `VTTD_BIND_ADDR`,
//! `VTTD_DB_PATH`).

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;

use crate::Config;

/// Load configuration, optionally from a TOML file
pub fn load(path: Option<&Path>) -> Result<Config, figment::Error> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }

    figment.merge(Env::prefixed("VTTD_")).extract()
}
