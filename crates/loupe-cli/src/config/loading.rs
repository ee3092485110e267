use crate::cli::PreviewArgs;
use crate::config::{CliOverrides, PreviewConfig};
use crate::error::{ConfigError, Result, ResultExt};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Config file looked up in the component directory.
pub const CONFIG_FILE_NAME: &str = "loupe.config.json";

/// Fields settable through `LOUPE_*`; other variables with the prefix are
/// left alone.
const ENV_KEYS: &[&str] = &[
    "dir",
    "root",
    "port",
    "liveReloadPort",
    "debug",
    "autoprefix",
    "router",
    "title",
    "framework",
    "watchIgnore",
    "debounceMs",
    "open",
];

impl PreviewConfig {
    /// Load configuration from every source and resolve its paths against
    /// the process working directory.
    pub fn load(args: &PreviewArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read the working directory")?;
        Self::load_from(args, &cwd)
    }

    /// Same as [`PreviewConfig::load`] with an explicit working directory.
    pub fn load_from(args: &PreviewArgs, cwd: &Path) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = config_file(args, cwd)? {
            tracing::debug!("config file: {}", path.display());
            figment = figment.merge(Json::file(path));
        }

        // LOUPE_PORT, LOUPE_LIVE_RELOAD_PORT, LOUPE_ROUTER, ...
        figment = figment.merge(
            Env::prefixed("LOUPE_")
                .map(|key| env_key(key.as_str()).into())
                .filter(|key| ENV_KEYS.contains(&key.as_str()))
                .lowercase(false),
        );

        figment = figment.merge(Serialized::defaults(CliOverrides::from(args)));

        let config: Self = figment.extract().map_err(|e| ConfigError::Extract {
            message: e.to_string(),
        })?;

        let config = config.resolve_paths(cwd);
        config.validate()?;
        Ok(config)
    }

    /// Make `dir` and `root` absolute, and framework paths absolute under
    /// `root`.
    pub fn resolve_paths(mut self, cwd: &Path) -> Self {
        self.dir = cwd.join(&self.dir).clean();
        self.root = cwd.join(&self.root).clean();
        let root = self.root.clone();
        self.framework = self
            .framework
            .into_iter()
            .map(|path| root.join(path).clean())
            .collect();
        self
    }
}

/// `LIVE_RELOAD_PORT` -> `liveReloadPort`.
fn env_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = !out.is_empty();
            continue;
        }
        if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// `--config` must exist; the implicit `DIR/loupe.config.json` is optional.
fn config_file(args: &PreviewArgs, cwd: &Path) -> Result<Option<PathBuf>> {
    if let Some(explicit) = &args.config {
        let path = cwd.join(explicit);
        if !path.is_file() {
            return Err(ConfigError::NotFound(path).into());
        }
        return Ok(Some(path));
    }

    let dir = args.dir.as_deref().unwrap_or(Path::new("."));
    let implicit = cwd.join(dir).join(CONFIG_FILE_NAME);
    Ok(implicit.is_file().then_some(implicit))
}

#[cfg(test)]
mod tests {
    use super::{ENV_KEYS, env_key};
    use crate::config::PreviewConfig;

    #[test]
    fn test_env_key_to_camel_case() {
        assert_eq!(env_key("PORT"), "port");
        assert_eq!(env_key("LIVE_RELOAD_PORT"), "liveReloadPort");
        assert_eq!(env_key("DEBOUNCE_MS"), "debounceMs");
    }

    #[test]
    fn test_env_keys_cover_every_field() {
        let value = serde_json::to_value(PreviewConfig {
            router: Some(true),
            title: Some("t".into()),
            ..PreviewConfig::default()
        })
        .unwrap();
        let mut fields: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut keys = ENV_KEYS.to_vec();
        fields.sort_unstable();
        keys.sort_unstable();
        assert_eq!(fields, keys);
    }
}
