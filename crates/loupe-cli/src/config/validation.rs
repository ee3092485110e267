use crate::config::PreviewConfig;
use crate::error::{ConfigError, Result, ResultExt};

impl PreviewConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        let dir = std::fs::metadata(&self.dir).with_path(&self.dir)?;
        if !dir.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "dir".to_string(),
                value: self.dir.display().to_string(),
                hint: "Point dir at the component directory, not a file inside it".to_string(),
            }
            .into());
        }

        for (field, port) in [("port", self.port), ("liveReloadPort", self.live_reload_port)] {
            if port == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: "0".to_string(),
                    hint: "Pick a fixed port between 1 and 65535".to_string(),
                }
                .into());
            }
        }

        if self.port == self.live_reload_port {
            return Err(ConfigError::ConflictingOptions(format!(
                "port and liveReloadPort are both {}",
                self.port
            ))
            .into());
        }

        Ok(())
    }
}
