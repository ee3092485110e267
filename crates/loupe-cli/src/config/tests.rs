#[cfg(test)]
mod tests {
    use crate::cli::PreviewArgs;
    use crate::config::{CONFIG_FILE_NAME, PreviewConfig};
    use crate::error::{CliError, ConfigError};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("button/example")).unwrap();
        temp
    }

    fn args_for(dir: &str) -> PreviewArgs {
        PreviewArgs {
            dir: Some(PathBuf::from(dir)),
            ..PreviewArgs::default()
        }
    }

    #[test]
    fn test_defaults() {
        let temp = project();
        let config = PreviewConfig::load_from(&args_for("button"), temp.path()).unwrap();

        assert_eq!(config.dir, temp.path().join("button"));
        assert_eq!(config.root, temp.path());
        assert_eq!(config.port, 4000);
        assert_eq!(config.live_reload_port, 4001);
        assert!(config.autoprefix);
        assert_eq!(config.router, None);
        assert_eq!(config.framework, vec![temp.path().join("node_modules/loupe")]);
        assert_eq!(config.debounce_ms, 100);
    }

    #[test]
    fn test_config_file_in_component_dir() {
        let temp = project();
        fs::write(
            temp.path().join("button").join(CONFIG_FILE_NAME),
            r#"{ "title": "Buttons", "router": false, "liveReloadPort": 4100 }"#,
        )
        .unwrap();

        let config = PreviewConfig::load_from(&args_for("button"), temp.path()).unwrap();
        assert_eq!(config.title.as_deref(), Some("Buttons"));
        assert_eq!(config.router, Some(false));
        assert_eq!(config.live_reload_port, 4100);
    }

    #[test]
    fn test_cli_overrides_file() {
        let temp = project();
        fs::write(
            temp.path().join("button").join(CONFIG_FILE_NAME),
            r#"{ "title": "From file", "port": 4500 }"#,
        )
        .unwrap();

        let mut args = args_for("button");
        args.title = Some("From flag".to_string());
        args.debug = true;

        let config = PreviewConfig::load_from(&args, temp.path()).unwrap();
        assert_eq!(config.title.as_deref(), Some("From flag"));
        assert_eq!(config.port, 4500);
        assert!(config.debug);
    }

    #[test]
    fn test_unset_flags_do_not_shadow_file() {
        let temp = project();
        fs::write(
            temp.path().join("button").join(CONFIG_FILE_NAME),
            r#"{ "debug": true, "autoprefix": false }"#,
        )
        .unwrap();

        let config = PreviewConfig::load_from(&args_for("button"), temp.path()).unwrap();
        assert!(config.debug);
        assert!(!config.autoprefix);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = project();
        let mut args = args_for("button");
        args.config = Some(PathBuf::from("missing.json"));

        let err = PreviewConfig::load_from(&args, temp.path()).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let temp = project();
        fs::write(
            temp.path().join("button").join(CONFIG_FILE_NAME),
            r#"{ "colour": "red" }"#,
        )
        .unwrap();

        let err = PreviewConfig::load_from(&args_for("button"), temp.path()).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::Extract { .. })));
    }

    #[test]
    fn test_missing_dir_rejected() {
        let temp = project();
        let err = PreviewConfig::load_from(&args_for("nope"), temp.path()).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_file_as_dir_rejected() {
        let temp = project();
        fs::write(temp.path().join("button/entry.jsx"), "<p></p>").unwrap();

        let err = PreviewConfig::load_from(&args_for("button/entry.jsx"), temp.path()).unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "dir"
        ));
    }

    #[test]
    fn test_same_ports_rejected() {
        let temp = project();
        let mut args = args_for("button");
        args.port = Some(4001);

        let err = PreviewConfig::load_from(&args, temp.path()).unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(ConfigError::ConflictingOptions(_))
        ));
    }

    #[test]
    fn test_framework_relative_to_root() {
        let temp = project();
        fs::write(
            temp.path().join("button").join(CONFIG_FILE_NAME),
            r#"{ "root": "button", "framework": ["vendor/ui", "/abs/kit"] }"#,
        )
        .unwrap();

        let config = PreviewConfig::load_from(&args_for("button"), temp.path()).unwrap();
        assert_eq!(config.root, temp.path().join("button"));
        assert_eq!(
            config.framework,
            vec![temp.path().join("button/vendor/ui"), PathBuf::from("/abs/kit")]
        );
    }
}
