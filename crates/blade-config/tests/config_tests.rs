#[cfg(test)]
mod tests {
    use blade_config::ConfigLoader;
    use blade_config::schema::*;
    use std::io::Write;
    use std::path::Path;

    // ── Default tests ──────────────────────────────────────────

    #[test]
    fn test_blade_config_defaults() {
        let config = BladeConfig::default();
        assert_eq!(config.blade.name, "blade");
        assert!(config.blade.auto_start);
        assert!(config.behaviors.disabled.is_empty());
    }

    #[test]
    fn test_schedule_config_defaults() {
        let config = ScheduleConfig::default();
        assert_eq!(config.update_ms, 100);
        assert_eq!(config.status_log_ms, 90_000);
        assert_eq!(config.remote_poll_ms, 2_000);
    }

    #[test]
    fn test_remote_config_defaults() {
        let config = RemoteConfig::default();
        assert!(config.requests_url.ends_with("/api/BladeCommands"));
        assert!(config.responses_url.ends_with("/api/BladeResponses"));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "pretty");
    }

    #[test]
    fn test_defaults_validate_clean() {
        let warnings = BladeConfig::default().validate().unwrap();
        assert!(warnings.is_empty());
    }

    // ── TOML tests ─────────────────────────────────────────────

    #[test]
    fn test_config_toml_roundtrip() {
        let config = BladeConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored: BladeConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(restored.blade.name, config.blade.name);
        assert_eq!(restored.schedule, config.schedule);
        assert_eq!(restored.remote.requests_url, config.remote.requests_url);
    }

    #[test]
    fn test_partial_toml_applies_defaults() {
        let toml_str = r#"
[blade]
name = "kitchen"

[schedule]
remote_poll_ms = 5000
"#;
        let config: BladeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.blade.name, "kitchen");
        assert_eq!(config.schedule.remote_poll_ms, 5000);
        // Defaults should fill in
        assert!(config.blade.auto_start);
        assert_eq!(config.schedule.update_ms, 100);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_behaviors_disabled_list() {
        let toml_str = r#"
[behaviors]
disabled = ["ping", "request-log"]
"#;
        let config: BladeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.behaviors.disabled, vec!["ping", "request-log"]);
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = ConfigLoader::parse("[blade\nname=", Path::new("broken.toml")).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    // ── Validation tests ───────────────────────────────────────

    #[test]
    fn test_validate_empty_name_is_error() {
        let mut config = BladeConfig::default();
        config.blade.name = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.contains("blade.name"));
    }

    #[test]
    fn test_validate_zero_interval_is_error() {
        let mut config = BladeConfig::default();
        config.schedule.remote_poll_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("schedule.remote_poll_ms"));
    }

    #[test]
    fn test_validate_short_interval_is_warning() {
        let mut config = BladeConfig::default();
        config.schedule.remote_poll_ms = 50;
        let warnings = config.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "schedule.remote_poll_ms");
        assert_eq!(warnings[0].severity, WarningSeverity::Warning);
    }

    #[test]
    fn test_validate_bad_url_is_error() {
        let mut config = BladeConfig::default();
        config.remote.responses_url = "ftp://example.test".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_unknown_log_format() {
        let mut config = BladeConfig::default();
        config.logging.format = "xml".into();
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.field == "logging.format"));
        assert!(warnings[0].to_string().contains("xml"));
    }

    // ── Override tests ─────────────────────────────────────────

    #[test]
    fn test_apply_overrides() {
        let config = ConfigLoader::apply_overrides(BladeConfig::default(), |key| match key {
            "BLADE_NAME" => Some("den".to_string()),
            "BLADE_REQUESTS_URL" => Some("http://localhost:9000/requests".to_string()),
            "BLADE_LOG_LEVEL" => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(config.blade.name, "den");
        assert_eq!(config.remote.requests_url, "http://localhost:9000/requests");
        assert_eq!(config.logging.level, "debug");
        // Untouched
        assert_eq!(config.remote.responses_url, RemoteConfig::default().responses_url);
    }

    // ── ConfigLoader tests ─────────────────────────────────────

    #[test]
    fn test_config_loader_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("blade.toml");
        let mut f = std::fs::File::create(&config_path).unwrap();
        writeln!(
            f,
            r#"
[blade]
name = "kitchen"
auto_start = false

[remote]
requests_url = "http://127.0.0.1:8080/api/BladeCommands"
responses_url = "http://127.0.0.1:8080/api/BladeResponses"
"#
        )
        .unwrap();

        let loader = ConfigLoader::load(Some(config_path.as_path())).unwrap();
        let config = loader.get();
        assert_eq!(loader.path(), config_path.as_path());
        assert!(!config.blade.auto_start);
        assert_eq!(
            config.remote.requests_url,
            "http://127.0.0.1:8080/api/BladeCommands"
        );
    }

    #[test]
    fn test_config_loader_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("absent.toml");
        let loader = ConfigLoader::load(Some(config_path.as_path())).unwrap();
        assert_eq!(loader.get().schedule, ScheduleConfig::default());
    }

    #[test]
    fn test_config_loader_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("blade.toml");
        std::fs::write(&config_path, "[schedule]\nupdate_ms = 0\n").unwrap();
        assert!(ConfigLoader::load(Some(config_path.as_path())).is_err());
    }

    #[test]
    fn test_resolve_path_explicit_wins() {
        let p = ConfigLoader::resolve_path(Some(Path::new("/tmp/custom.toml")));
        assert_eq!(p, Path::new("/tmp/custom.toml"));
    }
}
