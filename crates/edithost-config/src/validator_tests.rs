    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "logging.level"));
    }

    #[test]
    fn test_validate_log_level_case_insensitive() {
        let mut config = Config::default();
        config.logging.level = "DEBUG".to_string();

        assert!(ConfigValidator::validate(&config).is_valid());
    }

    #[test]
    fn test_validate_log_dir_is_file() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.logging.file = Some(file.path().to_path_buf());

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "logging.file"));
    }

    #[test]
    fn test_validate_empty_route() {
        let mut config = Config::default();
        config.routes.insert("ui.service.change".to_string(), "  ".to_string());
        config.routes.insert("ui.service.publish".to_string(), "/publish".to_string());

        let result = ConfigValidator::validate(&config);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "routes.ui.service.change");
    }

    #[test]
    fn test_validate_zero_timeout_warning() {
        let mut config = Config::default();
        config.flash_messages.success_timeout_ms = 0;

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.path == "flash_messages.success_timeout_ms"));
    }

    #[test]
    fn test_validate_overwrite_warning() {
        let mut config = Config::default();
        config.registry.allow_overwrite = true;

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_into_result() {
        let mut config = Config::default();
        config.flash_messages.success_timeout_ms = 0;
        let warnings = ConfigValidator::validate(&config).into_result().unwrap();
        assert_eq!(warnings.len(), 1);

        config.logging.level = "verbose".to_string();
        let err = ConfigValidator::validate(&config).into_result().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "logging.level"));
    }
