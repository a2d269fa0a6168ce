use super::*;
use std::time::Duration;
use tempfile::tempdir;

mod load {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(&AppConfig::path(dir.path())).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.search.incremental_limit, 500);
        assert_eq!(config.search.fulltext_limit, 10_000);
        assert_eq!(config.pronunciation.auto_playback, AutoPronunciation::Off);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = AppConfig::path(dir.path());
        std::fs::write(
            &path,
            "[search]\nincremental_limit = 50\n\n[pronunciation]\nauto_playback = \"gb\"\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.search.incremental_limit, 50);
        assert_eq!(config.search.max_commit_delay_ms, 100);
        assert_eq!(config.pronunciation.auto_playback, AutoPronunciation::Gb);
        assert_eq!(config.pronunciation.delay_ms, 500);
        assert!(!config.clipboard.monitor);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = AppConfig::path(dir.path());
        std::fs::write(&path, "[search\nincremental_limit = ").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, AppConfigError::Parse(_)));
    }

    #[test]
    fn test_load_failure_surfaces_as_config_error() {
        let dir = tempdir().unwrap();
        let path = AppConfig::path(dir.path());
        std::fs::write(&path, "[search\n").unwrap();

        let load = || -> crate::Result<AppConfig> { Ok(AppConfig::load(&path)?) };
        let err = load().unwrap_err();
        assert!(matches!(err, crate::Error::Config(AppConfigError::Parse(_))));
        assert!(err.to_string().starts_with("config error: "));
    }
}

mod save {
    use super::*;

    #[test]
    fn test_save_then_load_preserves_values() {
        let dir = tempdir().unwrap();
        let path = AppConfig::path(dir.path());

        let mut config = AppConfig::default();
        config.paths.incremental_index = Some(dir.path().join("incremental.jsonl"));
        config.clipboard.monitor = true;
        config.pronunciation.auto_playback = AutoPronunciation::Us;
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }
}

mod validate {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_empty());
    }

    #[test]
    fn test_zero_limits_are_reported_and_replaced() {
        let mut config = AppConfig::default();
        config.search.incremental_limit = 0;
        config.search.fulltext_limit = 0;
        config.clipboard.max_chars = 0;
        config.search.spell_correction_delay_ms = 350;

        assert_eq!(config.validate().len(), 3);

        let fixed = config.with_defaults_for_invalid();
        assert!(fixed.validate().is_empty());
        assert_eq!(fixed.search.incremental_limit, 500);
        assert_eq!(fixed.search.fulltext_limit, 10_000);
        assert_eq!(fixed.clipboard.max_chars, 100);
        assert_eq!(fixed.search.spell_correction_delay_ms, 350);
    }

    #[test]
    fn test_excessive_commit_delay_is_replaced() {
        let mut config = AppConfig::default();
        config.search.max_commit_delay_ms = 60_000;

        assert_eq!(config.validate().len(), 1);
        assert_eq!(config.with_defaults_for_invalid().search.max_commit_delay_ms, 100);
    }
}

mod engine {
    use super::*;

    #[test]
    fn test_engine_config_converts_milliseconds() {
        let mut config = AppConfig::default();
        config.search.fulltext_dispatch_delay_ms = 15;
        config.clipboard.monitor = true;

        let engine = EngineConfig::from(&config);

        assert_eq!(engine.max_commit_delay, Duration::from_millis(100));
        assert_eq!(engine.fulltext_dispatch_delay, Duration::from_millis(15));
        assert_eq!(engine.spell_correction_delay, Duration::from_millis(200));
        assert_eq!(engine.searching_indicator_delay, Duration::from_millis(200));
        assert_eq!(engine.auto_pronunciation_delay, Duration::from_millis(500));
        assert!(engine.monitor_clipboard);
        assert_eq!(EngineConfig::default().incremental_limit, 500);
    }
}
