use super::*;
use crate::error::ConfigError;
use figment::Jail;

fn resolve_in(jail: &Jail) -> (EffectiveConfig, Vec<ConfigError>) {
    ConfigResolver::new(jail.directory()).finish()
}

#[test]
fn test_defaults_without_files() {
    Jail::expect_with(|jail| {
        let (config, warnings) = resolve_in(jail);
        assert_eq!(config, EffectiveConfig::default());
        assert!(warnings.is_empty());
        Ok(())
    });
}

#[test]
fn test_yaml_file_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            YAML_CONFIG_FILE,
            r#"
min_lines: 3
max_lines: 50
insult_pack: Pirate
shame_level: savage
plugins: [todo-count, spellcheck]
block_on_severe: false
some_future_key: whatever
"#,
        )?;

        let (config, warnings) = resolve_in(jail);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.min_lines, 3);
        assert_eq!(config.max_lines, 50);
        assert_eq!(config.insult_pack, "pirate");
        assert_eq!(config.shame_level, ShameLevel::Savage);
        assert!(config.plugins.contains("todo-count"));
        assert!(config.plugins.contains("spellcheck"));
        assert!(!config.block_on_severe);
        Ok(())
    });
}

#[test]
fn test_shell_file_is_lower_precedence_than_yaml() {
    Jail::expect_with(|jail| {
        jail.create_file(SHELL_CONFIG_FILE, "MAX_LINES=80\nINSULT_PACK=dad\n")?;
        jail.create_file(YAML_CONFIG_FILE, "max_lines: 120\n")?;

        let (config, warnings) = resolve_in(jail);
        assert!(warnings.is_empty());
        assert_eq!(config.max_lines, 120);
        assert_eq!(config.insult_pack, "dad");
        Ok(())
    });
}

#[test]
fn test_environment_wins() {
    Jail::expect_with(|jail| {
        jail.create_file(YAML_CONFIG_FILE, "max_lines: 120\nshame_level: gentle\n")?;
        jail.set_env("COMMIT_SHAME_MAX_LINES", "42");
        jail.set_env("COMMIT_SHAME_SHAME_LEVEL", "SAVAGE");
        jail.set_env("COMMIT_SHAME_PLUGINS", "lint,spell");

        let (config, warnings) = resolve_in(jail);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.max_lines, 42);
        assert_eq!(config.shame_level, ShameLevel::Savage);
        assert_eq!(config.plugins.len(), 2);
        Ok(())
    });
}

#[test]
fn test_malformed_file_falls_back_with_warning() {
    Jail::expect_with(|jail| {
        jail.create_file(YAML_CONFIG_FILE, "max_lines: [unterminated\n")?;
        jail.create_file(SHELL_CONFIG_FILE, "MIN_LINES=4\n")?;

        let (config, warnings) = resolve_in(jail);
        assert_eq!(config.max_lines, 500);
        assert_eq!(config.min_lines, 4);
        assert!(matches!(warnings.as_slice(), [ConfigError::Malformed { .. }]));
        Ok(())
    });
}

#[test]
fn test_invalid_values_revert_individually() {
    Jail::expect_with(|jail| {
        jail.create_file(
            YAML_CONFIG_FILE,
            "min_lines: -2\nmax_lines: 60\nshame_level: brutal\n",
        )?;

        let (config, warnings) = resolve_in(jail);
        assert_eq!(config.min_lines, 1);
        assert_eq!(config.max_lines, 60);
        assert_eq!(config.shame_level, ShameLevel::Sarcastic);
        assert_eq!(warnings.len(), 2);
        Ok(())
    });
}

#[test]
fn test_min_above_max_reverts_both() {
    Jail::expect_with(|jail| {
        jail.create_file(YAML_CONFIG_FILE, "min_lines: 100\nmax_lines: 10\n")?;

        let (config, warnings) = resolve_in(jail);
        assert_eq!(config.min_lines, 1);
        assert_eq!(config.max_lines, 500);
        assert!(matches!(
            warnings.as_slice(),
            [ConfigError::InvalidValue { key: "min_lines", .. }]
        ));
        Ok(())
    });
}

#[test]
fn test_shame_level_parsing() {
    assert_eq!("Gentle".parse::<ShameLevel>().unwrap(), ShameLevel::Gentle);
    assert_eq!("savage".parse::<ShameLevel>().unwrap(), ShameLevel::Savage);
    assert!("klingon".parse::<ShameLevel>().is_err());
}
