//! Tests for layered `NoiseConfig` loading.

use std::path::Path;

use figment::Jail;

use crate::config::NoiseConfig;
use crate::cpu::{detect_tier, supports, InstructionTier};
use crate::error::Error;
use crate::interp::Quality;

#[test]
fn test_defaults() {
    let config = NoiseConfig::default();
    assert_eq!(config.quality, Quality::Standard);
    assert_eq!(config.tier, None);
    assert_eq!(config.seed, 0);
}

#[test]
fn test_load_without_sources_yields_defaults() {
    Jail::expect_with(|_jail| {
        assert_eq!(NoiseConfig::load(None).expect("config"), NoiseConfig::default());
        Ok(())
    });
}

#[test]
fn test_load_from_toml_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "cnoise.toml",
            r#"
                quality = "best"
                tier = "fallback"
                seed = 42
            "#,
        )?;
        let config = NoiseConfig::load(Some(Path::new("cnoise.toml"))).expect("config");
        assert_eq!(config.quality, Quality::Best);
        assert_eq!(config.tier, Some(InstructionTier::Fallback));
        assert_eq!(config.seed, 42);
        Ok(())
    });
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("cnoise.toml", "seed = -7")?;
        let config = NoiseConfig::load(Some(Path::new("cnoise.toml"))).expect("config");
        assert_eq!(config.seed, -7);
        assert_eq!(config.quality, Quality::Standard);
        assert_eq!(config.tier, None);
        Ok(())
    });
}

#[test]
fn test_env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("cnoise.toml", "quality = \"fast\"\nseed = 1")?;
        jail.set_env("CNOISE_QUALITY", "best");
        jail.set_env("CNOISE_SEED", "99");
        let config = NoiseConfig::load(Some(Path::new("cnoise.toml"))).expect("config");
        assert_eq!(config.quality, Quality::Best);
        assert_eq!(config.seed, 99);
        Ok(())
    });
}

#[test]
fn test_env_tier() {
    Jail::expect_with(|jail| {
        jail.set_env("CNOISE_TIER", "fallback");
        let config = NoiseConfig::load(None).expect("config");
        assert_eq!(config.tier, Some(InstructionTier::Fallback));
        Ok(())
    });
}

#[test]
fn test_invalid_quality_is_config_error() {
    Jail::expect_with(|jail| {
        jail.set_env("CNOISE_QUALITY", "ultra");
        let err = NoiseConfig::load(None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.is_config_error());
        Ok(())
    });
}

#[test]
fn test_missing_file_is_config_error() {
    Jail::expect_with(|_jail| {
        let err = NoiseConfig::load(Some(Path::new("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
        Ok(())
    });
}

#[test]
fn test_validate_and_engine() {
    let detected = NoiseConfig::default();
    assert!(detected.validate().is_ok());
    assert_eq!(detected.engine().expect("engine").tier(), detect_tier());

    let forced = NoiseConfig {
        tier: Some(InstructionTier::Fallback),
        ..NoiseConfig::default()
    };
    assert_eq!(
        forced.engine().expect("engine").tier(),
        InstructionTier::Fallback
    );

    if let Some(tier) = InstructionTier::ALL.into_iter().find(|&t| !supports(t)) {
        let unsupported = NoiseConfig {
            tier: Some(tier),
            ..NoiseConfig::default()
        };
        assert_eq!(unsupported.validate(), Err(Error::UnsupportedTier(tier)));
        assert!(unsupported.engine().is_err());
    }
}
