use super::*;

#[test]
fn zero_users_is_rejected() {
    let err = RuntimeConfig::new(
        0,
        Duration::from_secs(1),
        Duration::from_secs(1),
        1,
        Duration::from_secs(1),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::NonPositiveUsers));
}

#[test]
fn zero_pool_size_is_rejected() {
    let err = RuntimeConfig::new(
        1,
        Duration::from_secs(1),
        Duration::from_secs(1),
        0,
        Duration::from_secs(1),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::NonPositivePoolSize));
}

#[test]
fn zero_metrics_interval_is_rejected() {
    let err = RuntimeConfig::new(
        1,
        Duration::from_secs(1),
        Duration::from_secs(1),
        1,
        Duration::ZERO,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::NonPositiveMetricsInterval));
}

#[test]
fn valid_config_round_trips_from_toml() {
    let toml = r#"
        numberOfUsers = 50
        rampUpSecs = 10
        testDurationSecs = 30
        connectionPoolSize = 20
        metricsIntervalSecs = 2
        workerMode = "lightweight"
    "#;
    let config = RuntimeConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.number_of_users, 50);
    assert_eq!(config.ramp_up, Duration::from_secs(10));
    assert_eq!(config.connection_pool_size, 20);
}

#[test]
fn metrics_interval_defaults_when_omitted() {
    let toml = r#"
        numberOfUsers = 1
        rampUpSecs = 0
        testDurationSecs = 5
        connectionPoolSize = 1
    "#;
    let config = RuntimeConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.metrics_interval, Duration::from_secs(5));
}

#[test]
fn non_positive_fields_in_toml_are_rejected() {
    let toml = r#"
        numberOfUsers = 0
        rampUpSecs = 0
        testDurationSecs = 5
        connectionPoolSize = 1
    "#;
    let err = RuntimeConfig::from_toml_str(toml).unwrap_err();
    assert!(matches!(err, ConfigError::NonPositiveUsers));
}

#[test]
fn pool_size_override_is_used_for_the_named_action_only() {
    let config = RuntimeConfig::new(
        1,
        Duration::from_secs(1),
        Duration::from_secs(1),
        10,
        Duration::from_secs(1),
    )
    .unwrap()
    .with_pool_size_override("login", 50);
    assert_eq!(config.pool_size_for("login"), 50);
    assert_eq!(config.pool_size_for("checkout"), 10);
}

#[test]
fn pool_size_overrides_round_trip_from_toml() {
    let toml = r#"
        numberOfUsers = 1
        rampUpSecs = 0
        testDurationSecs = 5
        connectionPoolSize = 10

        [poolSizeOverrides]
        login = 50
    "#;
    let config = RuntimeConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.pool_size_for("login"), 50);
    assert_eq!(config.pool_size_for("checkout"), 10);
}

#[test]
fn non_positive_pool_size_override_in_toml_is_rejected() {
    let toml = r#"
        numberOfUsers = 1
        rampUpSecs = 0
        testDurationSecs = 5
        connectionPoolSize = 10

        [poolSizeOverrides]
        login = 0
    "#;
    let err = RuntimeConfig::from_toml_str(toml).unwrap_err();
    assert!(matches!(err, ConfigError::NonPositivePoolSize));
}
