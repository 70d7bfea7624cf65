//! Tests for core error types

use carousel::core::{Direction, EngineConfig, EngineError};

#[test]
fn test_unknown_transition_direction_error() {
    let error = EngineError::unknown_transition("slide", Some(Direction::Up));
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Unknown transition type: slide"));
    assert!(error_msg.contains("direction up"));
}

#[test]
fn test_config_parse_error_from_serde() {
    let error = EngineConfig::from_json_str("{ \"auto_play\": \"yes\" }").unwrap_err();
    assert!(matches!(error, EngineError::ConfigParse { .. }));
    assert!(format!("{}", error).contains("Config parse error"));
}

#[test]
fn test_error_source_chain() {
    use std::error::Error;

    let error = EngineConfig::from_json_str("42").unwrap_err();
    assert!(error.source().is_some());
    assert!(EngineError::index_out_of_range(1, 1).source().is_none());
}

#[test]
fn test_validation_errors() {
    for input in [
        r#"{ "rotation_speed_ms": 0 }"#,
        r#"{ "transition_timeout_ms": 0 }"#,
        r#"{ "dimensions": { "width": -1 } }"#,
    ] {
        let error = EngineConfig::from_json_str(input).unwrap_err();
        assert!(
            matches!(error, EngineError::InvalidConfig { .. }),
            "{} should be rejected",
            input
        );
    }
}
