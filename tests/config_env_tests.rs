//! Environment overrides. Kept in its own binary so no other test observes
//! the mutated process environment.

use roasbot::error::{ConfigError, Error};
use roasbot::infrastructure::config::settings::Config;

#[test]
fn environment_overrides_file_values() {
    std::env::set_var("ROASBOT_DATABASE", "/tmp/from-env.db");
    std::env::set_var("TELEGRAM_ENABLED", "off");

    let config = Config::parse_toml("database = \"file.db\"\n[telegram]\nenabled = true").unwrap();
    assert_eq!(config.database, "/tmp/from-env.db");
    assert!(!config.telegram.enabled);

    std::env::set_var("TELEGRAM_ENABLED", "maybe");
    let result = Config::parse_toml("");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "TELEGRAM_ENABLED",
            ..
        }))
    ));

    std::env::remove_var("ROASBOT_DATABASE");
    std::env::remove_var("TELEGRAM_ENABLED");
}
