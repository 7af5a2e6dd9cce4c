//! Fuzz test for configuration file parsing
//!
//! Tests that arbitrary TOML input doesn't cause panics or crashes when
//! parsed as WARD configuration.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ward::Config;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _: Result<toml::Value, _> = toml::from_str(s);

        // Accepted configurations must pass validation again after a roundtrip
        if let Ok(config) = Config::from_toml_str(s) {
            if let Ok(text) = toml::to_string(&config) {
                assert!(Config::from_toml_str(&text).is_ok());
            }
        }
    }
});
