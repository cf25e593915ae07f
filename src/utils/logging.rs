//! JSON-lines logging shared by the server and the seed binary.

use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write;

/// One log record as a JSON object on a single line
pub fn json_line(timestamp: &str, level: log::Level, target: &str, message: &str) -> String {
    let message = serde_json::to_string(message).unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
    format!(
        "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
        timestamp,
        level.as_str().to_ascii_lowercase(),
        message,
        target,
    )
}

/// Installs the stdout logger; `RUST_LOG` overrides the `info` default.
pub fn init_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string();
            let line = json_line(
                &ts,
                record.level(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{line}")
        })
        .target(Target::Stdout)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_escapes_the_message() {
        let line = json_line(
            "2024-06-03T10:00:00.000-06:00",
            log::Level::Warn,
            "dla_backend::seed",
            "admin \"root\" exists",
        );
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "warn");
        assert_eq!(value["message"], "admin \"root\" exists");
        assert_eq!(value["target"], "dla_backend::seed");
    }
}
