use chrono::{DateTime, SecondsFormat, Utc};
use env_logger::{Builder, Env};
use serde::{Serialize, Serializer};
use std::io::Write;

#[derive(Serialize, Debug)]
struct LogEntry {
    level: String,
    #[serde(serialize_with = "rfc3339_serializer")]
    time: DateTime<Utc>,
    target: String,
    message: String,
    #[serde(flatten)]
    meta: Option<serde_json::Value>,
}

fn rfc3339_serializer<S>(x: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&x.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// A convenience wrapper around the log! macro for writing structured log
/// messages that a log aggregator can ingest.
///
/// `jlog!(Info, "gather::payments", "Payment settled", {"order_id": id})`
/// produces
/// `{"level": "INFO", "target": "gather::payments", "message": "Payment settled", "order_id": "..."}`
///
/// The target argument may be omitted, in which case the calling module path
/// is used.
#[macro_export]
macro_rules! jlog {
    ($level:path, $msg:expr) => {{
        $crate::log_entry($level, module_path!(), $msg, None)
    }};
    ($level:path, $msg:expr, $json:tt) => {{
        let meta = serde_json::json!($json);
        $crate::log_entry($level, module_path!(), $msg, Some(meta))
    }};
    ($level:path, $target:expr, $msg:expr, $json:tt) => {{
        let meta = serde_json::json!($json);
        $crate::log_entry($level, $target, $msg, Some(meta))
    }};
}

pub fn log_entry(level: log::Level, target: &str, msg: &str, meta: Option<serde_json::Value>) {
    let entry = LogEntry {
        level: level.to_string(),
        target: target.to_string(),
        time: Utc::now(),
        message: msg.trim().to_string(),
        meta,
    };
    match serde_json::to_string(&entry) {
        Ok(json) => log::log!(target: target, level, "{}", json),
        Err(_) => log::log!(target: target, level, "{}", entry.message),
    }
}

fn is_json(msg: &str) -> bool {
    msg.starts_with('{') && msg.ends_with('}')
}

/// Installs an env_logger that emits one JSON object per line. Messages that
/// are already JSON (from `jlog!`) pass through untouched.
pub fn setup_logger() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let msg = format!("{}", record.args());
            if is_json(&msg) {
                return writeln!(buf, "{}", msg);
            }
            let entry = LogEntry {
                level: record.level().to_string(),
                time: Utc::now(),
                target: record.target().to_string(),
                message: msg.trim().to_string(),
                meta: None,
            };
            match serde_json::to_string(&entry) {
                Ok(json) => writeln!(buf, "{}", json),
                Err(err) => writeln!(buf, "Failed to serialize log entry: {:?}: {:?}", err, entry),
            }
        })
        .init();
}

#[cfg(test)]
mod tests {
    use log::Level::*;

    #[test]
    fn jlog_accepts_all_forms() {
        jlog!(Warn, "message");
        jlog!(Warn, "message", {"a": 1});
        jlog!(Error, "message", {"a": 1, "b": "two", "c": [3, 2, 1]});
        jlog!(Debug, "gather::domain_actions", "Found no actions to process", {});
    }

    #[test]
    fn json_detection() {
        assert!(super::is_json(r#"{"a": 1}"#));
        assert!(!super::is_json("plain message"));
    }
}
