//! Logging backends
//!
//! Android 上直接走 logcat，其它平台打印到 stderr（stdout 可能被宿主程序占用）。

use chrono::Local;
use log::{LevelFilter, Metadata, Record};
use std::str::FromStr;

pub const ENV_LOG_LEVEL: &str = "FASTNOISE_LOG";

pub struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "[{}] - {}: {}",
                Local::now().format("%d/%m/%Y %H:%M:%S"),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

#[cfg(not(target_os = "android"))]
static LOGGER: StderrLogger = StderrLogger;

pub fn init_logger(level: LevelFilter) {
    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(level)
                .with_tag("FastNoise2"),
        );
    }

    #[cfg(not(target_os = "android"))]
    {
        if let Err(err) = log::set_logger(&LOGGER).map(|()| log::set_max_level(level)) {
            eprintln!("{}", err)
        }
    }
}

/// 解析日志级别，无法识别时回落到 Info
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

pub fn init_logger_from_env() {
    let level = std::env::var(ENV_LOG_LEVEL).ok();
    init_logger(parse_level(level.as_deref()));
}
