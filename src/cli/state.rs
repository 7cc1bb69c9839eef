use chrono::{DateTime, Local, TimeZone};
use color_eyre::Result;
use colored::{ColoredString, Colorize};
use log::LevelFilter;

use super::LogFormat;

pub fn setup_log(level: LevelFilter, format: LogFormat) -> Result<()> {
    fern::Dispatch::new()
        .level(level)
        .format(move |out, message, record| {
            let stamp = timestamp(&Local::now(), format).bright_green();
            match format {
                LogFormat::Long => out.finish(format_args!(
                    "[{}] @{} {}: {}",
                    stamp,
                    format_target(record.target(), record.level()),
                    format_level(record.level()),
                    message
                )),
                LogFormat::Short => out.finish(format_args!(
                    "[{}] {}: {}",
                    stamp,
                    format_level(record.level()),
                    message
                )),
                LogFormat::Min => out.finish(format_args!(
                    "{}: {}",
                    format_level(record.level()),
                    message
                )),
                LogFormat::None => out.finish(format_args!("{}", message)),
            }
        })
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

/// Time stamp for a log line; empty for the formats that print none.
pub(crate) fn timestamp<Tz: TimeZone>(now: &DateTime<Tz>, format: LogFormat) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match format {
        LogFormat::Long => now.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        LogFormat::Short => now.format("%H:%M:%S").to_string(),
        LogFormat::Min | LogFormat::None => String::new(),
    }
}

pub(crate) fn format_level(level: log::Level) -> ColoredString {
    match level {
        log::Level::Error => format!("{:<8}", "ERROR").red(),
        log::Level::Warn => format!("{:<8}", "WARNING").yellow(),
        log::Level::Info => format!("{:<8}", "INFO").into(),
        log::Level::Debug => format!("{:<8}", "DEBUG").bright_black(),
        log::Level::Trace => format!("{:<8}", "TRACE").into(),
    }
}

/// Last two segments of a module path, padded to a fixed width.
pub(crate) fn format_target(target: &str, level: log::Level) -> ColoredString {
    let split_targets = target.split("::").collect::<Vec<_>>();
    let start = split_targets.len().saturating_sub(2);
    let mut shortened_path = split_targets[start..].join("::");
    if level < log::Level::Debug && shortened_path.len() > 20 {
        shortened_path = format!("{}...", shortened_path.chars().take(17).collect::<String>());
    }
    format!("{:<20}", shortened_path).bright_blue()
}
