use std::fmt;

/// Severity of a forwarded log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    /// Logged at error level with `fatal = true`; the caller is expected to stop.
    Fatal,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emit one event for a message that originated outside Rust code.
///
/// Each call produces exactly one event at the mapped level.
pub fn log_at(severity: Severity, tag: &str, message: &str) {
    match severity {
        Severity::Debug => tracing::debug!(tag, "{message}"),
        Severity::Info => tracing::info!(tag, "{message}"),
        Severity::Warn => tracing::warn!(tag, "{message}"),
        Severity::Error => tracing::error!(tag, "{message}"),
        Severity::Fatal => tracing::error!(tag, fatal = true, "{message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Fatal > Severity::Error);
        assert!(Severity::Info < Severity::Warn);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "ERROR");
        assert_eq!(Severity::Fatal.to_string(), "FATAL");
    }
}
