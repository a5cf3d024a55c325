// src/sink/syslog.rs

//! syslog(3) backend for error reports.
//!
//! A mirror usually runs unattended, so copy and watch failures also go to
//! the system log under the `daemon` facility with the `syncer` tag.

use std::ffi::CString;
use std::sync::OnceLock;

use super::ErrorSink;

/// Tag (ident) prepended to every syslog entry.
pub const SYSLOG_TAG: &str = "syncer";

/// Subset of syslog(3) facilities that make sense for a user daemon.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogFacility {
    User = libc::LOG_USER,
    #[default]
    Daemon = libc::LOG_DAEMON,
    Local0 = libc::LOG_LOCAL0,
}

/// Severity attached to each report.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogPriority {
    Error = libc::LOG_ERR,
    #[default]
    Warning = libc::LOG_WARNING,
    Notice = libc::LOG_NOTICE,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyslogConfig {
    pub facility: SyslogFacility,
    pub priority: SyslogPriority,
    pub tag: String,
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self {
            facility: SyslogFacility::default(),
            priority: SyslogPriority::default(),
            tag: SYSLOG_TAG.to_string(),
        }
    }
}

/// Sink that writes each report as one syslog entry.
///
/// `openlog` is process-global: the first sink opened decides the tag and
/// facility, and the connection stays open for the life of the process.
#[derive(Debug)]
pub struct SyslogErrorSink {
    priority: SyslogPriority,
}

impl SyslogErrorSink {
    pub fn open(config: SyslogConfig) -> Self {
        // syslog(3) keeps the ident pointer, so it must live forever.
        static IDENT: OnceLock<CString> = OnceLock::new();
        let mut first = false;
        let ident = IDENT.get_or_init(|| {
            first = true;
            CString::new(config.tag.replace('\0', ""))
                .unwrap_or_else(|_| CString::from(c"syncer"))
        });

        if first {
            // SAFETY: runs once per process; `ident` is a 'static C string.
            unsafe {
                libc::openlog(
                    ident.as_ptr(),
                    libc::LOG_PID | libc::LOG_NDELAY,
                    config.facility as libc::c_int,
                );
            }
        }

        Self {
            priority: config.priority,
        }
    }

    pub fn priority(&self) -> SyslogPriority {
        self.priority
    }
}

impl ErrorSink for SyslogErrorSink {
    fn report(&self, message: String) {
        // Interior NULs would truncate the entry; replace them.
        let Ok(message) = CString::new(message.replace('\0', "\u{FFFD}")) else {
            return;
        };

        // SAFETY: "%s" keeps `%` in the message from being read as a format
        // directive; both pointers are valid NUL-terminated strings.
        unsafe {
            libc::syslog(self.priority as libc::c_int, c"%s".as_ptr(), message.as_ptr());
        }
    }
}
