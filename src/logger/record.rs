//! Record rendering

use super::call_site::CallSite;
use super::flags::Flags;
use chrono::{DateTime, Local, Utc};
use std::fmt::{self, Display, Write as _};

/// Fixed tag carried by every record
pub const TAG: &str = "DEBUG: ";

/// Formatting strategy of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Operands joined with single spaces
    Concat,
    /// Operands joined with single spaces plus a trailing newline
    ConcatLine,
    /// Format string with substituted arguments
    Template,
}

/// Message body together with the strategy used to render it.
#[derive(Clone, Copy)]
pub enum Message<'a> {
    /// See [`Style::Concat`]
    Concat(&'a [&'a dyn Display]),
    /// See [`Style::ConcatLine`]
    ConcatLine(&'a [&'a dyn Display]),
    /// See [`Style::Template`]
    Template(fmt::Arguments<'a>),
}

impl Message<'_> {
    /// Strategy used for this body
    pub fn style(&self) -> Style {
        match self {
            Message::Concat(_) => Style::Concat,
            Message::ConcatLine(_) => Style::ConcatLine,
            Message::Template(_) => Style::Template,
        }
    }

    /// Render the message body
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self {
            Message::Concat(args) => join_spaced(&mut out, args),
            Message::ConcatLine(args) => {
                join_spaced(&mut out, args);
                out.push('\n');
            }
            Message::Template(args) => {
                let _ = out.write_fmt(*args);
            }
        }
        out
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Message")
            .field(&self.style())
            .field(&self.render())
            .finish()
    }
}

fn join_spaced(out: &mut String, args: &[&dyn Display]) {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", arg);
    }
}

/// Assemble one full record line.
///
/// Layout: tag, date, time, file:line, message. With `MSG_PREFIX` the
/// tag moves to just before the message. Exactly one newline ends it.
pub(crate) fn render_record(flags: Flags, now: DateTime<Utc>, site: Option<&CallSite>, body: &str) -> Vec<u8> {
    let mut line = String::with_capacity(TAG.len() + 48 + body.len());

    if !flags.contains(Flags::MSG_PREFIX) {
        line.push_str(TAG);
    }

    if flags.contains(Flags::DATE) || flags.wants_time() {
        if flags.contains(Flags::UTC) {
            write_timestamp(&mut line, flags, &now);
        } else {
            write_timestamp(&mut line, flags, &now.with_timezone(&Local));
        }
    }

    if flags.wants_file() {
        if let Some(site) = site {
            let file = if flags.contains(Flags::SHORT_FILE) {
                site.short_file()
            } else {
                site.file()
            };
            let _ = write!(line, "{}:{}: ", file, site.line());
        } else {
            line.push_str("???:0: ");
        }
    }

    if flags.contains(Flags::MSG_PREFIX) {
        line.push_str(TAG);
    }

    line.push_str(body);
    if !body.ends_with('\n') {
        line.push('\n');
    }

    line.into_bytes()
}

fn write_timestamp<Tz>(out: &mut String, flags: Flags, ts: &DateTime<Tz>)
where
    Tz: chrono::TimeZone,
    Tz::Offset: Display,
{
    if flags.contains(Flags::DATE) {
        let _ = write!(out, "{} ", ts.format("%Y/%m/%d"));
    }
    if flags.wants_time() {
        let _ = write!(out, "{}", ts.format("%H:%M:%S"));
        if flags.contains(Flags::MICROSECONDS) {
            let _ = write!(out, "{}", ts.format("%.6f"));
        }
        out.push(' ');
    }
}
