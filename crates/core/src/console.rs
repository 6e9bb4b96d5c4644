use core::fmt::{self, Write};

/// Line prefixes the log-capture tooling matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Tag {
    Ok,
    Ko,
    Start,
    Done,
    Check,
    Debug,
}

impl Tag {
    pub const fn as_str(self) -> &'static str {
        match self {
            Tag::Ok => "OK",
            Tag::Ko => "KO",
            Tag::Start => "START",
            Tag::Done => "DONE",
            Tag::Check => "CHECK",
            Tag::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SEPARATOR: &str = "_______________________________________";

/// Writes tagged status lines to the console sink.
///
/// The sink is opaque and has no error channel of its own: a failed write
/// loses the line and the test sequence carries on.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn line(&mut self, tag: Tag, args: fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{}: {}", tag, args);
    }

    /// Untagged line, used for the program banner.
    pub fn plain(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }

    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    pub fn sink(&self) -> &W {
        &self.out
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_sink(self) -> W {
        self.out
    }
}

#[macro_export]
macro_rules! report {
    ($reporter:expr, $tag:ident, $($arg:tt)*) => {
        $reporter.line($crate::console::Tag::$tag, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_line_format() {
        let mut reporter = Reporter::new(String::new());
        report!(reporter, Ok, "default value detected");
        report!(reporter, Debug, "RX data: {}", 42u32);
        assert_eq!(
            reporter.sink(),
            "OK: default value detected\nDEBUG: RX data: 42\n"
        );
    }

    #[test]
    fn test_banner_lines() {
        let mut reporter = Reporter::new(String::new());
        reporter.plain(SEPARATOR);
        reporter.blank();
        assert_eq!(reporter.into_sink(), format!("{}\n\n", SEPARATOR));
    }
}
