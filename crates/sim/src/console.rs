use std::fmt;
use std::io::{self, Write};

/// Console sink that splits the program output into lines.
///
/// Optionally echoes every completed line to stdout, the way the board's
/// UART shows up on a terminal.
#[derive(Debug, Default)]
pub struct CaptureConsole {
    lines: Vec<String>,
    partial: String,
    echo: bool,
}

impl CaptureConsole {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            ..Default::default()
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Completed lines, plus whatever was written after the last newline.
    pub fn into_lines(mut self) -> Vec<String> {
        if !self.partial.is_empty() {
            let rest = std::mem::take(&mut self.partial);
            self.lines.push(rest);
        }
        self.lines
    }

    fn finish_line(&mut self) {
        let line = std::mem::take(&mut self.partial);
        if self.echo {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", line);
            let _ = out.flush();
        }
        self.lines.push(line);
    }
}

impl fmt::Write for CaptureConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut rest = s;
        while let Some(pos) = rest.find('\n') {
            self.partial.push_str(&rest[..pos]);
            self.finish_line();
            rest = &rest[pos + 1..];
        }
        self.partial.push_str(rest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    #[test]
    fn test_lines_split_across_writes() {
        let mut console = CaptureConsole::new(false);
        write!(console, "OK: de").unwrap();
        write!(console, "fault value detected\nDEBUG: ").unwrap();
        writeln!(console, "RX data: 1").unwrap();
        write!(console, "tail").unwrap();

        assert!(console.contains("OK: default value detected"));
        assert_eq!(
            console.into_lines(),
            vec!["OK: default value detected", "DEBUG: RX data: 1", "tail"]
        );
    }
}
