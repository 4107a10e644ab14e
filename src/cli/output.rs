//! Output formatting module for ansible-launch
//!
//! Provides colored human output and a JSON mode for scripting.

use colored::Colorize;
use std::io::{self, Write};

/// Output formatter for different output modes
pub struct OutputFormatter {
    /// Use colored output
    use_color: bool,
    /// JSON output mode
    json_mode: bool,
    /// Verbosity level
    verbosity: u8,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(use_color: bool, json_mode: bool, verbosity: u8) -> Self {
        // Respect NO_COLOR environment variable
        let use_color = use_color && std::env::var("NO_COLOR").is_err();

        Self {
            use_color,
            json_mode,
            verbosity,
        }
    }

    /// Whether JSON output was requested
    pub fn is_json(&self) -> bool {
        self.json_mode
    }

    /// Print a plain line to stdout
    pub fn line(&self, text: &str) {
        println!("{}", text);
    }

    /// Print an info message (verbosity >= 1)
    pub fn info(&self, message: &str) {
        if self.json_mode || self.verbosity < 1 {
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "INFO:".bright_blue().bold(), message);
        } else {
            eprintln!("INFO: {}", message);
        }
    }

    /// Print a debug message (verbosity >= 2)
    pub fn debug(&self, message: &str) {
        if self.json_mode || self.verbosity < 2 {
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "DEBUG:".bright_black(), message.bright_black());
        } else {
            eprintln!("DEBUG: {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.json_mode {
            let warning = serde_json::json!({
                "type": "warning",
                "message": message
            });
            eprintln!("{}", warning);
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "WARNING:".yellow().bold(), message);
        } else {
            eprintln!("WARNING: {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.json_mode {
            let error = serde_json::json!({
                "type": "error",
                "message": message
            });
            eprintln!("{}", error);
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "ERROR:".red().bold(), message);
        } else {
            eprintln!("ERROR: {}", message);
        }
    }

    /// Print a JSON document to stdout
    pub fn json(&self, value: &serde_json::Value) {
        println!("{:#}", value);
    }

    /// Print a table
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        if self.json_mode {
            let table = serde_json::json!({
                "type": "table",
                "headers": headers,
                "rows": rows
            });
            self.json(&table);
            return;
        }

        // Calculate column widths
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.len());
                }
            }
        }

        let header_line = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:width$}", h, width = *w))
            .collect::<Vec<_>>()
            .join(" | ");

        if self.use_color {
            println!("{}", header_line.bright_white().bold());
        } else {
            println!("{}", header_line);
        }

        let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        if self.use_color {
            println!("{}", sep.join("-+-").bright_black());
        } else {
            println!("{}", sep.join("-+-"));
        }

        for row in rows {
            let row_line = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:width$}", cell, width = *w))
                .collect::<Vec<_>>()
                .join(" | ");
            println!("{}", row_line.trim_end());
        }
    }

    /// Flush stdout
    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_mode_flag() {
        assert!(OutputFormatter::new(false, true, 0).is_json());
        assert!(!OutputFormatter::new(true, false, 0).is_json());
    }
}
