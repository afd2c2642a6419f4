use colored::Colorize;
use console::Term;
use std::io;

use crate::application::services::config_validator::Violation;
use crate::domain::entities::operation_results::BatchSummary;

/// Terminal output primitives shared by the command handlers
#[derive(Debug, Clone)]
pub struct DisplayHelper {
    pub use_color: bool,
    pub verbose: bool,
}

impl DisplayHelper {
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Colors only when requested and stdout is a terminal
    pub fn detect(no_color: bool, verbose: bool) -> Self {
        let use_color =
            !no_color && Term::stdout().is_term() && std::env::var_os("NO_COLOR").is_none();
        Self::new(use_color, verbose)
    }

    pub fn success(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "✓".green().bold(), message);
        } else {
            println!("[OK] {}", message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "✗".red().bold(), message);
        } else {
            eprintln!("[ERROR] {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "⚠".yellow().bold(), message);
        } else {
            println!("[WARNING] {}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "::".blue().bold(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    /// Only printed with `--verbose`
    pub fn debug(&self, message: &str) {
        if !self.verbose {
            return;
        }
        if self.use_color {
            println!("{} {}", "->".dimmed(), message.dimmed());
        } else {
            println!("[DEBUG] {}", message);
        }
    }

    /// Hint printed under an error on stderr
    pub fn hint(&self, recommendation: &str) {
        if recommendation.is_empty() {
            return;
        }
        if self.use_color {
            eprintln!("  {} {}", "hint:".cyan().bold(), recommendation);
        } else {
            eprintln!("  hint: {}", recommendation);
        }
    }

    /// An error followed by the action that fixes it
    pub fn failure(&self, message: &str, recommendation: &str) {
        self.error(message);
        self.hint(recommendation);
    }

    /// Every violation of a rejected configuration, each with its fix
    pub fn violations(&self, violations: &[Violation]) {
        for violation in violations {
            if self.use_color {
                eprintln!("  {} {}", "•".red(), violation);
            } else {
                eprintln!("  - {}", violation);
            }
            self.print_indented_err(&format!("fix: {}", violation.recommendation()), 2);
        }
    }

    pub fn section_header(&self, title: &str) {
        if self.use_color {
            println!("\n{}", title.bold().underline());
        } else {
            println!("\n=== {} ===", title);
        }
    }

    pub fn format_path(&self, path: &str) -> String {
        if self.use_color {
            path.cyan().to_string()
        } else {
            format!("'{}'", path)
        }
    }

    pub fn format_repo(&self, repo: &str) -> String {
        if self.use_color {
            repo.cyan().bold().to_string()
        } else {
            repo.to_string()
        }
    }

    pub fn format_branch(&self, branch: &str) -> String {
        if self.use_color {
            branch.green().to_string()
        } else {
            format!("'{}'", branch)
        }
    }

    pub fn format_command(&self, command: &str) -> String {
        if self.use_color {
            command.magenta().bold().to_string()
        } else {
            format!("`{}`", command)
        }
    }

    pub fn format_duration_ms(&self, duration_ms: u64) -> String {
        if duration_ms >= 60_000 {
            format!("{}m {}s", duration_ms / 60_000, (duration_ms % 60_000) / 1000)
        } else if duration_ms >= 1000 {
            format!("{}.{}s", duration_ms / 1000, (duration_ms % 1000) / 100)
        } else {
            format!("{}ms", duration_ms)
        }
    }

    pub fn print_indented(&self, message: &str, level: usize) {
        println!("{}{}", "  ".repeat(level), message);
    }

    fn print_indented_err(&self, message: &str, level: usize) {
        eprintln!("{}{}", "  ".repeat(level), message);
    }

    /// Block of command output, one indented line per output line
    pub fn print_block(&self, text: &str, level: usize) {
        for line in text.lines() {
            self.print_indented(line, level);
        }
    }

    /// Final line of every batch
    pub fn print_summary(&self, operation: &str, summary: &BatchSummary) {
        let line = format!(
            "{}: {} repositories, {} succeeded, {} failed",
            operation, summary.total, summary.success_count, summary.failure_count
        );
        println!();
        if summary.is_success() {
            self.success(&line);
        } else {
            self.error(&line);
        }
    }

    /// Ask a yes/no question; anything but `y`/`yes` declines, as does a non-interactive stdout
    /// Ask on stderr so stdout stays machine-readable
    pub fn confirm(&self, message: &str) -> io::Result<bool> {
        let term = Term::stderr();
        let prompt = if self.use_color {
            format!("{} {} [y/N]: ", "?".yellow().bold(), message)
        } else {
            format!("[CONFIRM] {} [y/N]: ", message)
        };
        term.write_str(&prompt)?;
        let input = term.read_line()?;
        Ok(is_affirmative(&input))
    }
}

fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
