//! Output helpers for consistent CLI output.
//!
//! ```rust,ignore
//! use pkgstage::output::Output;
//!
//! Output::success("Staged vim for installation");
//! Output::warning("Package manager is disabled");
//! Output::change('+', "vim");
//! ```

use owo_colors::OwoColorize;

pub struct Output;

impl Output {
    /// `✓ Staged vim`
    pub fn success(msg: impl AsRef<str>) {
        println!("{} {}", "✓".green().bold(), msg.as_ref());
    }

    /// Printed to stderr.
    pub fn error(msg: impl AsRef<str>) {
        eprintln!("{} {}", "✗".red().bold(), msg.as_ref().red());
    }

    pub fn warning(msg: impl AsRef<str>) {
        println!("{} {}", "⚠".yellow(), msg.as_ref());
    }

    pub fn info(msg: impl AsRef<str>) {
        println!("{} {}", "→".cyan(), msg.as_ref().dimmed());
    }

    pub fn subheader(msg: impl AsRef<str>) {
        println!("{}", msg.as_ref().bold());
    }

    pub fn list_item(msg: impl AsRef<str>) {
        println!("  {}", msg.as_ref());
    }

    /// `  Status:        enabled`
    pub fn kv(key: impl AsRef<str>, value: impl AsRef<str>) {
        println!("  {:<14} {}", format!("{}:", key.as_ref()).cyan(), value.as_ref());
    }

    pub fn hint(msg: impl AsRef<str>) {
        println!("  {} {}", "→".cyan(), msg.as_ref());
    }

    /// A staged change, green for additions and red for removals.
    pub fn change(symbol: char, name: impl AsRef<str>) {
        match symbol {
            '+' => println!("  {} {}", "+".green().bold(), name.as_ref()),
            '-' => println!("  {} {}", "-".red().bold(), name.as_ref()),
            other => println!("  {} {}", other, name.as_ref()),
        }
    }

    pub fn dry_run(msg: impl AsRef<str>) {
        println!("{} {}", "[dry-run]".dimmed(), msg.as_ref().dimmed());
    }
}
