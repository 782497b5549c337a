//! Terminal output for people, as opposed to `log` output for debugging

use colored::{ColoredString, Colorize};

fn mark(symbol: ColoredString, msg: &str) {
    println!("{symbol} {msg}");
}

pub fn info(msg: &str) {
    mark("ℹ".blue(), msg);
}

pub fn success(msg: &str) {
    mark("✓".green(), msg);
}

pub fn warn(msg: &str) {
    mark("⚠".yellow(), msg);
}

/// Errors go to stderr so they survive `> /dev/null`.
pub fn error(msg: &str) {
    eprintln!("{} {msg}", "✗".red().bold());
}

/// Secondary detail, indented under the line before it
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Title with an underline of the same width
pub fn header(title: &str) {
    let rule = "─".repeat(title.chars().count());
    println!("\n{}\n{}", title.bold(), rule.dimmed());
}

pub fn section(title: &str) {
    println!("\n{}", title.cyan().bold());
}

pub fn kv(key: &str, value: &str) {
    println!("  {:<16} {value}", format!("{key}:").dimmed());
}

/// `[2/5] Clone or pull repositories`
pub fn step(current: usize, total: usize, title: &str) {
    let counter = format!("[{current}/{total}]");
    println!("\n{} {}", counter.blue().bold(), title.bold());
}

pub fn banner() {
    let art = r"
  ┬─┐┬┌─┐┬ ┬┌─┐
  ├┬┘││ ┬│ │├─┘
  ┴└─┴└─┘└─┘┴
";
    println!("{}", art.cyan());
    println!("  {}\n", "workstation provisioning".dimmed());
}
