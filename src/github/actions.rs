//! Workflow commands understood by the GitHub Actions runner.

/// Escape a message the way the runner expects command data
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Format an `::error::` command
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Mark the current run as failed with the given message
pub fn set_failed(message: &str) {
    println!("{}", error_command(message));
}
