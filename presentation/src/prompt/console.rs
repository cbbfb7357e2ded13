//! Terminal y/n dialog for gated tool calls.

use colored::Colorize;
use roundtable_application::PermissionRequest;
use std::io::Write;

/// Asks the human to approve or deny a gated tool call.
///
/// Reads one line from stdin on a blocking thread so the event loop
/// stays live. Anything other than an explicit yes is a denial, and a
/// failed read drops the request, which the orchestrator also treats
/// as denial.
pub struct ConsolePermissionPrompt;

impl ConsolePermissionPrompt {
    pub async fn ask(&self, model_name: &str, request: PermissionRequest) {
        println!();
        println!(
            "{} {} wants to run: {}",
            "!".yellow().bold(),
            model_name.bold(),
            request.call.summary().yellow()
        );
        print!("  Allow? [y/N] ");
        let _ = std::io::stdout().flush();

        let answer = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await;

        match answer {
            Ok(Ok(line)) if Self::is_yes(&line) => request.allow(),
            Ok(Ok(_)) => request.deny("denied by user"),
            Ok(Err(_)) | Err(_) => drop(request),
        }
    }

    fn is_yes(line: &str) -> bool {
        matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes_accepts_only_explicit_yes() {
        assert!(ConsolePermissionPrompt::is_yes("y\n"));
        assert!(ConsolePermissionPrompt::is_yes("  YES  "));
        assert!(!ConsolePermissionPrompt::is_yes(""));
        assert!(!ConsolePermissionPrompt::is_yes("n"));
        assert!(!ConsolePermissionPrompt::is_yes("yep"));
    }
}
