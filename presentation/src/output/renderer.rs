//! Console renderer for turn events

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use roundtable_application::TurnEvent;
use roundtable_domain::{Model, ModelCatalog, SpeakerDecision, ToolResult, Usage};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

const RESULT_PREVIEW_LEN: usize = 96;

/// Renders the turn event stream to stdout.
///
/// Speaker selection runs behind an indicatif spinner; everything after
/// it is plain line output so streamed chunks land unbuffered. The
/// permission dialog itself is rendered by the prompt adapter, not here.
pub struct ConsoleRenderer {
    catalog: Arc<ModelCatalog>,
    spinner: Option<ProgressBar>,
    use_spinner: bool,
    streamed: bool,
}

impl ConsoleRenderer {
    pub fn new(catalog: Arc<ModelCatalog>) -> Self {
        Self {
            catalog,
            spinner: None,
            use_spinner: true,
            streamed: false,
        }
    }

    /// Disable the spinner (plain text progress for dumb terminals).
    pub fn with_spinner(mut self, enabled: bool) -> Self {
        self.use_spinner = enabled;
        self
    }

    /// Render one event. Exhaustive over every variant so a new event
    /// kind fails to compile until it has a rendering.
    pub fn render(&mut self, event: &TurnEvent) {
        match event {
            TurnEvent::Thinking => {
                if self.use_spinner {
                    let pb = ProgressBar::new_spinner();
                    pb.set_style(Self::spinner_style());
                    pb.set_message("Deciding who speaks...");
                    pb.enable_steady_tick(Duration::from_millis(100));
                    self.spinner = Some(pb);
                } else {
                    println!("{} Deciding who speaks...", "->".cyan());
                }
            }
            TurnEvent::Evaluating { model } => {
                let name = self.catalog.display_name(model);
                if let Some(pb) = &self.spinner {
                    pb.set_message(format!("Evaluating {}...", name));
                } else {
                    println!("  {} evaluating {}", "?".dimmed(), name.dimmed());
                }
            }
            TurnEvent::WillSpeak(decision) => {
                self.stop_spinner();
                println!("{}", self.format_decision(decision));
            }
            TurnEvent::WillStaySilent(decision) => {
                self.stop_spinner();
                println!("{}", self.format_decision(decision));
            }
            TurnEvent::ResponseStart { model } => {
                self.stop_spinner();
                self.streamed = false;
                println!();
                println!("{}", self.banner(model));
            }
            TurnEvent::ResponseChunk { text, .. } => {
                self.streamed = true;
                print!("{}", text);
                let _ = std::io::stdout().flush();
            }
            TurnEvent::ResponseComplete { response, .. } => {
                if !self.streamed && !response.content.is_empty() {
                    println!("{}", response.content);
                } else if self.streamed {
                    println!();
                }
                if let Some(usage) = &response.usage {
                    println!("{}", Self::format_usage(usage).dimmed());
                }
            }
            TurnEvent::ToolCallRequested { call, .. } => {
                println!("  {} {}", "tool:".cyan().bold(), call.summary());
            }
            TurnEvent::ToolPermissionRequest { .. } => {
                // The permission prompt renders this one.
                self.stop_spinner();
            }
            TurnEvent::ToolExecuting { call, .. } => {
                println!("  {} {}", "running".dimmed(), call.summary().dimmed());
            }
            TurnEvent::ToolResultReady { result, .. } => {
                println!("{}", Self::format_tool_result(result));
            }
            TurnEvent::Error { model, message } => {
                self.stop_spinner();
                match model {
                    Some(model) => {
                        let name = self.catalog.display_name(model);
                        eprintln!("  {} {}: {}", "x".red(), name.red().bold(), message);
                    }
                    None => eprintln!("{} {}", "Error:".red().bold(), message),
                }
            }
            TurnEvent::TurnComplete { responses, usage } => {
                self.stop_spinner();
                if responses.is_empty() {
                    println!("{}", "(everyone stayed silent)".dimmed());
                }
                if !usage.is_empty() {
                    println!();
                    println!("{}", Self::format_usage(usage).dimmed());
                }
                println!();
            }
        }
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
    }

    fn banner(&self, model: &Model) -> String {
        format!("── {} ──", self.catalog.display_name(model))
            .yellow()
            .bold()
            .to_string()
    }

    fn format_decision(&self, decision: &SpeakerDecision) -> String {
        let name = self.catalog.display_name(&decision.model);
        if decision.should_speak {
            let note = if decision.is_forced {
                "mentioned".to_string()
            } else {
                format!("confidence {:.2}", decision.confidence)
            };
            format!("  {} {} will speak ({})", "v".green(), name.bold(), note)
        } else {
            format!(
                "  {} {} stays silent ({})",
                "-".dimmed(),
                name,
                decision.reason
            )
            .dimmed()
            .to_string()
        }
    }

    fn format_usage(usage: &Usage) -> String {
        let mut line = format!(
            "tokens: {} in / {} out",
            usage.prompt_tokens, usage.completion_tokens
        );
        if let Some(cost) = usage.cost {
            line.push_str(&format!(" (${:.4})", cost));
        }
        line
    }

    fn format_tool_result(result: &ToolResult) -> String {
        let preview = Self::preview(&result.content);
        if result.is_error {
            format!("  {} {}", "x".red(), preview)
        } else {
            format!("  {} {}", "->".dimmed(), preview.dimmed())
        }
    }

    /// First line of the content, truncated at a char boundary.
    fn preview(content: &str) -> String {
        let line = content.lines().next().unwrap_or("");
        if line.chars().count() > RESULT_PREVIEW_LEN {
            let cut: String = line.chars().take(RESULT_PREVIEW_LEN).collect();
            format!("{}...", cut)
        } else {
            line.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> ConsoleRenderer {
        colored::control::set_override(false);
        ConsoleRenderer::new(Arc::new(ModelCatalog::builtin())).with_spinner(false)
    }

    #[test]
    fn test_decision_lines() {
        let r = renderer();

        let speak = SpeakerDecision {
            model: Model::Gpt52,
            should_speak: true,
            confidence: 0.85,
            reason: "relevant".to_string(),
            is_forced: false,
        };
        let line = r.format_decision(&speak);
        assert!(line.contains("will speak"));
        assert!(line.contains("0.85"));

        let forced = SpeakerDecision::forced(Model::Gpt52, "mentioned by user");
        assert!(r.format_decision(&forced).contains("mentioned"));

        let silent = SpeakerDecision {
            model: Model::ClaudeSonnet45,
            should_speak: false,
            confidence: 0.2,
            reason: "nothing to add".to_string(),
            is_forced: false,
        };
        let line = r.format_decision(&silent);
        assert!(line.contains("stays silent"));
        assert!(line.contains("nothing to add"));
    }

    #[test]
    fn test_usage_line_with_and_without_cost() {
        let usage = Usage::new(300, 30);
        assert_eq!(ConsoleRenderer::format_usage(&usage), "tokens: 300 in / 30 out");

        let usage = usage.with_cost(0.0042);
        assert!(ConsoleRenderer::format_usage(&usage).ends_with("($0.0042)"));
    }

    #[test]
    fn test_tool_result_preview_truncates_to_first_line() {
        colored::control::set_override(false);
        let result = ToolResult::success("call_1", "line one\nline two");
        let line = ConsoleRenderer::format_tool_result(&result);
        assert!(line.contains("line one"));
        assert!(!line.contains("line two"));

        let long = "a".repeat(200);
        let result = ToolResult::error("call_1", long);
        assert!(ConsoleRenderer::format_tool_result(&result).contains("..."));
    }

    #[test]
    fn test_render_is_exhaustive_and_does_not_panic() {
        let mut r = renderer();
        r.render(&TurnEvent::Thinking);
        r.render(&TurnEvent::Evaluating {
            model: Model::Gpt52,
        });
        r.render(&TurnEvent::Error {
            model: None,
            message: "boom".to_string(),
        });
        r.render(&TurnEvent::TurnComplete {
            responses: vec![],
            usage: Usage::default(),
        });
    }
}
