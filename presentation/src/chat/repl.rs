//! REPL (Read-Eval-Print Loop) for interactive group chat

use crate::output::ConsoleRenderer;
use crate::prompt::ConsolePermissionPrompt;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use roundtable_application::{
    ModelClient, PermissionGate, ProcessTurnInput, ProcessTurnUseCase, ToolExecutorPort, TurnEvent,
};
use roundtable_domain::{Conversation, Model, ModelCatalog, parse_mentions};
use std::sync::Arc;

const HISTORY_CAPACITY: usize = 500;

/// Interactive chat REPL
///
/// Owns the shared conversation. The history only grows after a turn
/// completes, so the snapshot each turn works on is never half-updated.
pub struct ChatRepl<C, T, G>
where
    C: ModelClient + 'static,
    T: ToolExecutorPort + 'static,
    G: PermissionGate + 'static,
{
    use_case: ProcessTurnUseCase<C, T, G>,
    models: Vec<Model>,
    catalog: Arc<ModelCatalog>,
    conversation: Conversation,
    renderer: ConsoleRenderer,
    prompt: ConsolePermissionPrompt,
}

impl<C, T, G> ChatRepl<C, T, G>
where
    C: ModelClient + 'static,
    T: ToolExecutorPort + 'static,
    G: PermissionGate + 'static,
{
    pub fn new(
        use_case: ProcessTurnUseCase<C, T, G>,
        models: Vec<Model>,
        catalog: Arc<ModelCatalog>,
    ) -> Self {
        Self {
            use_case,
            models,
            renderer: ConsoleRenderer::new(Arc::clone(&catalog)),
            catalog,
            conversation: Conversation::new(),
            prompt: ConsolePermissionPrompt,
        }
    }

    /// Disable the evaluation spinner (plain progress lines instead).
    pub fn with_spinner(mut self, enabled: bool) -> Self {
        self.renderer = self.renderer.with_spinner(enabled);
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut line_editor = Reedline::create();

        if let Some(path) = dirs::data_dir().map(|p| p.join("roundtable").join("history.txt")) {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(history) = FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
                line_editor = line_editor.with_history(Box::new(history));
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(">>>".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match line_editor.read_line(&prompt) {
                Ok(Signal::Success(buffer)) => {
                    let line = buffer.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.process_message(line).await;
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(Signal::CtrlD) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          Roundtable - Group Chat            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Participants: {}",
            self.models
                .iter()
                .map(|m| self.catalog.display_name(m))
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
        println!("Mention @<model> or @all to make someone speak;");
        println!("otherwise each model decides for itself.");
        println!();
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /models   - Show participants and their mention handles");
        println!("  /history  - Show the conversation so far");
        println!("  /quit     - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&self, cmd: &str) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /models          - Show participants and mention handles");
                println!("  /history         - Show the conversation so far");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            "/models" => {
                println!();
                println!("Participants:");
                for model in &self.models {
                    println!(
                        "  - {} (mention with @{})",
                        self.catalog.display_name(model),
                        model.as_str()
                    );
                }
                println!();
                false
            }
            "/history" => {
                println!();
                if self.conversation.is_empty() {
                    println!("No messages yet.");
                } else {
                    println!("{} messages:", self.conversation.len());
                    for message in self.conversation.messages() {
                        let who = match &message.model {
                            Some(model) => self.catalog.display_name(model),
                            None => format!("{:?}", message.role).to_lowercase(),
                        };
                        println!("  [{}] {}", who, Self::one_line(&message.content));
                    }
                }
                println!();
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_message(&mut self, line: &str) {
        let input = ProcessTurnInput::new(self.conversation.clone(), line);
        let mut handle = self.use_case.start(input);

        let mut responses = Vec::new();
        while let Some(event) = handle.next_event().await {
            self.renderer.render(&event);
            match event {
                TurnEvent::ToolPermissionRequest { model, request } => {
                    let name = self.catalog.display_name(&model);
                    self.prompt.ask(&name, request).await;
                }
                TurnEvent::TurnComplete {
                    responses: turn_responses,
                    ..
                } => responses = turn_responses,
                _ => {}
            }
        }

        // History grows only once the turn is over, so an interrupted
        // turn leaves the shared conversation untouched.
        let scan = parse_mentions(line);
        self.conversation.add_user_message(scan.clean_message);
        for response in responses {
            self.conversation
                .add_assistant_message(response.model, response.content);
        }
    }

    fn one_line(content: &str) -> String {
        let line = content.lines().next().unwrap_or("");
        if line.chars().count() > 72 {
            let cut: String = line.chars().take(72).collect();
            format!("{}...", cut)
        } else {
            line.to_string()
        }
    }
}
