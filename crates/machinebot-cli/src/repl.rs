use std::future::Future;
use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use machinebot_core::{log_error, Logger, Orchestrator, ToolResult, TurnObserver};

/// What a line of user input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// End the session
    Quit,
    /// Nothing to send
    Blank,
    /// Send this text to the model
    Message(String),
}

/// Classify a line typed at the prompt
pub fn parse_input(line: &str) -> Input {
    let text = line.trim();
    if text.is_empty() {
        return Input::Blank;
    }
    match text.to_lowercase().as_str() {
        "quit" | "exit" | "q" => Input::Quit,
        _ => Input::Message(text.to_string()),
    }
}

/// Prints a line for each tool the model asked for
pub struct ProgressObserver;

impl TurnObserver for ProgressObserver {
    fn tool_started(&self, name: &str) {
        println!("  Running {}...", name);
    }

    fn tool_finished(&self, result: &ToolResult) {
        if result.is_error {
            println!("  {} failed", result.tool_name);
        }
    }
}

/// Print the greeting shown before the first prompt
pub fn print_banner(out: &mut impl Write, provider: &str, model: &str) -> Result<()> {
    writeln!(out, "My Machine Bot")?;
    writeln!(out, "A local AI assistant that knows about your system ({}/{})", provider, model)?;
    writeln!(out)?;
    writeln!(out, "Ask me about your CPU, memory, disk, network, processes, and more!")?;
    writeln!(out, "Type 'quit' or 'exit' to leave.")?;
    Ok(())
}

/// Resolves when the user presses Ctrl-C
///
/// Never resolves if the signal handler cannot be installed.
pub async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Read lines until quit, EOF or an interrupt, answering each one
///
/// `interrupt` is polled both at the prompt and while a turn runs; when it
/// fires mid-turn the orchestrator's cancel token is tripped and the session
/// ends. Backend errors are reported and the session continues.
pub async fn run_session<R, I, F>(
    bot: &mut Orchestrator,
    input: R,
    out: &mut impl Write,
    logger: &dyn Logger,
    interrupt: I,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    I: Fn() -> F,
    F: Future<Output = ()>,
{
    let mut lines = input.lines();
    let cancel = bot.cancel_token().clone();

    loop {
        write!(out, "\nYou: ")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupt() => {
                writeln!(out)?;
                None
            }
        };

        let Some(line) = line else {
            writeln!(out, "\nGoodbye!")?;
            break;
        };

        let text = match parse_input(&line) {
            Input::Quit => {
                writeln!(out, "\nGoodbye!")?;
                break;
            }
            Input::Blank => continue,
            Input::Message(text) => text,
        };

        let outcome = tokio::select! {
            outcome = bot.send(&text) => Some(outcome),
            _ = interrupt() => None,
        };

        match outcome {
            Some(Ok(reply)) => {
                writeln!(out, "\nBot:")?;
                writeln!(out, "{}", reply.content)?;
            }
            Some(Err(e)) => {
                log_error!(logger, "[Session] Turn failed: {}", e);
                writeln!(out, "\nError: {}", e)?;
            }
            None => {
                cancel.cancel();
                logger.info("[Session] Interrupted during a turn");
                writeln!(out, "\n\nGoodbye!")?;
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use machinebot_core::{
        CancellationToken, MockProvider, NoOpLogger, ProviderModelConfig, ToolRegistry,
    };

    fn never() -> impl Future<Output = ()> {
        std::future::pending()
    }

    fn bot(replies: &[&str]) -> (Orchestrator, Arc<MockProvider>) {
        let provider = Arc::new(MockProvider::scripted(replies.to_vec(), Arc::new(NoOpLogger)));
        let bot = Orchestrator::new(
            provider.clone(),
            ProviderModelConfig::new("llama3.2"),
            Arc::new(ToolRegistry::new()),
            Arc::new(NoOpLogger),
        );
        (bot, provider)
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("quit"), Input::Quit);
        assert_eq!(parse_input("  EXIT "), Input::Quit);
        assert_eq!(parse_input("Q"), Input::Quit);
        assert_eq!(parse_input("   "), Input::Blank);
        assert_eq!(parse_input(""), Input::Blank);
        assert_eq!(
            parse_input(" how much RAM? "),
            Input::Message("how much RAM?".to_string())
        );
        assert_eq!(parse_input("quitting time"), Input::Message("quitting time".to_string()));
    }

    #[tokio::test]
    async fn test_session_until_quit() {
        let (mut bot, provider) = bot(&["Hello!", "Still here."]);
        let mut out = Vec::new();

        run_session(&mut bot, &b"hi\n\n   \nagain\nquit\nnever sent\n"[..], &mut out, &NoOpLogger, never)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(provider.call_count(), 2);
        assert!(text.contains("Bot:\nHello!\n"));
        assert!(text.contains("Bot:\nStill here.\n"));
        assert!(text.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_session_survives_backend_error() {
        let (mut bot, provider) = bot(&["__ERROR__:connection refused", "Recovered."]);
        let mut out = Vec::new();

        run_session(&mut bot, &b"one\ntwo\n"[..], &mut out, &NoOpLogger, never)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(provider.call_count(), 2);
        assert!(text.contains("Error: "));
        assert!(text.contains("connection refused"));
        assert!(text.contains("Bot:\nRecovered.\n"));
        // EOF ends the session
        assert!(text.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_interrupt_during_turn_ends_session() {
        let provider = Arc::new(
            MockProvider::scripted(["first reply is slow", "second"], Arc::new(NoOpLogger))
                .with_chunk_size(2)
                .with_delay(100),
        );
        let token = CancellationToken::new();
        let mut bot = Orchestrator::new(
            provider.clone(),
            ProviderModelConfig::new("llama3.2"),
            Arc::new(ToolRegistry::new()),
            Arc::new(NoOpLogger),
        )
        .with_cancel_token(token.clone());
        let mut out = Vec::new();

        // Lines are ready at once, so only the running turn can lose the race
        let interrupt = || tokio::time::sleep(Duration::from_millis(250));
        run_session(&mut bot, &b"one\ntwo\n"[..], &mut out, &NoOpLogger, interrupt)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(provider.call_count(), 1);
        assert!(token.is_cancelled());
        assert!(!text.contains("Bot:"));
        assert!(text.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_banner() {
        let mut out = Vec::new();
        print_banner(&mut out, "ollama", "llama3.2").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(ollama/llama3.2)"));
        assert!(text.contains("'quit'"));
    }
}
