//! Interactive terminal chat session against a running advisory server.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::info;

use crate::classify::QuestionStyle;
use crate::config::{ClientConfig, DEFAULT_LANGUAGE};
use crate::controller::{AdvisoryClient, ChatController, SubmitOutcome};
use crate::language::{LanguageEvents, LanguageStore};
use crate::render;

pub async fn run_chat(config: ClientConfig, style: QuestionStyle) -> Result<()> {
    let store = LanguageStore::new(&config.prefs_path);
    // Explicit flag wins, then the persisted preference, then the default.
    let language = config
        .language
        .clone()
        .or_else(|| store.load())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let mut events = LanguageEvents::new();
    events.subscribe(Box::new(store));

    let client = AdvisoryClient::new(config.server_url.clone());
    let mut controller = ChatController::new(client, language.clone(), style);

    info!(server = %config.server_url, %language, "chat session started");
    println!("{}", render::header("ShopScout", &language));
    println!("Type a message, /lang <code> to switch language, /quit to exit.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line == "/quit" {
            break;
        }
        if let Some(code) = line.strip_prefix("/lang ") {
            let code = code.trim();
            if !code.is_empty() {
                controller.set_language(code);
                events.emit(code);
                println!("language set to {code}");
            }
            continue;
        }

        let before = controller.messages().len();
        match controller.submit(line).await {
            SubmitOutcome::Submitted => {
                for message in &controller.messages()[before + 1..] {
                    println!("{}", render::render_message(message));
                }
            }
            SubmitOutcome::Ignored => {}
            SubmitOutcome::Failed(reason) => {
                // Transient notification only; the conversation is intact
                // and the user can simply resubmit.
                println!("(request failed: {reason})");
            }
        }
    }

    info!("chat session finished");
    Ok(())
}
