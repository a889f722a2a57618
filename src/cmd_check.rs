//! `check` subcommand.

use std::io::Read;

use proofmark_config::Config;
use proofmark_core::correction::correct;
use proofmark_core::{diff, render_inline, word_count};

use crate::register::build_provider;

/// Correct one piece of text and print the result as an inline word diff.
pub(crate) async fn handle_check(
    config: &Config,
    text: Option<String>,
    stdin: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = match (text, stdin) {
        (Some(text), _) => text,
        (None, true) => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        (None, false) => return Err("Provide TEXT or --stdin".into()),
    };

    if word_count(&text) < config.overlay.min_words {
        println!("Need at least {} words to check.", config.overlay.min_words);
        return Ok(());
    }

    let provider = build_provider(&config.provider);
    let corrected = correct(provider.as_ref(), &text).await?;
    println!("{}", describe(&text, &corrected));
    Ok(())
}

fn describe(original: &str, corrected: &str) -> String {
    if original == corrected {
        "No corrections".to_string()
    } else {
        render_inline(&diff(original, corrected))
    }
}
