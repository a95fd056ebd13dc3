//! `voxroute classify`: show how an utterance is routed without calling any
//! backend or touching the chat log.

use anyhow::Result;
use console::style;
use serde::Serialize;

use voxroute_core::classify::AgentClassifier;
use voxroute_core::nlp::Lemmatizer;
use voxroute_types::agent::AgentCategory;

#[derive(Debug, Serialize)]
pub struct Classification {
    pub input: String,
    pub lemmas: Vec<String>,
    pub agent: Option<AgentCategory>,
}

/// Lemmatize and classify `text` with the configured keyword table.
pub fn classification<L: Lemmatizer>(classifier: &AgentClassifier<L>, text: &str) -> Classification {
    let lemmas = classifier.lemmatizer().lemmatize(&text.to_lowercase());
    let agent = classifier.classify_lemmas(&lemmas);
    Classification {
        input: text.to_string(),
        lemmas,
        agent,
    }
}

/// Print the routing decision for `text`.
///
/// # Examples
///
/// ```bash
/// voxroute classify what is the weather tomorrow
/// voxroute classify "tell me a joke" --json
/// ```
pub fn classify<L: Lemmatizer>(classifier: &AgentClassifier<L>, text: &str, json: bool) -> Result<()> {
    let result = classification(classifier, text);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("Input: ").dim(), result.input);
    println!("  {} {}", style("Lemmas:").dim(), result.lemmas.join(" "));
    match result.agent {
        Some(agent) => println!("  {} {}", style("Agent: ").dim(), style(agent).green().bold()),
        None => println!("  {} {}", style("Agent: ").dim(), style("none (unknown)").yellow()),
    }
    println!();

    Ok(())
}
