use anyhow::{bail, Result};
use sd_ai::EmailRequest;

use super::{print_json, Session};

pub async fn concept(session: &Session, prompt: &str, json: bool) -> Result<()> {
    if prompt.trim().is_empty() {
        bail!("prompt must not be empty");
    }

    let concept = match session.assistant.concept(prompt).await {
        Ok(c) => c,
        Err(e) => bail!("concept generation failed: {e}"),
    };

    let Some(c) = concept else {
        if session.assistant.is_configured() {
            println!("The model returned no concept.");
        } else {
            println!(
                "AI assistant is not configured (set {}).",
                session.config.ai.api_key_env
            );
        }
        return Ok(());
    };

    if json {
        return print_json(&c);
    }

    println!("{}", c.title);
    println!();
    println!("Mood:     {}", c.mood);
    println!("Lighting: {}", c.lighting);
    println!("Outfits:");
    for o in &c.outfit_suggestions {
        println!("  - {o}");
    }
    println!("Poses:");
    for p in &c.pose_ideas {
        println!("  - {p}");
    }
    Ok(())
}

pub async fn email(
    session: &Session,
    client: String,
    scenario: String,
    tone: Option<String>,
) -> Result<()> {
    if client.trim().is_empty() || scenario.trim().is_empty() {
        bail!("--client and --scenario must not be empty");
    }
    let req = EmailRequest {
        client_name: client,
        scenario,
        tone,
    };
    println!("{}", session.assistant.email(&req).await);
    Ok(())
}
