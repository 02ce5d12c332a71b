use anyhow::Result;

use crate::core::AppConfig;
use crate::gemini::GeminiClient;

/// Print the models the API key can use
pub async fn run(all: bool) -> Result<()> {
    let config = AppConfig::from_env()?;
    let key = &config.gemini_api_key;
    if key.is_ascii() && key.len() > 10 {
        println!(
            "Using API key: {}...{}",
            &key[..5],
            &key[key.len() - 5..]
        );
    }

    let client = GeminiClient::new(
        &config.gemini_api_hostname,
        &config.gemini_api_key,
        &config.gemini_model,
        None,
        config.gemini_timeout,
    )?;
    let models: Vec<_> = client
        .list_models()
        .await?
        .into_iter()
        .filter(|m| all || m.supports_generate_content())
        .collect();

    if models.is_empty() {
        println!("No models found with generateContent support.");
        return Ok(());
    }

    if all {
        println!("Available models:");
    } else {
        println!("Available models for generateContent:");
    }
    for m in models {
        match m.display_name {
            Some(display_name) => println!("- {} ({})", m.name, display_name),
            None => println!("- {}", m.name),
        }
    }

    Ok(())
}
