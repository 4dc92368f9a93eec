use anyhow::Context as _;
use colored::Colorize;
use keycard_config::ProviderConfig;
use keycard_provider::{ActionType, ApplyResult, KeycardProvider, Plan, ResourceSet};
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;

/// Load the provider configuration and connect to the Keycard API
pub async fn configured_provider(config_path: Option<&Path>) -> anyhow::Result<KeycardProvider> {
    let config = match config_path {
        Some(path) => ProviderConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ProviderConfig::discover()?,
    };
    let resolved = config.with_env_fallbacks().resolve()?;
    tracing::debug!(endpoint = %resolved.endpoint, "Connecting to Keycard");

    let data = keycard_provider::connect(resolved).await?;
    let mut provider = KeycardProvider::new();
    provider.configure(Some(data));
    Ok(provider)
}

/// Parse a YAML or JSON file
pub fn load_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn load_desired(path: &Path) -> anyhow::Result<ResourceSet> {
    load_file(path)
}

pub fn print_plan(plan: &Plan) {
    if !plan.has_changes {
        println!("{}", "No changes. Resources match the desired state.".green());
        return;
    }

    for action in &plan.actions {
        let marker = match action.action_type {
            ActionType::Create => "+".green(),
            ActionType::Update => "~".yellow(),
            ActionType::Replace => "-/+".magenta(),
            ActionType::Delete => "-".red(),
            ActionType::NoOp => continue,
        };
        println!("  {} {} ({})", marker, action.id.bold(), action.action_type);

        let mut details: Vec<_> = action.details.iter().collect();
        details.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in details {
            println!("      {} = {}", key, value);
        }
    }

    println!();
    println!("Plan: {}", plan.summary().to_string().bold());
}

pub fn print_apply_result(result: &ApplyResult) {
    for success in &result.succeeded {
        println!("  {} {}", "✓".green(), success.message);
    }
    for failure in &result.failed {
        println!(
            "  {} {}: {}",
            "✗".red(),
            failure.action_id,
            failure.error.as_deref().unwrap_or("unknown error")
        );
    }
    println!(
        "{}",
        format!(
            "{} succeeded, {} failed in {}ms",
            result.succeeded.len(),
            result.failed.len(),
            result.duration_ms
        )
        .dimmed()
    );
}

/// Ask a yes/no question on stdin
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N]: ", prompt);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
