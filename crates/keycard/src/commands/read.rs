use super::Context;
use crate::utils;
use std::path::Path;

pub async fn handle(context: &Context, data_source: &str, file: &Path) -> anyhow::Result<()> {
    let config: serde_json::Value = utils::load_file(file)?;
    let result = context.provider.read_data_source(data_source, config).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
