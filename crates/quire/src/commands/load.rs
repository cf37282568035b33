//! Load a single module through the loader chain.

use anyhow::{anyhow, Result};
use quire_loader::LoaderChain;

/// Run the load command.
pub fn run(chain: &LoaderChain, id: &str, json: bool) -> Result<()> {
    println!("{}", render(chain, id, json)?);
    Ok(())
}

/// Load `id` and render the module body, or the whole load result as JSON.
pub fn render(chain: &LoaderChain, id: &str, json: bool) -> Result<String> {
    let claimed = chain
        .load(id)?
        .ok_or_else(|| anyhow!("No loader handles {id}"))?;

    tracing::debug!("{} loaded by the {} loader", id, claimed.loader);

    if json {
        Ok(serde_json::to_string_pretty(&claimed.result)?)
    } else {
        Ok(claimed.result.code)
    }
}
