//! Key command - print the cache key for the current manifest

use super::RunContext;
use crate::cache::derive_key;
use crate::error::StashResult;

/// Execute the key command
///
/// Prints only the key, so it can be captured by CI cache actions.
pub fn execute(ctx: &RunContext) -> StashResult<()> {
    let key = derive_key(&ctx.manifest_path)?;
    println!("{}", key);
    Ok(())
}
