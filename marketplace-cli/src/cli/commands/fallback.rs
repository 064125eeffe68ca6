//! `fallback` command

use anyhow::{Result, anyhow};

use crate::api::{FallbackCategory, FallbackResolver};
use crate::cli::FallbackArgs;
use crate::cli::output::render_page;

pub fn handle_fallback_command(args: FallbackArgs) -> Result<()> {
    let category: FallbackCategory = args.category.parse().map_err(|e: String| anyhow!(e))?;
    let page = FallbackResolver::new().resolve(category);
    println!("{}", render_page(&page, args.format)?);
    Ok(())
}
