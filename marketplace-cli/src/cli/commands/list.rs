//! `list` command

use anyhow::{Context, Result};

use super::Session;
use crate::api::{Filters, QueryBuilder};
use crate::cli::ListArgs;
use crate::cli::output::{describe, render_page};
use crate::config::AppConfig;

pub async fn handle_list_command(args: ListArgs, config: &AppConfig) -> Result<()> {
    let session = Session::connect(config)?;
    let manager = session.list(&args.resource);

    let descriptor = QueryBuilder::new()
        .page(args.page)
        .page_size(args.page_size)
        .sort_by(args.sort_by)
        .sort_order(args.sort_order)
        .filters(args.filters.into_iter().collect::<Filters>())
        .build();

    let result = manager.query(descriptor).await;
    if let Some(status) = describe(&manager.snapshot()) {
        eprintln!("{}", status);
    }

    let page = result.with_context(|| format!("Failed to list {}", manager.endpoint().path))?;
    println!("{}", render_page(&page, args.format)?);
    Ok(())
}
