//! `set` command

use anyhow::{Context, Result};
use colored::*;

use super::Session;
use crate::api::MutationRequest;
use crate::api::pluralization::collection_path;
use crate::cli::SetArgs;
use crate::cli::output::{describe, render_page};
use crate::config::AppConfig;

pub async fn handle_set_command(args: SetArgs, config: &AppConfig) -> Result<()> {
    let session = Session::connect(config)?;
    let request = MutationRequest::new(
        collection_path(&args.resource),
        &args.id,
        args.field,
        MutationRequest::parse_value(&args.value),
    );

    session
        .gateway()
        .mutate(&request, session.credential())
        .await
        .with_context(|| format!("Failed to update {}", request.path()))?;

    eprintln!(
        "{} {} {} = {}",
        "Updated".bright_green().bold(),
        request.record_id,
        request.field,
        request.new_value
    );

    // the backend is the source of truth, so show what it reports now
    let manager = session.list(&request.resource);
    let result = manager.refetch().await;
    if let Some(status) = describe(&manager.snapshot()) {
        eprintln!("{}", status);
    }

    let page = result.context("Update applied but the refreshed list could not be loaded")?;
    println!("{}", render_page(&page, args.format)?);
    Ok(())
}
