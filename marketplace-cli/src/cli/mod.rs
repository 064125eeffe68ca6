//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};

use crate::api::SortOrder;

#[derive(Parser, Debug)]
#[command(name = "marketplace-cli", version, about = "Query and update storefront data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List one page of a resource (products, categories, orders, users, vendors)
    List(ListArgs),
    /// Change one field of one record, then show the refreshed page
    Set(SetArgs),
    /// Print a bundled fallback dataset
    Fallback(FallbackArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Resource or entity name (e.g. "orders", "category")
    pub resource: String,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = 10)]
    pub page_size: u32,

    #[arg(long, default_value = "created_at")]
    pub sort_by: String,

    #[arg(long, default_value = "desc", value_parser = parse_sort_order)]
    pub sort_order: SortOrder,

    /// Filter as key=value; repeatable
    #[arg(long = "filter", short = 'f', value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SetArgs {
    /// Resource name (e.g. "orders", "vendors")
    pub resource: String,
    pub id: String,
    pub field: String,
    /// New value; JSON literals (true, 12, "x") are sent as-is
    pub value: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct FallbackArgs {
    /// products or categories
    pub category: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonCompact,
    Csv,
}

fn parse_sort_order(raw: &str) -> Result<SortOrder, String> {
    raw.parse()
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    crate::api::Filters::parse_pair(raw)
}
