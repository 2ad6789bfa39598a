//! One-shot read commands. Each run starts from an empty overlay.

use anyhow::Result;
use clap::Args;
use storefront_catalog::{ProductId, ProductQuery};

use super::{Action, execute};
use crate::opts::GlobalOpts;
use crate::output::print_success;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive text matched against title and description
    #[arg(long)]
    pub search: Option<String>,

    /// Exact category to keep
    #[arg(long)]
    pub category: Option<String>,
}

impl ListArgs {
    fn query(&self) -> ProductQuery {
        ProductQuery {
            text: self.search.clone(),
            category: self.category.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Product identifier
    pub id: ProductId,
}

#[derive(Args, Debug)]
pub struct CategoryArgs {
    /// Category name (case-sensitive)
    pub name: String,
}

pub async fn cmd_list(opts: &GlobalOpts, args: &ListArgs) -> Result<()> {
    run(opts, Action::List(args.query())).await
}

pub async fn cmd_get(opts: &GlobalOpts, args: &GetArgs) -> Result<()> {
    run(opts, Action::Get(args.id)).await
}

pub async fn cmd_categories(opts: &GlobalOpts) -> Result<()> {
    run(opts, Action::Categories).await
}

pub async fn cmd_category(opts: &GlobalOpts, args: &CategoryArgs) -> Result<()> {
    run(opts, Action::Category(args.name.clone())).await
}

pub async fn cmd_summary(opts: &GlobalOpts) -> Result<()> {
    run(opts, Action::Summary).await
}

async fn run(opts: &GlobalOpts, action: Action) -> Result<()> {
    let store = opts.open_store()?;
    let rendered = execute(&store, action).await?;
    print_success(opts, rendered)
}
