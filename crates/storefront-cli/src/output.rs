//! Shared output helpers for human and JSON modes.
//!
//! Human mode prints primary data to stdout and failures to stderr.
//! JSON mode wraps results in `{ data }` and failures in `{ error }`.

use std::io::Write;

use anyhow::Result;
use serde_json::{Value, json};
use storefront_catalog::{CatalogSummary, OverlayStats, Product};

use crate::opts::GlobalOpts;

/// Result of one command: the JSON payload plus its human rendering.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub data: Value,
    pub human: String,
}

impl Rendered {
    pub fn new(data: Value, human: impl Into<String>) -> Self {
        Self {
            data,
            human: human.into(),
        }
    }
}

pub fn print_success(opts: &GlobalOpts, rendered: Rendered) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if opts.json_output() {
        write_json(&mut stdout, opts, json!({ "data": rendered.data }))?;
    } else if !rendered.human.is_empty() {
        writeln!(stdout, "{}", rendered.human)?;
    }
    Ok(())
}

pub fn print_failure(opts: &GlobalOpts, err: &anyhow::Error) -> Result<()> {
    if opts.json_output() {
        let mut stdout = std::io::stdout().lock();
        write_json(&mut stdout, opts, json!({ "error": format!("{err:#}") }))?;
    } else {
        writeln!(std::io::stderr(), "error: {err:#}")?;
    }
    Ok(())
}

fn write_json(out: &mut impl Write, opts: &GlobalOpts, value: Value) -> Result<()> {
    if opts.pretty {
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        writeln!(out, "{}", serde_json::to_string(&value)?)?;
    }
    out.flush()?;
    Ok(())
}

pub fn product_line(product: &Product) -> String {
    format!(
        "#{:<5} {:<40} ${:>8.2}  [{}]",
        product.id, product.title, product.price, product.category
    )
}

pub fn product_lines(products: &[Product]) -> String {
    if products.is_empty() {
        return "(no products)".into();
    }
    products
        .iter()
        .map(product_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn product_detail(product: &Product) -> String {
    let mut lines = vec![
        format!("id:          {}", product.id),
        format!("title:       {}", product.title),
        format!("price:       ${:.2}", product.price),
        format!("category:    {}", product.category),
        format!("description: {}", product.description),
        format!("image:       {}", product.image),
    ];
    if let Some(rating) = product.rating {
        lines.push(format!("rating:      {:.1} ({} reviews)", rating.rate, rating.count));
    }
    lines.join("\n")
}

pub fn summary_text(summary: &CatalogSummary) -> String {
    format!(
        "products:   {}\ntotal:      ${:.0}\ncategories: {}",
        summary.total_products, summary.total_value, summary.category_count
    )
}

pub fn stats_text(stats: &OverlayStats) -> String {
    format!(
        "edited:     {}\ndeleted:    {}\nnext id:    {}",
        stats.edited, stats.tombstoned, stats.next_id
    )
}
