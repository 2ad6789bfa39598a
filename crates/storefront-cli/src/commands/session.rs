//! Interactive session: one live store, one command per stdin line.
//!
//! ```text
//! create {"title":"Latte","price":4.0,"category":"coffee"}
//! update 1000 {"price":4.5}
//! delete 3
//! list
//! ```

use anyhow::{Context, Result, anyhow, bail};
use storefront_catalog::{NewProduct, ProductId, ProductPatch, ProductQuery};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::{Action, execute};
use crate::opts::GlobalOpts;
use crate::output::{Rendered, print_failure, print_success};

const HELP: &str = "\
commands:
  list                     all products
  search <text>            products whose title or description contains <text>
  get <id>                 one product
  categories               distinct categories
  category <name>          products in <name>
  summary                  product count, total value, category count
  stats                    local overlay counters
  create <json>            add a product, e.g. {\"title\":\"Latte\",\"price\":4,\"category\":\"coffee\"}
  update <id> <json>       patch fields, e.g. update 3 {\"price\":9.5}
  delete <id>              remove a product
  help                     this text
  quit                     end the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Run(Action),
    Help,
    Quit,
}

/// Parses one session line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "list" => {
            expect_no_args(verb, rest)?;
            SessionCommand::Run(Action::List(ProductQuery::new()))
        }
        "search" => SessionCommand::Run(Action::List(ProductQuery::new().text(rest))),
        "get" => SessionCommand::Run(Action::Get(parse_id(rest)?)),
        "categories" => {
            expect_no_args(verb, rest)?;
            SessionCommand::Run(Action::Categories)
        }
        "category" => {
            if rest.is_empty() {
                bail!("usage: category <name>");
            }
            SessionCommand::Run(Action::Category(rest.to_string()))
        }
        "summary" => {
            expect_no_args(verb, rest)?;
            SessionCommand::Run(Action::Summary)
        }
        "stats" => {
            expect_no_args(verb, rest)?;
            SessionCommand::Run(Action::Stats)
        }
        "create" => {
            let payload: NewProduct =
                serde_json::from_str(rest).context("create expects a JSON product payload")?;
            SessionCommand::Run(Action::Create(payload))
        }
        "update" => {
            let (id, json) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: update <id> <json>"))?;
            let patch: ProductPatch =
                serde_json::from_str(json.trim()).context("update expects a JSON patch")?;
            SessionCommand::Run(Action::Update(parse_id(id)?, patch))
        }
        "delete" => SessionCommand::Run(Action::Delete(parse_id(rest)?)),
        "help" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

fn parse_id(raw: &str) -> Result<ProductId> {
    raw.trim()
        .parse::<ProductId>()
        .with_context(|| format!("invalid product id '{}'", raw.trim()))
}

fn expect_no_args(verb: &str, rest: &str) -> Result<()> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("'{verb}' takes no arguments"))
    }
}

pub async fn cmd_session(opts: &GlobalOpts) -> Result<()> {
    let store = opts.open_store()?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut handled = 0usize;

    while let Some(line) = lines.next_line().await.context("read session input")? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                print_failure(opts, &err)?;
                continue;
            }
        };
        match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => print_success(opts, Rendered::new(HELP.into(), HELP))?,
            SessionCommand::Run(action) => match execute(&store, action).await {
                Ok(rendered) => print_success(opts, rendered)?,
                Err(err) => print_failure(opts, &err)?,
            },
        }
        handled += 1;
    }

    debug!(handled, "session ended");
    Ok(())
}
