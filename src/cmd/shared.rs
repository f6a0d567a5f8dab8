/*!
shared.rs - helpers shared by every resource command.

Focus:
  - Session: resolved settings + output mode
  - run: validate -> (confirm) -> dispatch -> select -> emit
  - parse_tags: repeatable KEY=VALUE flags
  - load_document: JSON or YAML file into a typed value
*/

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::format::{Role, StyleOptions, color, render};
use super::select::Selection;
use crate::api::model::Tags;
use crate::api::{ApiError, Client, Operation, Shape};
use crate::config::{Overrides, Settings};
use crate::utils;

/* ---- Session ---- */

/// Per-invocation context handed to every command.
///
/// Connection settings stay unresolved until a call is about to be sent, so
/// input errors are reported even when no region or endpoint is configured.
#[derive(Debug, Clone)]
pub struct Session {
    pub overrides: Overrides,
    pub json: bool,
}

impl Session {
    pub fn settings(&self) -> Result<Settings> {
        let settings = Settings::resolve(&self.overrides)?;
        debug!(endpoint = %settings.endpoint, region = %settings.region, "resolved settings");
        Ok(settings)
    }
}

/* ---- Common Flags ---- */

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// What to print: 'primary' (default), '*' for the whole response, '^Name' to echo an input
    #[arg(long, value_name = "SELECTION")]
    pub select: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Maximum number of items in this page
    #[arg(long, value_name = "N")]
    pub max_results: Option<u32>,

    /// Continuation marker from a previous page
    #[arg(long, value_name = "TOKEN")]
    pub next_token: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfirmArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/* ---- Run ---- */

/// Confirmation requirement for a destructive call.
pub struct Prompt<'a> {
    pub message: String,
    pub confirm: &'a ConfirmArgs,
}

/// Execute one operation end to end.
///
/// Inputs and `--select` are validated first, so a bad invocation never
/// prompts and never reaches the network.
pub fn run<O: Operation>(
    session: &Session,
    op: &O,
    output: &OutputArgs,
    prompt: Option<Prompt<'_>>,
) -> Result<()> {
    op.to_request()?;
    let selection = Selection::resolve(op, output.select.as_deref())?;

    if let Some(prompt) = prompt
        && !confirm(&prompt)?
    {
        info!("not confirmed; nothing sent");
        eprintln!("{}", color(Role::Warning, "Cancelled.", &StyleOptions::detect()));
        return Ok(());
    }

    let client = Client::new(session.settings()?.transport()?);
    let rt = runtime()?;
    let response = rt.block_on(client.call_until(op, interrupted()))?;

    emit(selection.project(&response), response.next_token(), session.json)
}

fn confirm(prompt: &Prompt<'_>) -> Result<bool> {
    if prompt.confirm.force {
        return Ok(true);
    }
    if !utils::stdin_is_interactive() {
        return Err(ApiError::InvalidParameter {
            name: "--force",
            reason: "confirmation needed but no terminal is attached".into(),
        }
        .into());
    }
    dialoguer::Confirm::new()
        .with_prompt(&prompt.message)
        .default(false)
        .interact()
        .context("failed to read confirmation")
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")
}

/// Resolves on Ctrl-C. Never resolves if the signal handler cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/* ---- Output ---- */

pub fn emit(value: Option<serde_json::Value>, next_token: Option<&str>, json: bool) -> Result<()> {
    if json {
        if let Some(v) = &value {
            println!("{}", serde_json::to_string_pretty(v)?);
        }
        if let Some(token) = next_token {
            eprintln!("{}", serde_json::json!({ "next_token": token }));
        }
        return Ok(());
    }

    let style = StyleOptions::detect();
    if let Some(v) = &value {
        let text = render(v, &style);
        if !text.is_empty() {
            println!("{text}");
        }
    }
    if let Some(token) = next_token {
        println!("{}", color(Role::Dim, format!("next token: {token}"), &style));
    }
    Ok(())
}

/* ---- Flag Parsing ---- */

/// Repeatable `KEY=VALUE` tag flags. Later keys win.
pub fn parse_tags(raw: &[String]) -> Result<Tags> {
    let mut tags = Tags::new();
    for kv in raw {
        match kv.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => {
                tags.insert(k.trim().to_string(), v.trim().to_string());
            }
            Some(_) => {
                return Err(ApiError::InvalidParameter {
                    name: "Tags",
                    reason: format!("empty key in '{kv}'"),
                }
                .into());
            }
            None => {
                return Err(ApiError::InvalidParameter {
                    name: "Tags",
                    reason: format!("expected KEY=VALUE, got '{kv}'"),
                }
                .into());
            }
        }
    }
    Ok(tags)
}

/// Load a JSON or YAML document (by extension; anything but .yaml/.yml is JSON).
/// YAML goes through a JSON value so tagged unions read the same either way.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    let lower = path.to_string_lossy().to_ascii_lowercase();

    let value: serde_json::Value = if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        let yaml_v: serde_yaml::Value =
            serde_yaml::from_str(&raw).context("failed to parse YAML file")?;
        serde_json::to_value(yaml_v).context("failed to convert YAML to JSON")?
    } else {
        serde_json::from_str(&raw).context("failed to parse JSON file")?
    };

    serde_json::from_value(value)
        .with_context(|| format!("unexpected document structure in {}", path.display()))
}
