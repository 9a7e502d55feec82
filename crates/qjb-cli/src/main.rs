// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod cli;
mod client;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, ConfigCommand};
use qjb_core::ConfigValue;
use qjb_wire::Request;
use serde_json::Value;

fn parse_json(raw: &str, field: &'static str) -> anyhow::Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("parsing `--{field}` as JSON"))
}

fn parse_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        Vec::new()
    } else {
        raw.split(',').map(str::to_string).collect()
    }
}

fn to_request(command: Command) -> anyhow::Result<Request> {
    Ok(match command {
        Command::Put { queue, id, data, now, priority, tags, delay } => Request::Put {
            queue,
            id,
            data: parse_json(&data, "data")?,
            now,
            priority,
            tags: parse_tags(&tags),
            delay,
        },
        Command::Peek { queue, count, now } => Request::Peek { queue, count, now },
        Command::Pop { queue, worker, count, now, expires } => {
            Request::Pop { queue, worker, count, now, expires }
        }
        Command::Heartbeat { id, worker, now, data } => {
            let data = data.map(|raw| parse_json(&raw, "data")).transpose()?;
            Request::Heartbeat { id, worker, now, data }
        }
        Command::Complete { id, worker, queue, now, next, delay, data } => {
            let data = data.map(|raw| parse_json(&raw, "data")).transpose()?;
            Request::Complete { id, worker, queue, now, next, delay, data }
        }
        Command::Fail { id, worker, group, message, now, data } => {
            let data = data.map(|raw| parse_json(&raw, "data")).transpose()?;
            Request::Fail { id, worker, group, message, now, data }
        }
        Command::Cancel { id } => Request::Cancel { id },
        Command::Get { id } => Request::Get { id },
        Command::Config(ConfigCommand::Get { name }) => Request::GetConfig { name },
        Command::Config(ConfigCommand::Set { name, value }) => {
            Request::SetConfig { name, value: value.map(ConfigValue::from) }
        }
        Command::Queues { now } => Request::Queues { now },
        Command::Failed { group, start, limit } => Request::Failed { group, start, limit },
        Command::Stats { queue, date } => Request::Stats { queue, date },
        Command::Track { id } => Request::Track { id },
        Command::Untrack { id } => Request::Untrack { id },
        Command::Tracked => Request::TrackedAll,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let request = to_request(cli.command)?;
    let response = client::call(&cli.bind, request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
