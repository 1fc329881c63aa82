// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use doctree::MethodCall;
use serde_json::Value;

use crate::common::HostContext;

/// Call command - send a raw method call and report the JSON reply
///
/// `arguments` is a JSON object using the keys `rootUri`, `path` and
/// `data`; omitted means no arguments.
pub fn call_command<F>(
    context: &HostContext,
    method: &str,
    arguments: Option<&str>,
    mut handler: F,
) -> Result<()>
where
    F: FnMut(&str),
{
    let arguments: Value = match arguments {
        Some(json) => serde_json::from_str(json)
            .with_context(|| format!("Failed to parse arguments for {}", method))?,
        None => Value::Null,
    };
    let reply = context.call(MethodCall::new(method, arguments))?;
    handler(&reply.into_value().to_string());
    Ok(())
}
