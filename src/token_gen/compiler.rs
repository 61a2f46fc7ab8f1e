//! Contract compilation through `solc --standard-json`

use alloy::primitives::Bytes;
use serde_json::{json, Value};
use std::process::Stdio;
use std::str::FromStr;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, warn};
use crate::{
    errors::{BotError, BotResult},
    token_gen::template::ContractSource,
};

#[derive(Debug, Clone)]
pub struct CompiledContract {
    pub abi: Value,
    pub bytecode: Bytes,
}

fn compile_error(message: impl Into<String>) -> BotError {
    BotError::Compilation {
        message: message.into(),
        source: None,
    }
}

pub fn standard_input(contract: &ContractSource) -> Value {
    json!({
        "language": "Solidity",
        "sources": {
            format!("{}.sol", contract.contract_name): { "content": contract.source }
        },
        "settings": {
            "outputSelection": { "*": { "*": ["abi", "evm.bytecode.object"] } }
        }
    })
}

/// Extracts ABI and creation bytecode from solc's standard-json output.
pub fn parse_output(contract: &ContractSource, output: &Value) -> BotResult<CompiledContract> {
    if let Some(errors) = output.get("errors").and_then(Value::as_array) {
        let fatal: Vec<&str> = errors
            .iter()
            .filter(|e| e.get("severity").and_then(Value::as_str) == Some("error"))
            .filter_map(|e| e.get("formattedMessage").or_else(|| e.get("message")).and_then(Value::as_str))
            .collect();
        if !fatal.is_empty() {
            return Err(compile_error(fatal.join("\n")));
        }
        for warning in errors.iter().filter_map(|e| e.get("message").and_then(Value::as_str)) {
            debug!("solc: {}", warning);
        }
    }

    let file = format!("{}.sol", contract.contract_name);
    let unit = output
        .pointer(&format!("/contracts/{}/{}", file, contract.contract_name))
        .ok_or_else(|| compile_error(format!("{} missing from solc output", contract.contract_name)))?;

    let object = unit
        .pointer("/evm/bytecode/object")
        .and_then(Value::as_str)
        .filter(|o| !o.is_empty())
        .ok_or_else(|| compile_error("solc produced no bytecode"))?;
    let bytecode = Bytes::from_str(object).map_err(|e| BotError::Compilation {
        message: "bytecode is not valid hex".to_string(),
        source: Some(e.into()),
    })?;

    Ok(CompiledContract {
        abi: unit.get("abi").cloned().unwrap_or(Value::Null),
        bytecode,
    })
}

/// Runs the configured `solc` binary on the rendered source.
pub async fn compile(solc_path: &str, contract: &ContractSource) -> BotResult<CompiledContract> {
    let input = serde_json::to_vec(&standard_input(contract)).map_err(|e| BotError::Compilation {
        message: "failed to encode solc input".to_string(),
        source: Some(e.into()),
    })?;

    let mut child = Command::new(solc_path)
        .arg("--standard-json")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| BotError::Compilation {
            message: format!("failed to start {}", solc_path),
            source: Some(e.into()),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(&input).await.map_err(|e| BotError::Compilation {
            message: "failed to write solc input".to_string(),
            source: Some(e.into()),
        })?;
    }

    let output = child.wait_with_output().await.map_err(|e| BotError::Compilation {
        message: "solc did not finish".to_string(),
        source: Some(e.into()),
    })?;
    if !output.status.success() {
        warn!("⚠️ solc exited with {}", output.status);
    }

    let parsed: Value = serde_json::from_slice(&output.stdout).map_err(|e| BotError::Compilation {
        message: format!("unreadable solc output: {}", String::from_utf8_lossy(&output.stderr)),
        source: Some(e.into()),
    })?;
    parse_output(contract, &parsed)
}
