//! Ad-hoc bytecode execution

use clap::Args;
use ember_evm::{Address, CallContext, Environment, Evm, InMemoryWorld, Outcome, Word};
use serde_json::{json, Value};

use crate::{config::CliConfig, output::Output, CliError};

/// Arguments for `ember exec`
#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Bytecode as hex, with or without 0x
    pub code: String,
    /// Call data as hex
    #[arg(long)]
    pub calldata: Option<String>,
    /// Address of the executing contract
    #[arg(long)]
    pub address: Option<String>,
    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExecArgs {
    /// Execute against an empty world and print the outcome
    pub fn execute(&self, config: &CliConfig) -> Result<(), CliError> {
        let code = parse_hex(&self.code)?;
        let data = self
            .calldata
            .as_deref()
            .map(parse_hex)
            .transpose()?
            .unwrap_or_default();
        let address = match &self.address {
            Some(s) => Address::from_hex(s).map_err(|e| CliError::InvalidAddress(e.to_string()))?,
            None => Address::ZERO,
        };

        let env = Environment {
            call: CallContext::new(address, Address::ZERO, Word::zero(), data),
            ..Default::default()
        };
        let world = InMemoryWorld::new();
        let outcome = Evm::new(&world)
            .with_config(config.evm.clone())
            .execute_isolated(&code, &env);

        tracing::debug!("exec finished: {:?}", outcome.halt);
        render(&outcome, self.json).print();
        Ok(())
    }
}

/// Decode a hex string, with or without 0x
pub fn parse_hex(s: &str) -> Result<Vec<u8>, CliError> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| CliError::InvalidHex(e.to_string()))
}

fn word_hex(w: &Word) -> String {
    format!("{:#x}", w)
}

/// Outcome as a JSON value with hex-encoded words and bytes
pub fn outcome_json(outcome: &Outcome) -> Value {
    let logs: Vec<Value> = outcome
        .logs
        .iter()
        .map(|log| {
            json!({
                "address": log.address.to_string(),
                "topics": log.topics.iter().map(word_hex).collect::<Vec<_>>(),
                "data": format!("0x{}", hex::encode(&log.data)),
            })
        })
        .collect();

    json!({
        "stack": outcome.stack.iter().map(word_hex).collect::<Vec<_>>(),
        "logs": logs,
        "return": format!("0x{}", hex::encode(&outcome.return_data)),
        "success": outcome.success,
        "halt": format!("{:?}", outcome.halt),
        "error": outcome.error.as_ref().map(|e| e.to_string()),
    })
}

fn render(outcome: &Outcome, json: bool) -> Output {
    let mut lines = vec![
        format!("success: {}", outcome.success),
        format!("halt:    {:?}", outcome.halt),
    ];
    if let Some(err) = &outcome.error {
        lines.push(format!("error:   {}", err));
    }
    lines.push(format!(
        "return:  0x{}",
        hex::encode(&outcome.return_data)
    ));
    lines.push("stack (top first):".to_string());
    for w in &outcome.stack {
        lines.push(format!("  {}", word_hex(w)));
    }
    for (i, log) in outcome.logs.iter().enumerate() {
        lines.push(format!(
            "log {}: {} topics={} data=0x{}",
            i,
            log.address,
            log.topics.len(),
            hex::encode(&log.data)
        ));
    }

    let mut out = Output::new(json).message(&lines.join("\n"));
    if let Value::Object(fields) = outcome_json(outcome) {
        for (key, value) in fields {
            out = out.field_value(&key, value);
        }
    }
    out
}
