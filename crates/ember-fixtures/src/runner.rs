//! Fixture runner

use crate::error::{FixtureError, FixtureResult};
use crate::types::*;
use ember_evm::{
    Account, BlockContext, CallContext, Environment, Evm, EvmConfig, InMemoryWorld, Log, Outcome,
    TxContext, Word,
};
use std::fmt;
use std::path::Path;

/// Results of one fixture file
#[derive(Debug, Default)]
pub struct FixtureReport {
    /// Source file
    pub file: String,
    /// Passed fixture names
    pub passed: Vec<String>,
    /// Failed fixtures with reasons
    pub failed: Vec<(String, String)>,
}

impl FixtureReport {
    /// Create an empty report
    pub fn new(file: String) -> Self {
        Self {
            file,
            ..Default::default()
        }
    }

    /// Number of fixtures run
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }

    /// Pass rate as percentage
    pub fn pass_rate(&self) -> f64 {
        if self.total() == 0 {
            return 100.0;
        }
        (self.passed.len() as f64 / self.total() as f64) * 100.0
    }

    /// Check if nothing failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for FixtureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.file)?;
        writeln!(f, "  Total:     {}", self.total())?;
        writeln!(f, "  Passed:    {}", self.passed.len())?;
        writeln!(f, "  Failed:    {}", self.failed.len())?;
        write!(f, "  Pass Rate: {:.2}%", self.pass_rate())?;
        for (name, reason) in &self.failed {
            write!(f, "\n  - {}: {}", name, reason)?;
        }
        Ok(())
    }
}

/// Runs fixtures through a fresh [`Evm`] each
pub struct FixtureRunner {
    verbose: bool,
    fail_fast: bool,
    config: EvmConfig,
}

impl FixtureRunner {
    /// Create new fixture runner
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            fail_fast: false,
            config: EvmConfig::default(),
        }
    }

    /// Stop a file at its first failure
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Replace the interpreter limits
    pub fn with_config(mut self, config: EvmConfig) -> Self {
        self.config = config;
        self
    }

    /// Run every fixture in a JSON array file whose name contains `filter`
    pub fn run_file(&self, path: &Path, filter: Option<&str>) -> FixtureResult<FixtureReport> {
        let content = std::fs::read_to_string(path)?;
        let fixtures = parse_fixtures(&content)?;
        Ok(self.run_all(
            path.to_string_lossy().to_string(),
            &fixtures,
            filter,
        ))
    }

    /// Run a batch of fixtures
    pub fn run_all(&self, file: String, fixtures: &[Fixture], filter: Option<&str>) -> FixtureReport {
        let mut report = FixtureReport::new(file);

        for fixture in fixtures {
            if filter.is_some_and(|f| !fixture.name.contains(f)) {
                continue;
            }
            match self.run(fixture) {
                Ok(()) => {
                    if self.verbose {
                        tracing::info!("PASS: {}", fixture.name);
                    }
                    report.passed.push(fixture.name.clone());
                }
                Err(e) => {
                    if self.verbose {
                        tracing::warn!("FAIL: {} - {}", fixture.name, e);
                    }
                    report.failed.push((fixture.name.clone(), e.to_string()));
                    if self.fail_fast {
                        break;
                    }
                }
            }
        }

        report
    }

    /// Run one fixture and check every present expectation
    pub fn run(&self, fixture: &Fixture) -> FixtureResult<()> {
        let outcome = self.execute(fixture);
        check_outcome(fixture, &outcome).map_err(|e| match &fixture.hint {
            Some(hint) if !hint.is_empty() => {
                FixtureError::Assertion(format!("{} (hint: {})", e, hint))
            }
            _ => FixtureError::Assertion(e),
        })
    }

    /// Execute a fixture's code against its environment and world state
    pub fn execute(&self, fixture: &Fixture) -> Outcome {
        let env = build_environment(fixture);
        let world = build_world(fixture);
        Evm::new(&world)
            .with_config(self.config.clone())
            .execute_isolated(&fixture.code.bin.0, &env)
    }
}

fn word(value: &Option<HexWord>) -> Word {
    value.map(|w| w.0).unwrap_or_default()
}

/// Build the execution environment from the `tx` and `block` records
pub fn build_environment(fixture: &Fixture) -> Environment {
    let tx = fixture.tx.clone().unwrap_or_default();
    let block = fixture.block.clone().unwrap_or_default();

    let from = tx.from.map(|a| a.0).unwrap_or_default();
    let call = CallContext::new(
        tx.to.map(|a| a.0).unwrap_or_default(),
        from,
        word(&tx.value),
        tx.data.map(|d| d.0).unwrap_or_default(),
    );

    let defaults = BlockContext::default();
    let block = BlockContext {
        coinbase: block.coinbase.map(|a| a.0).unwrap_or_default(),
        timestamp: word(&block.timestamp),
        number: word(&block.number),
        prevrandao: word(&block.difficulty),
        gas_limit: word(&block.gaslimit),
        chain_id: block.chainid.map(|c| c.0).unwrap_or(defaults.chain_id),
        base_fee: word(&block.basefee),
    };

    let tx = TxContext {
        origin: tx.origin.map(|a| a.0).unwrap_or(from),
        gas_price: word(&tx.gasprice),
    };

    Environment { call, block, tx }
}

/// Build the world-state view from the `state` record
pub fn build_world(fixture: &Fixture) -> InMemoryWorld {
    let mut world = InMemoryWorld::new();
    for (address, account) in &fixture.state {
        world.insert(
            address.0,
            Account {
                balance: word(&account.balance),
                nonce: account.nonce,
                code: account
                    .code
                    .as_ref()
                    .map(|c| c.bin.0.clone())
                    .unwrap_or_default(),
            },
        );
    }
    world
}

fn format_stack(stack: &[Word]) -> String {
    let items: Vec<String> = stack.iter().map(|w| format!("{:#x}", w)).collect();
    format!("[{}]", items.join(", "))
}

fn log_matches(expected: &LogFixture, actual: &Log) -> bool {
    expected.address.0 == actual.address
        && expected.data.0 == actual.data
        && expected.topics.len() == actual.topics.len()
        && expected
            .topics
            .iter()
            .zip(&actual.topics)
            .all(|(e, a)| e.0 == *a)
}

/// Compare an outcome against the fixture's `expect` record
pub fn check_outcome(fixture: &Fixture, outcome: &Outcome) -> Result<(), String> {
    let expect = &fixture.expect;

    if let Some(success) = expect.success {
        if outcome.success != success {
            return Err(format!(
                "success mismatch: expected {}, got {} ({:?})",
                success, outcome.success, outcome.error
            ));
        }
    }

    if let Some(stack) = &expect.stack {
        let expected: Vec<Word> = stack.iter().map(|w| w.0).collect();
        if outcome.stack != expected {
            return Err(format!(
                "stack mismatch: expected {}, got {}",
                format_stack(&expected),
                format_stack(&outcome.stack)
            ));
        }
    }

    if let Some(logs) = &expect.logs {
        if logs.len() != outcome.logs.len() {
            return Err(format!(
                "log count mismatch: expected {}, got {}",
                logs.len(),
                outcome.logs.len()
            ));
        }
        for (i, (expected, actual)) in logs.iter().zip(&outcome.logs).enumerate() {
            if !log_matches(expected, actual) {
                return Err(format!("log {} mismatch: got {:?}", i, actual));
            }
        }
    }

    if let Some(data) = &expect.return_data {
        if outcome.return_data != data.0 {
            return Err(format!(
                "return mismatch: expected 0x{}, got 0x{}",
                hex::encode(&data.0),
                hex::encode(&outcome.return_data)
            ));
        }
    }

    Ok(())
}
