use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};

use super::{Call, Token, TokenEvent};
use crate::crypto::Address;
use crate::error::TokenError;
use crate::transfer::TransferMode;
use crate::Amount;

/// Deployment parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    /// Initializer: receives the root and admin roles and becomes controller
    pub deployer: Address,
}

/// One scripted call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub caller: Address,
    pub call: Call,
}

/// A deployment followed by a call script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub token: TokenConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Result of one scripted call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: String,
    pub caller: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u64>,
    pub events: Vec<TokenEvent>,
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Token state at the end of a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: Amount,
    pub transfer_mode: TransferMode,
    pub transfer_controller: Address,
    pub paused: bool,
    pub implementation: Address,
    /// Balances of every address named in the scenario
    pub balances: IndexMap<Address, Amount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub steps: Vec<StepOutcome>,
    pub state: TokenSnapshot,
}

impl ScenarioReport {
    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| !s.is_ok()).count()
    }
}

impl Scenario {
    fn addresses(&self) -> Vec<Address> {
        let mut seen = vec![self.token.deployer];
        for step in &self.steps {
            let mut named = vec![step.caller];
            match &step.call {
                Call::Mint { to, .. } | Call::Transfer { to, .. } => named.push(*to),
                Call::TransferFrom { from, to, .. } => {
                    named.push(*from);
                    named.push(*to);
                }
                Call::Approve { spender, .. } => named.push(*spender),
                Call::SetTransferController { controller } => named.push(*controller),
                Call::GrantRole { account, .. } | Call::RevokeRole { account, .. } => {
                    named.push(*account)
                }
                _ => {}
            }
            for address in named {
                if !address.is_zero() && !seen.contains(&address) {
                    seen.push(address);
                }
            }
        }
        seen
    }

    /// Deploy, initialize and replay every step
    ///
    /// Only deployment and initialization failures abort the run; rejected
    /// steps are recorded in the report.
    pub fn run(&self) -> Result<ScenarioReport, TokenError> {
        let mut token = Token::new()?;
        let initialization = token.initialize(&self.token.deployer, &self.token.name, &self.token.symbol)?;

        let mut steps = vec![StepOutcome {
            index: 0,
            op: "initialize".to_string(),
            caller: self.token.deployer,
            error: None,
            code: None,
            events: initialization,
        }];

        for (i, step) in self.steps.iter().enumerate() {
            let op = step.call.name().to_string();
            let outcome = match token.call(&step.caller, step.call.clone()) {
                Ok(events) => StepOutcome {
                    index: i + 1,
                    op,
                    caller: step.caller,
                    error: None,
                    code: None,
                    events,
                },
                Err(e) => StepOutcome {
                    index: i + 1,
                    op,
                    caller: step.caller,
                    error: Some(e.to_string()),
                    code: Some(e.to_code()),
                    events: Vec::new(),
                },
            };
            steps.push(outcome);
        }

        let balances = self
            .addresses()
            .into_iter()
            .map(|address| (address, token.balance_of(&address)))
            .collect();

        let state = TokenSnapshot {
            name: token.name(),
            symbol: token.symbol(),
            decimals: token.decimals(),
            total_supply: token.total_supply(),
            transfer_mode: token.get_transfer_mode(),
            transfer_controller: token.get_transfer_controller(),
            paused: token.paused(),
            implementation: token.implementation(),
            balances,
        };

        let report = ScenarioReport { steps, state };
        info!(
            "Scenario replayed {} step(s), {} rejected",
            self.steps.len(),
            report.failures()
        );
        Ok(report)
    }
}
