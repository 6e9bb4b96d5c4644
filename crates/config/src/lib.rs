use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SCHEMA_VERSION: &str = "1.0";

/// Receive word the board presents after reset.
pub const DEFAULT_RX_VALUE: u32 = 1_073_741_826;
pub const DEFAULT_RANDOM_TX_WORDS: u64 = 1024;
pub const DEFAULT_TRACE_DEPTH: usize = 64;

fn default_rx_value() -> u32 {
    DEFAULT_RX_VALUE
}

fn default_random_tx_words() -> u64 {
    DEFAULT_RANDOM_TX_WORDS
}

fn default_trace_depth() -> usize {
    DEFAULT_TRACE_DEPTH
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BoardSetup {
    #[serde(default = "default_rx_value")]
    pub rx_value: u32,
}

impl Default for BoardSetup {
    fn default() -> Self {
        Self {
            rx_value: DEFAULT_RX_VALUE,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BenchLimits {
    /// Words streamed by the randomized transmit loop before the bench
    /// moves on to the stop sequence.
    #[serde(default = "default_random_tx_words")]
    pub random_tx_words: u64,
    #[serde(default = "default_trace_depth")]
    pub trace_depth: usize,
}

impl Default for BenchLimits {
    fn default() -> Self {
        Self {
            random_tx_words: DEFAULT_RANDOM_TX_WORDS,
            trace_depth: DEFAULT_TRACE_DEPTH,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStep {
    VisualInit,
    RxDefault,
    TxAllZeros,
    TxAllOnes,
    VisualStop,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedStatus {
    Ok,
    Ko,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConsoleContainsAssertion {
    pub console_contains: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LedDataAssertion {
    pub led_data: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StepExpectation {
    pub step: CampaignStep,
    pub status: ExpectedStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StepStatusAssertion {
    pub step_status: StepExpectation,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum BenchAssertion {
    ConsoleContains(ConsoleContainsAssertion),
    LedData(LedDataAssertion),
    StepStatus(StepStatusAssertion),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BenchScript {
    pub schema_version: String,
    #[serde(default)]
    pub board: BoardSetup,
    #[serde(default)]
    pub limits: BenchLimits,
    #[serde(default)]
    pub assertions: Vec<BenchAssertion>,
}

impl BenchScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open bench script at {:?}", path.as_ref()))?;
        let script: Self =
            serde_yaml::from_reader(f).context("Failed to parse bench script YAML")?;
        script.validate()?;
        tracing::debug!(
            "Loaded bench script: {} assertions, rx {:#010x}",
            script.assertions.len(),
            script.board.rx_value
        );
        Ok(script)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let script: Self = serde_yaml::from_str(yaml).context("Failed to parse bench script YAML")?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '{}'",
                self.schema_version,
                SCHEMA_VERSION
            );
        }

        if self.limits.random_tx_words == 0 {
            anyhow::bail!("Limit 'random_tx_words' must be greater than zero");
        }

        for assertion in &self.assertions {
            if let BenchAssertion::ConsoleContains(a) = assertion {
                if a.console_contains.is_empty() {
                    anyhow::bail!("Assertion 'console_contains' cannot be empty");
                }
            }
        }

        Ok(())
    }
}

/// Parses a register value given as decimal or `0x`-prefixed hex.
pub fn parse_u32(s: &str) -> Result<u32, String> {
    let trimmed = s.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(&hex.replace('_', ""), 16)
            .map_err(|e| format!("Invalid hex value '{}': {}", s, e))
    } else {
        trimmed
            .replace('_', "")
            .parse()
            .map_err(|e| format!("Invalid value '{}': {}", s, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_script() {
        let yaml = r#"
schema_version: "1.0"
board:
  rx_value: 3735928559
limits:
  random_tx_words: 256
  trace_depth: 16
assertions:
  - console_contains: "KO: not default value detected"
  - led_data: 0
  - step_status:
      step: rx_default
      status: ko
"#;
        let script = BenchScript::from_yaml(yaml).unwrap();
        assert_eq!(script.board.rx_value, 0xDEAD_BEEF);
        assert_eq!(script.limits.random_tx_words, 256);
        assert_eq!(script.limits.trace_depth, 16);
        assert_eq!(script.assertions.len(), 3);
        assert_eq!(
            script.assertions[2],
            BenchAssertion::StepStatus(StepStatusAssertion {
                step_status: StepExpectation {
                    step: CampaignStep::RxDefault,
                    status: ExpectedStatus::Ko,
                }
            })
        );
        assert!(matches!(
            script.assertions[1],
            BenchAssertion::LedData(LedDataAssertion { led_data: 0 })
        ));
    }

    #[test]
    fn test_defaults() {
        let script = BenchScript::from_yaml("schema_version: \"1.0\"\n").unwrap();
        assert_eq!(script.board.rx_value, DEFAULT_RX_VALUE);
        assert_eq!(script.limits, BenchLimits::default());
        assert!(script.assertions.is_empty());
    }

    #[test]
    fn test_invalid_version() {
        let err = BenchScript::from_yaml("schema_version: \"2.0\"\n").unwrap_err();
        assert!(err.to_string().contains("Unsupported schema_version"));
    }

    #[test]
    fn test_zero_random_budget() {
        let yaml = r#"
schema_version: "1.0"
limits:
  random_tx_words: 0
"#;
        let err = BenchScript::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("random_tx_words"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
schema_version: "1.0"
board:
  rx_value: 1
  tx_value: 2
"#;
        assert!(BenchScript::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_parse_u32() {
        assert_eq!(parse_u32("0x4000_0002"), Ok(1_073_741_826));
        assert_eq!(parse_u32("0XDEADBEEF"), Ok(0xDEAD_BEEF));
        assert_eq!(parse_u32(" 42 "), Ok(42));
        assert!(parse_u32("0x1_0000_0000").is_err());
        assert!(parse_u32("LED").is_err());
    }
}
