use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use validator::Validate;

const CONFIG_DIR: &str = "config";
const DEFAULT_PRIMARY_LOCATION_ID: i64 = 1;

fn default_primary_location() -> i64 {
    DEFAULT_PRIMARY_LOCATION_ID
}

/// Posting configuration for the settlement core.
///
/// The ledger and voucher identifiers the accounting poster needs are
/// resolved once at startup and injected into the services, never looked up
/// through a runtime key-value store.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SettlementConfig {
    /// Ledger debited/credited for cash, card and UPI tenders.
    #[validate(range(min = 1))]
    pub cash_ledger_id: i64,

    /// Income ledger for sales (and sale returns).
    #[validate(range(min = 1))]
    pub sales_ledger_id: i64,

    /// Expense ledger for purchases (and purchase returns).
    #[validate(range(min = 1))]
    pub purchase_ledger_id: i64,

    /// Ledger collecting the non-inclusive GST portion.
    #[validate(range(min = 1))]
    pub gst_ledger_id: i64,

    /// Voucher ids scoping the accounting postings per family.
    #[validate(range(min = 1))]
    pub sale_voucher_id: i64,
    #[validate(range(min = 1))]
    pub sale_return_voucher_id: i64,
    #[validate(range(min = 1))]
    pub purchase_voucher_id: i64,
    #[validate(range(min = 1))]
    pub purchase_return_voucher_id: i64,

    /// Only transactions at the primary location post to the general
    /// ledger; satellite locations keep stock ledgers only.
    #[serde(default = "default_primary_location")]
    pub primary_location_id: i64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            cash_ledger_id: 1,
            sales_ledger_id: 2,
            purchase_ledger_id: 3,
            gst_ledger_id: 4,
            sale_voucher_id: 1,
            sale_return_voucher_id: 2,
            purchase_voucher_id: 3,
            purchase_return_voucher_id: 4,
            primary_location_id: DEFAULT_PRIMARY_LOCATION_ID,
        }
    }
}

impl SettlementConfig {
    /// Loads configuration from `config/settlement.toml` (if present) layered
    /// under `SETTLEMENT_`-prefixed environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let file = Path::new(CONFIG_DIR).join("settlement.toml");
        if file.exists() {
            builder = builder.add_source(File::from(file));
        }

        let cfg: SettlementConfig = builder
            .add_source(Environment::with_prefix("SETTLEMENT"))
            .build()?
            .try_deserialize()?;

        cfg.validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        info!(
            primary_location_id = cfg.primary_location_id,
            "settlement configuration loaded"
        );
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let cfg = SettlementConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.primary_location_id, 1);
    }

    #[test]
    fn zero_ledger_id_is_rejected() {
        let cfg = SettlementConfig {
            cash_ledger_id: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
