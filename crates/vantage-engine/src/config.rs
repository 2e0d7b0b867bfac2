//! # Engine Configuration
//!
//! Loaded once at startup from environment variables with development
//! defaults; read-only afterward.

use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Business display name (printed on receipts).
    pub business_name: String,

    /// Currency symbol (for activity details and receipt formatting).
    pub currency_symbol: String,

    /// Number of decimal places for the currency.
    pub currency_decimals: u8,

    /// Prefix for generated sale numbers (e.g. "INV").
    pub sale_number_prefix: String,
}

impl Default for EngineConfig {
    /// Defaults suitable for development.
    fn default() -> Self {
        EngineConfig {
            business_name: "Vantage Dev Store".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            sale_number_prefix: "INV".to_string(),
        }
    }
}

impl EngineConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `VANTAGE_BUSINESS_NAME`: business display name
    /// - `VANTAGE_CURRENCY_SYMBOL`: currency symbol
    /// - `VANTAGE_SALE_NUMBER_PREFIX`: sale number prefix
    pub fn from_env() -> Self {
        let mut config = EngineConfig::default();

        if let Ok(name) = std::env::var("VANTAGE_BUSINESS_NAME") {
            config.business_name = name;
        }

        if let Ok(symbol) = std::env::var("VANTAGE_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Ok(prefix) = std::env::var("VANTAGE_SALE_NUMBER_PREFIX") {
            config.sale_number_prefix = prefix;
        }

        config
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use vantage_engine::config::EngineConfig;
    ///
    /// let config = EngineConfig::default();
    /// assert_eq!(config.format_currency(15_000), "$150.00");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!("{}.{:0width$}", whole, frac, width = self.currency_decimals as usize)
            } else {
                whole.to_string()
            }
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
