use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the loan wizard
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WizardConfig {
    /// Loan-processing backend settings
    pub backend: BackendConfig,
    /// Credit calculator limits and rates
    pub credit: CreditConfig,
    /// Short-lived resume cache
    pub resume: ResumeConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the form backend
    pub base_url: String,
    /// Request timeout for each submission call
    pub timeout_seconds: u64,
    /// Form alias used to close the form session
    pub form_alias: String,
    /// Mark submitted applications as test traffic
    pub test_mode: bool,
    /// Redirect URL reported to the backend
    pub redirect_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreditConfig {
    pub min_amount: u64,
    pub max_amount: u64,
    pub default_amount: u64,
    pub min_period_months: u32,
    pub max_period_months: u32,
    /// Amounts above this use the "big" rates
    pub big_amount_threshold: u64,
    pub rates: RateConfig,
}

/// Annual interest rates in percent
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateConfig {
    pub with_insurance: f64,
    pub without_insurance: f64,
    pub with_insurance_big: f64,
    pub without_insurance_big: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResumeConfig {
    /// Mirror the application record so a reloaded session can resume
    pub enabled: bool,
    /// Fixed key the record is stored under
    pub product_key: String,
    /// Key of calculator presets seeding the credit step
    pub credit_preset_key: String,
    pub ttl_minutes: u64,
    pub max_entries: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level
    pub log_level: String,
    /// Emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://localhost:8080/api".to_string(),
                timeout_seconds: 30,
                form_alias: "personal-loan".to_string(),
                test_mode: true, // Production deployments switch this off explicitly
                redirect_url: "https://localhost/forms/cc/personal-loan".to_string(),
            },
            credit: CreditConfig {
                min_amount: 100_000,
                max_amount: 3_000_000,
                default_amount: 300_000,
                min_period_months: 13,
                max_period_months: 84,
                big_amount_threshold: 300_000,
                rates: RateConfig {
                    with_insurance: 15.9,
                    without_insurance: 19.9,
                    with_insurance_big: 12.9,
                    without_insurance_big: 16.9,
                },
            },
            resume: ResumeConfig {
                enabled: true,
                product_key: "personal-loan".to_string(),
                credit_preset_key: "credit_params".to_string(),
                ttl_minutes: 30,
                max_entries: 1000,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: true,
            },
        }
    }
}

impl WizardConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (loan-wizard.toml, .loan-wizard-rc)
    /// 3. Environment variables (prefixed with LOAN_WIZARD_)
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&WizardConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if Path::new("loan-wizard.toml").exists() {
            builder = builder.add_source(File::with_name("loan-wizard"));
        }

        if Path::new(".loan-wizard-rc").exists() {
            builder = builder.add_source(File::with_name(".loan-wizard-rc").format(config::FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("LOAN_WIZARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let wizard_config: WizardConfig = config.try_deserialize()?;
        Ok(wizard_config)
    }

    /// Load configuration from an explicit file layered over the defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults = Config::try_from(&WizardConfig::default())?;
        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_ref()))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<WizardConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = WizardConfig::load_env_file();
        WizardConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static WizardConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_product_limits() {
        let config = WizardConfig::default();
        assert_eq!(config.credit.min_amount, 100_000);
        assert_eq!(config.credit.max_amount, 3_000_000);
        assert_eq!(config.credit.min_period_months, 13);
        assert_eq!(config.credit.max_period_months, 84);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wizard.toml");
        std::fs::write(
            &path,
            "[backend]\nbase_url = \"https://forms.example.com\"\ntest_mode = false\n",
        )
        .unwrap();

        let config = WizardConfig::load_from_file(&path).unwrap();
        assert_eq!(config.backend.base_url, "https://forms.example.com");
        assert!(!config.backend.test_mode);
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.resume.product_key, "personal-loan");
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        WizardConfig::default().save_to_file(&path).unwrap();

        let loaded = WizardConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.credit.default_amount, 300_000);
    }
}
