//! Gateway configuration
//!
//! Configuration objects are passed explicitly into the signer and the
//! clients. They can be built in code, deserialized (e.g. from TOML or JSON),
//! or read from `PAYBRIDGE_*` environment variables.

use crate::error::{PaymentError, PaymentResult};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host every MWS signature is computed against
pub const MWS_HOST: &str = "mws.amazonservices.com";

/// Processor environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Test/certification environment
    #[default]
    Sandbox,
    /// Production
    Live,
}

impl Environment {
    /// Is test/sandbox mode
    pub fn is_test(&self) -> bool {
        matches!(self, Self::Sandbox)
    }
}

impl FromStr for Environment {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" | "test" | "cert" => Ok(Self::Sandbox),
            "live" | "production" | "prod" => Ok(Self::Live),
            other => Err(PaymentError::Config(format!("unknown environment {other:?}"))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => write!(f, "sandbox"),
            Self::Live => write!(f, "live"),
        }
    }
}

fn parse_flag(key: &str, value: &str) -> PaymentResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(PaymentError::Config(format!("{key} must be a boolean, got {value:?}"))),
    }
}

fn require(field: &str, value: &str) -> PaymentResult<()> {
    if value.trim().is_empty() {
        return Err(PaymentError::Config(format!("{field} is required")));
    }
    Ok(())
}

fn validate_endpoint(endpoint: Option<&str>) -> PaymentResult<()> {
    if let Some(endpoint) = endpoint {
        url::Url::parse(endpoint)?;
    }
    Ok(())
}

/// Amazon Pay (MWS) account configuration
#[derive(Clone, Deserialize)]
pub struct MwsConfig {
    /// `AWSAccessKeyId`
    pub access_key: String,
    /// Shared secret used for request signatures
    pub secret_key: SecretString,
    /// `SellerId`
    pub seller_id: String,
    /// `PlatformId`, sent only when set
    #[serde(default)]
    pub platform_id: Option<String>,
    /// `CaptureNow` on authorizations
    #[serde(default)]
    pub auto_capture: bool,
    /// Sandbox or live
    #[serde(default)]
    pub environment: Environment,
    /// Override the URL requests are POSTed to (signatures still use the
    /// canonical host and path)
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl MwsConfig {
    /// Create a sandbox configuration
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        seller_id: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: SecretString::from(secret_key.into()),
            seller_id: seller_id.into(),
            platform_id: None,
            auto_capture: false,
            environment: Environment::Sandbox,
            endpoint: None,
        }
    }

    /// Set the environment
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the platform id
    pub fn platform_id(mut self, platform_id: impl Into<String>) -> Self {
        self.platform_id = Some(platform_id.into());
        self
    }

    /// Capture funds as part of the authorization
    pub fn auto_capture(mut self, auto_capture: bool) -> Self {
        self.auto_capture = auto_capture;
        self
    }

    /// POST to a different URL
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Read `PAYBRIDGE_MWS_*` environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; keys are the `PAYBRIDGE_MWS_*` names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PaymentResult<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| PaymentError::Config(format!("{key} is not set")))
        };

        let mut config = Self::new(
            required("PAYBRIDGE_MWS_ACCESS_KEY")?,
            required("PAYBRIDGE_MWS_SECRET_KEY")?,
            required("PAYBRIDGE_MWS_SELLER_ID")?,
        );
        config.platform_id = lookup("PAYBRIDGE_MWS_PLATFORM_ID");
        if let Some(flag) = lookup("PAYBRIDGE_MWS_AUTO_CAPTURE") {
            config.auto_capture = parse_flag("PAYBRIDGE_MWS_AUTO_CAPTURE", &flag)?;
        }
        if let Some(environment) = lookup("PAYBRIDGE_MWS_ENVIRONMENT") {
            config.environment = environment.parse()?;
        }
        config.endpoint = lookup("PAYBRIDGE_MWS_ENDPOINT");

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot sign a request
    pub fn validate(&self) -> PaymentResult<()> {
        require("access_key", &self.access_key)?;
        require("seller_id", &self.seller_id)?;
        require("secret_key", self.secret_key.expose_secret())?;
        validate_endpoint(self.endpoint.as_deref())
    }

    /// Host line of the signing message
    pub fn signing_host(&self) -> &'static str {
        MWS_HOST
    }

    /// Path line of the signing message
    pub fn signing_path(&self) -> &'static str {
        match self.environment {
            Environment::Sandbox => "/OffAmazonPayments_Sandbox/2013-01-01",
            Environment::Live => "/OffAmazonPayments/2013-01-01",
        }
    }

    /// URL requests are POSTed to
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}{}", MWS_HOST, self.signing_path()))
    }
}

impl fmt::Debug for MwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MwsConfig")
            .field("access_key", &self.access_key)
            .field("seller_id", &self.seller_id)
            .field("platform_id", &self.platform_id)
            .field("auto_capture", &self.auto_capture)
            .field("environment", &self.environment)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Heartland Portico gift card configuration
#[derive(Clone, Deserialize)]
pub struct HpsGiftConfig {
    /// `SecretAPIKey` header value
    pub secret_api_key: SecretString,
    /// `DeveloperID` header value
    #[serde(default)]
    pub developer_id: Option<String>,
    /// `VersionNbr` header value
    #[serde(default)]
    pub version_number: Option<String>,
    /// `SiteTrace` header value
    #[serde(default)]
    pub site_trace: Option<String>,
    /// Explicit environment; derived from the key when unset
    #[serde(default)]
    pub environment: Option<Environment>,
    /// Override the URL requests are POSTed to
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl HpsGiftConfig {
    /// Certification endpoint
    pub const TEST_URL: &'static str =
        "https://cert.api2.heartlandportico.com/Hps.Exchange.PosGateway/PosGatewayService.asmx?wsdl";
    /// Production endpoint
    pub const LIVE_URL: &'static str =
        "https://api2.heartlandportico.com/Hps.Exchange.PosGateway/PosGatewayService.asmx?wsdl";

    /// Create a configuration from a secret API key
    pub fn new(secret_api_key: impl Into<String>) -> Self {
        Self {
            secret_api_key: SecretString::from(secret_api_key.into()),
            developer_id: None,
            version_number: None,
            site_trace: None,
            environment: None,
            endpoint: None,
        }
    }

    /// Set the developer id
    pub fn developer_id(mut self, developer_id: impl Into<String>) -> Self {
        self.developer_id = Some(developer_id.into());
        self
    }

    /// Set the version number
    pub fn version_number(mut self, version_number: impl Into<String>) -> Self {
        self.version_number = Some(version_number.into());
        self
    }

    /// Set the site trace
    pub fn site_trace(mut self, site_trace: impl Into<String>) -> Self {
        self.site_trace = Some(site_trace.into());
        self
    }

    /// Force an environment
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// POST to a different URL
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Read `PAYBRIDGE_HPS_*` environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; keys are the `PAYBRIDGE_HPS_*` names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PaymentResult<Self> {
        let secret = lookup("PAYBRIDGE_HPS_SECRET_API_KEY")
            .ok_or_else(|| PaymentError::Config("PAYBRIDGE_HPS_SECRET_API_KEY is not set".into()))?;

        let mut config = Self::new(secret);
        config.developer_id = lookup("PAYBRIDGE_HPS_DEVELOPER_ID");
        config.version_number = lookup("PAYBRIDGE_HPS_VERSION_NUMBER");
        config.site_trace = lookup("PAYBRIDGE_HPS_SITE_TRACE");
        config.environment = lookup("PAYBRIDGE_HPS_ENVIRONMENT")
            .map(|value| value.parse())
            .transpose()?;
        config.endpoint = lookup("PAYBRIDGE_HPS_ENDPOINT");

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations without a key
    pub fn validate(&self) -> PaymentResult<()> {
        require("secret_api_key", self.secret_api_key.expose_secret())?;
        validate_endpoint(self.endpoint.as_deref())
    }

    /// Effective environment: certification keys carry `_cert_`.
    pub fn resolved_environment(&self) -> Environment {
        self.environment.unwrap_or_else(|| {
            if self.secret_api_key.expose_secret().contains("_cert_") {
                Environment::Sandbox
            } else {
                Environment::Live
            }
        })
    }

    /// URL requests are POSTed to
    pub fn endpoint_url(&self) -> String {
        match (&self.endpoint, self.resolved_environment()) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, Environment::Sandbox) => Self::TEST_URL.to_string(),
            (None, Environment::Live) => Self::LIVE_URL.to_string(),
        }
    }
}

impl fmt::Debug for HpsGiftConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HpsGiftConfig")
            .field("developer_id", &self.developer_id)
            .field("version_number", &self.version_number)
            .field("site_trace", &self.site_trace)
            .field("environment", &self.resolved_environment())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
