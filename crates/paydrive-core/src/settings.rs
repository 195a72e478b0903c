//! Playground configuration and its transport encoding.
//!
//! The example application exposes a configurable host screen (the
//! "playground") that test scenarios parameterize before launch. This module
//! defines the [`PlaygroundSettings`] record, one closed enumeration per
//! option, and the deterministic encoding used to pass the whole record
//! through the launch environment as a single compact string.
//!
//! Every field has a documented default; [`PlaygroundSettings::default`] is
//! the factory scenarios start from. Settings are mutated freely before
//! launch, serialized exactly once at launch time, and never mutated after.
//!
//! # Example
//!
//! ```
//! use paydrive_core::settings::{PlaygroundSettings, UiStyle, Currency};
//!
//! let mut settings = PlaygroundSettings::default();
//! settings.ui_style = UiStyle::FlowController;
//! settings.currency = Currency::Eur;
//!
//! let blob = settings.encode().unwrap();
//! let decoded = PlaygroundSettings::decode(&blob).unwrap();
//! assert_eq!(decoded, settings);
//! ```

use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::element::ElementQuery;

/// Accessibility name of the landing screen's reload control.
///
/// Tapping it reloads the playground in place; the reload-retry controller
/// uses it instead of a cold relaunch.
pub const RELOAD_CONTROL: &str = "Reload";

/// Errors raised while encoding or decoding playground settings.
///
/// Encoding failures are fatal at launch time: the launcher raises them
/// before the application process is ever started, so a bad configuration is
/// never partially applied.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// A payment-method token was empty or contained invalid characters.
    #[error("Invalid payment method token '{0}': expected lowercase [a-z0-9_]+")]
    InvalidPaymentMethod(String),

    /// JSON serialization or deserialization failed.
    #[error("Settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The transport blob was not valid base64.
    #[error("Settings blob is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Which integration surface of the payment SDK the playground presents.
///
/// Selects the landing screen and therefore the ready signal the reload
/// controller waits for after every launch or reload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiStyle {
    /// The prebuilt full-sheet checkout surface.
    #[default]
    PaymentSheet,
    /// The split present/confirm flow-controller surface.
    FlowController,
    /// The embedded payment element surface.
    Embedded,
}

impl UiStyle {
    /// The accessibility name of this mode's landing element.
    ///
    /// Total mapping: every mode resolves to exactly one name. There is no
    /// fallback arm; adding a mode without a landing element is a compile
    /// error.
    pub fn landing_button(self) -> &'static str {
        match self {
            UiStyle::PaymentSheet => "Present PaymentSheet",
            UiStyle::FlowController => "Confirm",
            UiStyle::Embedded => "Present embedded payment element",
        }
    }

    /// The ready-signal query the reload controller awaits for this mode.
    pub fn ready_element(self) -> ElementQuery {
        ElementQuery::button(self.landing_button())
    }
}

/// How the playground attaches a customer to the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerMode {
    /// No customer object; one-off guest checkout.
    #[default]
    Guest,
    /// A freshly created customer with no saved payment methods.
    New,
    /// A returning customer with previously saved payment methods.
    Returning,
}

/// Presentation currency for the checkout amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// US dollars.
    #[default]
    Usd,
    /// Euros.
    Eur,
    /// British pounds.
    Gbp,
    /// Australian dollars.
    Aud,
    /// Swedish kronor.
    Sek,
}

impl Currency {
    /// Lowercase ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Aud => "aud",
            Currency::Sek => "sek",
        }
    }
}

/// Merchant country of the simulated account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MerchantCountry {
    /// United States.
    #[default]
    Us,
    /// United Kingdom.
    Gb,
    /// Germany.
    De,
    /// France.
    Fr,
    /// Australia.
    Au,
}

/// Arrangement of payment method options on the checkout surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Let the SDK choose based on available methods.
    #[default]
    Automatic,
    /// Horizontal carousel of method tiles.
    Horizontal,
    /// Vertical list of methods.
    Vertical,
}

/// How aggressively billing details are collected during checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCollection {
    /// Collect what the selected payment method requires.
    #[default]
    Automatic,
    /// Never collect billing details.
    Never,
    /// Always collect the full billing record.
    Always,
}

/// The flat configuration record for one playground scenario.
///
/// Constructed from [`Default`], mutated by the test before launch,
/// serialized once via [`encode`](Self::encode). Field-set order never
/// affects the encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaygroundSettings {
    /// Integration surface to present. Default: [`UiStyle::PaymentSheet`].
    #[serde(default)]
    pub ui_style: UiStyle,

    /// Payment-method layout. Default: [`Layout::Automatic`].
    #[serde(default)]
    pub layout: Layout,

    /// Customer attachment. Default: [`CustomerMode::Guest`].
    #[serde(default)]
    pub customer_mode: CustomerMode,

    /// Checkout currency. Default: [`Currency::Usd`].
    #[serde(default)]
    pub currency: Currency,

    /// Merchant country. Default: [`MerchantCountry::Us`].
    #[serde(default)]
    pub merchant_country: MerchantCountry,

    /// Comma-separated payment-method tokens to enable, e.g.
    /// `"card,sepa_debit"`. `None` (the default) lets the SDK decide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_methods: Option<String>,

    /// Billing-details collection mode. Default:
    /// [`BillingCollection::Automatic`].
    #[serde(default)]
    pub billing_collection: BillingCollection,

    /// Whether the wallet button is offered. Default: `true`.
    #[serde(default = "default_true")]
    pub apple_pay_enabled: bool,

    /// Whether a shipping address is collected. Default: `false`.
    #[serde(default)]
    pub collect_shipping: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PlaygroundSettings {
    fn default() -> Self {
        Self {
            ui_style: UiStyle::default(),
            layout: Layout::default(),
            customer_mode: CustomerMode::default(),
            currency: Currency::default(),
            merchant_country: MerchantCountry::default(),
            payment_methods: None,
            billing_collection: BillingCollection::default(),
            apple_pay_enabled: true,
            collect_shipping: false,
        }
    }
}

impl PlaygroundSettings {
    /// Serializes the settings into the compact transport form.
    ///
    /// Deterministic: the same settings always produce byte-identical
    /// output, regardless of the order fields were assigned. Unset optional
    /// fields are omitted entirely, never encoded as null.
    ///
    /// # Errors
    ///
    /// [`EncodeError::InvalidPaymentMethod`] if a payment-method token fails
    /// validation; [`EncodeError::Json`] if serialization fails.
    pub fn encode(&self) -> Result<String, EncodeError> {
        self.validate()?;
        let json = serde_json::to_vec(self)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(json))
    }

    /// Decodes a transport blob back into settings.
    ///
    /// Unknown JSON fields are ignored, so a newer harness can drive an
    /// older application build. Missing fields resolve to their defaults.
    pub fn decode(blob: &str) -> Result<Self, EncodeError> {
        let json = base64::engine::general_purpose::STANDARD.decode(blob)?;
        Ok(serde_json::from_slice(&json)?)
    }

    /// Validates the free-form fields.
    ///
    /// The enum fields are closed and need no checking; the payment-methods
    /// CSV is the only place invalid input can hide.
    fn validate(&self) -> Result<(), EncodeError> {
        if let Some(csv) = &self.payment_methods {
            for token in csv.split(',') {
                let valid = !token.is_empty()
                    && token
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
                if !valid {
                    return Err(EncodeError::InvalidPaymentMethod(token.to_string()));
                }
            }
        }
        Ok(())
    }
}
