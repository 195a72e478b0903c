//! Screen rendering for the mock playground.
//!
//! Each screen is rendered to a fresh element tree on every accessibility
//! read, the same way a real application's tree reflects its current view
//! hierarchy. Nothing here is cached between reads.

use paydrive_core::element::{Role, UiElement};
use paydrive_core::settings::{
    BillingCollection, CustomerMode, PlaygroundSettings, RELOAD_CONTROL,
};

/// Identifier of the landing screen's settings summary element.
pub const SETTINGS_SUMMARY: &str = "settings-summary";

/// Identifier of the checkout sheet container.
pub const SHEET: &str = "payment-sheet";

/// Static text shown on the result screen after a successful payment.
pub const PAYMENT_COMPLETE: &str = "Payment complete";

/// The view the playground is currently presenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Boot did not finish; only the spinner and the reload control exist.
    Spinner,
    /// The configurable host screen with the mode-specific landing element.
    Landing,
    /// The checkout sheet with the card form.
    Sheet,
    /// The post-payment result screen.
    Result,
}

/// Mutable state of the checkout card form.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    /// Typed card number digits.
    pub card_number: String,
    /// Typed expiry, e.g. "12/34".
    pub expiry: String,
    /// Typed security code.
    pub cvc: String,
    /// Typed postal code, when the form collects one.
    pub postal_code: String,
}

impl FormState {
    /// True once every required field holds plausible input; gates the Pay
    /// button's hittability.
    pub fn complete(&self, settings: &PlaygroundSettings) -> bool {
        let card_ok =
            self.card_number.len() == 16 && self.card_number.chars().all(|c| c.is_ascii_digit());
        let expiry_ok = self.expiry.len() >= 4;
        let cvc_ok = self.cvc.len() >= 3;
        let postal_ok =
            settings.billing_collection != BillingCollection::Always || !self.postal_code.is_empty();
        card_ok && expiry_ok && cvc_ok && postal_ok
    }
}

fn customer_label(mode: CustomerMode) -> &'static str {
    match mode {
        CustomerMode::Guest => "guest",
        CustomerMode::New => "new",
        CustomerMode::Returning => "returning",
    }
}

fn country_label(settings: &PlaygroundSettings) -> &'static str {
    use paydrive_core::settings::MerchantCountry;
    match settings.merchant_country {
        MerchantCountry::Us => "us",
        MerchantCountry::Gb => "gb",
        MerchantCountry::De => "de",
        MerchantCountry::Fr => "fr",
        MerchantCountry::Au => "au",
    }
}

/// One-line summary of the active configuration, shown on the landing
/// screen.
pub fn settings_summary(settings: &PlaygroundSettings) -> String {
    format!(
        "{} · {} · {}",
        customer_label(settings.customer_mode),
        settings.currency.code(),
        country_label(settings),
    )
}

/// Renders the element tree for the given screen.
pub fn render(screen: Screen, settings: &PlaygroundSettings, form: &FormState) -> Vec<UiElement> {
    match screen {
        Screen::Spinner => render_spinner(),
        Screen::Landing => render_landing(settings),
        Screen::Sheet => render_sheet(settings, form),
        Screen::Result => render_result(),
    }
}

fn render_spinner() -> Vec<UiElement> {
    vec![UiElement::leaf(Role::Other, "playground").with_children(vec![
        UiElement::leaf(Role::Image, "activity-indicator"),
        UiElement::leaf(Role::Button, RELOAD_CONTROL),
    ])]
}

fn render_landing(settings: &PlaygroundSettings) -> Vec<UiElement> {
    let children = vec![
        UiElement::leaf(Role::Button, RELOAD_CONTROL),
        UiElement::leaf(Role::StaticText, SETTINGS_SUMMARY)
            .with_value(settings_summary(settings)),
        UiElement::leaf(Role::Button, settings.ui_style.landing_button()),
        UiElement::leaf(Role::Switch, "Apple Pay")
            .with_value(if settings.apple_pay_enabled { "1" } else { "0" }),
    ];
    vec![UiElement::leaf(Role::Other, "playground").with_children(children)]
}

fn render_sheet(settings: &PlaygroundSettings, form: &FormState) -> Vec<UiElement> {
    let mut fields = vec![
        UiElement::leaf(Role::TextField, "Card number").with_value(form.card_number.clone()),
        UiElement::leaf(Role::TextField, "MM/YY").with_value(form.expiry.clone()),
        UiElement::leaf(Role::SecureTextField, "CVC").with_value(form.cvc.clone()),
    ];
    if settings.billing_collection == BillingCollection::Always {
        fields.push(UiElement::leaf(Role::TextField, "ZIP").with_value(form.postal_code.clone()));
    }
    if settings.collect_shipping {
        fields.push(UiElement::leaf(Role::Button, "Add shipping address"));
    }
    fields.push(
        UiElement::leaf(Role::Button, "Pay")
            .with_value(format!("10.99 {}", settings.currency.code()))
            .with_hittable(form.complete(settings)),
    );
    vec![UiElement::leaf(Role::Other, SHEET).with_children(fields)]
}

fn render_result() -> Vec<UiElement> {
    vec![UiElement::leaf(Role::Other, "playground").with_children(vec![
        UiElement::leaf(Role::StaticText, PAYMENT_COMPLETE),
        UiElement::leaf(Role::Button, "Done"),
    ])]
}
