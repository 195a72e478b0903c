//! Checkout scenario suite, driven purely through harness APIs against the
//! mock playground.

use std::sync::{Arc, OnceLock};

use paydrive_core::element::{ElementQuery, Role};
use paydrive_core::session::{Session, SessionConfig};
use paydrive_core::settings::{Currency, MerchantCountry, PlaygroundSettings, UiStyle};
use paydrive_playground::{PlaygroundApp, PAYMENT_COMPLETE, SETTINGS_SUMMARY};

fn init_tracing() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

async fn start(name: &str, settings: PlaygroundSettings) -> (Arc<PlaygroundApp>, Session) {
    init_tracing();
    let app = PlaygroundApp::new();
    let session = Session::start(
        name,
        app.clone(),
        app.clone(),
        settings,
        SessionConfig::default(),
    )
    .await
    .expect("session should start");
    (app, session)
}

/// Fill the card form with a valid test card.
async fn fill_card_form(session: &Session) {
    session
        .type_text(&ElementQuery::text_field("Card number"), "4242424242424242")
        .await
        .expect("type card number");
    session
        .type_text(&ElementQuery::text_field("MM/YY"), "12/34")
        .await
        .expect("type expiry");
    session
        .type_text(&ElementQuery::new(Role::SecureTextField, "CVC"), "123")
        .await
        .expect("type cvc");
}

// ---------------------------------------------------------------------------
// Card checkout, sheet mode
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn card_checkout_completes() {
    let (_app, session) = start("card_checkout", PlaygroundSettings::default()).await;

    session
        .tap(&ElementQuery::button("Present PaymentSheet"))
        .await
        .expect("present the sheet");
    fill_card_form(&session).await;
    session
        .tap(&ElementQuery::button("Pay"))
        .await
        .expect("pay");
    session
        .assert_text(PAYMENT_COMPLETE)
        .await
        .expect("success screen");

    let log = session.action_log().await;
    assert_eq!(log.len(), 5, "every drive step is recorded");
    session.teardown().await.expect("teardown");
}

#[tokio::test(start_paused = true)]
async fn pay_stays_gated_until_the_form_is_complete() {
    let (app, session) = start("pay_gating", PlaygroundSettings::default()).await;

    session
        .tap(&ElementQuery::button("Present PaymentSheet"))
        .await
        .expect("present the sheet");

    let pay = ElementQuery::button("Pay");
    // Present immediately, but not tappable with an empty form.
    session
        .wait_for(&pay, std::time::Duration::from_secs(4))
        .await
        .expect("pay button is in the tree");
    assert!(
        !paydrive_core::driver::UiDriver::is_hittable(app.as_ref(), &pay)
            .await
            .unwrap(),
        "pay must not be hittable yet"
    );

    fill_card_form(&session).await;
    session
        .wait_for_hittable(&pay, std::time::Duration::from_secs(4))
        .await
        .expect("pay unlocks once the form is complete");
    session.teardown().await.expect("teardown");
}

// ---------------------------------------------------------------------------
// Landing elements per UI style
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn flow_controller_lands_on_confirm_and_opens_the_sheet() {
    let mut settings = PlaygroundSettings::default();
    settings.ui_style = UiStyle::FlowController;
    let (_app, session) = start("flow_controller", settings).await;

    session
        .tap(&ElementQuery::button("Confirm"))
        .await
        .expect("confirm opens the sheet");
    session
        .wait_for(
            &ElementQuery::text_field("Card number"),
            std::time::Duration::from_secs(4),
        )
        .await
        .expect("card form appears");
    session.teardown().await.expect("teardown");
}

#[tokio::test(start_paused = true)]
async fn embedded_mode_lands_on_the_embedded_element() {
    let mut settings = PlaygroundSettings::default();
    settings.ui_style = UiStyle::Embedded;
    let (_app, session) = start("embedded", settings).await;

    session
        .tap(&ElementQuery::button("Present embedded payment element"))
        .await
        .expect("embedded element presents");
    session.teardown().await.expect("teardown");
}

// ---------------------------------------------------------------------------
// Settings propagation through the launch environment
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn settings_summary_reflects_the_launched_configuration() {
    let mut settings = PlaygroundSettings::default();
    settings.currency = Currency::Eur;
    settings.merchant_country = MerchantCountry::De;
    let (_app, session) = start("summary", settings).await;

    let summary = session
        .read_value(&ElementQuery::static_text(SETTINGS_SUMMARY))
        .await
        .expect("summary readable");
    assert_eq!(summary.as_deref(), Some("guest · eur · de"));
    session.teardown().await.expect("teardown");
}

#[tokio::test(start_paused = true)]
async fn pay_button_carries_the_checkout_currency() {
    let mut settings = PlaygroundSettings::default();
    settings.currency = Currency::Gbp;
    let (_app, session) = start("currency_on_pay", settings).await;

    session
        .tap(&ElementQuery::button("Present PaymentSheet"))
        .await
        .expect("present the sheet");
    let amount = session
        .read_value(&ElementQuery::button("Pay"))
        .await
        .expect("amount readable");
    assert_eq!(amount.as_deref(), Some("10.99 gbp"));
    session.teardown().await.expect("teardown");
}

#[tokio::test(start_paused = true)]
async fn wallet_switch_reflects_the_apple_pay_setting() {
    let mut settings = PlaygroundSettings::default();
    settings.apple_pay_enabled = false;
    let (_app, session) = start("wallet_switch", settings).await;

    let value = session
        .read_value(&ElementQuery::switch("Apple Pay"))
        .await
        .expect("switch readable");
    assert_eq!(value.as_deref(), Some("0"));
    session.teardown().await.expect("teardown");
}

#[tokio::test(start_paused = true)]
async fn feature_toggles_reach_the_application() {
    let (app, session) = start("toggles", PlaygroundSettings::default()).await;

    assert!(app.bank_linking_stubbed().await);
    assert!(app.animations_disabled().await);
    session.teardown().await.expect("teardown");
}
