//! Session lifecycle tests: explicit start/teardown, action logging, and
//! isolation between consecutive sessions.

mod common;

use std::sync::Arc;

use common::ScriptedApp;

use paydrive_core::action::{Action, ActionResult};
use paydrive_core::driver::UiDriver;
use paydrive_core::element::ElementQuery;
use paydrive_core::launcher::AppHost;
use paydrive_core::session::{Session, SessionConfig};
use paydrive_core::settings::PlaygroundSettings;

async fn ready_session(app: &Arc<ScriptedApp>, name: &str) -> Session {
    Session::start(
        name,
        app.clone() as Arc<dyn UiDriver>,
        app.clone() as Arc<dyn AppHost>,
        PlaygroundSettings::default(),
        SessionConfig::default(),
    )
    .await
    .expect("session should start")
}

#[tokio::test(start_paused = true)]
async fn session_logs_every_action_in_order() {
    let app = ScriptedApp::new(Some(1));
    let session = ready_session(&app, "session_log_order").await;

    let landing = ElementQuery::button("Present PaymentSheet");
    session.tap(&landing).await.expect("tap landing");

    let log = session.action_log().await;
    assert_eq!(log.len(), 1);
    assert!(matches!(&log[0].action, Action::Tap { query } if *query == landing));
    assert!(matches!(log[0].result, ActionResult::Success));
    assert!(log[0].duration_ms.is_some());

    session.teardown().await.expect("teardown");
    assert!(!app.state().running, "teardown terminates the application");
}

#[tokio::test(start_paused = true)]
async fn failed_actions_are_logged_as_failures() {
    let app = ScriptedApp::new(Some(1));
    let config = SessionConfig {
        default_timeout: std::time::Duration::from_secs(1),
        ..SessionConfig::default()
    };
    let session = Session::start(
        "session_log_failure",
        app.clone() as Arc<dyn UiDriver>,
        app.clone() as Arc<dyn AppHost>,
        PlaygroundSettings::default(),
        config,
    )
    .await
    .expect("session should start");

    let missing = ElementQuery::button("No Such Button");
    session.tap(&missing).await.expect_err("tap must time out");

    let log = session.action_log().await;
    assert_eq!(log.len(), 1);
    assert!(matches!(log[0].result, ActionResult::Failure(_)));

    session.teardown().await.expect("teardown");
}

#[tokio::test(start_paused = true)]
async fn consecutive_sessions_each_launch_fresh() {
    let app = ScriptedApp::new(Some(1));

    let first = ready_session(&app, "session_isolation_a").await;
    first.teardown().await.expect("teardown first");

    let second = ready_session(&app, "session_isolation_b").await;
    second.teardown().await.expect("teardown second");

    let state = app.state();
    assert_eq!(state.launches, 2, "one cold launch per session");
    assert!(!state.running, "teardown terminates the application");
}

#[tokio::test(start_paused = true)]
async fn boot_report_is_exposed_on_the_session() {
    // Ready only after one reload.
    let app = ScriptedApp::new(Some(2));
    let session = ready_session(&app, "session_boot_report").await;

    assert_eq!(session.boot_report().attempts, 1);
    session.teardown().await.expect("teardown");
}
