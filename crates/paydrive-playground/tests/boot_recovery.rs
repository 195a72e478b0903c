//! End-to-end boot recovery: the real reload-retry controller against the
//! mock playground's scripted flaky boots.

use paydrive_core::reload::ReloadError;
use paydrive_core::session::{Session, SessionConfig, SessionError};
use paydrive_core::settings::PlaygroundSettings;
use paydrive_playground::PlaygroundApp;

#[tokio::test(start_paused = true)]
async fn flaky_boot_recovers_within_the_retry_budget() {
    // Boots 1 and 2 miss the landing screen; boot 3 is clean.
    let app = PlaygroundApp::flaky(2);
    let session = Session::start(
        "boot_recovery",
        app.clone(),
        app.clone(),
        PlaygroundSettings::default(),
        SessionConfig::default(),
    )
    .await
    .expect("boot should recover");

    assert_eq!(session.boot_report().attempts, 2);
    assert_eq!(app.boots().await, 3, "launch plus exactly two reloads");
    session.teardown().await.expect("teardown");
}

#[tokio::test(start_paused = true)]
async fn persistent_boot_failure_exhausts_the_bound_and_fails() {
    let app = PlaygroundApp::flaky(10);
    let err = Session::start(
        "boot_exhaustion",
        app.clone(),
        app.clone(),
        PlaygroundSettings::default(),
        SessionConfig::default(),
    )
    .await
    .expect_err("boot must give up");

    assert!(matches!(
        err,
        SessionError::Reload(ReloadError::ExhaustedRetries { attempts: 3 })
    ));
    assert_eq!(
        app.boots().await,
        4,
        "initial launch plus exactly max_retries reloads"
    );
}

#[tokio::test(start_paused = true)]
async fn retry_bound_is_a_session_knob() {
    let app = PlaygroundApp::flaky(5);
    let mut config = SessionConfig::default();
    config.reload.max_retries = 5;

    let session = Session::start(
        "boot_raised_bound",
        app.clone(),
        app.clone(),
        PlaygroundSettings::default(),
        config,
    )
    .await
    .expect("boot should recover with a raised bound");

    assert_eq!(session.boot_report().attempts, 5);
    assert_eq!(app.boots().await, 6);
    session.teardown().await.expect("teardown");
}
