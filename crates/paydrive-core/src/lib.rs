//! # paydrive-core
//!
//! Core automation harness for driving a payment SDK's example application
//! ("the playground") in end-to-end UI tests.
//!
//! The harness is the generic synchronization layer any GUI end-to-end test
//! suite needs: typed element queries resolved fresh against the live
//! accessibility tree, bounded polling with explicit timeouts, wait-then-act
//! input dispatch, deterministic settings encoding into the launch
//! environment, and a reload-retry controller that makes application
//! startup reliable despite cold-start flakiness.
//!
//! ## Modules
//!
//! - [`element`] - Element model and typed queries (role + name + scope)
//! - [`driver`] - The [`UiDriver`](driver::UiDriver) backend seam and tree search
//! - [`wait`] - Bounded polling ([`Waiter`](wait::Waiter)) and named timeout defaults
//! - [`action`] - Simulated user actions and persisted action records
//! - [`dispatch`] - Wait-then-act composition ([`Dispatcher`](dispatch::Dispatcher))
//! - [`settings`] - Playground configuration and its base64 transport encoding
//! - [`launcher`] - Launch environment channel and the [`AppHost`](launcher::AppHost) seam
//! - [`reload`] - Launch / await-ready / bounded-reload orchestration
//! - [`session`] - Explicit per-scenario session with action logging
//!
//! ## Concurrency model
//!
//! One test task drives one application exclusively. All waits are
//! synchronous from the caller's perspective and suspend cooperatively
//! inside the waiter's poll loop; actions execute strictly in program
//! order. Cross-test isolation comes from launching the application fresh
//! per scenario, never from shared harness state.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use paydrive_core::element::ElementQuery;
//! use paydrive_core::session::{Session, SessionConfig};
//! use paydrive_core::settings::{PlaygroundSettings, UiStyle};
//! # use paydrive_core::driver::UiDriver;
//! # use paydrive_core::launcher::AppHost;
//!
//! # async fn example(driver: Arc<dyn UiDriver>, host: Arc<dyn AppHost>) {
//! let mut settings = PlaygroundSettings::default();
//! settings.ui_style = UiStyle::PaymentSheet;
//!
//! let session = Session::start("smoke", driver, host, settings, SessionConfig::default())
//!     .await
//!     .expect("boot failed");
//!
//! session.tap(&ElementQuery::button("Present PaymentSheet")).await.unwrap();
//! session.type_text(&ElementQuery::text_field("Card number"), "4242424242424242").await.unwrap();
//! session.tap(&ElementQuery::button("Pay")).await.unwrap();
//! session.assert_text("Payment complete").await.unwrap();
//! session.teardown().await.unwrap();
//! # }
//! ```

pub mod action;
pub mod dispatch;
pub mod driver;
pub mod element;
pub mod launcher;
pub mod reload;
pub mod session;
pub mod settings;
pub mod wait;
