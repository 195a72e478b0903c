//! # paydrive-playground
//!
//! An in-process mock of the payment SDK's example application, used to run
//! the checkout scenario suite hermetically: no simulator, no network, no
//! real SDK. The mock honors the same launch-environment contract as the
//! real application — it decodes the `PAYDRIVE_SETTINGS` blob, applies the
//! recognized feature toggles, and ignores everything else — so the suite
//! exercises the harness end-to-end, including the settings round-trip and
//! the reload-retry boot path.
//!
//! [`PlaygroundApp`] implements both backend seams of `paydrive-core`:
//! [`AppHost`](paydrive_core::launcher::AppHost) for process lifecycle and
//! [`UiDriver`](paydrive_core::driver::UiDriver) for accessibility reads and
//! simulated input.
//!
//! ## Example
//!
//! ```
//! use paydrive_playground::PlaygroundApp;
//! use paydrive_core::element::ElementQuery;
//! use paydrive_core::session::{Session, SessionConfig};
//! use paydrive_core::settings::PlaygroundSettings;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let app = PlaygroundApp::new();
//! let session = Session::start(
//!     "doc_example",
//!     app.clone(),
//!     app.clone(),
//!     PlaygroundSettings::default(),
//!     SessionConfig::default(),
//! )
//! .await
//! .unwrap();
//!
//! session.tap(&ElementQuery::button("Present PaymentSheet")).await.unwrap();
//! session.teardown().await.unwrap();
//! # }
//! ```

pub mod app;
pub mod screens;

pub use app::{FlakePlan, PlaygroundApp};
pub use screens::{Screen, PAYMENT_COMPLETE, SETTINGS_SUMMARY, SHEET};
