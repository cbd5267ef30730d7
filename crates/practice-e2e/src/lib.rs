//! practice-e2e: page objects and end-to-end flows for the practice web application
//!
//! The crate is a thin interaction layer over a browser driver:
//!
//! - [`BasePage`] holds a page handle and a timeout and turns the driver's
//!   "not there / timed out" signalling into booleans plus log lines.
//! - [`pages`] builds one page object per screen on top of it.
//! - [`LogBridge`] forwards `tracing` events into the report as steps.
//! - [`flows`] strings the page objects together into scenarios, and
//!   [`artifacts::run_scenario`] attaches a screenshot and video when one
//!   fails.
//!
//! The browser itself sits behind [`PageDriver`]; enable the `playwright`
//! feature for the Playwright implementation.
//!
//! # Example
//!
//! ```ignore
//! use practice_e2e::driver::playwright::{BrowserSession, LaunchProfile};
//! use practice_e2e::{AllureReporter, FlowContext, LogBridge, Settings, flows};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load()?;
//!     let reporter = Arc::new(AllureReporter::new("allure-results")?);
//!     LogBridge::new(reporter.clone()).install_global()?;
//!
//!     let session = BrowserSession::launch(&LaunchProfile::from_env()).await?;
//!     reporter.start_test("flows::full", &flows::register_login_and_send_contact_message_metadata());
//!
//!     let ctx = FlowContext::new(session.page(), &settings, reporter.as_ref());
//!     let outcome = practice_e2e::artifacts::run_scenario(
//!         &session,
//!         reporter.as_ref(),
//!         "flows::full",
//!         flows::register_login_and_send_contact_message(&ctx),
//!     )
//!     .await;
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod artifacts;
pub mod assertions;
pub mod base_page;
pub mod config;
pub mod driver;
mod error;
pub mod flows;
pub mod locator;
pub mod log_bridge;
pub mod notifications;
pub mod pages;
pub mod report;

// Re-export error types
pub use error::{Error, Result};

// Re-export the interaction layer
pub use base_page::BasePage;
pub use driver::PageDriver;
pub use locator::{AriaRole, Locator};
pub use notifications::Notification;
pub use pages::{ContactPage, LoginPage, PageObject, RegisterPage, SecuredAreaPage};

// Re-export reporting
pub use log_bridge::{LogBridge, LogBridgeGuard, ReportLayer};
pub use report::{AllureReporter, MemoryReporter, Reporter, Status};

// Re-export configuration and flows
pub use config::Settings;
pub use flows::FlowContext;
