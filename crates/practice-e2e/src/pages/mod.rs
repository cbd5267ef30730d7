//! Page objects for the practice application.
//!
//! Each page object owns a [`BasePage`] (the shared page handle plus timeout)
//! and the locators of one screen. Single-field operations return the
//! primitive's boolean; compound operations chain them in the order a user
//! would and stop at the first step that fails.

mod contact;
mod login;
mod register;
mod secured_area;

pub use contact::ContactPage;
pub use login::LoginPage;
pub use register::RegisterPage;
pub use secured_area::SecuredAreaPage;

use crate::base_page::BasePage;
use crate::error::{Error, Result};
use async_trait::async_trait;

/// Capability shared by every screen: access to the interaction primitives
/// and the notification checks built on them.
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Page object name used in logs and failure reports.
    const NAME: &'static str;

    /// The primitives this page object acts through.
    fn base(&self) -> &BasePage<'_>;

    /// See [`BasePage::is_success_notification_displayed`].
    async fn is_success_notification_displayed(&self, expected: &str) -> bool {
        self.base().is_success_notification_displayed(expected).await
    }

    /// See [`BasePage::is_error_notification_displayed`].
    async fn is_error_notification_displayed(&self) -> bool {
        self.base().is_error_notification_displayed().await
    }
}

/// Turns a failed step of a compound operation into [`Error::ActionFailed`].
pub(crate) fn step_done(done: bool, page: &'static str, action: &str) -> Result<()> {
    if done {
        Ok(())
    } else {
        tracing::error!("{}: aborting, could not {}", page, action);
        Err(Error::ActionFailed {
            page,
            action: action.to_string(),
        })
    }
}
