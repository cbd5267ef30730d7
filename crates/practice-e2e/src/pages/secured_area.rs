use super::{PageObject, step_done};
use crate::base_page::BasePage;
use crate::driver::PageDriver;
use crate::error::Result;
use crate::locator::{AriaRole, Locator};

/// The `/secure` landing screen shown after login.
#[derive(Debug, Clone)]
pub struct SecuredAreaPage<'p> {
    base: BasePage<'p>,
    pub contact_link: Locator,
}

impl<'p> SecuredAreaPage<'p> {
    pub fn new(page: &'p dyn PageDriver) -> Self {
        Self::with_base(BasePage::new(page))
    }

    pub fn with_base(base: BasePage<'p>) -> Self {
        Self {
            base,
            contact_link: Locator::role(AriaRole::Link, "Contact"),
        }
    }

    /// Opens the contact form through the navigation bar.
    pub async fn click_contact(&self) -> Result<()> {
        tracing::info!("Open Contact form by clicking Contact link on Bar");
        step_done(
            self.base.click_element(&self.contact_link).await,
            Self::NAME,
            "click contact link",
        )
    }
}

impl PageObject for SecuredAreaPage<'_> {
    const NAME: &'static str = "SecuredAreaPage";

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }
}
