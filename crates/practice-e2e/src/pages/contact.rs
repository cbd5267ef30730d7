use super::{PageObject, step_done};
use crate::base_page::BasePage;
use crate::driver::PageDriver;
use crate::error::Result;
use crate::locator::{AriaRole, Locator};

/// The `/contact` screen.
#[derive(Debug, Clone)]
pub struct ContactPage<'p> {
    base: BasePage<'p>,
    pub name_input: Locator,
    pub email_address_input: Locator,
    pub message_textarea: Locator,
    pub send_button: Locator,
}

impl<'p> ContactPage<'p> {
    pub fn new(page: &'p dyn PageDriver) -> Self {
        Self::with_base(BasePage::new(page))
    }

    pub fn with_base(base: BasePage<'p>) -> Self {
        Self {
            base,
            // The form's labels are not associated with their inputs
            name_input: Locator::css(r#"label:has-text("Name") + input"#),
            email_address_input: Locator::css(r#"label:has-text("Email") + input"#),
            message_textarea: Locator::css(r#"textarea[name="address"]"#),
            send_button: Locator::role(AriaRole::Link, "Send"),
        }
    }

    pub async fn fill_name(&self, name: &str) -> bool {
        tracing::info!("Filling name: {}", name);
        self.base.fill_element(&self.name_input, name).await
    }

    pub async fn fill_email(&self, email: &str) -> bool {
        tracing::info!("Filling email: {}", email);
        self.base.fill_element(&self.email_address_input, email).await
    }

    pub async fn fill_message(&self, message: &str) -> bool {
        tracing::info!("Filling message: {}", message);
        self.base.fill_element(&self.message_textarea, message).await
    }

    pub async fn click_send(&self) -> bool {
        tracing::info!("Clicking the send button");
        self.base.click_element(&self.send_button).await
    }

    /// Fills out and sends the contact form.
    ///
    /// # Errors
    ///
    /// [`crate::Error::ActionFailed`] naming the first step that could not
    /// be performed.
    pub async fn send_contact_message(&self, name: &str, email: &str, message: &str) -> Result<()> {
        step_done(self.fill_name(name).await, Self::NAME, "fill name")?;
        step_done(self.fill_email(email).await, Self::NAME, "fill email")?;
        step_done(self.fill_message(message).await, Self::NAME, "fill message")?;
        step_done(self.click_send().await, Self::NAME, "click send")
    }
}

impl PageObject for ContactPage<'_> {
    const NAME: &'static str = "ContactPage";

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }
}
