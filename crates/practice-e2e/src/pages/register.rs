use super::{PageObject, step_done};
use crate::base_page::BasePage;
use crate::driver::PageDriver;
use crate::error::Result;
use crate::locator::{AriaRole, Locator};

/// The `/register` screen.
#[derive(Debug, Clone)]
pub struct RegisterPage<'p> {
    base: BasePage<'p>,
    pub username_input: Locator,
    pub password_input: Locator,
    pub confirm_password_input: Locator,
    pub register_button: Locator,
}

impl<'p> RegisterPage<'p> {
    pub fn new(page: &'p dyn PageDriver) -> Self {
        Self::with_base(BasePage::new(page))
    }

    pub fn with_base(base: BasePage<'p>) -> Self {
        Self {
            base,
            username_input: Locator::label("Username"),
            // Exact, otherwise "Confirm Password" matches too
            password_input: Locator::label_exact("Password"),
            confirm_password_input: Locator::label("Confirm Password"),
            register_button: Locator::role(AriaRole::Button, "Register"),
        }
    }

    pub async fn fill_username(&self, username: &str) -> bool {
        tracing::info!("Filling username: {}", username);
        self.base.fill_element(&self.username_input, username).await
    }

    pub async fn fill_password(&self, password: &str) -> bool {
        tracing::info!("Filling password");
        self.base.fill_element(&self.password_input, password).await
    }

    pub async fn fill_confirm_password(&self, password: &str) -> bool {
        tracing::info!("Filling confirm password");
        self.base
            .fill_element(&self.confirm_password_input, password)
            .await
    }

    pub async fn click_register(&self) -> bool {
        tracing::info!("Clicking the register button");
        self.base.click_element(&self.register_button).await
    }

    /// Registers a new account: username, password twice, then submit.
    ///
    /// # Errors
    ///
    /// [`crate::Error::ActionFailed`] naming the first step that could not
    /// be performed.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        step_done(self.fill_username(username).await, Self::NAME, "fill username")?;
        step_done(self.fill_password(password).await, Self::NAME, "fill password")?;
        step_done(
            self.fill_confirm_password(password).await,
            Self::NAME,
            "fill confirm password",
        )?;
        step_done(self.click_register().await, Self::NAME, "click register")
    }
}

impl PageObject for RegisterPage<'_> {
    const NAME: &'static str = "RegisterPage";

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }
}
