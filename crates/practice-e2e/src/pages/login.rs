use super::{PageObject, step_done};
use crate::base_page::BasePage;
use crate::driver::PageDriver;
use crate::error::Result;
use crate::locator::{AriaRole, Locator};

/// The `/login` screen.
#[derive(Debug, Clone)]
pub struct LoginPage<'p> {
    base: BasePage<'p>,
    pub username_input: Locator,
    pub password_input: Locator,
    pub login_button: Locator,
}

impl<'p> LoginPage<'p> {
    pub fn new(page: &'p dyn PageDriver) -> Self {
        Self::with_base(BasePage::new(page))
    }

    /// Builds the page object on existing primitives (e.g. a custom timeout).
    pub fn with_base(base: BasePage<'p>) -> Self {
        Self {
            base,
            username_input: Locator::label("Username"),
            password_input: Locator::label("Password"),
            login_button: Locator::role(AriaRole::Button, "Login"),
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

    pub async fn click_login(&self) -> bool {
        tracing::info!("Clicking the login button");
        self.base.click_element(&self.login_button).await
    }

    /// Fills in the credentials and submits the form.
    ///
    /// # Errors
    ///
    /// [`crate::Error::ActionFailed`] naming the first step that could not
    /// be performed; later steps are skipped.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        step_done(self.fill_username(username).await, Self::NAME, "fill username")?;
        step_done(self.fill_password(password).await, Self::NAME, "fill password")?;
        step_done(self.click_login().await, Self::NAME, "click login")
    }
}

impl PageObject for LoginPage<'_> {
    const NAME: &'static str = "LoginPage";

    fn base(&self) -> &BasePage<'_> {
        &self.base
    }
}
