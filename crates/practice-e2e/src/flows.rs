//! End-to-end flows through the practice application.
//!
//! A flow drives page objects in sequence and checks navigation and banner
//! outcomes after each phase. Each phase is a report step; the first failed
//! check ends the flow with [`Error::AssertionFailed`](crate::Error).

use crate::assertions::{ensure, expect_page};
use crate::base_page::{BasePage, DEFAULT_TIMEOUT};
use crate::config::Settings;
use crate::driver::PageDriver;
use crate::error::Result;
use crate::notifications::Notification;
use crate::pages::{ContactPage, LoginPage, PageObject, RegisterPage, SecuredAreaPage};
use crate::report::{Reporter, Severity, TestMetadata, step};
use std::time::Duration;

/// E-mail address submitted through the contact form
pub const CONTACT_EMAIL: &str = "test@gmail.com";

/// Message submitted through the contact form
pub const CONTACT_MESSAGE: &str = "This is a test message.";

/// Everything a flow needs: the page, who to log in as, where to report.
#[derive(Clone, Copy)]
pub struct FlowContext<'a> {
    pub page: &'a dyn PageDriver,
    pub settings: &'a Settings,
    pub reporter: &'a dyn Reporter,
    /// Wait budget for every element, banner and URL check
    pub timeout: Duration,
}

impl<'a> FlowContext<'a> {
    pub fn new(page: &'a dyn PageDriver, settings: &'a Settings, reporter: &'a dyn Reporter) -> Self {
        Self {
            page,
            settings,
            reporter,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn base(&self) -> BasePage<'a> {
        BasePage::with_timeout(self.page, self.timeout)
    }

    async fn expect_url(&self, path: &str, message: &str) -> Result<()> {
        expect_page(self.page)
            .with_timeout(self.timeout)
            .with_message(message)
            .to_have_url(&self.settings.url(path))
            .await
    }
}

/// Report metadata of [`register_login_and_send_contact_message`].
pub fn register_login_and_send_contact_message_metadata() -> TestMetadata {
    TestMetadata::new("User Registration, Login, and Contact Message Sending Flow")
        .parent_suite("Sanity")
        .suite("Full Flows")
        .feature("User Registration and Contact")
        .story("Register, login, and send a notification")
        .severity(Severity::Critical)
        .tag("sanity")
}

/// Registers the configured user, logs in with it and sends a contact
/// message.
///
/// 1. Go to `/register`.
/// 2. Register; expect no error banner, `/login` and the registration banner.
/// 3. Log in; expect no error banner, `/secure` and the login banner.
/// 4. Click "Contact"; expect `/contact`.
/// 5. Send the form; expect the message-sent banner.
pub async fn register_login_and_send_contact_message(ctx: &FlowContext<'_>) -> Result<()> {
    let base = ctx.base();
    let register_page = RegisterPage::with_base(base);
    let login_page = LoginPage::with_base(base);
    let secured_area_page = SecuredAreaPage::with_base(base);
    let contact_page = ContactPage::with_base(base);
    let settings = ctx.settings;

    step(ctx.reporter, "Go to registration page", async {
        ctx.page.goto(&settings.url("register")).await?;
        tracing::info!("Navigated to registration page");
        Ok(())
    })
    .await?;

    step(
        ctx.reporter,
        "Register a new user and verify successful registration",
        async {
            register_page
                .register(&settings.user, &settings.password)
                .await?;

            tracing::info!("Verify there are no errors");
            ensure(
                !register_page.is_error_notification_displayed().await,
                "Unexpected error notification displayed during registration",
            )?;

            tracing::info!("Verify user was redirected to login page");
            ctx.expect_url("login", "User was not redirected to login page")
                .await?;

            tracing::info!("Verify correct success message appears");
            ensure(
                login_page
                    .is_success_notification_displayed(Notification::RegistrationSuccess.text())
                    .await,
                "Registration success notification not displayed",
            )
        },
    )
    .await?;

    step(
        ctx.reporter,
        "Login with the new user and verify successful login",
        async {
            login_page.login(&settings.user, &settings.password).await?;

            tracing::info!("Verify there are no errors");
            ensure(
                !login_page.is_error_notification_displayed().await,
                "Unexpected error notification displayed during login",
            )?;

            tracing::info!("Verify user was redirected to secure page");
            ctx.expect_url("secure", "User was not redirected to secured area")
                .await?;

            tracing::info!("Verify correct success message");
            ensure(
                secured_area_page
                    .is_success_notification_displayed(Notification::LoginSuccess.text())
                    .await,
                "Login success notification not displayed",
            )
        },
    )
    .await?;

    step(ctx.reporter, "Navigate to contact page", async {
        secured_area_page.click_contact().await?;

        tracing::info!("Verify user was redirected to contact page");
        ctx.expect_url("contact", "User was not redirected to contact page")
            .await
    })
    .await?;

    step(ctx.reporter, "Send a contact message and verify success", async {
        contact_page
            .send_contact_message(&settings.user, CONTACT_EMAIL, CONTACT_MESSAGE)
            .await?;

        ensure(
            contact_page
                .is_success_notification_displayed(Notification::MessageSentSuccess.text())
                .await,
            "Message send success notification not displayed",
        )
    })
    .await
}
