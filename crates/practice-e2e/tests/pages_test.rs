// Integration tests for the page objects
//
// Tests cover:
// - Locators declared by each page
// - Compound operations fill fields in display order, then submit
// - A failed step aborts the rest of the operation and is named in the error
// - Notification checks through the PageObject capability

mod common;

use common::FakeApp;
use practice_e2e::{
    BasePage, ContactPage, Error, LoginPage, Notification, PageObject, RegisterPage,
    SecuredAreaPage,
};
use std::time::Duration;

const SHORT: Duration = Duration::from_millis(200);

#[test]
fn test_page_locators() {
    let app = FakeApp::new();

    let register = RegisterPage::new(&app);
    assert_eq!(register.username_input.to_string(), "get_by_label('Username')");
    assert_eq!(
        register.password_input.to_string(),
        "get_by_label('Password', exact=True)"
    );
    assert_eq!(
        register.register_button.to_string(),
        "get_by_role('button', name='Register')"
    );

    let contact = ContactPage::new(&app);
    assert_eq!(
        contact.message_textarea.to_selector(),
        r#"textarea[name="address"]"#
    );
    assert_eq!(
        contact.send_button.to_string(),
        "get_by_role('link', name='Send')"
    );

    let secure = SecuredAreaPage::new(&app);
    assert_eq!(
        secure.contact_link.to_string(),
        "get_by_role('link', name='Contact')"
    );
}

#[tokio::test]
async fn test_register_fills_in_display_order_then_submits() {
    common::init_tracing();
    let app = FakeApp::at("/register");
    let page = RegisterPage::with_base(BasePage::with_timeout(&app, SHORT));

    page.register("practice", "SuperSecretPassword!")
        .await
        .expect("Registration form should submit");

    assert_eq!(
        app.actions(),
        vec![
            format!("fill {}", page.username_input.to_selector()),
            format!("fill {}", page.password_input.to_selector()),
            format!("fill {}", page.confirm_password_input.to_selector()),
            format!("click {}", page.register_button.to_selector()),
        ]
    );
    assert!(app.has_user("practice"));
    assert_eq!(app.path(), "/login");

    let login = LoginPage::with_base(BasePage::with_timeout(&app, SHORT));
    assert!(
        login
            .is_success_notification_displayed(Notification::RegistrationSuccess.text())
            .await
    );
    assert!(!login.is_error_notification_displayed().await);
}

#[tokio::test]
async fn test_register_aborts_at_first_missing_field() {
    common::init_tracing();
    let app = FakeApp::at("/register");
    let page = RegisterPage::with_base(BasePage::with_timeout(&app, SHORT));
    app.hide(&page.confirm_password_input.to_selector());

    let err = page
        .register("practice", "SuperSecretPassword!")
        .await
        .expect_err("Registration should stop at the hidden field");

    match err {
        Error::ActionFailed { page, action } => {
            assert_eq!(page, "RegisterPage");
            assert_eq!(action, "fill confirm password");
        }
        other => panic!("unexpected error: {other}"),
    }
    // Register was never clicked
    assert_eq!(app.actions().len(), 2);
    assert!(!app.has_user("practice"));
}

#[tokio::test]
async fn test_login_with_known_user() {
    common::init_tracing();
    let app = FakeApp::at("/login").with_user("practice", "SuperSecretPassword!");
    let page = LoginPage::with_base(BasePage::with_timeout(&app, SHORT));

    page.login("practice", "SuperSecretPassword!")
        .await
        .expect("Login form should submit");

    assert_eq!(app.path(), "/secure");
    let secure = SecuredAreaPage::with_base(BasePage::with_timeout(&app, SHORT));
    assert!(
        secure
            .is_success_notification_displayed(Notification::LoginSuccess.text())
            .await
    );
}

#[tokio::test]
async fn test_login_with_wrong_password_shows_error() {
    common::init_tracing();
    let app = FakeApp::at("/login").with_user("practice", "SuperSecretPassword!");
    let page = LoginPage::with_base(BasePage::with_timeout(&app, SHORT));

    // The form submits fine; the application rejects it
    page.login("practice", "wrong").await.expect("Form should submit");

    assert_eq!(app.path(), "/login");
    assert!(page.is_error_notification_displayed().await);
    assert!(
        !page
            .is_success_notification_displayed(Notification::LoginSuccess.text())
            .await
    );
}

#[tokio::test]
async fn test_login_aborts_when_button_missing() {
    let app = FakeApp::at("/login");
    let page = LoginPage::with_base(BasePage::with_timeout(&app, SHORT));
    app.hide(&page.login_button.to_selector());

    let err = page.login("practice", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), "LoginPage: failed to click login");
}

#[tokio::test]
async fn test_secured_area_navigates_to_contact() {
    let app = FakeApp::at("/secure");
    let page = SecuredAreaPage::with_base(BasePage::with_timeout(&app, SHORT));

    page.click_contact().await.expect("Contact link should be clickable");
    assert_eq!(app.path(), "/contact");

    // Not on the secured area any more: the link is gone
    let err = page.click_contact().await.unwrap_err();
    assert!(matches!(err, Error::ActionFailed { page: "SecuredAreaPage", .. }));
}

#[tokio::test]
async fn test_send_contact_message() {
    common::init_tracing();
    let app = FakeApp::at("/contact");
    let page = ContactPage::with_base(BasePage::with_timeout(&app, SHORT));

    page.send_contact_message("practice", "test@gmail.com", "This is a test message.")
        .await
        .expect("Contact form should submit");

    assert_eq!(
        app.field(&page.email_address_input.to_selector()).as_deref(),
        Some("test@gmail.com")
    );
    assert_eq!(
        app.field(&page.message_textarea.to_selector()).as_deref(),
        Some("This is a test message.")
    );
    assert!(
        page.is_success_notification_displayed(Notification::MessageSentSuccess.text())
            .await
    );
}

#[tokio::test]
async fn test_single_field_operations_report_visibility() {
    let app = FakeApp::at("/contact");
    let page = ContactPage::with_base(BasePage::with_timeout(&app, SHORT));
    app.hide(&page.name_input.to_selector());

    assert!(!page.fill_name("practice").await);
    assert!(page.fill_email("test@gmail.com").await);
    assert!(page.fill_message("hello").await);
}
