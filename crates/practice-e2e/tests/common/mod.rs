// Shared test support: tracing setup and a scripted fake of the practice app
//
// Note: items appear "unused" because each test binary compiles separately,
// but they ARE used across multiple test files.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use practice_e2e::artifacts::ArtifactSource;
use practice_e2e::base_page::{ERROR_NOTIFICATION_SELECTOR, SUCCESS_NOTIFICATION_SELECTOR};
use practice_e2e::report::{AttachmentType, Reporter, Status};
use practice_e2e::{
    ContactPage, Error, LoginPage, PageDriver, RegisterPage, Result, SecuredAreaPage,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub const BASE_URL: &str = "http://practice.test";

/// Console logging for a test, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
struct AppState {
    path: String,
    fields: HashMap<String, String>,
    flash: Option<String>,
    error: Option<String>,
    users: HashMap<String, String>,
    hidden: HashSet<String>,
    faulty: HashSet<String>,
    flash_override: Option<String>,
    actions: Vec<String>,
    action_timeouts: Vec<Duration>,
}

/// In-memory stand-in for the practice application.
///
/// Screens expose the same controls (by selector) as the real pages, and
/// clicks on submit controls apply the application's rules: registration,
/// login, contact form, with the matching banners and redirects.
#[derive(Debug, Default)]
pub struct FakeApp {
    state: Mutex<AppState>,
    hang: std::sync::atomic::AtomicBool,
    screenshots: AtomicUsize,
}

impl FakeApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts on `path` (e.g. "/register").
    pub fn at(path: &str) -> Self {
        let app = Self::new();
        app.state.lock().path = path.to_string();
        app
    }

    pub fn with_user(self, username: &str, password: &str) -> Self {
        self.state
            .lock()
            .users
            .insert(username.to_string(), password.to_string());
        self
    }

    /// Never renders the element with this selector.
    pub fn hide(&self, selector: &str) {
        self.state.lock().hidden.insert(selector.to_string());
    }

    /// Driver faults on any interaction with this selector.
    pub fn fault_on(&self, selector: &str) {
        self.state.lock().faulty.insert(selector.to_string());
    }

    /// Waits never return (ignoring their timeout).
    pub fn hang_waits(&self) {
        self.hang.store(true, Ordering::SeqCst);
    }

    /// Shows a success banner right away.
    pub fn show_success(&self, text: &str) {
        self.state.lock().flash = Some(text.to_string());
    }

    /// Shows an error banner right away.
    pub fn show_error(&self, text: &str) {
        self.state.lock().error = Some(text.to_string());
    }

    /// Every success banner reads `text` instead of the real message.
    pub fn override_flash(&self, text: &str) {
        self.state.lock().flash_override = Some(text.to_string());
    }

    pub fn path(&self) -> String {
        self.state.lock().path.clone()
    }

    pub fn field(&self, selector: &str) -> Option<String> {
        self.state.lock().fields.get(selector).cloned()
    }

    /// Interactions performed so far: `fill <selector>` / `click <selector>`.
    pub fn actions(&self) -> Vec<String> {
        self.state.lock().actions.clone()
    }

    /// Timeout handed to the driver with every click and fill.
    pub fn action_timeouts(&self) -> Vec<Duration> {
        self.state.lock().action_timeouts.clone()
    }

    pub fn has_user(&self, username: &str) -> bool {
        self.state.lock().users.contains_key(username)
    }

    pub fn screenshots_taken(&self) -> usize {
        self.screenshots.load(Ordering::SeqCst)
    }

    fn controls(path: &str) -> Vec<String> {
        match path {
            "/register" => {
                let page = RegisterPage::new(&NoopDriver);
                vec![
                    page.username_input.to_selector(),
                    page.password_input.to_selector(),
                    page.confirm_password_input.to_selector(),
                    page.register_button.to_selector(),
                ]
            }
            "/login" => {
                let page = LoginPage::new(&NoopDriver);
                vec![
                    page.username_input.to_selector(),
                    page.password_input.to_selector(),
                    page.login_button.to_selector(),
                ]
            }
            "/secure" => {
                let page = SecuredAreaPage::new(&NoopDriver);
                vec![page.contact_link.to_selector()]
            }
            "/contact" => {
                let page = ContactPage::new(&NoopDriver);
                vec![
                    page.name_input.to_selector(),
                    page.email_address_input.to_selector(),
                    page.message_textarea.to_selector(),
                    page.send_button.to_selector(),
                ]
            }
            _ => Vec::new(),
        }
    }

    fn rendered(state: &AppState, selector: &str) -> bool {
        if state.hidden.contains(selector) {
            return false;
        }
        if selector == SUCCESS_NOTIFICATION_SELECTOR {
            return state.flash.is_some();
        }
        if selector == ERROR_NOTIFICATION_SELECTOR {
            return state.error.is_some();
        }
        Self::controls(&state.path).iter().any(|s| s == selector)
    }

    fn check_fault(state: &AppState, selector: &str) -> Result<()> {
        if state.faulty.contains(selector) {
            Err(Error::Driver(format!("target crashed while handling {}", selector)))
        } else {
            Ok(())
        }
    }

    fn navigate(state: &mut AppState, path: &str) {
        state.path = path.to_string();
        state.fields.clear();
        state.flash = None;
        state.error = None;
    }

    fn field_of(state: &AppState, selector: String) -> String {
        state.fields.get(&selector).cloned().unwrap_or_default()
    }

    fn submit(state: &mut AppState, selector: &str) {
        let register = RegisterPage::new(&NoopDriver);
        let login = LoginPage::new(&NoopDriver);
        let secure = SecuredAreaPage::new(&NoopDriver);
        let contact = ContactPage::new(&NoopDriver);

        let path = state.path.clone();
        match (path.as_str(), selector) {
            ("/register", s) if s == register.register_button.to_selector() => {
                let username = Self::field_of(state, register.username_input.to_selector());
                let password = Self::field_of(state, register.password_input.to_selector());
                let confirm = Self::field_of(state, register.confirm_password_input.to_selector());
                if username.is_empty() || password != confirm || state.users.contains_key(&username)
                {
                    state.error = Some("An error occurred during registration.".to_string());
                } else {
                    state.users.insert(username, password);
                    Self::navigate(state, "/login");
                    state.flash =
                        Some("Successfully registered, you can log in now.".to_string());
                }
            }
            ("/login", s) if s == login.login_button.to_selector() => {
                let username = Self::field_of(state, login.username_input.to_selector());
                let password = Self::field_of(state, login.password_input.to_selector());
                if state.users.get(&username) == Some(&password) {
                    Self::navigate(state, "/secure");
                    state.flash = Some("You logged into a secure area!".to_string());
                } else {
                    state.error = Some("Your password is invalid!".to_string());
                }
            }
            ("/secure", s) if s == secure.contact_link.to_selector() => {
                Self::navigate(state, "/contact");
            }
            ("/contact", s) if s == contact.send_button.to_selector() => {
                let filled = [
                    contact.name_input.to_selector(),
                    contact.email_address_input.to_selector(),
                    contact.message_textarea.to_selector(),
                ]
                .into_iter()
                .all(|field| !Self::field_of(state, field).is_empty());
                if filled {
                    state.flash = Some("Message was sent successfully".to_string());
                } else {
                    state.error = Some("Please fill out all fields.".to_string());
                }
            }
            _ => {}
        }
    }
}

#[async_trait]
impl PageDriver for FakeApp {
    async fn goto(&self, url: &str) -> Result<()> {
        let path = url.strip_prefix(BASE_URL).unwrap_or(url).to_string();
        Self::navigate(&mut self.state.lock(), &path);
        Ok(())
    }

    async fn url(&self) -> Result<String> {
        Ok(format!("{}{}", BASE_URL, self.state.lock().path))
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }

        let start = Instant::now();
        loop {
            {
                let state = self.state.lock();
                Self::check_fault(&state, selector)?;
                if Self::rendered(&state, selector) {
                    return Ok(());
                }
            }
            if start.elapsed() >= timeout {
                return Err(Error::Timeout(format!("waiting for {}", selector)));
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    async fn inner_text(&self, selector: &str) -> Result<String> {
        let state = self.state.lock();
        Self::check_fault(&state, selector)?;
        if selector == SUCCESS_NOTIFICATION_SELECTOR {
            if let Some(text) = &state.flash_override {
                return Ok(text.clone());
            }
            return state
                .flash
                .clone()
                .ok_or_else(|| Error::Timeout("no flash".into()));
        }
        if selector == ERROR_NOTIFICATION_SELECTOR {
            return state
                .error
                .clone()
                .ok_or_else(|| Error::Timeout("no error".into()));
        }
        Ok(state.fields.get(selector).cloned().unwrap_or_default())
    }

    async fn is_visible(&self, locator: &practice_e2e::Locator) -> Result<bool> {
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let state = self.state.lock();
        let selector = locator.to_selector();
        Self::check_fault(&state, &selector)?;
        Ok(Self::rendered(&state, &selector))
    }

    async fn click(&self, locator: &practice_e2e::Locator, timeout: Duration) -> Result<()> {
        let mut state = self.state.lock();
        state.action_timeouts.push(timeout);
        let selector = locator.to_selector();
        Self::check_fault(&state, &selector)?;
        if !Self::rendered(&state, &selector) {
            return Err(Error::Timeout(format!("{} not found", locator)));
        }
        state.actions.push(format!("click {}", selector));
        Self::submit(&mut state, &selector);
        Ok(())
    }

    async fn fill(
        &self,
        locator: &practice_e2e::Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<()> {
        let mut state = self.state.lock();
        state.action_timeouts.push(timeout);
        let selector = locator.to_selector();
        Self::check_fault(&state, &selector)?;
        if !Self::rendered(&state, &selector) {
            return Err(Error::Timeout(format!("{} not found", locator)));
        }
        state.actions.push(format!("fill {}", selector));
        state.fields.insert(selector, text.to_string());
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.screenshots.fetch_add(1, Ordering::SeqCst);
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }
}

/// Driver used only to build page objects for their locators.
pub struct NoopDriver;

#[async_trait]
impl PageDriver for NoopDriver {
    async fn goto(&self, _url: &str) -> Result<()> {
        Ok(())
    }

    async fn url(&self) -> Result<String> {
        Ok(String::new())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> Result<()> {
        Err(Error::Timeout(selector.to_string()))
    }

    async fn inner_text(&self, _selector: &str) -> Result<String> {
        Ok(String::new())
    }

    async fn is_visible(&self, _locator: &practice_e2e::Locator) -> Result<bool> {
        Ok(false)
    }

    async fn click(&self, _locator: &practice_e2e::Locator, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    async fn fill(
        &self,
        _locator: &practice_e2e::Locator,
        _text: &str,
        _timeout: Duration,
    ) -> Result<()> {
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Artifact source with switchable failures.
#[derive(Debug, Default)]
pub struct FakeArtifacts {
    pub fail_screenshot: bool,
    pub fail_video: bool,
    pub videos_finished: AtomicUsize,
}

#[async_trait]
impl ArtifactSource for FakeArtifacts {
    async fn screenshot(&self) -> Result<Vec<u8>> {
        if self.fail_screenshot {
            return Err(Error::Driver("page crashed".into()));
        }
        Ok(b"png-bytes".to_vec())
    }

    async fn video(&self) -> Result<Vec<u8>> {
        self.videos_finished.fetch_add(1, Ordering::SeqCst);
        if self.fail_video {
            return Err(Error::Report("no video written".into()));
        }
        Ok(b"webm-bytes".to_vec())
    }
}

/// Reporter whose every call fails.
#[derive(Debug, Default)]
pub struct BrokenReporter {
    pub calls: AtomicUsize,
}

impl Reporter for BrokenReporter {
    fn start_step(&self, _name: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Report("sink unavailable".into()))
    }

    fn stop_step(&self, _status: Status) -> Result<()> {
        Err(Error::Report("sink unavailable".into()))
    }

    fn attach(&self, _name: &str, _kind: AttachmentType, _content: &[u8]) -> Result<()> {
        Err(Error::Report("sink unavailable".into()))
    }
}
