// Locator - lazy references to page elements
//
// A locator names *how* to find an element, never *which* node it is.
// Drivers resolve it again on every action.
//
// See: https://playwright.dev/docs/locators

use std::fmt;

/// ARIA roles used by the practice application's controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AriaRole {
    Button,
    Link,
}

impl AriaRole {
    /// Returns the role name as it appears in ARIA markup.
    pub fn as_str(&self) -> &'static str {
        match self {
            AriaRole::Button => "button",
            AriaRole::Link => "link",
        }
    }
}

/// A re-evaluatable reference to zero or more elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS (or Playwright CSS extension) selector
    Css(String),
    /// Element with the given role and accessible name
    Role { role: AriaRole, name: String },
    /// Form control associated with a `<label>`
    ///
    /// When `exact` is false the label text matches case-insensitively as a
    /// substring, so "Password" also finds "Confirm Password".
    Label { text: String, exact: bool },
}

impl Locator {
    /// Locates elements matching a CSS selector.
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    /// Locates elements by ARIA role and accessible name.
    ///
    /// See: <https://playwright.dev/docs/locators#locate-by-role>
    pub fn role(role: AriaRole, name: impl Into<String>) -> Self {
        Locator::Role {
            role,
            name: name.into(),
        }
    }

    /// Locates form controls by their label text (substring match).
    ///
    /// See: <https://playwright.dev/docs/locators#locate-by-label>
    pub fn label(text: impl Into<String>) -> Self {
        Locator::Label {
            text: text.into(),
            exact: false,
        }
    }

    /// Locates form controls whose label text equals `text` exactly.
    pub fn label_exact(text: impl Into<String>) -> Self {
        Locator::Label {
            text: text.into(),
            exact: true,
        }
    }

    /// Renders the locator as a Playwright selector string.
    ///
    /// Role and label locators map onto Playwright's internal selector
    /// engines, which is what `getByRole`/`getByLabel` produce in the
    /// official bindings.
    pub fn to_selector(&self) -> String {
        match self {
            Locator::Css(selector) => selector.clone(),
            Locator::Role { role, name } => {
                format!("internal:role={}[name={}i]", role.as_str(), quote(name))
            }
            Locator::Label { text, exact } => {
                let flag = if *exact { 's' } else { 'i' };
                format!("internal:label={}{}", quote(text), flag)
            }
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "locator('{}')", selector),
            Locator::Role { role, name } => {
                write!(f, "get_by_role('{}', name='{}')", role.as_str(), name)
            }
            Locator::Label { text, exact: false } => write!(f, "get_by_label('{}')", text),
            Locator::Label { text, exact: true } => {
                write!(f, "get_by_label('{}', exact=True)", text)
            }
        }
    }
}

fn quote(text: &str) -> String {
    // JSON string escaping is what Playwright's selector parser expects
    serde_json::Value::String(text.to_string()).to_string()
}
