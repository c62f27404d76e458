//! Placeholder substitution for the static HTML pages.
//!
//! Templates mark slots with upper-case bracketed tokens such as `{NAME}` or
//! `{MAIN_PLACEHOLDER}`. [`render`] walks the template once and replaces every
//! token with the value supplied for it. A token that is not a known
//! [`Placeholder`], or a known one without a value, fails the render so a page
//! never goes out with raw tokens in it. Values are inserted verbatim and never
//! scanned again.

use super::device::TemplateNumber;
use regex::{Captures, Regex};
use std::{collections::BTreeMap, sync::LazyLock};
use thiserror::Error;

static TOKEN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\{([A-Z][A-Z0-9_-]*)\}"));

pub const LAYOUT_HTML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/layout.html"
));
pub const BOARDING_HTML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/boarding.html"
));
pub const REGISTER_HTML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/register.html"
));

const HERO_IMAGE: &str = "https://res.cloudinary.com/woooanet/image/upload/v1540199193/hitachi-fingervein-fe/brandingimg_vid_e.jpg";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("unknown placeholder {{{0}}}")]
    Unknown(String),
    #[error("no value for placeholder {0}")]
    Missing(&'static str),
    #[error("invalid placeholder pattern: {0}")]
    Pattern(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Placeholder {
    ThisUrl,
    Nav,
    Main,
    Name,
    FromLong,
    FromShort,
    ToLong,
    ToShort,
    Flight,
    Month,
    Day,
    Year,
    Hour,
    Minute,
    Gate,
    BoardingHour,
    BoardingMinute,
    Seat,
    TemplateNumber,
}

impl Placeholder {
    pub const ALL: [Self; 19] = [
        Self::ThisUrl,
        Self::Nav,
        Self::Main,
        Self::Name,
        Self::FromLong,
        Self::FromShort,
        Self::ToLong,
        Self::ToShort,
        Self::Flight,
        Self::Month,
        Self::Day,
        Self::Year,
        Self::Hour,
        Self::Minute,
        Self::Gate,
        Self::BoardingHour,
        Self::BoardingMinute,
        Self::Seat,
        Self::TemplateNumber,
    ];

    /// Token name as written inside the braces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ThisUrl => "THIS_URL",
            Self::Nav => "NAV_PLACEHOLDER",
            Self::Main => "MAIN_PLACEHOLDER",
            Self::Name => "NAME",
            Self::FromLong => "FROM-LONG",
            Self::FromShort => "FROM-SHORT",
            Self::ToLong => "TO-LONG",
            Self::ToShort => "TO-SHORT",
            Self::Flight => "FLIGHT",
            Self::Month => "MMM",
            Self::Day => "DD",
            Self::Year => "YYYY",
            Self::Hour => "HH",
            Self::Minute => "MM",
            Self::Gate => "GATE",
            Self::BoardingHour => "BHH",
            Self::BoardingMinute => "BMM",
            Self::Seat => "SEAT",
            Self::TemplateNumber => "TEMPLATE_NUMBER",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Values for one render, keyed by placeholder.
#[derive(Debug, Clone, Default)]
pub struct Placeholders(BTreeMap<Placeholder, String>);

impl Placeholders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: Placeholder, value: impl Into<String>) -> Self {
        self.0.insert(key, value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: Placeholder) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }
}

/// Substitute every placeholder in `template`.
///
/// # Errors
/// Returns [`RenderError`] on an unknown token or a token without a value.
pub fn render(template: &str, values: &Placeholders) -> Result<String, RenderError> {
    let token = TOKEN
        .as_ref()
        .map_err(|err| RenderError::Pattern(err.to_string()))?;

    let mut failure = None;
    let rendered = token.replace_all(template, |caps: &Captures| {
        let name = &caps[1];
        let value = match Placeholder::from_name(name) {
            Some(key) => values.get(key).ok_or(RenderError::Missing(key.name())),
            None => Err(RenderError::Unknown(name.to_string())),
        };

        match value {
            Ok(value) => value.to_string(),
            Err(err) => {
                failure.get_or_insert(err);
                String::new()
            }
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(rendered.into_owned()),
    }
}

/// Escape text for insertion into HTML content or attribute values.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Page shell plus the fragments rendered into its main slot.
#[derive(Debug, Clone)]
pub struct Pages {
    base_url: String,
    layout: String,
    boarding: String,
    register: String,
}

impl Pages {
    /// Pages backed by the templates embedded at build time.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::from_templates(base_url, LAYOUT_HTML, BOARDING_HTML, REGISTER_HTML)
    }

    #[must_use]
    pub fn from_templates(base_url: &str, layout: &str, boarding: &str, register: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            layout: layout.to_string(),
            boarding: boarding.to_string(),
            register: register.to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn globals(&self) -> Placeholders {
        Placeholders::new().with(Placeholder::ThisUrl, self.base_url.clone())
    }

    fn anonymous_nav() -> &'static str {
        r#"<li onclick="register()">Register</li><li onclick="logIn()">Login</li>"#
    }

    fn shell(&self, nav: String, main: String) -> Result<String, RenderError> {
        render(
            &self.layout,
            &self
                .globals()
                .with(Placeholder::Nav, nav)
                .with(Placeholder::Main, main),
        )
    }

    /// Landing page with the hero image.
    ///
    /// # Errors
    /// Returns [`RenderError`] if the layout has unresolved placeholders.
    pub fn home(&self) -> Result<String, RenderError> {
        self.shell(
            Self::anonymous_nav().to_string(),
            format!(r#"<figure><img id="cover-img" src="{HERO_IMAGE}" /></figure>"#),
        )
    }

    /// Home shell carrying an inline message in place of the hero image.
    ///
    /// # Errors
    /// Returns [`RenderError`] if the layout has unresolved placeholders.
    pub fn message(&self, id: &str, text: &str) -> Result<String, RenderError> {
        self.shell(
            Self::anonymous_nav().to_string(),
            format!(r#"<p id="{id}">{}</p>"#, escape_html(text)),
        )
    }

    /// Boarding pass for a verified traveler.
    ///
    /// # Errors
    /// Returns [`RenderError`] if a template has unresolved placeholders.
    pub fn boarding_pass(
        &self,
        pass: &super::boarding_pass::BoardingPass,
    ) -> Result<String, RenderError> {
        let times = super::boarding_pass::PassTimes::new(pass.time);

        let fields = self
            .globals()
            .with(Placeholder::Name, escape_html(&pass.name.to_uppercase()))
            .with(Placeholder::FromLong, escape_html(&pass.from_long.to_uppercase()))
            .with(Placeholder::FromShort, escape_html(&pass.from_short))
            .with(Placeholder::ToLong, escape_html(&pass.to_long.to_uppercase()))
            .with(Placeholder::ToShort, escape_html(&pass.to_short))
            .with(Placeholder::Flight, escape_html(&pass.flight))
            .with(Placeholder::Month, times.month)
            .with(Placeholder::Day, times.day)
            .with(Placeholder::Year, times.year)
            .with(Placeholder::Hour, times.hour)
            .with(Placeholder::Minute, times.minute)
            .with(Placeholder::Gate, escape_html(&pass.gate))
            .with(Placeholder::BoardingHour, times.boarding_hour)
            .with(Placeholder::BoardingMinute, times.boarding_minute)
            .with(Placeholder::Seat, escape_html(&pass.seat));

        let main = render(&self.boarding, &fields)?;
        let nav = format!(
            r#"<li>Hello, {}!</li><li><a href="{}/logout">Logout</a></li>"#,
            escape_html(&pass.name),
            self.base_url
        );

        self.shell(nav, main)
    }

    /// Registration form pre-filled with the template number the device assigned.
    ///
    /// # Errors
    /// Returns [`RenderError`] if a template has unresolved placeholders.
    pub fn registration(&self, template_number: TemplateNumber) -> Result<String, RenderError> {
        let main = render(
            &self.register,
            &self
                .globals()
                .with(Placeholder::TemplateNumber, template_number.to_string()),
        )?;

        self.shell(Self::anonymous_nav().to_string(), main)
    }
}
