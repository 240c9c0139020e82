//! Template System - Literal Placeholder Substitution
//!
//! Placeholders are exact literal tokens. No regex, no partial matching.
//! Missing tokens are a no-op and unused context values are ignored.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Declaration rewritten to the scheme's primary color.
pub const PRIMARY_COLOR_DECLARATION: &str = "--primary-color: #2563eb";

/// Replaced everywhere it appears, not only inside a declaration.
pub const SECONDARY_COLOR_LITERAL: &str = "#1d4ed8";

/// Used when the configured template cannot be read.
pub const FALLBACK_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{site_title}}</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.1.3/dist/css/bootstrap.min.css" rel="stylesheet">
</head>
<body>
    <nav class="navbar navbar-expand-lg navbar-dark bg-primary">
        <div class="container">
            <a class="navbar-brand" href="#">{{site_title}}</a>
        </div>
    </nav>
    <div class="container mt-4">
        <h1>{{site_title}}</h1>
        <p>{{site_description}}</p>
    </div>
    <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.1.3/dist/js/bootstrap.bundle.min.js"></script>
</body>
</html>
"##;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorScheme {
    #[default]
    Blue,
    Green,
    Purple,
    Red,
    Orange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    pub primary: &'static str,
    pub secondary: &'static str,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 5] = [
        ColorScheme::Blue,
        ColorScheme::Green,
        ColorScheme::Purple,
        ColorScheme::Red,
        ColorScheme::Orange,
    ];

    pub fn colors(&self) -> ColorPair {
        let (primary, secondary) = match self {
            ColorScheme::Blue => ("#2563eb", "#1d4ed8"),
            ColorScheme::Green => ("#059669", "#047857"),
            ColorScheme::Purple => ("#7c3aed", "#6d28d9"),
            ColorScheme::Red => ("#dc2626", "#b91c1c"),
            ColorScheme::Orange => ("#ea580c", "#c2410c"),
        };
        ColorPair { primary, secondary }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::Blue => "Blue",
            ColorScheme::Green => "Green",
            ColorScheme::Purple => "Purple",
            ColorScheme::Red => "Red",
            ColorScheme::Orange => "Orange",
        }
    }

    /// Case-insensitive lookup; unknown names fall back to Blue.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recognized blog template placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    SiteTitle,
    SiteDescription,
    SiteKeywords,
    CurrentYear,
}

impl Placeholder {
    pub const ALL: [Placeholder; 4] = [
        Placeholder::SiteTitle,
        Placeholder::SiteDescription,
        Placeholder::SiteKeywords,
        Placeholder::CurrentYear,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::SiteTitle => "{{site_title}}",
            Placeholder::SiteDescription => "{{site_description}}",
            Placeholder::SiteKeywords => "{{site_keywords}}",
            Placeholder::CurrentYear => "{{current_year}}",
        }
    }
}

/// Values for one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    pub site_title: String,
    pub site_description: String,
    pub site_keywords: String,
    pub current_year: String,
    pub colors: ColorPair,
}

impl TemplateContext {
    /// Builds a context stamped with the current calendar year.
    pub fn new(
        site_title: impl Into<String>,
        site_description: impl Into<String>,
        site_keywords: impl Into<String>,
        scheme: ColorScheme,
    ) -> Self {
        Self {
            site_title: site_title.into(),
            site_description: site_description.into(),
            site_keywords: site_keywords.into(),
            current_year: chrono::Local::now().year().to_string(),
            colors: scheme.colors(),
        }
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.current_year = year.into();
        self
    }

    pub fn value(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::SiteTitle => &self.site_title,
            Placeholder::SiteDescription => &self.site_description,
            Placeholder::SiteKeywords => &self.site_keywords,
            Placeholder::CurrentYear => &self.current_year,
        }
    }
}

/// Apply literal replacements in order.
pub fn substitute<'a, I>(template: &str, replacements: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    replacements
        .into_iter()
        .fold(template.to_string(), |text, (token, value)| {
            if text.contains(token) {
                text.replace(token, value)
            } else {
                text
            }
        })
}

/// Render a blog template: placeholders first, then the color literals.
pub fn render(template: &str, context: &TemplateContext) -> String {
    let primary = format!("--primary-color: {}", context.colors.primary);

    let replacements = Placeholder::ALL
        .into_iter()
        .map(|p| (p.token(), context.value(p)))
        .chain([
            (PRIMARY_COLOR_DECLARATION, primary.as_str()),
            (SECONDARY_COLOR_LITERAL, context.colors.secondary),
        ]);

    substitute(template, replacements)
}

/// Full blog template shipped with the binary.
pub const BUNDLED_TEMPLATE: &str = include_str!("../templates/blog-template.html");

/// Where template text comes from.
#[derive(Debug, Clone, Default)]
pub enum TemplateSource {
    File(PathBuf),
    #[default]
    Bundled,
}

impl TemplateSource {
    pub fn file(path: impl AsRef<Path>) -> Self {
        TemplateSource::File(path.as_ref().to_path_buf())
    }

    /// Reads the template text. An unreadable file yields the fallback template.
    pub fn load(&self) -> String {
        match self {
            TemplateSource::File(path) => match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!(
                        "Template {} unavailable ({}), using built-in fallback",
                        path.display(),
                        e
                    );
                    FALLBACK_TEMPLATE.to_string()
                }
            },
            TemplateSource::Bundled => BUNDLED_TEMPLATE.to_string(),
        }
    }
}
