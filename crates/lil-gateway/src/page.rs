use std::io;
use std::path::Path;

/// Placeholder replaced by the escaped target URL.
pub const URL_PLACEHOLDER: &str = "{{url}}";

const DEFAULT_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>Redirecting</title>
</head>
<body>
  <p>You are being redirected to:</p>
  <p><a href="{{url}}" rel="noopener noreferrer">{{url}}</a></p>
</body>
</html>
"#;

/// The confirmation page shown for `/p/{code}` links.
#[derive(Debug, Clone)]
pub struct InterstitialPage {
    template: String,
}

impl Default for InterstitialPage {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl InterstitialPage {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Reads the template at `path`, or uses the built-in page when `None`.
    pub fn load(path: Option<&Path>) -> io::Result<Self> {
        match path {
            Some(path) => Ok(Self::new(std::fs::read_to_string(path)?)),
            None => Ok(Self::default()),
        }
    }

    pub fn render(&self, target_url: &str) -> String {
        self.template
            .replace(URL_PLACEHOLDER, &escape_html(target_url))
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_mentions_target() {
        let body = InterstitialPage::default().render("https://example.com/a");
        assert!(body.contains(r#"href="https://example.com/a""#));
    }

    #[test]
    fn target_is_escaped() {
        let page = InterstitialPage::new("<a href=\"{{url}}\">");
        let body = page.render("https://example.com/?a=1&b=\"><script>");
        assert_eq!(
            body,
            "<a href=\"https://example.com/?a=1&amp;b=&quot;&gt;&lt;script&gt;\">"
        );
    }

    #[test]
    fn missing_template_is_an_error() {
        assert!(InterstitialPage::load(Some(Path::new("/nonexistent/lil/redirect.html"))).is_err());
    }

    #[test]
    fn no_path_uses_default() {
        let page = InterstitialPage::load(None).unwrap();
        assert!(page.render("https://x.io").contains("https://x.io"));
    }
}
