/// Derives a logical view name from a request path when a handler does not
/// name one itself.
///
/// `/examples/` -> `examples`, `/about.html` -> `about`, `/` -> `index`.
#[derive(Debug, Clone)]
pub struct RequestToViewNameTranslator {
    prefix: String,
    suffix: String,
    default_view: String,
}

impl Default for RequestToViewNameTranslator {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            default_view: "index".to_string(),
        }
    }
}

impl RequestToViewNameTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn view_name(&self, path: &str) -> String {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let core = match segments.split_last() {
            None => self.default_view.clone(),
            Some((last, parents)) => {
                let last = strip_extension(last);
                let mut parts: Vec<&str> = parents.to_vec();
                if !last.is_empty() {
                    parts.push(last);
                }
                if parts.is_empty() {
                    self.default_view.clone()
                } else {
                    parts.join("/")
                }
            }
        };

        format!("{}{}{}", self.prefix, core, self.suffix)
    }
}

fn strip_extension(segment: &str) -> &str {
    match segment.rfind('.') {
        Some(0) | None => segment,
        Some(idx) => &segment[..idx],
    }
}
