use std::io::ErrorKind;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::AppError;
use crate::views::resolver::{ResolvedView, ViewResolverChain};

/// A view name plus the values its template may reference.
#[derive(Debug, Clone, Default)]
pub struct ModelAndView {
    pub view_name: String,
    pub model: Map<String, Value>,
}

impl ModelAndView {
    pub fn new(view_name: impl Into<String>) -> Self {
        Self {
            view_name: view_name.into(),
            model: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.model.insert(key.into(), value.into());
        self
    }
}

/// Resolve through the chain, read the template and fill it in.
pub async fn render_view(chain: &ViewResolverChain, mav: &ModelAndView) -> Result<String, AppError> {
    let view = chain.resolve(&mav.view_name)?;
    let template = load(&view).await?;
    Ok(substitute(&template, &mav.model))
}

/// Render one template once per model and concatenate the results, for
/// repeated fragments such as table rows.
pub async fn render_each<I>(
    chain: &ViewResolverChain,
    view_name: &str,
    models: I,
) -> Result<String, AppError>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    let view = chain.resolve(view_name)?;
    let template = load(&view).await?;
    Ok(models
        .into_iter()
        .map(|model| substitute(&template, &model))
        .collect())
}

async fn load(view: &ResolvedView) -> Result<String, AppError> {
    match tokio::fs::read_to_string(&view.path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::not_found(
            "VIEW_NOT_FOUND",
            format!("view '{}' has no template", view.view_name),
        )),
        Err(e) => Err(AppError::internal(format!(
            "failed to read template {}: {e}",
            view.path.display()
        ))),
    }
}

/// Replace `${key}` with the HTML-escaped value and `$!{key}` with the raw
/// value. Keys may be dotted paths into nested objects. Unknown keys render
/// as nothing; an unterminated placeholder is copied through.
pub fn substitute(template: &str, model: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let (raw, open) = if tail.starts_with("$!{") {
            (true, 3)
        } else if tail.starts_with("${") {
            (false, 2)
        } else {
            out.push('$');
            rest = &tail[1..];
            continue;
        };

        let Some(close) = tail[open..].find('}') else {
            out.push_str(tail);
            return out;
        };

        let key = tail[open..open + close].trim();
        match lookup(model, key) {
            Some(value) => {
                let text = display(value);
                if raw {
                    out.push_str(&text);
                } else {
                    out.push_str(&html_escape::encode_quoted_attribute(&text));
                }
            }
            None => debug!("view=missing_key key={key}"),
        }
        rest = &tail[open + close + 1..];
    }

    out.push_str(rest);
    out
}

fn lookup<'a>(model: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    let mut parts = key.split('.');
    let mut current = model.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
