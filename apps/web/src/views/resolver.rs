//! Ordered view resolution.
//!
//! Each resolver maps a logical view name onto a template file under the web
//! root. The chain asks resolvers in ascending `order`; the first one that
//! answers wins. A terminal resolver answers for any valid name and leaves
//! the missing-file case to rendering.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedView {
    pub view_name: String,
    pub path: PathBuf,
    pub resolver: String,
}

pub trait ViewResolver: Send + Sync {
    fn name(&self) -> &str;
    fn order(&self) -> i32;
    fn resolve(&self, view_name: &str) -> Option<ResolvedView>;
}

/// Resolves `<root>/<prefix><view name><suffix>`.
#[derive(Debug, Clone)]
pub struct TemplateViewResolver {
    name: String,
    order: i32,
    root: PathBuf,
    prefix: String,
    suffix: String,
    terminal: bool,
}

impl TemplateViewResolver {
    /// Answers only when the template file exists.
    pub fn checked(
        name: impl Into<String>,
        order: i32,
        root: impl Into<PathBuf>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            order,
            root: root.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
            terminal: false,
        }
    }

    /// Answers for every valid view name.
    pub fn terminal(
        name: impl Into<String>,
        order: i32,
        root: impl Into<PathBuf>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            terminal: true,
            ..Self::checked(name, order, root, prefix, suffix)
        }
    }

    fn candidate(&self, view_name: &str) -> PathBuf {
        self.root
            .join(format!("{}{}{}", self.prefix, view_name, self.suffix))
    }
}

impl ViewResolver for TemplateViewResolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn resolve(&self, view_name: &str) -> Option<ResolvedView> {
        let path = self.candidate(view_name);
        if self.terminal || path.is_file() {
            Some(ResolvedView {
                view_name: view_name.to_string(),
                path,
                resolver: self.name.clone(),
            })
        } else {
            None
        }
    }
}

/// View names are relative, slash-separated and never climb out of the root.
pub fn is_valid_view_name(view_name: &str) -> bool {
    if view_name.is_empty() || view_name.contains('\\') || view_name.contains('\0') {
        return false;
    }
    Path::new(view_name)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

pub struct ViewResolverChain {
    resolvers: Vec<Box<dyn ViewResolver>>,
}

impl ViewResolverChain {
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// `view/*.html` first, then `pages/*.htm` as the fallback.
    pub fn standard(web_root: impl AsRef<Path>) -> Self {
        let root = web_root.as_ref();
        Self::new()
            .with(TemplateViewResolver::checked("view", 1, root, "view/", ".html"))
            .with(TemplateViewResolver::terminal("pages", 2, root, "pages/", ".htm"))
    }

    /// Registration order does not matter; resolvers stay sorted by `order`.
    pub fn with(mut self, resolver: impl ViewResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self.resolvers.sort_by_key(|r| r.order());
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    pub fn resolve(&self, view_name: &str) -> Result<ResolvedView, AppError> {
        if !is_valid_view_name(view_name) {
            return Err(AppError::bad_request(
                "INVALID_VIEW_NAME",
                format!("view name '{view_name}' is not allowed"),
            ));
        }
        for resolver in &self.resolvers {
            if let Some(view) = resolver.resolve(view_name) {
                debug!(
                    "view=resolved name={} resolver={} path={}",
                    view_name,
                    view.resolver,
                    view.path.display()
                );
                return Ok(view);
            }
        }
        Err(AppError::not_found(
            "VIEW_NOT_FOUND",
            format!("no resolver could resolve view '{view_name}'"),
        ))
    }
}

impl Default for ViewResolverChain {
    fn default() -> Self {
        Self::new()
    }
}
