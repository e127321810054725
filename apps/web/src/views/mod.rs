//! View layer: URL path to view name, view name to template, template to HTML.

pub mod render;
pub mod resolver;
pub mod translator;

pub use render::{render_each, render_view, substitute, ModelAndView};
pub use resolver::{ResolvedView, TemplateViewResolver, ViewResolver, ViewResolverChain};
pub use translator::RequestToViewNameTranslator;
