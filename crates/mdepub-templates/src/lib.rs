use std::collections::HashMap;

pub const BASE_TEMPLATE: &str = include_str!("../templates/base.xhtml");
pub const PAGE_TEMPLATE: &str = include_str!("../templates/page.xhtml");
pub const NAV_TEMPLATE: &str = include_str!("../templates/nav.xhtml");
pub const TOC_TEMPLATE: &str = include_str!("../templates/toc.xhtml");

/// Every embedded template keyed by the name it is registered under. The
/// base shell must be registered together with the pages extending it.
#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert("base.xhtml", BASE_TEMPLATE);
  templates.insert("page.xhtml", PAGE_TEMPLATE);
  templates.insert("nav.xhtml", NAV_TEMPLATE);
  templates.insert("toc.xhtml", TOC_TEMPLATE);
  templates
}
