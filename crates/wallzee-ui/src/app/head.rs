//! Document head updates per route.

use gloo::utils::document;
use serde_json::Value;
use wallzee_core::seo::{PageMeta, website_schema};
use web_sys::Element;

const SCHEMA_ID: &str = "structured-data";

fn head_element(selector: &str, tag: &str, attr: (&str, &str)) -> Option<Element> {
    let document = document();
    if let Ok(Some(existing)) = document.query_selector(selector) {
        return Some(existing);
    }
    let element = document.create_element(tag).ok()?;
    element.set_attribute(attr.0, attr.1).ok()?;
    document.head()?.append_child(&element).ok()?;
    Some(element)
}

fn set_meta(name: &str, content: &str) {
    let selector = format!("meta[name=\"{name}\"]");
    if let Some(meta) = head_element(&selector, "meta", ("name", name)) {
        meta.set_attribute("content", content).ok();
    }
}

/// Apply title, description, canonical link, and robots directive.
pub(crate) fn apply_meta(meta: &PageMeta) {
    document().set_title(&meta.title);
    set_meta("description", &meta.description);
    set_meta("keywords", &meta.keywords);
    set_meta("robots", meta.robots);
    if let Some(link) = head_element("link[rel=\"canonical\"]", "link", ("rel", "canonical")) {
        link.set_attribute("href", &meta.canonical_url).ok();
    }
}

/// Replace the page's JSON-LD block; `None` falls back to the site schema.
pub(crate) fn apply_schema(schema: Option<&Value>) {
    let selector = format!("script#{SCHEMA_ID}");
    let Some(script) = head_element(&selector, "script", ("id", SCHEMA_ID)) else {
        return;
    };
    script.set_attribute("type", "application/ld+json").ok();
    let fallback = website_schema();
    script.set_text_content(Some(&schema.unwrap_or(&fallback).to_string()));
}
