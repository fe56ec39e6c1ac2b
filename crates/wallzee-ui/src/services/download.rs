//! Synthetic anchor-click download.

use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

use super::api::{ApiError, ApiResult};

/// Ask the browser to save `url` as `filename`.
pub(crate) fn save_as(url: &str, filename: &str) -> ApiResult<()> {
    let browser = |what: &str| ApiError::Browser(what.to_string());
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| browser("document unavailable"))?;
    let body = document.body().ok_or_else(|| browser("document body unavailable"))?;
    let anchor = document
        .create_element("a")
        .map_err(|_| browser("failed to create link"))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| browser("failed to create link"))?;
    anchor.set_href(url);
    anchor.set_download(filename);
    anchor.set_target("_blank");
    body.append_child(&anchor)
        .map_err(|_| browser("failed to attach link"))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|_| browser("failed to detach link"))?;
    Ok(())
}
