use heartlock_core::PageConfig;

pub(crate) const CONFIG_SCRIPT_ID: &str = "heartlock-config";

/// Reads the optional JSON block embedded in the page. A missing block means
/// defaults; a broken one is logged and replaced by defaults.
pub(crate) fn load_page_config() -> PageConfig {
    let raw = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_SCRIPT_ID))
        .and_then(|element| element.text_content());
    match raw {
        Some(raw) => parse_page_config(&raw),
        None => PageConfig::default(),
    }
}

pub(crate) fn parse_page_config(raw: &str) -> PageConfig {
    if raw.trim().is_empty() {
        return PageConfig::default();
    }
    match PageConfig::from_json(raw) {
        Ok(config) => config,
        Err(err) => {
            gloo::console::warn!(format!("config: {err}, using defaults"));
            PageConfig::default()
        }
    }
}
