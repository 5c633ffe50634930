use std::collections::BTreeMap;

/// Custom property holding one percent of the visible viewport height.
pub const VIEWPORT_HEIGHT_PROPERTY: &str = "--vh";

/// viewport_unit
///
/// Mobile browsers report a `100vh` that includes collapsible toolbars; the
/// page shell uses `calc(var(--vh) * 100)` instead.
pub fn viewport_unit(inner_height: f64) -> String {
    format!("{}px", inner_height * 0.01)
}

/// Viewport
///
/// Document-level style properties, recomputed on load and on resize.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    properties: BTreeMap<String, String>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_load(&mut self, inner_height: f64) {
        self.adjust(inner_height);
    }

    pub fn on_resize(&mut self, inner_height: f64) {
        self.adjust(inner_height);
    }

    fn adjust(&mut self, inner_height: f64) {
        let value = viewport_unit(inner_height);
        tracing::trace!(%value, "viewport height updated");
        self.properties
            .insert(VIEWPORT_HEIGHT_PROPERTY.to_string(), value);
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}
