use dioxus_logger::tracing::{warn, Level};

use vote_ui::{mount, on_dom_ready, WidgetConfig};

fn main() {
    // Initialize logging for WASM
    wasm_logger::init(wasm_logger::Config::default());
    dioxus_logger::init(Level::INFO).ok();

    on_dom_ready(|| {
        let config = WidgetConfig::from_document().unwrap_or_else(|e| {
            warn!("Invalid vote widget config, using defaults: {}", e);
            WidgetConfig::default()
        });
        // Listeners hold the controller from here on.
        let _controller = mount(config);
    });
}
