use crate::ui::StyleTokens;
use gtk4::CssProvider;

fn runtime_css(tokens: StyleTokens) -> String {
    format!(
        "
window.swiper-root {{
  background: #000;
}}
.permission-view {{
  background: #fff;
  padding: {spacing_24}px;
}}
.permission-view label {{
  color: #222;
}}
.permission-title {{
  font-size: 24px;
  font-weight: bold;
  margin-bottom: {spacing_16}px;
}}
.permission-text,
.permission-hint {{
  font-size: 16px;
  color: #666;
}}
.permission-hint {{
  font-size: 14px;
  margin-top: {spacing_16}px;
}}
.permission-view button {{
  min-width: 200px;
  min-height: {control_size}px;
  border-radius: {control_radius}px;
  margin-top: {spacing_8}px;
}}
.dark-view {{
  background: #000;
}}
.loading-text {{
  font-size: 18px;
  color: #fff;
}}
.info-text {{
  font-size: 16px;
  color: #fff;
  margin-bottom: {spacing_12}px;
}}
.toast-badge {{
  background: rgba(30, 30, 30, 0.88);
  color: #fff;
  border-radius: {control_radius}px;
  padding: {spacing_8}px {spacing_12}px;
}}
",
        spacing_8 = tokens.spacing_8,
        spacing_12 = tokens.spacing_12,
        spacing_16 = tokens.spacing_16,
        spacing_24 = tokens.spacing_24,
        control_size = tokens.control_size,
        control_radius = tokens.control_radius,
    )
}

pub(super) fn install_runtime_css(tokens: StyleTokens) {
    let provider = CssProvider::new();
    provider.load_from_data(&runtime_css(tokens));
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    } else {
        tracing::warn!("no default display; runtime css not installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::LAYOUT_TOKENS;

    #[test]
    fn css_substitutes_layout_tokens() {
        let css = runtime_css(LAYOUT_TOKENS);
        assert!(css.contains("min-height: 40px;"));
        assert!(css.contains(".toast-badge"));
        assert!(!css.contains("{spacing"));
    }
}
