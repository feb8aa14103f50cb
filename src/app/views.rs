use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Button, DrawingArea, Justification, Label, Orientation, Overlay, Stack,
    StackTransitionType,
};

use crate::browser::ScreenView;
use crate::ui::StyleTokens;

const PERMISSION_PAGE: &str = "permission";
const LOADING_PAGE: &str = "loading";
const PHOTO_PAGE: &str = "photo";
const PLACEHOLDER_PAGE: &str = "placeholder";

const BLOCKED_HINT: &str =
    "Open Settings and remove the saved decision to allow photo access again";
const SWIPE_HINT: &str = "Swipe left or right to see next photo";

#[derive(Clone)]
pub(super) struct BrowserViews {
    pub(super) root: Overlay,
    pub(super) stack: Stack,
    pub(super) grant_button: Button,
    pub(super) settings_button: Button,
    pub(super) blocked_hint: Label,
    pub(super) card: DrawingArea,
    pub(super) toast_label: Label,
}

impl BrowserViews {
    /// Shows the page for `view`; the blocked hint only appears when blocked.
    pub(super) fn show(&self, view: ScreenView) {
        let blocked = matches!(view, ScreenView::PermissionRequired { blocked: true });
        self.blocked_hint.set_visible(blocked);
        self.settings_button.set_visible(blocked);
        self.stack.set_visible_child_name(page_name(view));
        if view == ScreenView::Photo {
            self.card.queue_draw();
        }
    }
}

fn page_name(view: ScreenView) -> &'static str {
    match view {
        ScreenView::PermissionRequired { .. } => PERMISSION_PAGE,
        ScreenView::Loading => LOADING_PAGE,
        ScreenView::Photo => PHOTO_PAGE,
        ScreenView::Placeholder => PLACEHOLDER_PAGE,
    }
}

pub(super) fn build_browser_views(style_tokens: StyleTokens) -> BrowserViews {
    let stack = Stack::new();
    stack.set_transition_type(StackTransitionType::Crossfade);
    stack.set_hexpand(true);
    stack.set_vexpand(true);

    let (permission_page, grant_button, settings_button, blocked_hint) =
        build_permission_page(style_tokens);
    stack.add_named(&permission_page, Some(PERMISSION_PAGE));
    stack.add_named(
        &build_message_page("Loading photos..."),
        Some(LOADING_PAGE),
    );
    let (photo_page, card) = build_photo_page(style_tokens);
    stack.add_named(&photo_page, Some(PHOTO_PAGE));
    stack.add_named(&build_message_page("Loading..."), Some(PLACEHOLDER_PAGE));
    stack.set_visible_child_name(PLACEHOLDER_PAGE);

    let root = Overlay::new();
    root.set_child(Some(&stack));

    let toast_anchor = GtkBox::new(Orientation::Vertical, 0);
    toast_anchor.set_halign(Align::Center);
    toast_anchor.set_valign(Align::Start);
    toast_anchor.set_margin_top(style_tokens.spacing_24);
    toast_anchor.set_margin_start(style_tokens.spacing_12);
    toast_anchor.set_margin_end(style_tokens.spacing_12);
    let toast_label = Label::new(Some(""));
    toast_label.add_css_class("toast-badge");
    toast_label.set_justify(Justification::Center);
    toast_label.set_wrap(true);
    toast_label.set_visible(false);
    toast_anchor.append(&toast_label);
    root.add_overlay(&toast_anchor);

    BrowserViews {
        root,
        stack,
        grant_button,
        settings_button,
        blocked_hint,
        card,
        toast_label,
    }
}

fn build_permission_page(style_tokens: StyleTokens) -> (GtkBox, Button, Button, Label) {
    let page = GtkBox::new(Orientation::Vertical, style_tokens.spacing_8);
    page.add_css_class("permission-view");
    page.set_valign(Align::Fill);

    let content = GtkBox::new(Orientation::Vertical, style_tokens.spacing_8);
    content.set_valign(Align::Center);
    content.set_halign(Align::Center);
    content.set_vexpand(true);

    let title = Label::new(Some("Photo Access Required"));
    title.add_css_class("permission-title");
    title.set_justify(Justification::Center);

    let text = Label::new(Some(
        "Swiper needs access to your photo library to display photos.",
    ));
    text.add_css_class("permission-text");
    text.set_justify(Justification::Center);
    text.set_wrap(true);

    let grant_button = Button::with_label("Grant Photo Access");
    grant_button.set_halign(Align::Center);
    grant_button.set_sensitive(false);

    let blocked_hint = Label::new(Some(BLOCKED_HINT));
    blocked_hint.add_css_class("permission-hint");
    blocked_hint.set_justify(Justification::Center);
    blocked_hint.set_wrap(true);
    blocked_hint.set_visible(false);

    let settings_button = Button::with_label("Open Settings");
    settings_button.set_halign(Align::Center);
    settings_button.set_visible(false);

    content.append(&title);
    content.append(&text);
    content.append(&grant_button);
    content.append(&blocked_hint);
    content.append(&settings_button);
    page.append(&content);

    (page, grant_button, settings_button, blocked_hint)
}

fn build_message_page(message: &str) -> GtkBox {
    let page = GtkBox::new(Orientation::Vertical, 0);
    page.add_css_class("dark-view");
    let label = Label::new(Some(message));
    label.add_css_class("loading-text");
    label.set_valign(Align::Center);
    label.set_halign(Align::Center);
    label.set_vexpand(true);
    page.append(&label);
    page
}

fn build_photo_page(style_tokens: StyleTokens) -> (Overlay, DrawingArea) {
    let card = DrawingArea::new();
    card.set_hexpand(true);
    card.set_vexpand(true);

    let info = Label::new(Some(SWIPE_HINT));
    info.add_css_class("info-text");
    info.set_halign(Align::Center);
    info.set_valign(Align::End);
    info.set_margin_bottom(style_tokens.spacing_24 * 2);
    info.set_can_target(false);

    let page = Overlay::new();
    page.add_css_class("dark-view");
    page.set_child(Some(&card));
    page.add_overlay(&info);
    (page, card)
}
