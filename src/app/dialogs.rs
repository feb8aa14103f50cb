use std::path::Path;

use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Box as GtkBox, Dialog, Justification, Label, Orientation, ResponseType};

use crate::notice::{Notice, NoticeAction};
use crate::permission::ConsentAnswer;
use crate::ui::StyleTokens;

/// Dismissing the prompt without choosing is not a decline.
fn consent_answer_for(response: ResponseType) -> Option<ConsentAnswer> {
    match response {
        ResponseType::Accept => Some(ConsentAnswer::Allow),
        ResponseType::Reject => Some(ConsentAnswer::Deny),
        _ => None,
    }
}

fn dialog_shell(window: &ApplicationWindow, title: &str, body: &str, tokens: StyleTokens) -> Dialog {
    let dialog = Dialog::new();
    dialog.add_css_class("swiper-root");
    dialog.set_title(Some(title));
    dialog.set_transient_for(Some(window));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);

    let body = Label::new(Some(body));
    body.set_xalign(0.5);
    body.set_wrap(true);
    body.set_justify(Justification::Center);

    let content = GtkBox::new(Orientation::Vertical, 0);
    content.set_margin_top(tokens.spacing_12);
    content.set_margin_bottom(tokens.spacing_12);
    content.set_margin_start(tokens.spacing_12);
    content.set_margin_end(tokens.spacing_12);
    content.append(&body);
    dialog.content_area().append(&content);
    dialog
}

pub(super) fn open_consent_dialog<F>(
    window: &ApplicationWindow,
    library_dir: &Path,
    tokens: StyleTokens,
    on_answer: F,
) where
    F: Fn(Option<ConsentAnswer>) + 'static,
{
    let body = format!(
        "Swiper would like to read the photos in\n{}",
        library_dir.display()
    );
    let dialog = dialog_shell(window, "Allow Photo Access?", &body, tokens);
    dialog.add_button("Don't Allow", ResponseType::Reject);
    dialog.add_button("Allow", ResponseType::Accept);
    dialog.set_default_response(ResponseType::Accept);

    dialog.connect_response(move |dialog, response| {
        let answer = consent_answer_for(response);
        tracing::info!(?answer, "consent prompt answered");
        dialog.close();
        on_answer(answer);
    });
    dialog.present();
}

/// Notices that offer a settings shortcut get a dialog instead of a toast.
pub(super) fn open_notice_dialog<F>(
    window: &ApplicationWindow,
    notice: &Notice,
    tokens: StyleTokens,
    on_open_settings: F,
) where
    F: Fn() + 'static,
{
    let dialog = dialog_shell(window, &notice.title, &notice.body, tokens);
    dialog.add_button("OK", ResponseType::Cancel);
    let offers_settings = notice.action == Some(NoticeAction::OpenSettings);
    if offers_settings {
        dialog.add_button("Open Settings", ResponseType::Accept);
    }
    dialog.set_default_response(ResponseType::Cancel);

    dialog.connect_response(move |dialog, response| {
        dialog.close();
        if offers_settings && response == ResponseType::Accept {
            on_open_settings();
        }
    });
    dialog.present();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_buttons_answer_the_prompt() {
        assert_eq!(
            consent_answer_for(ResponseType::Accept),
            Some(ConsentAnswer::Allow)
        );
        assert_eq!(
            consent_answer_for(ResponseType::Reject),
            Some(ConsentAnswer::Deny)
        );
        assert_eq!(consent_answer_for(ResponseType::DeleteEvent), None);
    }
}
