use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::Label;

use crate::notice::Notice;

#[derive(Clone)]
pub(super) struct ToastRuntime {
    label: Label,
    sequence: Rc<Cell<u64>>,
    duration_ms: u32,
}

impl ToastRuntime {
    pub(super) fn new(label: &Label, duration_ms: u32) -> Self {
        Self {
            label: label.clone(),
            sequence: Rc::new(Cell::new(0)),
            duration_ms,
        }
    }

    pub(super) fn show(&self, message: impl Into<String>) {
        let message = message.into();
        self.label.set_text(&message);
        self.label.set_visible(true);

        let sequence = self.sequence.get().saturating_add(1);
        self.sequence.set(sequence);

        let label = self.label.clone();
        let latest_sequence = self.sequence.clone();
        gtk4::glib::timeout_add_local_once(
            Duration::from_millis(u64::from(self.duration_ms)),
            move || {
                if latest_sequence.get() == sequence {
                    label.set_visible(false);
                }
            },
        );
    }

    pub(super) fn show_notice(&self, notice: &Notice) {
        self.show(toast_text(notice));
    }
}

fn toast_text(notice: &Notice) -> String {
    format!("{}\n{}", notice.title, notice.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_text_stacks_title_over_body() {
        let text = toast_text(&Notice::no_photos());
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(Notice::no_photos().title.as_str()));
        assert_eq!(lines.next(), Some(Notice::no_photos().body.as_str()));
    }
}
