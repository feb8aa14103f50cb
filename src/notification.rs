use crate::notice::Notice;

const APP_NAME: &str = "Swiper";

pub fn send(notice: &Notice) {
    if let Err(err) = notify_rust::Notification::new()
        .appname(APP_NAME)
        .summary(&notice.title)
        .body(&notice.body)
        .show()
    {
        tracing::warn!("system notification failed: {err}");
    }
}
