#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeAction {
    OpenSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub action: Option<NoticeAction>,
}

impl Notice {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            action: None,
        }
    }

    pub fn with_action(mut self, action: NoticeAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn permission_denied() -> Self {
        Self::new(
            "Permission Denied",
            "Photo library access was denied. You can enable it in Settings.",
        )
    }

    pub fn permission_blocked() -> Self {
        Self::new(
            "Permission Blocked",
            "Photo library access is blocked. Please enable it in Settings.",
        )
        .with_action(NoticeAction::OpenSettings)
    }

    pub fn permission_limited() -> Self {
        Self::new(
            "Limited Access",
            "You have granted limited access to your photo library.",
        )
    }

    pub fn permission_unavailable() -> Self {
        Self::new(
            "Library Unavailable",
            "The photo library folder could not be found.",
        )
    }

    pub fn permission_request_failed() -> Self {
        Self::new("Error", "Failed to request photo library permission.")
    }

    pub fn permission_check_failed() -> Self {
        Self::new("Error", "Failed to check photo library permission.")
    }

    pub fn no_photos() -> Self {
        Self::new("No Photos", "No photos found in your photo library.")
    }

    pub fn only_one_photo(limited: bool) -> Self {
        if limited {
            Self::new(
                "Only One Photo",
                "Only 1 photo is accessible due to limited photo library access. \
                 Allow more folders in Settings.",
            )
            .with_action(NoticeAction::OpenSettings)
        } else {
            Self::new("Only One Photo", "Only 1 unique photo was found.")
        }
    }

    pub fn load_failed() -> Self {
        Self::new("Error", "Failed to load photos from your library.")
    }

    pub fn settings_failed() -> Self {
        Self::new("Error", "Failed to open Settings.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_limited_single_photo_offers_settings() {
        assert_eq!(
            Notice::only_one_photo(true).action,
            Some(NoticeAction::OpenSettings)
        );
        assert_eq!(Notice::only_one_photo(false).action, None);
        assert_eq!(Notice::only_one_photo(false).body, "Only 1 unique photo was found.");
    }
}
