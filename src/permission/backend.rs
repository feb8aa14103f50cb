use std::fs;
use std::io;
use std::path::PathBuf;

use crate::storage::{ConsentDecision, ConsentRecord, ConsentStorage};

use super::{
    ConsentAnswer, ConsentPrompt, PermissionBackend, PermissionError, PermissionResult,
    PermissionState,
};

/// Declines after which requests stop prompting.
pub const DECLINES_BEFORE_BLOCK: u32 = 2;

/// Permission over a library directory: user consent plus OS readability.
#[derive(Debug, Clone)]
pub struct LibraryPermissionBackend<S> {
    library_dir: PathBuf,
    consent: S,
}

impl<S: ConsentStorage> LibraryPermissionBackend<S> {
    pub fn new(library_dir: impl Into<PathBuf>, consent: S) -> Self {
        Self {
            library_dir: library_dir.into(),
            consent,
        }
    }

    fn inspect_root(&self) -> PermissionResult<Option<PermissionState>> {
        match fs::metadata(&self.library_dir) {
            Ok(metadata) if metadata.is_dir() => Ok(None),
            Ok(_) => Ok(Some(PermissionState::Unavailable)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Some(PermissionState::Unavailable))
            }
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                Ok(Some(PermissionState::Blocked))
            }
            Err(source) => Err(PermissionError::Inspect {
                path: self.library_dir.clone(),
                source,
            }),
        }
    }

    fn inspect_listing(&self) -> PermissionResult<PermissionState> {
        let entries = match fs::read_dir(&self.library_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                return Ok(PermissionState::Blocked);
            }
            Err(source) => {
                return Err(PermissionError::Inspect {
                    path: self.library_dir.clone(),
                    source,
                })
            }
        };

        let mut hidden_entries = 0usize;
        for entry in entries {
            let Ok(entry) = entry else {
                hidden_entries += 1;
                continue;
            };
            let path = entry.path();
            if path.is_dir() && fs::read_dir(&path).is_err() {
                hidden_entries += 1;
            }
        }

        if hidden_entries > 0 {
            tracing::debug!(
                library = %self.library_dir.display(),
                hidden_entries,
                "photo library is only partially readable"
            );
            Ok(PermissionState::Limited)
        } else {
            Ok(PermissionState::Granted)
        }
    }
}

impl<S: ConsentStorage> PermissionBackend for LibraryPermissionBackend<S> {
    fn check(&self) -> PermissionResult<PermissionState> {
        if let Some(state) = self.inspect_root()? {
            return Ok(state);
        }

        match self.consent.load()? {
            None => Ok(PermissionState::Denied),
            Some(record) if record.decision == ConsentDecision::Declined => {
                if record.declines >= DECLINES_BEFORE_BLOCK {
                    Ok(PermissionState::Blocked)
                } else {
                    Ok(PermissionState::Denied)
                }
            }
            Some(_) => self.inspect_listing(),
        }
    }

    fn request(&self, prompt: &dyn ConsentPrompt) -> PermissionResult<PermissionState> {
        let current = self.check()?;
        if current != PermissionState::Denied {
            tracing::debug!(state = %current, "permission request resolved without prompting");
            return Ok(current);
        }

        let record = match prompt.ask() {
            ConsentAnswer::Allow => ConsentRecord::granted(),
            ConsentAnswer::Deny => {
                let previous = self.consent.load()?;
                ConsentRecord::declined_after(previous.as_ref())
            }
        };
        self.consent.save(&record)?;
        tracing::info!(
            decision = ?record.decision,
            declines = record.declines,
            "recorded photo library consent"
        );

        self.check()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::storage::{StorageError, StorageResult};

    #[derive(Default)]
    struct MemoryConsent {
        record: RefCell<Option<ConsentRecord>>,
        fail_load: bool,
    }

    impl ConsentStorage for MemoryConsent {
        fn load(&self) -> StorageResult<Option<ConsentRecord>> {
            if self.fail_load {
                return Err(StorageError::MissingHomeDirectory);
            }
            Ok(*self.record.borrow())
        }

        fn save(&self, record: &ConsentRecord) -> StorageResult<()> {
            *self.record.borrow_mut() = Some(*record);
            Ok(())
        }
    }

    struct CountingPrompt {
        answer: ConsentAnswer,
        asked: Cell<u32>,
    }

    impl CountingPrompt {
        fn new(answer: ConsentAnswer) -> Self {
            Self {
                answer,
                asked: Cell::new(0),
            }
        }
    }

    impl ConsentPrompt for CountingPrompt {
        fn ask(&self) -> ConsentAnswer {
            self.asked.set(self.asked.get() + 1);
            self.answer
        }
    }

    fn scratch_library(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "swiper-permission-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create library");
        dir
    }

    #[test]
    fn missing_library_is_unavailable_and_never_prompts() {
        let library = scratch_library("missing").join("absent");
        let backend = LibraryPermissionBackend::new(&library, MemoryConsent::default());
        assert_eq!(backend.check().expect("check"), PermissionState::Unavailable);

        let prompt = CountingPrompt::new(ConsentAnswer::Allow);
        assert_eq!(
            backend.request(&prompt).expect("request"),
            PermissionState::Unavailable
        );
        assert_eq!(prompt.asked.get(), 0);
    }

    #[test]
    fn file_in_place_of_library_is_unavailable() {
        let library = scratch_library("file").join("photo.jpg");
        fs::write(&library, b"x").expect("write");
        let backend = LibraryPermissionBackend::new(&library, MemoryConsent::default());
        assert_eq!(backend.check().expect("check"), PermissionState::Unavailable);
    }

    #[test]
    fn check_without_consent_is_denied_and_does_not_write() {
        let library = scratch_library("denied");
        let backend = LibraryPermissionBackend::new(&library, MemoryConsent::default());
        assert_eq!(backend.check().expect("check"), PermissionState::Denied);
        assert_eq!(backend.check().expect("check again"), PermissionState::Denied);
        assert!(backend.consent.record.borrow().is_none());
    }

    #[test]
    fn allowing_grants_and_later_requests_do_not_prompt() {
        let library = scratch_library("allow");
        let backend = LibraryPermissionBackend::new(&library, MemoryConsent::default());
        let prompt = CountingPrompt::new(ConsentAnswer::Allow);

        assert_eq!(backend.request(&prompt).expect("request"), PermissionState::Granted);
        assert_eq!(backend.request(&prompt).expect("request again"), PermissionState::Granted);
        assert_eq!(prompt.asked.get(), 1);
        assert_eq!(backend.check().expect("check"), PermissionState::Granted);
    }

    #[test]
    fn repeated_declines_block_further_prompts() {
        let library = scratch_library("decline");
        let backend = LibraryPermissionBackend::new(&library, MemoryConsent::default());
        let prompt = CountingPrompt::new(ConsentAnswer::Deny);

        assert_eq!(backend.request(&prompt).expect("first"), PermissionState::Denied);
        assert_eq!(backend.request(&prompt).expect("second"), PermissionState::Blocked);
        assert_eq!(backend.request(&prompt).expect("third"), PermissionState::Blocked);
        assert_eq!(prompt.asked.get(), DECLINES_BEFORE_BLOCK);
    }

    #[test]
    fn consent_failures_surface_as_errors() {
        let library = scratch_library("fail");
        let backend = LibraryPermissionBackend::new(
            &library,
            MemoryConsent {
                fail_load: true,
                ..MemoryConsent::default()
            },
        );
        assert!(matches!(
            backend.check(),
            Err(PermissionError::Consent(StorageError::MissingHomeDirectory))
        ));
    }
}
