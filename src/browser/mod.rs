use std::time::Instant;

use thiserror::Error;

use crate::gesture::{
    CardFrame, DerivedVisualState, ReleaseOutcome, SettleCompletion, SwipeEngine, SwipeTuning,
};
use crate::library::{LibraryResult, LibraryShape, PhotoList, ViewIndex};
use crate::notice::Notice;
use crate::permission::PermissionState;
use crate::state::{StateError, SwipePhase};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no photo to swipe")]
    NoPhoto,
    #[error(transparent)]
    State(#[from] StateError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Which top-level view to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenView {
    PermissionRequired { blocked: bool },
    Loading,
    Photo,
    /// Nothing to show yet: still checking, or the library is empty.
    Placeholder,
}

#[derive(Debug)]
pub struct BrowserSession {
    permission: PermissionState,
    loading: bool,
    photos: PhotoList,
    index: ViewIndex,
    engine: SwipeEngine,
}

impl BrowserSession {
    pub fn new(tuning: SwipeTuning, screen_width: f64) -> Self {
        Self {
            permission: PermissionState::Checking,
            loading: false,
            photos: PhotoList::new(),
            index: ViewIndex::default(),
            engine: SwipeEngine::new(tuning, screen_width),
        }
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn photos(&self) -> &PhotoList {
        &self.photos
    }

    pub fn current_index(&self) -> usize {
        self.index.resolve(self.photos.len()).unwrap_or(0)
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    pub fn current_photo(&self) -> Option<&str> {
        self.photos.at(self.index)
    }

    pub fn screen(&self) -> ScreenView {
        if self.permission.needs_prompt_view() {
            ScreenView::PermissionRequired {
                blocked: self.permission == PermissionState::Blocked,
            }
        } else if self.loading {
            ScreenView::Loading
        } else if self.current_photo().is_some() {
            ScreenView::Photo
        } else {
            ScreenView::Placeholder
        }
    }

    /// Records a check/request result. Returns whether photos should be
    /// loaded now.
    pub fn apply_permission(&mut self, state: PermissionState) -> bool {
        if self.permission != state {
            tracing::debug!(from = %self.permission, to = %state, "permission state changed");
        }
        self.permission = state;
        state.allows_reading() && self.photos.is_empty() && !self.loading
    }

    /// Marks a load as started; `false` if one is already running.
    pub fn begin_load(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    pub fn finish_load(&mut self, result: LibraryResult<PhotoList>) -> Option<Notice> {
        self.loading = false;
        let photos = match result {
            Ok(photos) => photos,
            Err(err) => {
                tracing::error!(?err, "error loading photos");
                return Some(Notice::load_failed());
            }
        };

        let notice = match photos.shape() {
            LibraryShape::Empty => Some(Notice::no_photos()),
            LibraryShape::Single => Some(Notice::only_one_photo(
                self.permission == PermissionState::Limited,
            )),
            LibraryShape::Many => None,
        };
        tracing::info!(count = photos.len(), "photo library loaded");
        self.photos = photos;
        self.index.reset();
        notice
    }

    /// Ends a load whose worker never reported back. Photos from an earlier
    /// load stay, and a new load can be started.
    pub fn abort_load(&mut self) -> Notice {
        self.loading = false;
        tracing::error!(count = self.photos.len(), "photo load lost its worker");
        Notice::load_failed()
    }

    /// The photo a commit from the current position would show next.
    pub fn upcoming_photo(&self) -> Option<&str> {
        let mut next = self.index;
        next.advance(self.photos.len());
        self.photos.at(next)
    }

    pub fn phase(&self) -> SwipePhase {
        self.engine.phase()
    }

    pub fn is_animating(&self) -> bool {
        self.engine.is_animating()
    }

    pub fn frame(&self) -> CardFrame {
        self.engine.frame()
    }

    pub fn set_screen_width(&mut self, screen_width: f64) {
        self.engine.set_screen_width(screen_width);
    }

    pub fn begin_drag(&mut self) -> SessionResult<()> {
        if self.current_photo().is_none() {
            return Err(SessionError::NoPhoto);
        }
        self.engine.begin_drag()?;
        Ok(())
    }

    pub fn drag_to(&mut self, dx: f64, dy: f64) -> Option<DerivedVisualState> {
        self.engine.drag_to(dx, dy)
    }

    pub fn release(&mut self, dx: f64, dy: f64, now: Instant) -> SessionResult<ReleaseOutcome> {
        let count = self.photos.len();
        Ok(self.engine.release(dx, dy, now, &mut self.index, count)?)
    }

    pub fn tick(&mut self, now: Instant) -> Option<SettleCompletion> {
        self.engine.tick(now)
    }
}
