use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use gtk4::gdk_pixbuf::Pixbuf;
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow};

use crate::browser::BrowserSession;
use crate::error::AppResult;
use crate::gesture::SwipeTuning;
use crate::library::{DirectoryPhotoSource, PhotoList, PhotoQuery, PhotoSource};
use crate::notice::Notice;
use crate::notification;
use crate::permission::{
    ConsentAnswer, LibraryPermissionBackend, PermissionGate, PermissionState, RequestOutcome,
};
use crate::settings::{SettingsLauncher, XdgSettingsLauncher};
use crate::storage::ConsentStore;
use crate::ui::{StyleTokens, CARD_COLORS, LAYOUT_TOKENS};

mod bootstrap;
mod card;
mod dialogs;
mod gestures;
mod runtime_css;
mod toast;
mod views;
mod worker;

use self::bootstrap::*;
use self::card::*;
use self::dialogs::*;
use self::gestures::*;
use self::runtime_css::*;
use self::toast::*;
use self::views::*;
use self::worker::*;

const APP_ID: &str = "io.github.swiper.Swiper";

type LibraryGate = PermissionGate<LibraryPermissionBackend<ConsentStore>>;

/// What a permission worker found: either a finished outcome, or the library
/// is undecided and the user has to be asked first.
enum PermissionStep {
    Settled(RequestOutcome),
    NeedsConsent,
}

#[derive(Clone)]
struct BrowserRuntime {
    window: ApplicationWindow,
    views: BrowserViews,
    toast: ToastRuntime,
    session: Rc<RefCell<BrowserSession>>,
    photo_cache: Rc<RefCell<PhotoCache<Pixbuf>>>,
    prefetcher: PhotoPrefetcher,
    gate: Arc<LibraryGate>,
    source: Arc<DirectoryPhotoSource>,
    query: PhotoQuery,
    settings: Rc<XdgSettingsLauncher>,
    library_dir: Rc<PathBuf>,
    permission_busy: Rc<Cell<bool>>,
    style_tokens: StyleTokens,
}

fn sync_screen(runtime: &BrowserRuntime) {
    let view = runtime.session.borrow().screen();
    runtime.views.show(view);
}

fn present_notice(runtime: &BrowserRuntime, notice: &Notice) {
    tracing::info!(title = %notice.title, "presenting notice");
    if notice.action.is_some() {
        let settings_runtime = runtime.clone();
        open_notice_dialog(&runtime.window, notice, runtime.style_tokens, move || {
            open_settings(&settings_runtime);
        });
    } else {
        runtime.toast.show_notice(notice);
    }
    if !runtime.window.is_active() {
        notification::send(notice);
    }
}

fn open_settings(runtime: &BrowserRuntime) {
    if let Err(err) = runtime.settings.open_settings() {
        tracing::error!(?err, "failed to open settings");
        runtime.toast.show_notice(&Notice::settings_failed());
    }
}

/// Outcome for a permission worker that never reported back.
fn lost_permission_outcome(notice: Notice) -> RequestOutcome {
    tracing::error!("permission worker lost");
    RequestOutcome {
        state: PermissionState::Error,
        notice: Some(notice),
    }
}

fn check_permission(runtime: &BrowserRuntime) {
    if runtime.permission_busy.replace(true) {
        return;
    }
    runtime.views.grant_button.set_sensitive(false);

    let gate = runtime.gate.clone();
    let handler_runtime = runtime.clone();
    spawn_worker(
        "permission-check",
        move || gate.check(),
        move |outcome| {
            let outcome = outcome
                .unwrap_or_else(|| lost_permission_outcome(Notice::permission_check_failed()));
            apply_permission_outcome(&handler_runtime, outcome);
        },
    );
}

fn request_permission(runtime: &BrowserRuntime) {
    if runtime.permission_busy.replace(true) {
        return;
    }
    runtime.views.grant_button.set_sensitive(false);

    let permission = runtime.session.borrow().permission();
    if permission == PermissionState::Denied {
        ask_for_consent(runtime);
        return;
    }

    // The cached state may be stale; look again before deciding whether to ask.
    let gate = runtime.gate.clone();
    let handler_runtime = runtime.clone();
    spawn_worker(
        "permission-request",
        move || {
            let outcome = gate.recheck();
            if outcome.state == PermissionState::Denied {
                PermissionStep::NeedsConsent
            } else {
                PermissionStep::Settled(outcome)
            }
        },
        move |step| match step {
            Some(PermissionStep::Settled(outcome)) => {
                apply_permission_outcome(&handler_runtime, outcome);
            }
            Some(PermissionStep::NeedsConsent) => ask_for_consent(&handler_runtime),
            None => apply_permission_outcome(
                &handler_runtime,
                lost_permission_outcome(Notice::permission_request_failed()),
            ),
        },
    );
}

fn ask_for_consent(runtime: &BrowserRuntime) {
    let answer_runtime = runtime.clone();
    open_consent_dialog(
        &runtime.window,
        &runtime.library_dir,
        runtime.style_tokens,
        move |answer| match answer {
            Some(answer) => submit_consent(&answer_runtime, answer),
            None => {
                tracing::debug!("consent prompt dismissed");
                answer_runtime.permission_busy.set(false);
                answer_runtime.views.grant_button.set_sensitive(true);
            }
        },
    );
}

fn submit_consent(runtime: &BrowserRuntime, answer: ConsentAnswer) {
    let gate = runtime.gate.clone();
    let handler_runtime = runtime.clone();
    spawn_worker(
        "permission-request",
        move || gate.request(&answer),
        move |outcome| {
            let outcome = outcome
                .unwrap_or_else(|| lost_permission_outcome(Notice::permission_request_failed()));
            apply_permission_outcome(&handler_runtime, outcome);
        },
    );
}

fn apply_permission_outcome(runtime: &BrowserRuntime, outcome: RequestOutcome) {
    runtime.permission_busy.set(false);
    let should_load = runtime
        .session
        .borrow_mut()
        .apply_permission(outcome.state);
    runtime
        .views
        .grant_button
        .set_sensitive(outcome.state != PermissionState::Checking);
    sync_screen(runtime);

    if let Some(notice) = outcome.notice.as_ref() {
        present_notice(runtime, notice);
    }
    if should_load {
        start_photo_load(runtime);
    }
}

fn start_photo_load(runtime: &BrowserRuntime) {
    let started = runtime.session.borrow_mut().begin_load();
    if !started {
        tracing::debug!("photo load already running");
        return;
    }
    sync_screen(runtime);

    let source = runtime.source.clone();
    let query = runtime.query;
    let handler_runtime = runtime.clone();
    spawn_worker(
        "photo-load",
        move || source.enumerate(&query).map(PhotoList::from_records),
        move |result| {
            let notice = match result {
                Some(result) => {
                    let notice = handler_runtime.session.borrow_mut().finish_load(result);
                    // A reload may reuse references whose files changed.
                    handler_runtime.photo_cache.borrow_mut().clear();
                    notice
                }
                None => Some(handler_runtime.session.borrow_mut().abort_load()),
            };
            handler_runtime.prefetcher.sync();
            sync_screen(&handler_runtime);
            if let Some(notice) = notice.as_ref() {
                present_notice(&handler_runtime, notice);
            }
        },
    );
}

struct BrowserServices {
    gate: Arc<LibraryGate>,
    source: Arc<DirectoryPhotoSource>,
    query: PhotoQuery,
    settings: Rc<XdgSettingsLauncher>,
    library_dir: Rc<PathBuf>,
}

fn build_browser_window(
    app: &Application,
    services: &BrowserServices,
    session: Rc<RefCell<BrowserSession>>,
) -> BrowserRuntime {
    let style_tokens = LAYOUT_TOKENS;
    let window = ApplicationWindow::new(app);
    window.add_css_class("swiper-root");
    window.set_title(Some("Swiper"));
    window.set_default_size(
        style_tokens.window_default_width,
        style_tokens.window_default_height,
    );
    window.set_size_request(style_tokens.window_min_width, style_tokens.window_min_height);

    let views = build_browser_views(style_tokens);
    window.set_child(Some(&views.root));
    let toast = ToastRuntime::new(&views.toast_label, style_tokens.toast_duration_ms);

    let photo_cache = Rc::new(RefCell::new(PhotoCache::default()));
    install_card_draw(&views.card, session.clone(), photo_cache.clone(), CARD_COLORS);
    let prefetcher = PhotoPrefetcher {
        session: session.clone(),
        cache: photo_cache.clone(),
        card: views.card.clone(),
    };
    connect_swipe_gesture(SwipeGestureContext {
        session: session.clone(),
        card: views.card.clone(),
        prefetcher: prefetcher.clone(),
        ticker_running: Rc::new(Cell::new(false)),
        frame_interval: Duration::from_millis(u64::from(style_tokens.motion_frame_ms)),
    });

    BrowserRuntime {
        window,
        views,
        toast,
        session,
        photo_cache,
        prefetcher,
        gate: services.gate.clone(),
        source: services.source.clone(),
        query: services.query,
        settings: services.settings.clone(),
        library_dir: services.library_dir.clone(),
        permission_busy: Rc::new(Cell::new(false)),
        style_tokens,
    }
}

fn connect_browser_controls(runtime: &BrowserRuntime) {
    let grant_runtime = runtime.clone();
    runtime.views.grant_button.connect_clicked(move |_| {
        request_permission(&grant_runtime);
    });

    let settings_runtime = runtime.clone();
    runtime.views.settings_button.connect_clicked(move |_| {
        open_settings(&settings_runtime);
    });

    // Coming back from the settings folder may have changed the answer.
    let focus_runtime = runtime.clone();
    runtime.window.connect_is_active_notify(move |window| {
        let needs_prompt = focus_runtime
            .session
            .borrow()
            .permission()
            .needs_prompt_view();
        if window.is_active() && needs_prompt {
            check_permission(&focus_runtime);
        }
    });
}

pub struct App {
    session: Rc<RefCell<BrowserSession>>,
}

impl App {
    pub fn new() -> Self {
        Self {
            session: Rc::new(RefCell::new(BrowserSession::new(
                SwipeTuning::default(),
                f64::from(LAYOUT_TOKENS.window_default_width),
            ))),
        }
    }

    pub fn start(&mut self) -> AppResult<()> {
        let bootstrap = bootstrap_app_runtime()?;
        *self.session.borrow_mut() = BrowserSession::new(
            bootstrap.tuning,
            f64::from(LAYOUT_TOKENS.window_default_width),
        );

        let services = BrowserServices {
            gate: Arc::new(PermissionGate::new(LibraryPermissionBackend::new(
                bootstrap.library_dir.clone(),
                bootstrap.consent,
            ))),
            source: Arc::new(DirectoryPhotoSource::new(bootstrap.library_dir.clone())),
            query: bootstrap.query,
            settings: Rc::new(XdgSettingsLauncher::new(bootstrap.settings_dir)),
            library_dir: Rc::new(bootstrap.library_dir),
        };

        let application = Application::new(Some(APP_ID), gtk4::gio::ApplicationFlags::NON_UNIQUE);
        let activate_once = Rc::new(Cell::new(false));
        let session = self.session.clone();
        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }
            install_runtime_css(LAYOUT_TOKENS);
            let runtime = build_browser_window(app, &services, session.clone());
            connect_browser_controls(&runtime);
            sync_screen(&runtime);
            runtime.window.present();
            check_permission(&runtime);
        });

        // Pass only argv[0] so --library does not reach GTK's option parser.
        let gtk_args: Vec<String> = std::env::args().take(1).collect();
        let status = application.run_with_args(&gtk_args);
        tracing::debug!(?status, "gtk main loop exited");
        Ok(())
    }

    pub fn photo_count(&self) -> usize {
        self.session.borrow().photo_count()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
