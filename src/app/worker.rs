use std::sync::mpsc;
use std::time::Duration;

pub(super) const WORKER_RESULT_POLL_INTERVAL: Duration = Duration::from_millis(24);

/// Runs blocking work off the GTK thread and hands the result back on the
/// main loop. The handler always runs exactly once: with `None` when the
/// thread could not be spawned or exited without a result.
pub(super) fn spawn_worker<T, W, H>(label: &'static str, work: W, mut on_result: H)
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
    H: FnMut(Option<T>) + 'static,
{
    let (tx, rx) = mpsc::channel::<T>();
    let spawned = std::thread::Builder::new()
        .name(format!("swiper-{label}"))
        .spawn(move || {
            let result = work();
            let _ = tx.send(result);
        });
    if let Err(err) = spawned {
        tracing::error!(label, ?err, "failed to spawn worker thread");
        gtk4::glib::idle_add_local_once(move || on_result(None));
        return;
    }

    gtk4::glib::timeout_add_local(WORKER_RESULT_POLL_INTERVAL, move || {
        match poll_worker(&rx) {
            WorkerPoll::Pending => gtk4::glib::ControlFlow::Continue,
            WorkerPoll::Done(result) => {
                if result.is_none() {
                    tracing::warn!(label, "worker exited without a result");
                }
                on_result(result);
                gtk4::glib::ControlFlow::Break
            }
        }
    });
}

enum WorkerPoll<T> {
    Pending,
    Done(Option<T>),
}

fn poll_worker<T>(rx: &mpsc::Receiver<T>) -> WorkerPoll<T> {
    match rx.try_recv() {
        Ok(result) => WorkerPoll::Done(Some(result)),
        Err(mpsc::TryRecvError::Empty) => WorkerPoll::Pending,
        Err(mpsc::TryRecvError::Disconnected) => WorkerPoll::Done(None),
    }
}
