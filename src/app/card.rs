use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gtk4::cairo;
use gtk4::gdk::prelude::GdkCairoContextExt;
use gtk4::gdk_pixbuf::{Colorspace, Pixbuf};
use gtk4::prelude::*;
use gtk4::DrawingArea;

use crate::browser::BrowserSession;
use crate::geometry::Rgba;
use crate::library::{decode_for_display, photo_path, DecodedPhoto, DISPLAY_MAX_EDGE};
use crate::ui::CardColors;

use super::worker::spawn_worker;

/// Where a photo lands inside the card when scaled to fit ("contain").
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PhotoPlacement {
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) scale: f64,
}

pub(super) fn contain_placement(
    image_width: f64,
    image_height: f64,
    area_width: f64,
    area_height: f64,
) -> Option<PhotoPlacement> {
    if image_width <= 0.0 || image_height <= 0.0 || area_width <= 0.0 || area_height <= 0.0 {
        return None;
    }
    let scale = (area_width / image_width).min(area_height / image_height);
    Some(PhotoPlacement {
        x: (area_width - image_width * scale) / 2.0,
        y: (area_height - image_height * scale) / 2.0,
        scale,
    })
}

enum CacheSlot<T> {
    Pending,
    Ready(T),
    Failed,
}

/// Decoded photos keyed by reference. Only the photos the browser can show
/// next are kept; failed decodes are remembered so they are not retried.
pub(super) struct PhotoCache<T> {
    slots: HashMap<String, CacheSlot<T>>,
}

impl<T> Default for PhotoCache<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<T> PhotoCache<T> {
    /// Marks `uri` as being decoded. `false` when it is already known.
    pub(super) fn request(&mut self, uri: &str) -> bool {
        if self.slots.contains_key(uri) {
            return false;
        }
        self.slots.insert(uri.to_string(), CacheSlot::Pending);
        true
    }

    /// Stores a finished decode, unless `uri` was evicted meanwhile.
    pub(super) fn fulfil(&mut self, uri: &str, decoded: Option<T>) -> bool {
        let Some(slot) = self.slots.get_mut(uri) else {
            return false;
        };
        *slot = match decoded {
            Some(value) => CacheSlot::Ready(value),
            None => CacheSlot::Failed,
        };
        true
    }

    pub(super) fn get(&self, uri: &str) -> Option<&T> {
        match self.slots.get(uri) {
            Some(CacheSlot::Ready(value)) => Some(value),
            _ => None,
        }
    }

    pub(super) fn retain_only(&mut self, keep: &[&str]) {
        self.slots.retain(|uri, _| keep.contains(&uri.as_str()));
    }

    pub(super) fn clear(&mut self) {
        self.slots.clear();
    }
}

fn pixbuf_from_decoded(photo: DecodedPhoto) -> Option<Pixbuf> {
    let width = i32::try_from(photo.width).ok()?;
    let height = i32::try_from(photo.height).ok()?;
    let row_stride = i32::try_from(photo.row_stride()).ok()?;
    let bytes = gtk4::glib::Bytes::from_owned(photo.rgba);
    Some(Pixbuf::from_bytes(
        &bytes,
        Colorspace::Rgb,
        true,
        8,
        width,
        height,
        row_stride,
    ))
}

/// Keeps the current and upcoming photo decoded off the main loop, so a
/// commit, which advances to the upcoming photo, draws from the cache.
#[derive(Clone)]
pub(super) struct PhotoPrefetcher {
    pub(super) session: Rc<RefCell<BrowserSession>>,
    pub(super) cache: Rc<RefCell<PhotoCache<Pixbuf>>>,
    pub(super) card: DrawingArea,
}

impl PhotoPrefetcher {
    pub(super) fn sync(&self) {
        let wanted: Vec<String> = {
            let session = self.session.borrow();
            [session.current_photo(), session.upcoming_photo()]
                .into_iter()
                .flatten()
                .map(str::to_string)
                .collect()
        };
        let keep: Vec<&str> = wanted.iter().map(String::as_str).collect();
        self.cache.borrow_mut().retain_only(&keep);

        for uri in wanted {
            let started = self.cache.borrow_mut().request(&uri);
            if started {
                self.decode(uri);
            }
        }
    }

    fn decode(&self, uri: String) {
        let path = photo_path(&uri);
        let cache = self.cache.clone();
        let card = self.card.clone();
        spawn_worker(
            "photo-decode",
            move || decode_for_display(&path, DISPLAY_MAX_EDGE),
            move |result| {
                let pixbuf = match result {
                    Some(Ok(decoded)) => pixbuf_from_decoded(decoded),
                    Some(Err(err)) => {
                        tracing::warn!(%uri, ?err, "failed to decode photo");
                        None
                    }
                    None => None,
                };
                if cache.borrow_mut().fulfil(&uri, pixbuf) {
                    card.queue_draw();
                }
            },
        );
    }
}

pub(super) fn install_card_draw(
    card: &DrawingArea,
    session: Rc<RefCell<BrowserSession>>,
    cache: Rc<RefCell<PhotoCache<Pixbuf>>>,
    colors: CardColors,
) {
    card.set_draw_func(move |_, cr, width, height| {
        let session = session.borrow();
        if let Err(err) = draw_card(cr, &session, &cache, colors, width, height) {
            tracing::debug!(?err, "card draw failed");
        }
    });
}

fn draw_card(
    cr: &cairo::Context,
    session: &BrowserSession,
    cache: &RefCell<PhotoCache<Pixbuf>>,
    colors: CardColors,
    width: i32,
    height: i32,
) -> Result<(), cairo::Error> {
    let area_width = f64::from(width);
    let area_height = f64::from(height);
    set_source_rgba(cr, colors.backdrop);
    cr.paint()?;

    let Some(uri) = session.current_photo() else {
        return Ok(());
    };
    let frame = session.frame();
    // Pending decodes draw the bare card until the worker reports back.
    let pixbuf = cache.borrow().get(uri).cloned();

    cr.save()?;
    cr.translate(
        area_width / 2.0 + frame.translate.x,
        area_height / 2.0 + frame.translate.y,
    );
    cr.rotate(frame.rotation_degrees.to_radians());
    cr.translate(-area_width / 2.0, -area_height / 2.0);

    cr.push_group();
    fill_card(cr, colors.card, area_width, area_height)?;
    if let Some(pixbuf) = pixbuf.as_ref() {
        let image_width = f64::from(pixbuf.width());
        let image_height = f64::from(pixbuf.height());
        if let Some(placement) =
            contain_placement(image_width, image_height, area_width, area_height)
        {
            cr.save()?;
            cr.translate(placement.x, placement.y);
            cr.scale(placement.scale, placement.scale);
            cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
            cr.rectangle(0.0, 0.0, image_width, image_height);
            cr.fill()?;
            cr.restore()?;
        }
    }
    fill_card(
        cr,
        colors.right_overlay.with_alpha(frame.green_alpha),
        area_width,
        area_height,
    )?;
    fill_card(
        cr,
        colors.left_overlay.with_alpha(frame.red_alpha),
        area_width,
        area_height,
    )?;
    cr.pop_group_to_source()?;
    cr.paint_with_alpha(frame.opacity)?;
    cr.restore()?;
    Ok(())
}

fn fill_card(cr: &cairo::Context, color: Rgba, width: f64, height: f64) -> Result<(), cairo::Error> {
    if color.a <= 0.0 {
        return Ok(());
    }
    set_source_rgba(cr, color);
    cr.rectangle(0.0, 0.0, width, height);
    cr.fill()
}

fn set_source_rgba(cr: &cairo::Context, color: Rgba) {
    cr.set_source_rgba(color.r, color.g, color.b, color.a);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_photo_is_letterboxed() {
        let placement = contain_placement(2000.0, 1000.0, 400.0, 800.0).expect("placement");
        assert_eq!(placement.scale, 0.2);
        assert_eq!(placement.x, 0.0);
        assert_eq!(placement.y, 300.0);
    }

    #[test]
    fn portrait_photo_is_pillarboxed() {
        let placement = contain_placement(500.0, 1000.0, 800.0, 400.0).expect("placement");
        assert_eq!(placement.scale, 0.4);
        assert_eq!(placement.x, 300.0);
        assert_eq!(placement.y, 0.0);
    }

    #[test]
    fn cache_requests_each_photo_once() {
        let mut cache = PhotoCache::<u32>::default();
        assert!(cache.request("a"));
        assert!(!cache.request("a"));
        assert_eq!(cache.get("a"), None);

        assert!(cache.fulfil("a", Some(1)));
        assert_eq!(cache.get("a"), Some(&1));
        assert!(!cache.request("a"));
    }

    #[test]
    fn failed_decode_is_not_retried() {
        let mut cache = PhotoCache::<u32>::default();
        cache.request("broken");
        cache.fulfil("broken", None);
        assert_eq!(cache.get("broken"), None);
        assert!(!cache.request("broken"));
    }

    #[test]
    fn evicted_photo_ignores_late_decode() {
        let mut cache = PhotoCache::<u32>::default();
        cache.request("old");
        cache.request("next");
        cache.retain_only(&["next"]);
        assert!(!cache.fulfil("old", Some(1)));
        assert_eq!(cache.get("old"), None);
        assert!(cache.fulfil("next", Some(2)));
        assert_eq!(cache.get("next"), Some(&2));

        cache.clear();
        assert!(cache.request("next"));
    }

    #[test]
    fn degenerate_sizes_have_no_placement() {
        assert_eq!(contain_placement(0.0, 10.0, 100.0, 100.0), None);
        assert_eq!(contain_placement(10.0, 10.0, 100.0, 0.0), None);
    }
}
