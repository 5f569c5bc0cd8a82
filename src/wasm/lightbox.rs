use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, HtmlMediaElement, HtmlVideoElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent,
    Window,
};

use super::{after, by_id, listen, next_frame};
use crate::config::GalleryConfig;
use crate::error::{FxError, FxResult};
use crate::frame::Liveness;
use crate::gallery::{reveal_delay, Lightbox, MediaKind, ProxySource, Rect, Stage, Trigger, Wait};

struct DomStage {
    body: HtmlElement,
    lightbox: Element,
    items: Vec<Element>,
    image: HtmlImageElement,
    video: Option<HtmlVideoElement>,
}

impl DomStage {
    fn thumbnail(&self, item: usize) -> Option<HtmlElement> {
        self.items
            .get(item)?
            .query_selector("img, video")
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn viewer(&self, kind: MediaKind) -> HtmlElement {
        match (kind, &self.video) {
            (MediaKind::Video, Some(video)) => video.clone().unchecked_into(),
            _ => self.image.clone().unchecked_into(),
        }
    }
}

fn set_style(el: &HtmlElement, name: &str, value: &str) {
    let _ = el.style().set_property(name, value);
}

fn place(el: &HtmlElement, rect: Rect) {
    set_style(el, "top", &format!("{}px", rect.y));
    set_style(el, "left", &format!("{}px", rect.x));
    set_style(el, "width", &format!("{}px", rect.width));
    set_style(el, "height", &format!("{}px", rect.height));
}

fn rect_of(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
}

fn as_media(el: &HtmlElement) -> Option<&HtmlMediaElement> {
    el.dyn_ref::<HtmlMediaElement>()
}

/// Proxies are clones of live media; they must never make a sound.
fn silence(el: &HtmlElement) {
    if let Some(media) = as_media(el) {
        media.set_muted(true);
        let _ = media.pause();
    }
}

impl Stage for DomStage {
    /// `None` when the source element could not be cloned; the transition
    /// still runs, just without a visible morph.
    type Proxy = Option<HtmlElement>;

    fn media_kind(&self, item: usize) -> Option<MediaKind> {
        let media = self.thumbnail(item)?;
        Some(if media.tag_name().eq_ignore_ascii_case("video") {
            MediaKind::Video
        } else {
            MediaKind::Image
        })
    }

    fn thumbnail_rect(&self, item: usize) -> Rect {
        self.thumbnail(item).map(|m| rect_of(&m)).unwrap_or_default()
    }

    fn set_thumbnail_visible(&mut self, item: usize, visible: bool) {
        if let Some(media) = self.thumbnail(item) {
            set_style(&media, "visibility", if visible { "visible" } else { "hidden" });
        }
    }

    fn present_viewer(&mut self, item: usize, kind: MediaKind) {
        let Some(thumb) = self.thumbnail(item) else {
            return;
        };
        match (kind, &self.video) {
            (MediaKind::Video, Some(video)) => {
                if let Some(src) = thumb.dyn_ref::<HtmlMediaElement>().map(|m| m.current_src()) {
                    video.set_src(&src);
                }
                set_style(&self.image, "display", "none");
                set_style(video, "display", "");
            }
            _ => {
                if let Some(src) = thumb.dyn_ref::<HtmlImageElement>().map(|i| i.src()) {
                    self.image.set_src(&src);
                }
                set_style(&self.image, "display", "");
                if let Some(video) = &self.video {
                    set_style(video, "display", "none");
                }
            }
        }
        set_style(&self.viewer(kind), "opacity", "0");
        let _ = self.lightbox.class_list().add_1("active");
    }

    fn viewer_rect(&self, kind: MediaKind) -> Rect {
        rect_of(&self.viewer(kind))
    }

    fn set_viewer_opaque(&mut self, kind: MediaKind, opaque: bool) {
        let viewer = self.viewer(kind);
        if !opaque {
            set_style(&viewer, "opacity", "0");
            return;
        }
        // Swap in without the viewer's own fade so it lands exactly where the
        // proxy ended.
        set_style(&viewer, "transition", "none");
        set_style(&viewer, "opacity", "1");
        let _ = viewer.offset_width();
        let restore = viewer.clone();
        let _ = after(50, move || set_style(&restore, "transition", ""));
        if let Some(media) = as_media(&viewer) {
            media.set_muted(false);
            let _ = media.play();
        }
    }

    fn dismiss_viewer(&mut self, kind: MediaKind) {
        if let Some(media) = as_media(&self.viewer(kind)) {
            let _ = media.pause();
        }
        let _ = self.lightbox.class_list().remove_1("active");
    }

    fn lock_scroll(&mut self, locked: bool) {
        set_style(&self.body, "overflow", if locked { "hidden" } else { "" });
    }

    fn spawn_proxy(&mut self, source: ProxySource, rect: Rect) -> Option<HtmlElement> {
        let original = match source {
            ProxySource::Thumbnail(item) => self.thumbnail(item)?,
            ProxySource::Viewer(kind) => self.viewer(kind),
        };
        let proxy = original.clone_node().ok()?.dyn_into::<HtmlElement>().ok()?;
        let _ = proxy.class_list().add_1("transition-clone");
        place(&proxy, rect);
        set_style(&proxy, "margin", "0");
        set_style(&proxy, "object-fit", "cover");
        if let ProxySource::Viewer(_) = source {
            let _ = proxy.class_list().add_1("closing");
            set_style(&proxy, "box-shadow", "0 40px 100px -20px rgba(0, 0, 0, 0.6)");
        }
        silence(&proxy);
        self.body.append_child(&proxy).ok()?;
        Some(proxy)
    }

    fn move_proxy(&mut self, proxy: &Option<HtmlElement>, rect: Rect) {
        let Some(proxy) = proxy else {
            return;
        };
        place(proxy, rect);
        if proxy.class_list().contains("closing") {
            set_style(proxy, "border-radius", "1rem");
        }
    }

    fn fade_proxy(&mut self, proxy: &Option<HtmlElement>) {
        if let Some(proxy) = proxy {
            set_style(proxy, "opacity", "0");
        }
    }

    fn discard_proxy(&mut self, proxy: Option<HtmlElement>) {
        if let Some(proxy) = proxy {
            proxy.remove();
        }
    }
}

type Shared = Rc<RefCell<Lightbox<DomStage>>>;

/// Schedules whatever `wait` asks for and feeds the result back in, until the
/// machine goes idle. A callback arriving after teardown, or a callback that
/// cannot be scheduled, aborts the transition so the page is never left
/// behind an overlay nothing can close.
fn drive(lightbox: &Shared, liveness: &Liveness, wait: Wait) {
    let scheduled = match wait {
        Wait::Idle => return,
        Wait::NextFrame => {
            let (lightbox, liveness) = (lightbox.clone(), liveness.clone());
            next_frame(move || {
                if !liveness.is_alive() {
                    lightbox.borrow_mut().abort();
                    return;
                }
                let next = lightbox.borrow_mut().frame();
                drive(&lightbox, &liveness, next);
            })
        }
        Wait::Delay(ms) => {
            let (lightbox, liveness) = (lightbox.clone(), liveness.clone());
            after(ms, move || {
                if !liveness.is_alive() {
                    lightbox.borrow_mut().abort();
                    return;
                }
                let next = lightbox.borrow_mut().timer();
                drive(&lightbox, &liveness, next);
            })
        }
    };
    if let Err(err) = scheduled {
        log::warn!("lightbox transition stalled, resetting: {err}");
        lightbox.borrow_mut().abort();
    }
}

fn observe_reveals(items: &[Element], config: GalleryConfig, liveness: Liveness) -> FxResult<()> {
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for (index, entry) in entries.iter().enumerate() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                observer.unobserve(&target);
                let liveness = liveness.clone();
                let _ = after(reveal_delay(index, &config), move || {
                    if liveness.is_alive() {
                        let _ = target.class_list().add_1("reveal");
                    }
                });
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(0.1));
    options.set_root_margin("0px 0px -50px 0px");
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();
    for item in items {
        observer.observe(item);
    }
    Ok(())
}

/// Wires `.gallery-item` entries to `#lightbox`.
pub fn mount(window: &Window, document: &Document, liveness: Liveness) -> FxResult<()> {
    let config = GalleryConfig::default();
    let items: Vec<Element> = {
        let list = document.query_selector_all(".gallery-item")?;
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    };
    if items.is_empty() {
        return Err(FxError::MissingElement(".gallery-item".into()));
    }
    observe_reveals(&items, config, liveness.clone())?;

    let lightbox_el: Element = by_id(document, "lightbox")?;
    let find = |selector: &str| {
        lightbox_el
            .query_selector(selector)
            .ok()
            .flatten()
            .ok_or_else(|| FxError::MissingElement(format!("#lightbox {selector}")))
    };
    let image = find(".lightbox-img")?
        .dyn_into::<HtmlImageElement>()
        .map_err(|_| FxError::MissingElement("#lightbox img.lightbox-img".into()))?;
    let video = find(".lightbox-video")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok());
    let close = find(".lightbox-close")?;
    let body = document.body().ok_or(FxError::MissingElement("body".into()))?;

    let stage = DomStage {
        body,
        lightbox: lightbox_el.clone(),
        items: items.clone(),
        image,
        video,
    };
    let lightbox: Shared = Rc::new(RefCell::new(Lightbox::new(stage, config)));

    for (index, item) in items.iter().enumerate() {
        let (lightbox, liveness) = (lightbox.clone(), liveness.clone());
        listen(item, "click", move |_| {
            if !liveness.is_alive() {
                return;
            }
            let wait = lightbox.borrow_mut().open(index);
            drive(&lightbox, &liveness, wait);
        })?;
    }
    {
        let (lightbox, liveness) = (lightbox.clone(), liveness.clone());
        listen(&close, "click", move |event| {
            event.stop_propagation();
            let wait = lightbox.borrow_mut().close(Trigger::CloseButton);
            drive(&lightbox, &liveness, wait);
        })?;
    }
    {
        let (lightbox, liveness) = (lightbox.clone(), liveness.clone());
        let backdrop = lightbox_el.clone();
        listen(&lightbox_el, "click", move |event| {
            let on_backdrop = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .is_some_and(|t| t == backdrop);
            if on_backdrop {
                let wait = lightbox.borrow_mut().close(Trigger::Backdrop);
                drive(&lightbox, &liveness, wait);
            }
        })?;
    }
    {
        let (lightbox, liveness) = (lightbox.clone(), liveness.clone());
        listen(window, "keydown", move |event| {
            let escape = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|k| k.key() == "Escape");
            if escape {
                let wait = lightbox.borrow_mut().close(Trigger::Escape);
                drive(&lightbox, &liveness, wait);
            }
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn stage() -> (DomStage, HtmlVideoElement) {
        let document = web_sys::window().unwrap().document().unwrap();
        let create = |tag: &str| document.create_element(tag).unwrap();
        let video: HtmlVideoElement = create("video").dyn_into().unwrap();
        let stage = DomStage {
            body: document.body().unwrap(),
            lightbox: create("div"),
            items: Vec::new(),
            image: create("img").dyn_into().unwrap(),
            video: Some(video.clone()),
        };
        (stage, video)
    }

    #[wasm_bindgen_test]
    fn dismissing_the_video_keeps_its_sound() {
        let (mut stage, video) = stage();
        video.set_muted(false);
        stage.dismiss_viewer(MediaKind::Video);
        assert!(video.paused());
        assert!(!video.muted());
    }

    #[wasm_bindgen_test]
    fn showing_the_video_unmutes_it() {
        let (mut stage, video) = stage();
        video.set_muted(true);
        stage.set_viewer_opaque(MediaKind::Video, true);
        assert!(!video.muted());
        stage.dismiss_viewer(MediaKind::Video);
        stage.set_viewer_opaque(MediaKind::Video, true);
        assert!(!video.muted());
    }

    #[wasm_bindgen_test]
    fn proxies_of_the_video_are_silent() {
        let (mut stage, video) = stage();
        video.set_muted(false);
        let proxy = stage
            .spawn_proxy(ProxySource::Viewer(MediaKind::Video), Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        assert!(proxy.unchecked_ref::<HtmlMediaElement>().muted());
        assert!(!video.muted());
        stage.discard_proxy(Some(proxy));
    }
}
