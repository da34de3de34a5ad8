// Overlay stage: sprite sheet, animator, gesture listeners and the landing timer.
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::config::DemoConfig;
use crate::error::StageError;
use crate::model::{Point, SpriteSheet, SurfaceSize};
use crate::render::CanvasSurface;
use crate::state::{Effect, GestureEvent, GestureRecognizer, SpriteAnimator};
use crate::timer::JumpTimer;
use crate::util::{load_image, page_points};

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        f: impl FnMut(Event) + 'static,
    ) -> Result<Self, StageError> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

#[derive(Clone)]
struct Shared {
    animator: Rc<RefCell<SpriteAnimator<CanvasSurface>>>,
    recognizer: Rc<RefCell<GestureRecognizer>>,
    timer: Rc<RefCell<JumpTimer>>,
}

impl Shared {
    fn dispatch(&self, events: Vec<GestureEvent>) {
        for ev in events {
            let effect = self.animator.borrow_mut().handle(ev);
            if let Some(Effect::ScheduleLanding { delay_ms }) = effect {
                self.schedule_landing(delay_ms);
            }
        }
    }

    fn schedule_landing(&self, delay_ms: i32) {
        self.recognizer.borrow_mut().set_enabled(false);
        let on_fire = self.clone();
        let res = self
            .timer
            .borrow_mut()
            .schedule(delay_ms, move || on_fire.land());
        if let Err(e) = res {
            log::error!("landing timer: {}", e);
            self.land();
        }
    }

    fn land(&self) {
        self.animator.borrow_mut().land();
        let animator = self.animator.borrow();
        log::debug!("landed at frame {:?}", animator.state().frame);
        let mut recognizer = self.recognizer.borrow_mut();
        if recognizer.enabled() != animator.input_enabled() {
            recognizer.set_enabled(animator.input_enabled());
        }
    }
}

/// The running foreground. Dropping it detaches every listener and cancels a
/// pending landing.
pub struct Stage {
    shared: Shared,
    _listeners: Vec<Listener>,
}

impl Stage {
    /// Size the overlay to `size` and load the sprite sheet; once it loads the
    /// runner is drawn and the finished stage is stored in `slot`.
    pub fn mount(
        canvas: HtmlCanvasElement,
        size: SurfaceSize,
        config: DemoConfig,
        slot: Rc<RefCell<Option<Stage>>>,
    ) -> Result<(), StageError> {
        canvas.set_width(size.width as u32);
        canvas.set_height(size.height as u32);
        let url = config.sprite_url.clone();
        load_image(
            &url,
            move |sprite| match Stage::build(canvas, sprite, &config) {
                Ok(stage) => {
                    log::info!("runner ready");
                    *slot.borrow_mut() = Some(stage);
                }
                Err(e) => log::error!("stage setup failed: {}", e),
            },
            |e| log::error!("{}", e),
        )
    }

    fn build(
        canvas: HtmlCanvasElement,
        sprite: web_sys::HtmlImageElement,
        config: &DemoConfig,
    ) -> Result<Self, StageError> {
        let window = web_sys::window().ok_or(StageError::NoWindow)?;
        let surface = CanvasSurface::new(canvas.clone(), sprite)?;
        let mut animator = SpriteAnimator::new(
            surface,
            config.frame_y_ratio,
            SpriteSheet::default(),
            config.jump_delay_ms,
        );
        animator.start(config.initial_frame);
        let shared = Shared {
            animator: Rc::new(RefCell::new(animator)),
            recognizer: Rc::new(RefCell::new(GestureRecognizer::new(config.gestures))),
            timer: Rc::new(RefCell::new(JumpTimer::default())),
        };
        let listeners = install_listeners(&shared, canvas.as_ref(), window.as_ref())?;
        Ok(Self {
            shared,
            _listeners: listeners,
        })
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.shared.timer.borrow_mut().cancel();
    }
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn mouse_point(e: &Event) -> Option<Point> {
    e.dyn_ref::<MouseEvent>()
        .map(|m| Point::new(m.page_x() as f64, m.page_y() as f64))
}

fn install_listeners(
    shared: &Shared,
    canvas: &EventTarget,
    window: &EventTarget,
) -> Result<Vec<Listener>, StageError> {
    let mut out = Vec::new();
    // Touch: block default scrolling and zooming while gesturing on the overlay
    {
        let s = shared.clone();
        out.push(Listener::attach(canvas, "touchstart", move |e| {
            if let Some(t) = e.dyn_ref::<TouchEvent>() {
                t.prevent_default();
                let events = s.recognizer.borrow_mut().start(&page_points(&t.touches()), now_ms());
                s.dispatch(events);
            }
        })?);
    }
    {
        let s = shared.clone();
        out.push(Listener::attach(canvas, "touchmove", move |e| {
            if let Some(t) = e.dyn_ref::<TouchEvent>() {
                t.prevent_default();
                let events = s.recognizer.borrow_mut().moved(&page_points(&t.touches()));
                s.dispatch(events);
            }
        })?);
    }
    {
        let s = shared.clone();
        out.push(Listener::attach(canvas, "touchend", move |e| {
            if let Some(t) = e.dyn_ref::<TouchEvent>() {
                t.prevent_default();
                let events = s.recognizer.borrow_mut().end(&page_points(&t.touches()), now_ms());
                s.dispatch(events);
            }
        })?);
    }
    {
        let s = shared.clone();
        out.push(Listener::attach(canvas, "touchcancel", move |_e| {
            let events = s.recognizer.borrow_mut().cancel();
            s.dispatch(events);
        })?);
    }
    // Mouse: a single pointer, released anywhere on the page
    let mouse_down = Rc::new(RefCell::new(false));
    {
        let s = shared.clone();
        let down = mouse_down.clone();
        out.push(Listener::attach(canvas, "mousedown", move |e| {
            let primary = e.dyn_ref::<MouseEvent>().map(|m| m.button() == 0).unwrap_or(false);
            if let (true, Some(p)) = (primary, mouse_point(&e)) {
                e.prevent_default();
                *down.borrow_mut() = true;
                let events = s.recognizer.borrow_mut().start(&[p], now_ms());
                s.dispatch(events);
            }
        })?);
    }
    {
        let s = shared.clone();
        let down = mouse_down.clone();
        out.push(Listener::attach(window, "mousemove", move |e| {
            if !*down.borrow() {
                return;
            }
            if let Some(p) = mouse_point(&e) {
                let events = s.recognizer.borrow_mut().moved(&[p]);
                s.dispatch(events);
            }
        })?);
    }
    {
        let s = shared.clone();
        let down = mouse_down;
        out.push(Listener::attach(window, "mouseup", move |_e| {
            if !std::mem::replace(&mut *down.borrow_mut(), false) {
                return;
            }
            let events = s.recognizer.borrow_mut().end(&[], now_ms());
            s.dispatch(events);
        })?);
    }
    Ok(out)
}
