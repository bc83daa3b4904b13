//! Glyph Field entry point
//!
//! On the web: wires browser events, animation frames and timers to the
//! `Landing` core. Natively: renders a headless preview to the terminal.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, PageTransitionEvent};

    use glyph_field::field::{Mode, Step, ToggleOutcome, ToggleSource};
    use glyph_field::landing::Display;
    use glyph_field::renderer::{CanvasSurface, DrawList, Surface};
    use glyph_field::{Landing, Settings, TerminalContent};

    /// Page instance holding all state
    struct App {
        landing: Landing,
        surface: CanvasSurface,
        /// Terminal panel and its children
        terminal: Element,
        terminal_text: Element,
        cursor: Element,
        draw_list: DrawList,
        /// Pending animation frame
        frame_handle: Option<i32>,
        /// Pending collapse/reveal step
        step_handle: Option<i32>,
        /// Cursor blink interval
        blink_handle: Option<i32>,
        torn_down: bool,
    }

    impl App {
        /// Replay the draw list on the canvas
        fn present(&mut self) {
            self.surface.present(&self.draw_list);
            self.draw_list.clear();
        }

        /// Push the terminal payload to the DOM
        fn sync_terminal(&self) {
            let _ = self
                .surface
                .canvas()
                .class_list()
                .toggle_with_force("hidden", self.landing.mode() == Mode::Terminal);

            let classes = self.terminal.class_list();
            match self.landing.display() {
                // A visible panel plays its leave animation first; see `finish_leave`
                Display::Hidden => {
                    if !classes.contains("hidden") {
                        let _ = classes.add_1("leaving");
                    }
                }
                Display::Revealing(text) => {
                    let _ = classes.remove_2("hidden", "leaving");
                    self.terminal_text.set_text_content(Some(text));
                }
                Display::Finished(html) => {
                    let _ = classes.remove_2("hidden", "leaving");
                    self.terminal_text.set_inner_html(&html);
                }
            }
        }

        /// Leave animation done: hide the panel and drop its text
        fn finish_leave(&self) {
            let classes = self.terminal.class_list();
            if classes.contains("leaving") {
                let _ = classes.remove_1("leaving");
                let _ = classes.add_1("hidden");
                self.terminal_text.set_text_content(None);
            }
        }

        fn sync_cursor(&self) {
            let visible = self.landing.state().cursor_visible;
            let _ = self.cursor.class_list().toggle_with_force("visible", visible);
        }
    }

    fn window() -> Result<web_sys::Window, JsValue> {
        web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
    }

    fn element(document: &web_sys::Document, id: &str) -> Result<Element, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))
    }

    /// Viewport size in CSS px
    fn viewport(window: &web_sys::Window) -> (u32, u32) {
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        (w.max(0.0) as u32, h.max(0.0) as u32)
    }

    /// Content override from `<script id="terminal-content" type="application/json">`
    fn load_content(document: &web_sys::Document) -> TerminalContent {
        let Some(json) = document
            .get_element_by_id("terminal-content")
            .and_then(|el| el.text_content())
        else {
            return TerminalContent::default();
        };
        match serde_json::from_str(&json) {
            Ok(content) => {
                log::info!("Loaded terminal content override");
                content
            }
            Err(e) => {
                log::warn!("Ignoring invalid terminal content: {}", e);
                TerminalContent::default()
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Glyph Field starting...");

        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Glyphs measured before the web font loads would use the fallback
        if let Ok(ready) = document.fonts().ready() {
            let _ = wasm_bindgen_futures::JsFuture::from(ready).await;
        }

        let canvas: HtmlCanvasElement = element(&document, "canvas")?.dyn_into()?;
        let settings = Settings::load();
        let mut surface = CanvasSurface::new(canvas, &settings.font_family)
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?;

        let (width, height) = viewport(&window);
        surface.resize(width, height);
        surface.clear();

        let seed = js_sys::Date::now() as u64;
        let mut landing = Landing::new(settings, load_content(&document), seed);
        landing.attach_surface(width, height);
        log::info!("Field initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            landing,
            surface,
            terminal: element(&document, "terminal")?,
            terminal_text: element(&document, "terminal-text")?,
            cursor: element(&document, "cursor")?,
            draw_list: DrawList::with_capacity(2048),
            frame_handle: None,
            step_handle: None,
            blink_handle: None,
            torn_down: false,
        }));
        {
            let a = app.borrow();
            a.sync_terminal();
            a.sync_cursor();
        }

        setup_input_handlers(&window, &document, app.clone())?;
        setup_terminal_leave(app.clone())?;
        setup_cursor_blink(&window, app.clone())?;
        setup_teardown(&window, app.clone())?;

        // Start the field
        request_animation_frame(&app);

        log::info!("Glyph Field running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        document: &web_sys::Document,
        app: Rc<RefCell<App>>,
    ) -> Result<(), JsValue> {
        // Pointer position feeds the repulsion
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut()
                    .landing
                    .pointer_moved(event.client_x() as f32, event.client_y() as f32);
            });
            window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Resize: canvas always follows the viewport, the grid only while animating
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let (w, h) = viewport(&window);
                let mut a = app.borrow_mut();
                if a.torn_down {
                    return;
                }
                a.surface.resize(w, h);
                a.landing.resize(w, h);
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Click anywhere toggles, except on terminal links
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let on_link = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest("a").ok().flatten())
                    .is_some();
                if !on_link {
                    toggle(&app, ToggleSource::Click);
                }
            });
            element(document, "app")?
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Space returns from the terminal
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() != "Space" {
                    return;
                }
                if app.borrow().landing.mode() == Mode::Terminal {
                    event.prevent_default();
                    toggle(&app, ToggleSource::Space);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_terminal_leave(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let terminal = app.borrow().terminal.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow().finish_leave();
        });
        terminal.add_event_listener_with_callback("animationend", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_cursor_blink(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let interval = app.borrow().landing.settings().tuning.cursor_blink_ms as i32;
        let app_cb = app.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut a = app_cb.borrow_mut();
            a.landing.blink_cursor();
            a.sync_cursor();
        });
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval,
        )?;
        closure.forget();
        app.borrow_mut().blink_handle = Some(handle);
        Ok(())
    }

    /// Cancel the frame loop and timers when the page goes away, and re-arm
    /// them if it comes back from the back-forward cache
    fn setup_teardown(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PageTransitionEvent| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let mut a = app.borrow_mut();
                if let Some(handle) = a.frame_handle.take() {
                    let _ = window.cancel_animation_frame(handle);
                }
                if let Some(handle) = a.step_handle.take() {
                    window.clear_timeout_with_handle(handle);
                }
                if let Some(handle) = a.blink_handle.take() {
                    window.clear_interval_with_handle(handle);
                }
                a.landing.detach_surface();
                a.torn_down = true;
            });
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
            if !event.persisted() {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Err(e) = resume(&window, &app) {
                log::error!("Failed to resume after back-forward navigation: {:?}", e);
            }
        });
        window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Undo teardown: reattach, restart the blink, pick up where the page left off
    fn resume(window: &web_sys::Window, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
        let (w, h) = viewport(window);
        let (transitioning, animating) = {
            let mut a = app.borrow_mut();
            if !a.torn_down {
                return Ok(());
            }
            a.torn_down = false;
            a.surface.resize(w, h);
            a.surface.clear();
            a.landing.attach_surface(w, h);
            a.sync_terminal();
            a.sync_cursor();
            (a.landing.is_transitioning(), a.landing.mode() == Mode::Animating)
        };
        log::info!("Resumed from back-forward cache at {}x{}", w, h);

        setup_cursor_blink(window, app.clone())?;
        if transitioning {
            step_sequence(app.clone());
        } else if animating {
            request_animation_frame(app);
        }
        Ok(())
    }

    fn toggle(app: &Rc<RefCell<App>>, source: ToggleSource) {
        let outcome = {
            let mut a = app.borrow_mut();
            if a.torn_down {
                return;
            }
            a.landing.request_toggle(source)
        };

        match outcome {
            ToggleOutcome::Collapse => {
                cancel_animation_frame(app);
                step_sequence(app.clone());
            }
            ToggleOutcome::Restore => {
                {
                    let mut a = app.borrow_mut();
                    a.surface.clear();
                    a.sync_terminal();
                }
                request_animation_frame(app);
            }
            ToggleOutcome::Ignored => {}
        }
    }

    /// Run one collapse/reveal step and schedule the next
    fn step_sequence(app: Rc<RefCell<App>>) {
        let step = {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            a.step_handle = None;
            if a.torn_down {
                return;
            }
            let step = a.landing.advance(&mut a.draw_list);
            a.present();
            a.sync_terminal();
            step
        };

        if let Step::Wait(delay) = step {
            set_timeout(app, delay);
        }
    }

    fn set_timeout(app: Rc<RefCell<App>>, delay: Duration) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let app_cb = app.clone();
        let callback = Closure::once_into_js(move || step_sequence(app_cb));
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay.as_millis() as i32,
        ) {
            Ok(handle) => app.borrow_mut().step_handle = Some(handle),
            Err(e) => log::error!("setTimeout failed: {:?}", e),
        }
    }

    fn request_animation_frame(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let app_cb = app.clone();
        let callback = Closure::once_into_js(move |_time: f64| {
            frame_loop(app_cb);
        });
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(handle) => app.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel_animation_frame(app: &Rc<RefCell<App>>) {
        let handle = app.borrow_mut().frame_handle.take();
        if let (Some(handle), Some(window)) = (handle, web_sys::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        let keep_going = {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            a.frame_handle = None;
            if a.torn_down {
                false
            } else {
                let drawn = a.landing.frame(&mut a.draw_list);
                a.present();
                drawn
            }
        };

        if keep_going {
            request_animation_frame(&app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_app::run().await {
        log::error!("Glyph Field failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Glyph Field (native) starting...");
    log::info!("Native mode renders a headless preview - run with `trunk serve` for the web version");

    preview::run(std::env::args().skip(1).collect());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless preview: animate, collapse, reveal, all on a character grid
#[cfg(not(target_arch = "wasm32"))]
mod preview {
    use std::time::{SystemTime, UNIX_EPOCH};

    use glyph_field::Landing;
    use glyph_field::field::{Step, ToggleSource};
    use glyph_field::renderer::{AsciiSurface, DrawList, Surface};

    /// Cell size of the character grid in px
    const CELL_W: u32 = 8;
    const CELL_H: u32 = 16;
    const PREVIEW_FRAMES: u32 = 90;

    /// `glyph-field [WIDTH HEIGHT]` in px
    pub fn run(args: Vec<String>) {
        let mut dims = args.iter().filter_map(|a| a.parse::<u32>().ok());
        let width = dims.next().unwrap_or(640);
        let height = dims.next().unwrap_or(384);

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut landing = Landing::with_seed(seed);
        let mut surface = AsciiSurface::new(width, height, CELL_W, CELL_H);
        let mut list = DrawList::new();

        landing.attach_surface(width, height);
        landing.pointer_moved(width as f32 * 0.3, height as f32 * 0.4);

        for _ in 0..PREVIEW_FRAMES {
            landing.frame(&mut list);
            surface.present(&list);
            list.clear();
        }
        println!("{}\n", surface.to_text());

        landing.request_toggle(ToggleSource::Click);
        let mut steps = 0;
        loop {
            let step = landing.advance(&mut list);
            surface.present(&list);
            list.clear();
            steps += 1;
            if step == Step::Done {
                break;
            }
        }
        log::info!(
            "Transition finished after {} steps ({} cells still lit)",
            steps,
            surface.visible_cells()
        );

        if let glyph_field::landing::Display::Finished(_) = landing.display() {
            println!("{}", landing.content().plain_text());
        }
    }
}
