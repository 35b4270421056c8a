//! WebAssembly entry point and DOM wiring.
//!
//! The DOM is a view of the board: every event is forwarded to the
//! [`Board`] and the spans and overlay are then resynced from its state.

use kurbo::{Point, Size};
use letterboard_core::{
    Board, BoardConfig, EventBinder, EventKind, GlyphId, GlyphMetrics, Modifiers, PointerTarget,
    Subscriptions,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, MouseEvent};

const GLYPH_CLASS: &str = "selectable";
const SELECTED_CLASS: &str = "selected";
const HIDDEN_CLASS: &str = "hidden";
const GLYPH_ID_ATTR: &str = "data-glyph-id";

type Listener = Closure<dyn FnMut(Event)>;

thread_local! {
    static APP: RefCell<Option<WebApp>> = const { RefCell::new(None) };
}

/// Binds pointer listeners on the document and submit on the form.
struct DomBinder {
    document: EventTarget,
    form: EventTarget,
}

impl DomBinder {
    fn target(&self, kind: EventKind) -> &EventTarget {
        match kind {
            EventKind::Submit => &self.form,
            _ => &self.document,
        }
    }
}

impl EventBinder<Listener> for DomBinder {
    type Error = JsValue;

    fn bind(&mut self, kind: EventKind, listener: &Listener) -> Result<(), JsValue> {
        self.target(kind)
            .add_event_listener_with_callback(kind.dom_name(), listener.as_ref().unchecked_ref())
    }

    fn unbind(&mut self, kind: EventKind, listener: &Listener) -> Result<(), JsValue> {
        self.target(kind)
            .remove_event_listener_with_callback(kind.dom_name(), listener.as_ref().unchecked_ref())
    }
}

/// Measures characters by rendering them once, invisibly.
struct DomMetrics<'a> {
    document: &'a Document,
    host: &'a Element,
    fallback: Size,
}

impl DomMetrics<'_> {
    fn try_measure(&self, ch: char) -> Result<Size, JsValue> {
        let probe = self.document.create_element("span")?;
        probe.set_class_name(GLYPH_CLASS);
        probe.set_attribute("style", "visibility: hidden")?;
        probe.set_text_content(Some(&ch.to_string()));
        self.host.append_child(&probe)?;
        let rect = probe.get_bounding_client_rect();
        probe.remove();
        Ok(Size::new(rect.width(), rect.height()))
    }
}

impl GlyphMetrics for DomMetrics<'_> {
    fn measure(&self, ch: char) -> Size {
        match self.try_measure(ch) {
            Ok(size) if size.width > 0.0 && size.height > 0.0 => size,
            Ok(_) => self.fallback,
            Err(e) => {
                log::warn!("Failed to measure {:?}: {:?}", ch, e);
                self.fallback
            }
        }
    }
}

/// Board plus the DOM nodes that render it.
struct Playground {
    board: Board,
    document: Document,
    input: HtmlInputElement,
    results: Element,
    selector: HtmlElement,
    spans: HashMap<GlyphId, HtmlElement>,
}

impl Playground {
    /// Replace the glyphs with the input field's current text.
    fn submit(&mut self) -> Result<(), JsValue> {
        for (_, span) in self.spans.drain() {
            span.remove();
        }

        if let Some(window) = web_sys::window() {
            let width = window.inner_width()?.as_f64().unwrap_or(800.0);
            let height = window.inner_height()?.as_f64().unwrap_or(600.0);
            self.board.set_viewport_size(width, height);
        }

        let text = self.input.value();
        let metrics = DomMetrics {
            document: &self.document,
            host: &self.results,
            fallback: self.board.config().layout.glyph_size(),
        };
        self.board.submit_text(&text, &metrics);

        for view in self.board.snapshot().glyphs {
            let span: HtmlElement = self.document.create_element("span")?.dyn_into()?;
            span.set_class_name(GLYPH_CLASS);
            span.set_attribute(GLYPH_ID_ATTR, &view.id.to_string())?;
            span.set_text_content(Some(&view.ch.to_string()));
            self.results.append_child(&span)?;
            self.spans.insert(view.id, span);
        }
        self.render()
    }

    /// Sync spans and the overlay with the board.
    fn render(&mut self) -> Result<(), JsValue> {
        let snapshot = self.board.snapshot();

        let mut live = HashSet::with_capacity(snapshot.glyphs.len());
        for view in &snapshot.glyphs {
            live.insert(view.id);
            let Some(span) = self.spans.get(&view.id) else {
                continue;
            };
            let style = span.style();
            style.set_property("left", &format!("{}px", view.bounds.x0))?;
            style.set_property("top", &format!("{}px", view.bounds.y0))?;
            span.class_list().toggle_with_force(SELECTED_CLASS, view.selected)?;
        }

        // Pruned glyphs lose their element.
        self.spans.retain(|id, span| {
            let keep = live.contains(id);
            if !keep {
                span.remove();
            }
            keep
        });

        match snapshot.overlay {
            Some(rect) => {
                let style = self.selector.style();
                style.set_property("left", &format!("{}px", rect.x0))?;
                style.set_property("top", &format!("{}px", rect.y0))?;
                style.set_property("width", &format!("{}px", rect.width()))?;
                style.set_property("height", &format!("{}px", rect.height()))?;
                self.selector.class_list().remove_1(HIDDEN_CLASS)?;
            }
            None => self.selector.class_list().add_1(HIDDEN_CLASS)?,
        }
        Ok(())
    }

    /// The glyph an event landed on, if any.
    fn target_of(&self, event: &Event) -> PointerTarget {
        event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(&format!("[{}]", GLYPH_ID_ATTR)).ok().flatten())
            .and_then(|el| el.get_attribute(GLYPH_ID_ATTR))
            .and_then(|raw| GlyphId::parse_str(&raw).ok())
            .map(PointerTarget::Glyph)
            .unwrap_or(PointerTarget::Canvas)
    }
}

fn pointer_position(event: &MouseEvent) -> Point {
    Point::new(event.client_x() as f64, event.client_y() as f64)
}

fn modifiers(event: &MouseEvent) -> Modifiers {
    Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
    }
}

/// Mounted playground with its listeners.
struct WebApp {
    binder: DomBinder,
    subscriptions: Subscriptions<Listener>,
    _state: Rc<RefCell<Playground>>,
}

impl WebApp {
    fn mount(document: Document, root: Element, config: BoardConfig) -> Result<Self, JsValue> {
        let form = document.create_element("form")?;
        form.set_id("form");
        form.set_attribute("method", "post")?;

        let label = document.create_element("label")?;
        label.set_attribute("for", "inputField")?;
        label.set_text_content(Some("Input:"));

        let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
        input.set_type("text");
        input.set_id("inputField");
        input.set_name("inputField");

        let button = document.create_element("button")?;
        button.set_attribute("type", "submit")?;
        button.set_text_content(Some("Submit"));

        form.append_child(&label)?;
        form.append_child(&input)?;
        form.append_child(&button)?;

        let results = document.create_element("p")?;
        results.set_class_name("results");

        let selector: HtmlElement = document.create_element("div")?.dyn_into()?;
        selector.set_class_name("rectangle-selector hidden");

        root.append_child(&form)?;
        root.append_child(&results)?;
        root.append_child(&selector)?;

        let state = Rc::new(RefCell::new(Playground {
            board: Board::new(config),
            document: document.clone(),
            input,
            results,
            selector,
            spans: HashMap::new(),
        }));

        let mut app = Self {
            binder: DomBinder {
                document: document.into(),
                form: form.into(),
            },
            subscriptions: Subscriptions::new(),
            _state: state.clone(),
        };
        app.bind_listeners(&state)?;
        Ok(app)
    }

    fn bind_listeners(&mut self, state: &Rc<RefCell<Playground>>) -> Result<(), JsValue> {
        let down_state = state.clone();
        let on_down = Closure::wrap(Box::new(move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let mut playground = down_state.borrow_mut();
            let target = playground.target_of(&event);
            playground
                .board
                .pointer_down(target, pointer_position(mouse), modifiers(mouse));
            if let Err(e) = playground.render() {
                log::error!("Render failed: {:?}", e);
            }
        }) as Box<dyn FnMut(Event)>);
        self.subscriptions
            .subscribe(&mut self.binder, EventKind::PointerDown, on_down)?;

        let move_state = state.clone();
        let on_move = Closure::wrap(Box::new(move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let mut playground = move_state.borrow_mut();
            if !playground.board.engine().is_moving() && !playground.board.engine().is_selecting() {
                return;
            }
            playground.board.pointer_move(pointer_position(mouse));
            if let Err(e) = playground.render() {
                log::error!("Render failed: {:?}", e);
            }
        }) as Box<dyn FnMut(Event)>);
        self.subscriptions
            .subscribe(&mut self.binder, EventKind::PointerMove, on_move)?;

        let up_state = state.clone();
        let on_up = Closure::wrap(Box::new(move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let mut playground = up_state.borrow_mut();
            let target = playground.target_of(&event);
            playground.board.pointer_up(target, pointer_position(mouse));
            if let Err(e) = playground.render() {
                log::error!("Render failed: {:?}", e);
            }
        }) as Box<dyn FnMut(Event)>);
        self.subscriptions
            .subscribe(&mut self.binder, EventKind::PointerUp, on_up)?;

        let submit_state = state.clone();
        let on_submit = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            if let Err(e) = submit_state.borrow_mut().submit() {
                log::error!("Submit failed: {:?}", e);
            }
        }) as Box<dyn FnMut(Event)>);
        self.subscriptions
            .subscribe(&mut self.binder, EventKind::Submit, on_submit)?;

        Ok(())
    }

    fn detach(&mut self) {
        if let Err(e) = self.subscriptions.unbind_all(&mut self.binder) {
            log::warn!("Failed to remove listeners: {:?}", e);
        }
    }
}

/// Board configuration from the root element's `data-config` attribute.
fn read_config(root: &Element) -> BoardConfig {
    let Some(raw) = root.get_attribute("data-config") else {
        return BoardConfig::default();
    };
    match BoardConfig::from_json(&raw) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring data-config: {}", e);
            BoardConfig::default()
        }
    }
}

fn mount() -> Result<WebApp, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let root: Element = match document.get_element_by_id("root") {
        Some(root) => root,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("No body"))?
            .into(),
    };
    let config = read_config(&root);
    WebApp::mount(document, root, config)
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("Starting Letterboard (WASM)");

    match mount() {
        Ok(app) => APP.with(|cell| *cell.borrow_mut() = Some(app)),
        Err(e) => log::error!("Failed to mount Letterboard: {:?}", e),
    }
}

/// Remove every listener the playground installed.
#[wasm_bindgen]
pub fn unmount_wasm() {
    APP.with(|cell| {
        if let Some(mut app) = cell.borrow_mut().take() {
            app.detach();
            log::info!("Letterboard unmounted");
        }
    });
}
