use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use heartlock_core::path::fmt_f32;
use heartlock_core::piece::{
    PieceBlueprint, HIT_STROKE_WIDTH, OUTLINE_OPACITY, OUTLINE_STROKE, OUTLINE_STROKE_WIDTH,
};
use heartlock_core::{PieceId, PuzzleAction, PuzzleConfig, PuzzleEvent};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, MouseEvent, TouchEvent};

use crate::app_core::{CoreSubscription, PuzzleCore, SolvedHook, ViewRect};
use crate::input::{mouse_to_view_coords, touch_from_event, touch_to_view_coords};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub(crate) const PUZZLE_SVG_ID: &str = "puzzleSVG";
const PIECE_CLASS: &str = "puzzle-piece";
const PIECE_DRAGGING_CLASS: &str = "puzzle-piece dragging";

/// Live SVG scene for one puzzle. Dropping it detaches every listener.
pub(crate) struct PuzzleView {
    core: Rc<PuzzleCore>,
    svg: Element,
    layer: Element,
    pieces: Vec<Element>,
    piece_listeners: RefCell<Vec<EventListener>>,
    drag_listeners: RefCell<Vec<EventListener>>,
    resize_listener: RefCell<Option<EventListener>>,
    subscription: RefCell<Option<CoreSubscription>>,
}

/// Builds the puzzle inside `#puzzleSVG`. Returns `None`, after logging,
/// when the container is missing or the DOM refuses to build the scene.
pub(crate) fn mount(config: &PuzzleConfig, on_solved: SolvedHook) -> Option<Rc<PuzzleView>> {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        gloo::console::warn!("puzzle: no document, not mounted");
        return None;
    };
    let Some(svg) = document.get_element_by_id(PUZZLE_SVG_ID) else {
        gloo::console::warn!("puzzle: #puzzleSVG not found, not mounted");
        return None;
    };
    clear_children(&svg);

    let view = measure_view(&svg);
    apply_view_box(&svg, view);
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u32;
    let (core, blueprints) = PuzzleCore::scatter(config.clone(), view, seed);
    core.set_solved_hook(on_solved);

    let defs = create_svg_element(&document, "defs")?;
    let layer = create_svg_element(&document, "g")?;
    let _ = layer.set_attribute("class", "puzzle-layer");
    let _ = svg.append_child(&defs);
    let _ = svg.append_child(&layer);

    let mut pieces = Vec::with_capacity(blueprints.len());
    for blueprint in &blueprints {
        let (clip, piece) = build_piece_nodes(&document, blueprint)?;
        let _ = defs.append_child(&clip);
        let _ = layer.append_child(&piece);
        pieces.push(piece);
    }

    let view = Rc::new(PuzzleView {
        core,
        svg,
        layer,
        pieces,
        piece_listeners: RefCell::new(Vec::new()),
        drag_listeners: RefCell::new(Vec::new()),
        resize_listener: RefCell::new(None),
        subscription: RefCell::new(None),
    });
    view.install_piece_listeners();
    view.install_resize_listener();
    view.subscribe();
    gloo::console::log!("puzzle mounted with", blueprints.len(), "pieces");
    Some(view)
}

fn measure_view(svg: &Element) -> ViewRect {
    let rect = svg.get_bounding_client_rect();
    let (mut width, mut height) = (rect.width() as f32, rect.height() as f32);
    if width <= 0.0 || height <= 0.0 {
        if let Some(window) = web_sys::window() {
            width = window
                .inner_width()
                .ok()
                .and_then(|value| value.as_f64())
                .unwrap_or(0.0) as f32;
            height = window
                .inner_height()
                .ok()
                .and_then(|value| value.as_f64())
                .unwrap_or(0.0) as f32;
        }
    }
    ViewRect::from_size(width.max(1.0), height.max(1.0))
}

fn apply_view_box(svg: &Element, view: ViewRect) {
    let view_box = format!(
        "{} {} {} {}",
        fmt_f32(view.min_x),
        fmt_f32(view.min_y),
        fmt_f32(view.width),
        fmt_f32(view.height)
    );
    let _ = svg.set_attribute("viewBox", &view_box);
}

fn build_piece_nodes(document: &Document, blueprint: &PieceBlueprint) -> Option<(Element, Element)> {
    let clip = create_svg_element(document, "clipPath")?;
    let _ = clip.set_attribute("id", &blueprint.clip_id);
    let clip_path = create_svg_element(document, "path")?;
    let _ = clip_path.set_attribute("d", &blueprint.outline_d);
    let _ = clip.append_child(&clip_path);

    let piece = create_svg_element(document, "g")?;
    let _ = piece.set_attribute("class", PIECE_CLASS);
    let _ = piece.set_attribute("data-piece-id", &blueprint.id.to_string());
    let _ = piece.set_attribute("data-row", &blueprint.coord.row.to_string());
    let _ = piece.set_attribute("data-col", &blueprint.coord.col.to_string());
    let _ = piece.set_attribute("transform", &translate_attr(blueprint.translation));

    let image = create_svg_element(document, "image")?;
    let _ = image.set_attribute("href", &blueprint.image.href);
    let _ = image.set_attribute("x", &fmt_f32(blueprint.image.x));
    let _ = image.set_attribute("y", &fmt_f32(blueprint.image.y));
    let _ = image.set_attribute("width", &fmt_f32(blueprint.image.width));
    let _ = image.set_attribute("height", &fmt_f32(blueprint.image.height));
    let _ = image.set_attribute("preserveAspectRatio", "none");
    let _ = image.set_attribute("clip-path", &format!("url(#{})", blueprint.clip_id));
    let _ = image.set_attribute("pointer-events", "none");

    let outline = create_svg_element(document, "path")?;
    let _ = outline.set_attribute("d", &blueprint.outline_d);
    let _ = outline.set_attribute("fill", "none");
    let _ = outline.set_attribute("stroke", OUTLINE_STROKE);
    let _ = outline.set_attribute("stroke-width", &fmt_f32(OUTLINE_STROKE_WIDTH));
    let _ = outline.set_attribute("opacity", &fmt_f32(OUTLINE_OPACITY));
    let _ = outline.set_attribute("pointer-events", "none");

    let hit = create_svg_element(document, "path")?;
    let _ = hit.set_attribute("class", "piece-hit");
    let _ = hit.set_attribute("d", &blueprint.outline_d);
    let _ = hit.set_attribute("fill", "transparent");
    let _ = hit.set_attribute("stroke", "transparent");
    let _ = hit.set_attribute("stroke-width", &fmt_f32(HIT_STROKE_WIDTH));
    let _ = hit.set_attribute("style", "cursor: grab");

    let _ = piece.append_child(&image);
    let _ = piece.append_child(&outline);
    let _ = piece.append_child(&hit);
    Some((clip, piece))
}

impl PuzzleView {
    pub(crate) fn core(&self) -> &Rc<PuzzleCore> {
        &self.core
    }

    /// One pointer-down pair per piece. Handlers carry only the piece id; the
    /// core resolves whichever group holds it at the time of the press.
    fn install_piece_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::with_capacity(self.pieces.len() * 2);
        for (piece_id, piece) in self.pieces.iter().enumerate() {
            let Some(hit) = piece.last_element_child() else {
                continue;
            };
            let weak = Rc::downgrade(self);
            let listener = EventListener::new_with_options(
                &hit,
                "mousedown",
                active_options(),
                move |event: &Event| {
                    let (Some(view), Some(event)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>())
                    else {
                        return;
                    };
                    if event.button() != 0 {
                        return;
                    }
                    let Some((x, y)) = mouse_to_view_coords(event, &view.svg, view.core.view())
                    else {
                        return;
                    };
                    event.prevent_default();
                    event.stop_propagation();
                    view.begin_drag(piece_id, x, y, None);
                },
            );
            listeners.push(listener);

            let weak = Rc::downgrade(self);
            let listener = EventListener::new_with_options(
                &hit,
                "touchstart",
                active_options(),
                move |event: &Event| {
                    let (Some(view), Some(event)) = (weak.upgrade(), event.dyn_ref::<TouchEvent>())
                    else {
                        return;
                    };
                    let Some(touch) = touch_from_event(event, None, true) else {
                        return;
                    };
                    let Some((x, y)) = touch_to_view_coords(&touch, &view.svg, view.core.view())
                    else {
                        return;
                    };
                    event.prevent_default();
                    event.stop_propagation();
                    view.begin_drag(piece_id, x, y, Some(touch.identifier()));
                },
            );
            listeners.push(listener);
        }
        *self.piece_listeners.borrow_mut() = listeners;
    }

    fn install_resize_listener(self: &Rc<Self>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let weak = Rc::downgrade(self);
        let listener = EventListener::new(&window, "resize", move |_event| {
            if let Some(view) = weak.upgrade() {
                view.refresh_view();
            }
        });
        *self.resize_listener.borrow_mut() = Some(listener);
    }

    /// Keeps the viewBox the same shape as the element, so one screen pixel
    /// stays one view unit on both axes.
    fn refresh_view(&self) {
        let view = measure_view(&self.svg);
        if view == self.core.view() {
            return;
        }
        self.core.set_view(view);
        apply_view_box(&self.svg, view);
    }

    fn subscribe(self: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let subscription = self.core.subscribe(Rc::new(move |events: &[PuzzleEvent]| {
            if let Some(view) = weak.upgrade() {
                view.render_events(events);
            }
        }));
        *self.subscription.borrow_mut() = Some(subscription);
    }

    fn begin_drag(self: &Rc<Self>, piece_id: PieceId, x: f32, y: f32, pointer_id: Option<i32>) {
        let events = self.core.apply_action(PuzzleAction::BeginDrag {
            piece_id,
            x,
            y,
            pointer_id,
        });
        if events
            .iter()
            .any(|event| matches!(event, PuzzleEvent::DragStarted { .. }))
        {
            self.install_drag_listeners();
        }
    }

    /// Document-level move/up listeners, alive only while a drag runs.
    fn install_drag_listeners(self: &Rc<Self>) {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let mut listeners = Vec::with_capacity(5);

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new_with_options(
            &document,
            "mousemove",
            active_options(),
            move |event: &Event| {
                let (Some(view), Some(event)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>())
                else {
                    return;
                };
                if let Some((x, y)) = mouse_to_view_coords(event, &view.svg, view.core.view()) {
                    event.prevent_default();
                    view.core.apply_action(PuzzleAction::DragMove { x, y });
                }
            },
        ));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new_with_options(
            &document,
            "mouseup",
            active_options(),
            move |_event: &Event| {
                if let Some(view) = weak.upgrade() {
                    view.end_drag(None);
                }
            },
        ));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new_with_options(
            &document,
            "touchmove",
            active_options(),
            move |event: &Event| {
                let (Some(view), Some(event)) = (weak.upgrade(), event.dyn_ref::<TouchEvent>())
                else {
                    return;
                };
                let Some(touch) = touch_from_event(event, view.core.active_pointer(), false)
                else {
                    return;
                };
                if let Some((x, y)) = touch_to_view_coords(&touch, &view.svg, view.core.view()) {
                    event.prevent_default();
                    view.core.apply_action(PuzzleAction::DragMove { x, y });
                }
            },
        ));

        for kind in ["touchend", "touchcancel"] {
            let weak = Rc::downgrade(self);
            listeners.push(EventListener::new_with_options(
                &document,
                kind,
                active_options(),
                move |event: &Event| {
                    let (Some(view), Some(event)) = (weak.upgrade(), event.dyn_ref::<TouchEvent>())
                    else {
                        return;
                    };
                    let active = view.core.active_pointer();
                    if let Some(touch) = touch_from_event(event, active, true) {
                        view.end_drag(Some(touch.identifier()));
                    }
                },
            ));
        }

        *self.drag_listeners.borrow_mut() = listeners;
    }

    fn end_drag(&self, pointer_id: Option<i32>) {
        let events = self.core.apply_action(PuzzleAction::DragEnd { pointer_id });
        if events
            .iter()
            .any(|event| matches!(event, PuzzleEvent::DragEnded { .. }))
        {
            self.drag_listeners.borrow_mut().clear();
        }
    }

    fn render_events(&self, events: &[PuzzleEvent]) {
        let mut restack = false;
        for event in events {
            match event {
                PuzzleEvent::DragStarted { members, .. } => {
                    for &piece in members {
                        self.set_piece_class(piece, PIECE_DRAGGING_CLASS);
                    }
                    restack = true;
                }
                PuzzleEvent::GroupMoved { group, translation } => {
                    let members = self.core.with_scene(|scene| {
                        scene
                            .group(*group)
                            .map(|state| state.members.clone())
                            .unwrap_or_default()
                    });
                    let transform = translate_attr(*translation);
                    for piece in members {
                        if let Some(node) = self.pieces.get(piece) {
                            let _ = node.set_attribute("transform", &transform);
                        }
                    }
                }
                PuzzleEvent::DragEnded { .. } => {
                    for piece in 0..self.pieces.len() {
                        self.set_piece_class(piece, PIECE_CLASS);
                    }
                }
                PuzzleEvent::Merged(record) => {
                    let translation = self
                        .core
                        .with_scene(|scene| scene.translation(record.survivor));
                    if let Some(translation) = translation {
                        let transform = translate_attr(translation);
                        for &piece in &record.moved {
                            if let Some(node) = self.pieces.get(piece) {
                                let _ = node.set_attribute("transform", &transform);
                            }
                        }
                    }
                    restack = true;
                }
                PuzzleEvent::Solved => {
                    let _ = self.svg.set_attribute("class", "puzzle-svg solved");
                }
            }
        }
        if restack {
            self.apply_z_order();
        }
    }

    fn set_piece_class(&self, piece: PieceId, class: &str) {
        if let Some(node) = self.pieces.get(piece) {
            let _ = node.set_attribute("class", class);
        }
    }

    /// Re-appends pieces back to front so the front-most group paints last.
    fn apply_z_order(&self) {
        let order = self.core.with_scene(|scene| scene.piece_order());
        for piece in order {
            if let Some(node) = self.pieces.get(piece) {
                let _ = self.layer.append_child(node);
            }
        }
    }
}

fn active_options() -> EventListenerOptions {
    EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: false,
    }
}

fn translate_attr(translation: [f32; 2]) -> String {
    format!(
        "translate({} {})",
        fmt_f32(translation[0]),
        fmt_f32(translation[1])
    )
}

fn create_svg_element(document: &Document, tag: &str) -> Option<Element> {
    match document.create_element_ns(Some(SVG_NS), tag) {
        Ok(element) => Some(element),
        Err(_) => {
            gloo::console::warn!("puzzle: failed to create svg element", tag);
            None
        }
    }
}

fn clear_children(parent: &Element) {
    while let Some(child) = parent.first_child() {
        let _ = parent.remove_child(&child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::MouseEventInit;

    use crate::input::screen_to_view_coords;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window()
            .and_then(|window| window.document())
            .expect("document available")
    }

    fn attach_svg(width: u32, height: u32) -> Element {
        let document = document();
        if let Some(stale) = document.get_element_by_id(PUZZLE_SVG_ID) {
            stale.remove();
        }
        let svg = document
            .create_element_ns(Some(SVG_NS), "svg")
            .expect("create svg");
        svg.set_id(PUZZLE_SVG_ID);
        let _ = svg.set_attribute(
            "style",
            &format!("display: block; width: {width}px; height: {height}px;"),
        );
        document
            .body()
            .expect("body available")
            .append_child(&svg)
            .expect("append svg");
        svg
    }

    fn mouse(kind: &str, x: i32, y: i32) -> MouseEvent {
        let init = MouseEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_client_x(x);
        init.set_client_y(y);
        MouseEvent::new_with_mouse_event_init_dict(kind, &init).expect("mouse event")
    }

    fn translation_of(node: &Element) -> [f32; 2] {
        let transform = node.get_attribute("transform").expect("transform");
        let inner = transform
            .trim_start_matches("translate(")
            .trim_end_matches(')');
        let mut parts = inner.split(' ').map(|part| part.parse::<f32>().expect("number"));
        [parts.next().expect("x"), parts.next().expect("y")]
    }

    fn transforms(view: &PuzzleView) -> Vec<Option<String>> {
        view.pieces
            .iter()
            .map(|node| node.get_attribute("transform"))
            .collect()
    }

    #[wasm_bindgen_test]
    fn translate_uses_three_decimals() {
        assert_eq!(translate_attr([12.5, -3.0]), "translate(12.500 -3.000)");
    }

    #[wasm_bindgen_test]
    fn mouse_drag_follows_pointer_and_releases_listeners() {
        let svg = attach_svg(1024, 768);
        let view = mount(&PuzzleConfig::default(), Rc::new(|| {})).expect("mounted");
        let document = document();
        let rect = svg.get_bounding_client_rect();
        let start_x = rect.left() as i32 + 500;
        let start_y = rect.top() as i32 + 400;

        let piece = view.pieces[0].clone();
        let hit = piece.last_element_child().expect("hit path");
        let before = translation_of(&piece);

        hit.dispatch_event(&mouse("mousedown", start_x, start_y))
            .expect("dispatch mousedown");
        assert_eq!(
            piece.get_attribute("class").as_deref(),
            Some(PIECE_DRAGGING_CLASS)
        );
        assert_eq!(view.drag_listeners.borrow().len(), 5);

        document
            .dispatch_event(&mouse("mousemove", start_x + 37, start_y + 21))
            .expect("dispatch mousemove");
        let after = translation_of(&piece);
        assert!((after[0] - before[0] - 37.0).abs() < 0.01);
        assert!((after[1] - before[1] - 21.0).abs() < 0.01);

        document
            .dispatch_event(&mouse("mouseup", start_x + 37, start_y + 21))
            .expect("dispatch mouseup");
        assert_eq!(piece.get_attribute("class").as_deref(), Some(PIECE_CLASS));
        assert!(view.drag_listeners.borrow().is_empty());

        let settled = transforms(&view);
        document
            .dispatch_event(&mouse("mouseup", start_x, start_y))
            .expect("dispatch second mouseup");
        document
            .dispatch_event(&mouse("mousemove", start_x + 200, start_y + 200))
            .expect("dispatch stray mousemove");
        assert_eq!(transforms(&view), settled);

        drop(view);
        svg.remove();
    }

    #[wasm_bindgen_test]
    fn resize_refreshes_view_box_and_pointer_mapping() {
        let svg = attach_svg(1024, 768);
        let view = mount(&PuzzleConfig::default(), Rc::new(|| {})).expect("mounted");
        assert_eq!(view.core.view(), ViewRect::from_size(1024.0, 768.0));

        let _ = svg.set_attribute("style", "display: block; width: 600px; height: 800px;");
        let window = web_sys::window().expect("window available");
        window
            .dispatch_event(&Event::new("resize").expect("resize event"))
            .expect("dispatch resize");

        assert_eq!(view.core.view(), ViewRect::from_size(600.0, 800.0));
        assert_eq!(
            svg.get_attribute("viewBox").as_deref(),
            Some("0.000 0.000 600.000 800.000")
        );
        let rect = svg.get_bounding_client_rect();
        let (x, y) = screen_to_view_coords(
            rect.left() as f32 + 300.0,
            rect.top() as f32 + 200.0,
            &svg,
            view.core.view(),
        )
        .expect("mapped");
        assert!((x - 300.0).abs() < 0.01);
        assert!((y - 200.0).abs() < 0.01);

        drop(view);
        svg.remove();
    }
}
