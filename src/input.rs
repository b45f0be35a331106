use web_sys::{DomRect, Element, MouseEvent, Touch, TouchEvent};

use crate::app_core::ViewRect;

pub(crate) trait HasClientRect {
    fn client_rect(&self) -> DomRect;
}

impl HasClientRect for Element {
    fn client_rect(&self) -> DomRect {
        self.get_bounding_client_rect()
    }
}

pub(crate) fn screen_to_view_coords(
    screen_x: f32,
    screen_y: f32,
    element: &impl HasClientRect,
    view: ViewRect,
) -> Option<(f32, f32)> {
    let rect = element.client_rect();
    let rect_width = rect.width() as f32;
    let rect_height = rect.height() as f32;
    if rect_width <= 0.0 || rect_height <= 0.0 {
        return None;
    }
    let rect_left = rect.left() as f32;
    let rect_top = rect.top() as f32;
    let x = view.min_x + (screen_x - rect_left) * view.width / rect_width;
    let y = view.min_y + (screen_y - rect_top) * view.height / rect_height;
    Some((x, y))
}

pub(crate) fn mouse_to_view_coords(
    event: &MouseEvent,
    element: &Element,
    view: ViewRect,
) -> Option<(f32, f32)> {
    screen_to_view_coords(
        event.client_x() as f32,
        event.client_y() as f32,
        element,
        view,
    )
}

/// Finds the touch that drives the drag. With no id the first touch wins.
pub(crate) fn touch_from_event(
    event: &TouchEvent,
    touch_id: Option<i32>,
    use_changed: bool,
) -> Option<Touch> {
    let list = if use_changed {
        event.changed_touches()
    } else {
        event.touches()
    };
    if let Some(id) = touch_id {
        for idx in 0..list.length() {
            if let Some(touch) = list.item(idx) {
                if touch.identifier() == id {
                    return Some(touch);
                }
            }
        }
        None
    } else {
        list.item(0)
    }
}

pub(crate) fn touch_to_view_coords(
    touch: &Touch,
    element: &Element,
    view: ViewRect,
) -> Option<(f32, f32)> {
    screen_to_view_coords(
        touch.client_x() as f32,
        touch.client_y() as f32,
        element,
        view,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    struct FixedRect(DomRect);

    impl HasClientRect for FixedRect {
        fn client_rect(&self) -> DomRect {
            self.0.clone()
        }
    }

    #[wasm_bindgen_test]
    fn maps_client_point_into_view() {
        let rect = DomRect::new_with_x_and_y_and_width_and_height(10.0, 20.0, 400.0, 200.0)
            .expect("rect");
        let element = FixedRect(rect);
        let view = ViewRect::from_size(800.0, 400.0);
        assert_eq!(
            screen_to_view_coords(110.0, 70.0, &element, view),
            Some((200.0, 100.0))
        );
    }

    #[wasm_bindgen_test]
    fn empty_rect_has_no_mapping() {
        let rect = DomRect::new().expect("rect");
        let element = FixedRect(rect);
        let view = ViewRect::from_size(800.0, 400.0);
        assert_eq!(screen_to_view_coords(1.0, 1.0, &element, view), None);
    }
}
