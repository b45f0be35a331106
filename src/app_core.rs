use std::cell::{Cell, RefCell};
use std::rc::Rc;

use heartlock_core::piece::{PieceBlueprint, ScatterArea};
use heartlock_core::{PuzzleAction, PuzzleConfig, PuzzleEvent, PuzzleSession, Scene};

pub(crate) type CoreSubscriber = Rc<dyn Fn(&[PuzzleEvent])>;
pub(crate) type SolvedHook = Rc<dyn Fn()>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ViewRect {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewRect {
    pub(crate) fn from_size(width: f32, height: f32) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width,
            height,
        }
    }
}

/// Shared owner of the puzzle session. Input handlers dispatch actions here
/// and the renderer listens for the resulting events.
pub(crate) struct PuzzleCore {
    session: RefCell<PuzzleSession>,
    subscribers: Rc<RefCell<Vec<CoreSubscriber>>>,
    solved_hook: RefCell<Option<SolvedHook>>,
    view: Cell<ViewRect>,
}

impl PuzzleCore {
    pub(crate) fn scatter(
        config: PuzzleConfig,
        view: ViewRect,
        seed: u32,
    ) -> (Rc<Self>, Vec<PieceBlueprint>) {
        let area = ScatterArea::for_viewport(view.width, view.height, config.piece_size);
        let (session, blueprints) = PuzzleSession::scatter(config, seed, &area);
        let core = Rc::new(Self {
            session: RefCell::new(session),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            solved_hook: RefCell::new(None),
            view: Cell::new(view),
        });
        (core, blueprints)
    }

    pub(crate) fn view(&self) -> ViewRect {
        self.view.get()
    }

    /// Pieces keep their translations; only the pointer mapping changes.
    pub(crate) fn set_view(&self, view: ViewRect) {
        self.view.set(view);
    }

    pub(crate) fn with_scene<R>(&self, read: impl FnOnce(&Scene) -> R) -> R {
        read(self.session.borrow().scene())
    }

    pub(crate) fn active_pointer(&self) -> Option<i32> {
        self.session
            .borrow()
            .drag()
            .active()
            .and_then(|drag| drag.pointer_id)
    }

    pub(crate) fn set_solved_hook(&self, hook: SolvedHook) {
        *self.solved_hook.borrow_mut() = Some(hook);
    }

    pub(crate) fn subscribe(&self, subscriber: CoreSubscriber) -> CoreSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        CoreSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    pub(crate) fn apply_action(&self, action: PuzzleAction) -> Vec<PuzzleEvent> {
        let events = self.session.borrow_mut().apply_action(action);
        if events.is_empty() {
            return events;
        }
        self.notify(&events);
        if events.iter().any(|event| matches!(event, PuzzleEvent::Solved)) {
            gloo::console::log!("puzzle solved");
            let hook = self.solved_hook.borrow().clone();
            if let Some(hook) = hook {
                hook();
            }
        }
        events
    }

    fn notify(&self, events: &[PuzzleEvent]) {
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)(events);
        }
    }
}

pub(crate) struct CoreSubscription {
    subscriber: CoreSubscriber,
    subscribers: Rc<RefCell<Vec<CoreSubscriber>>>,
}

impl Drop for CoreSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}
