use std::rc::Rc;

use gloo::timers::callback::Timeout;
use heartlock_core::flow::{
    PIN_CHECK_DELAY_MS, SOLVED_DELAY_MS, UNLOCK_DELAY_MS, WRONG_PIN_MESSAGE,
};
use heartlock_core::{
    evade_position, Envelope, PageConfig, PinCheck, PinKey, PinPad, Plea, PuzzleConfig, Screen,
    ScreenFlow,
};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlAudioElement, HtmlElement};
use yew::prelude::*;

use crate::app_core::SolvedHook;
use crate::boot;
use crate::svg_app::{self, PUZZLE_SVG_ID};

const SHAKE_MS: u32 = 500;
const YES_START: (f32, f32) = (50.0, 50.0);
const NO_START: (f32, f32) = (50.0, 150.0);

#[derive(Properties, PartialEq)]
struct AppProps {
    config: Rc<PageConfig>,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let config = props.config.clone();
    let flow = use_mut_ref(ScreenFlow::new);
    let screen = use_state(|| Screen::Pin);
    let audio_ref = use_node_ref();

    let advance = {
        let flow = flow.clone();
        let screen = screen.clone();
        Callback::from(move |step: fn(&mut ScreenFlow) -> bool| {
            let mut flow = flow.borrow_mut();
            if step(&mut flow) {
                screen.set(flow.screen());
            }
        })
    };
    let on_unlock = {
        let advance = advance.clone();
        Callback::from(move |()| advance.emit(ScreenFlow::unlock))
    };
    let on_solved = {
        let advance = advance.clone();
        Callback::from(move |()| advance.emit(ScreenFlow::puzzle_solved))
    };
    let on_accept = {
        let advance = advance.clone();
        let audio_ref = audio_ref.clone();
        let volume = config.song_volume;
        Callback::from(move |()| {
            advance.emit(ScreenFlow::accept);
            if let Some(audio) = audio_ref.cast::<HtmlAudioElement>() {
                play_song(audio, volume);
            }
        })
    };

    let body = match *screen {
        Screen::Pin => html! {
            <PinScreen code={AttrValue::from(config.pin_code.clone())} on_unlock={on_unlock} />
        },
        Screen::Puzzle => html! {
            <PuzzleScreen puzzle={config.puzzle.clone()} on_solved={on_solved} />
        },
        Screen::Question => html! {
            <QuestionScreen
                pleas={config.pleas.clone()}
                evade_distance={config.evade_distance}
                on_accept={on_accept}
            />
        },
        Screen::Letter => html! { <LetterScreen letter={AttrValue::from(config.letter.clone())} /> },
    };

    html! {
        <main class="heartlock">
            { body }
            if !config.song_ref.is_empty() {
                <audio id="loveSong" ref={audio_ref} src={config.song_ref.clone()} preload="auto" />
            }
        </main>
    }
}

fn play_song(audio: HtmlAudioElement, volume: f32) {
    audio.set_volume(volume as f64);
    match audio.play() {
        Ok(promise) => spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                gloo::console::warn!("audio play failed:", err);
            }
        }),
        Err(err) => gloo::console::warn!("audio play failed:", err),
    }
}

#[derive(Properties, PartialEq)]
struct PinScreenProps {
    code: AttrValue,
    on_unlock: Callback<()>,
}

#[function_component(PinScreen)]
fn pin_screen(props: &PinScreenProps) -> Html {
    let pad = {
        let code = props.code.to_string();
        use_mut_ref(move || PinPad::new(code))
    };
    let filled = use_state(|| 0usize);
    let error = use_state(|| None::<&'static str>);
    let shaking = use_state(|| false);
    // The pending check and whatever it schedules live in separate slots so
    // the check callback never drops its own timeout.
    let pending_check = use_mut_ref(|| None::<Timeout>);
    let pending_result = use_mut_ref(|| None::<Timeout>);

    let on_key = {
        let pad = pad.clone();
        let filled = filled.clone();
        let error = error.clone();
        let shaking = shaking.clone();
        let pending_check = pending_check.clone();
        let pending_result = pending_result.clone();
        let on_unlock = props.on_unlock.clone();
        Callback::from(move |key: PinKey| {
            if !pad.borrow_mut().press(key) {
                return;
            }
            // Editing the entry cancels a check that has not fired yet.
            pending_check.borrow_mut().take();
            error.set(None);
            filled.set(pad.borrow().filled());
            if !pad.borrow().is_full() {
                return;
            }
            let pad = pad.clone();
            let filled = filled.clone();
            let error = error.clone();
            let shaking = shaking.clone();
            let on_unlock = on_unlock.clone();
            let pending_result = pending_result.clone();
            let check = Timeout::new(PIN_CHECK_DELAY_MS, move || {
                let result = pad.borrow_mut().check();
                let followup = match result {
                    Some(PinCheck::Accepted) => {
                        Timeout::new(UNLOCK_DELAY_MS, move || on_unlock.emit(()))
                    }
                    Some(PinCheck::Rejected) => {
                        error.set(Some(WRONG_PIN_MESSAGE));
                        filled.set(0);
                        shaking.set(true);
                        Timeout::new(SHAKE_MS, move || shaking.set(false))
                    }
                    None => return,
                };
                *pending_result.borrow_mut() = Some(followup);
            });
            *pending_check.borrow_mut() = Some(check);
        })
    };

    let capacity = pad.borrow().capacity();
    let dots = (0..capacity).map(|index| {
        let class = if index < *filled { "pin-dot filled" } else { "pin-dot" };
        html! { <span class={class} /> }
    });
    let keys = [
        Some(PinKey::Digit(1)),
        Some(PinKey::Digit(2)),
        Some(PinKey::Digit(3)),
        Some(PinKey::Digit(4)),
        Some(PinKey::Digit(5)),
        Some(PinKey::Digit(6)),
        Some(PinKey::Digit(7)),
        Some(PinKey::Digit(8)),
        Some(PinKey::Digit(9)),
        None,
        Some(PinKey::Digit(0)),
        Some(PinKey::Back),
    ];
    let buttons = keys.into_iter().map(|key| match key {
        Some(key) => {
            let label = match key {
                PinKey::Digit(digit) => digit.to_string(),
                PinKey::Back => "⌫".to_string(),
            };
            let on_key = on_key.clone();
            let onclick = Callback::from(move |_: MouseEvent| on_key.emit(key));
            html! { <button class="pin-btn" type="button" {onclick}>{ label }</button> }
        }
        None => html! { <span class="pin-spacer" /> },
    });
    let display_class = if *shaking { "pin-display shake" } else { "pin-display" };

    html! {
        <section class="screen active" id="pinScreen">
            <h1 class="pin-title">{ "Enter the PIN ♡" }</h1>
            <div class={display_class}>{ for dots }</div>
            <p class="error-message" id="errorMessage">{ error.unwrap_or_default() }</p>
            <div class="pin-pad">{ for buttons }</div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct PuzzleScreenProps {
    puzzle: PuzzleConfig,
    on_solved: Callback<()>,
}

#[function_component(PuzzleScreen)]
fn puzzle_screen(props: &PuzzleScreenProps) -> Html {
    let reveal = use_mut_ref(|| None::<Timeout>);
    {
        let puzzle = props.puzzle.clone();
        let on_solved = props.on_solved.clone();
        use_effect_with((), move |_| {
            let hook: SolvedHook = Rc::new(move || {
                let on_solved = on_solved.clone();
                let timer = Timeout::new(SOLVED_DELAY_MS, move || on_solved.emit(()));
                *reveal.borrow_mut() = Some(timer);
            });
            let view = svg_app::mount(&puzzle, hook);
            move || drop(view)
        });
    }
    html! {
        <section class="screen active" id="puzzleScreen">
            <p class="puzzle-hint">{ "Put me back together ♡" }</p>
            <svg id={PUZZLE_SVG_ID} class="puzzle-svg" width="100%" height="100%"></svg>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct QuestionScreenProps {
    pleas: Vec<String>,
    evade_distance: f32,
    on_accept: Callback<()>,
}

#[function_component(QuestionScreen)]
fn question_screen(props: &QuestionScreenProps) -> Html {
    let plea = {
        let pleas = props.pleas.clone();
        use_mut_ref(move || Plea::new(pleas))
    };
    let text = use_state(String::new);
    let surrendered = use_state(|| false);
    let yes_pos = use_state(|| YES_START);
    let no_pos = use_state(|| NO_START);
    let container_ref = use_node_ref();
    let no_ref = use_node_ref();

    let on_no = {
        let plea = plea.clone();
        let text = text.clone();
        let surrendered = surrendered.clone();
        let yes_pos = yes_pos.clone();
        let no_pos = no_pos.clone();
        let container_ref = container_ref.clone();
        let no_ref = no_ref.clone();
        let evade_distance = props.evade_distance;
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            let step = plea.borrow_mut().refuse();
            text.set(step.message);
            if step.surrendered {
                surrendered.set(true);
                return;
            }
            let (Some(container), Some(no)) = (
                container_ref.cast::<HtmlElement>(),
                no_ref.cast::<HtmlElement>(),
            ) else {
                return;
            };
            let current = *no_pos;
            yes_pos.set(current);
            let max = (
                (container.offset_width() - no.offset_width()) as f32,
                (container.offset_height() - no.offset_height()) as f32,
            );
            let seed = (js_sys::Math::random() * u32::MAX as f64) as u32;
            no_pos.set(evade_position(current, max, evade_distance, seed));
        })
    };
    let on_yes = {
        let on_accept = props.on_accept.clone();
        Callback::from(move |_: MouseEvent| on_accept.emit(()))
    };

    let yes_class = if *surrendered { "answer-btn yes-btn big" } else { "answer-btn yes-btn" };
    let yes_style = if *surrendered {
        "left: 50%; top: 50%; transform: translate(-50%, -50%);".to_string()
    } else {
        position_style(*yes_pos)
    };

    html! {
        <section class="screen active" id="questionScreen">
            <h1 class="question">{ "Will you be my Valentine?" }</h1>
            <p class="pleading-text" id="pleadingText">{ (*text).clone() }</p>
            <div class="buttons" ref={container_ref}>
                <button id="yesBtn" class={yes_class} style={yes_style} onclick={on_yes}>
                    { "Yes" }
                </button>
                if !*surrendered {
                    <button
                        id="noBtn"
                        class="answer-btn no-btn"
                        ref={no_ref}
                        style={position_style(*no_pos)}
                        onclick={on_no}
                    >
                        { "No" }
                    </button>
                }
            </div>
        </section>
    }
}

fn position_style(pos: (f32, f32)) -> String {
    format!("left: {}px; top: {}px;", pos.0, pos.1)
}

#[derive(Properties, PartialEq)]
struct LetterScreenProps {
    letter: AttrValue,
}

#[function_component(LetterScreen)]
fn letter_screen(props: &LetterScreenProps) -> Html {
    let envelope = use_mut_ref(Envelope::default);
    let opened = use_state(|| false);
    let onclick = {
        let envelope = envelope.clone();
        let opened = opened.clone();
        Callback::from(move |_: MouseEvent| {
            if envelope.borrow_mut().open() {
                opened.set(true);
            }
        })
    };
    let class = if *opened { "envelope-wrapper flap" } else { "envelope-wrapper" };
    html! {
        <section class="screen active" id="letterScreen">
            <div class={class} {onclick}>
                <div class="envelope">
                    <div class="letter">{ props.letter.to_string() }</div>
                </div>
                <div class="heart" />
            </div>
        </section>
    }
}

pub(crate) fn run() {
    let config = Rc::new(boot::load_page_config());
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn sleep(ms: u32) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
            }
        });
        let _ = JsFuture::from(promise).await;
    }

    fn press(root: &web_sys::Element, key: PinKey) {
        let index = match key {
            PinKey::Digit(0) => 9,
            PinKey::Digit(digit) => u32::from(digit) - 1,
            PinKey::Back => 10,
        };
        let button = root
            .query_selector_all(".pin-btn")
            .expect("pin buttons")
            .item(index)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
            .expect("pin button");
        button.click();
    }

    #[wasm_bindgen_test]
    async fn correcting_the_last_digit_unlocks_once() {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document available");
        let root = document.create_element("div").expect("root");
        document
            .body()
            .expect("body available")
            .append_child(&root)
            .expect("append root");

        let unlocks = Rc::new(Cell::new(0u32));
        let on_unlock = {
            let unlocks = unlocks.clone();
            Callback::from(move |()| unlocks.set(unlocks.get() + 1))
        };
        let handle = yew::Renderer::<PinScreen>::with_root_and_props(
            root.clone(),
            PinScreenProps {
                code: AttrValue::from("1202"),
                on_unlock,
            },
        )
        .render();
        sleep(20).await;

        for digit in [1, 2, 0, 3] {
            press(&root, PinKey::Digit(digit));
        }
        press(&root, PinKey::Back);
        press(&root, PinKey::Digit(2));
        sleep(PIN_CHECK_DELAY_MS + UNLOCK_DELAY_MS + 200).await;

        assert_eq!(unlocks.get(), 1);
        let message = root
            .query_selector("#errorMessage")
            .ok()
            .flatten()
            .and_then(|node| node.text_content())
            .unwrap_or_default();
        assert!(message.is_empty());

        handle.destroy();
        root.remove();
    }

    #[wasm_bindgen_test]
    fn button_position_is_in_pixels() {
        assert_eq!(position_style((50.0, 150.5)), "left: 50px; top: 150.5px;");
    }
}
