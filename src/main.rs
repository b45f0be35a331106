mod app_core;
mod boot;
mod input;
mod svg_app;
mod yew_app;

fn main() {
    console_error_panic_hook::set_once();
    yew_app::run();
}
