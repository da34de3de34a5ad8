mod components;
mod config;
mod error;
mod model;
mod render;
mod scene;
mod stage;
mod state;
mod timer;
mod util;

use components::App;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    yew::Renderer::<App>::new().render();
}
