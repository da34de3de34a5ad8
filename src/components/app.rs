use std::cell::RefCell;
use std::rc::Rc;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use crate::config::DemoConfig;
use crate::scene::SceneLoader;
use crate::stage::Stage;

// Background photo with the runner overlay stacked on top of it
#[function_component(App)]
pub fn app() -> Html {
    let background_ref = use_node_ref();
    let foreground_ref = use_node_ref();
    let stage = use_mut_ref(|| None::<Stage>);

    {
        let background_ref = background_ref.clone();
        let foreground_ref = foreground_ref.clone();
        let stage = stage.clone();
        use_effect_with((), move |_| {
            let config = DemoConfig::load();
            match (
                background_ref.cast::<HtmlCanvasElement>(),
                foreground_ref.cast::<HtmlCanvasElement>(),
            ) {
                (Some(background), Some(foreground)) => {
                    let slot: Rc<RefCell<Option<Stage>>> = stage.clone();
                    let url = config.background_url.clone();
                    let res = SceneLoader::new(background).load(&url, move |size| {
                        if let Err(e) = Stage::mount(foreground, size, config, slot) {
                            log::error!("runner init failed: {}", e);
                        }
                    });
                    if let Err(e) = res {
                        log::error!("scene load failed: {}", e);
                    }
                }
                _ => log::error!("canvas elements missing"),
            }
            // Cleanup
            move || {
                stage.borrow_mut().take();
            }
        });
    }

    html! {
        <div style="position:relative; margin:0; overflow:hidden;">
            <canvas id="background" ref={background_ref} style="position:absolute; left:0; top:0;"></canvas>
            <canvas id="foreground" ref={foreground_ref} style="position:absolute; left:0; top:0; touch-action:none;"></canvas>
        </div>
    }
}
