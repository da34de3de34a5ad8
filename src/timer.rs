use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::error::StageError;

/// One-shot `setTimeout` that can be cancelled before it fires.
#[derive(Default)]
pub struct JumpTimer {
    // the closure must outlive the browser's reference to it, so it is only
    // released when replaced or cancelled, never from inside the callback
    pending: Option<(i32, Closure<dyn FnMut()>)>,
}

impl JumpTimer {
    pub fn schedule(
        &mut self,
        delay_ms: i32,
        f: impl FnOnce() + 'static,
    ) -> Result<(), StageError> {
        self.cancel();
        let window = web_sys::window().ok_or(StageError::NoWindow)?;
        let mut f = Some(f);
        let cb = Closure::wrap(Box::new(move || {
            if let Some(f) = f.take() {
                f();
            }
        }) as Box<dyn FnMut()>);
        let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            delay_ms,
        )?;
        self.pending = Some((handle, cb));
        Ok(())
    }

    pub fn cancel(&mut self) {
        if let Some((handle, _cb)) = self.pending.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }
}

impl Drop for JumpTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
