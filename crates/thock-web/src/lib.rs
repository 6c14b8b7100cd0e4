#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use thock_core::KeySynth;
use wasm_bindgen::prelude::*;

mod audio;

use audio::WebAudioBackend;

thread_local! {
    // Built on first use; the AudioContext itself waits for the first key event
    static SYNTH: RefCell<Option<KeySynth<WebAudioBackend>>> = const { RefCell::new(None) };
}

fn with_synth(f: impl FnOnce(&mut KeySynth<WebAudioBackend>)) {
    SYNTH.with(|cell| {
        // re-entrant calls (e.g. from a resume callback) are dropped rather than panicking
        let Ok(mut slot) = cell.try_borrow_mut() else {
            log::warn!("[web] synth busy, dropping key event");
            return;
        };
        let synth = slot.get_or_insert_with(|| KeySynth::new(WebAudioBackend::default()));
        f(synth);
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("thock-web starting");
    Ok(())
}

/// Key press. Call from a user-gesture handler so the browser lets audio start.
#[wasm_bindgen(js_name = playDown)]
pub fn play_down(switch_id: &str) {
    with_synth(|synth| synth.play_down(switch_id));
}

/// Key release.
#[wasm_bindgen(js_name = playUp)]
pub fn play_up(switch_id: &str) {
    with_synth(|synth| synth.play_up(switch_id));
}

/// Known switch identifiers, for building a picker.
#[wasm_bindgen(js_name = switchIds)]
pub fn switch_ids() -> js_sys::Array {
    thock_core::ProfileTable::builtin()
        .ids()
        .into_iter()
        .map(JsValue::from_str)
        .collect()
}
