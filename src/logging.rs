//! `log` backend: browser console on wasm32, stdout elsewhere.

use log::{Level, LevelFilter, Record};

fn format_line(record: &Record) -> String {
    format!("[{}] {}: {}", record.level(), record.target(), record.args())
}

#[cfg(target_arch = "wasm32")]
fn emit(record: &Record) {
    let line = wasm_bindgen::JsValue::from_str(&format_line(record));
    match record.level() {
        Level::Error => web_sys::console::error_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
        Level::Info => web_sys::console::info_1(&line),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(record: &Record) {
    if record.level() <= Level::Warn {
        eprintln!("{}", format_line(record));
    } else {
        println!("{}", format_line(record));
    }
}

/// Install the global logger. Calling it twice is harmless.
pub fn init(level: LevelFilter) {
    let result = fern::Dispatch::new()
        .level(level)
        .chain(fern::Output::call(emit))
        .apply();
    if result.is_err() {
        log::debug!("Logger already initialised");
    }
}
