//! C-compatible exports called by the host

use std::ffi::{c_char, c_int, CStr};

use tracing::instrument;
use tracing_subscriber::EnvFilter;

use hookwork_core::sdk::InputEvent;
use hookwork_core::CoreConfig;

// Plugin metadata - static strings with null terminators for C compatibility
static AUTHOR: &[u8] = b"hookwork contributors\0";
static NAME: &[u8] = b"hookwork\0";
static DESCRIPTION: &[u8] = b"Cleaning Up Pandora+ and AutoSave Blocker\0";
static LICENSE: &[u8] = b"MIT\0";
static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
static LOG_TAG: &[u8] = b"HOOKWORK\0";

/// Install the global subscriber. `RUST_LOG` overrides the core config.
fn init_logging(core: &CoreConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(core.log_directive()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Called when the host loads the plugin
///
/// Host services must already be installed with `hookwork_engine::init_host`.
///
/// # Safety
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn rust_plugin_load(error: *mut c_char, maxlen: usize) -> bool {
    let (core, config_error) = match CoreConfig::load() {
        Ok(core) => (core, None),
        Err(e) => (CoreConfig::default(), Some(e)),
    };
    init_logging(&core);

    tracing::info!("hookwork loading...");
    if let Some(e) = config_error {
        tracing::warn!("Using default core config: {}", e);
    }

    match std::panic::catch_unwind(|| crate::load(&core)) {
        Ok(Ok(())) => {
            tracing::info!("Main thread ID: {:?}", std::thread::current().id());
            true
        }
        Ok(Err(e)) => {
            tracing::error!("Failed to load: {}", e);
            write_error(error, maxlen, &format!("Load error: {}", e));
            false
        }
        Err(_) => {
            write_error(error, maxlen, "Panic during load");
            false
        }
    }
}

/// Called when the host unloads the plugin
///
/// # Safety
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn rust_plugin_unload(error: *mut c_char, maxlen: usize) -> bool {
    tracing::info!("hookwork unloading...");

    match std::panic::catch_unwind(crate::unload) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            write_error(error, maxlen, &format!("Unload error: {}", e));
            false
        }
        Err(_) => {
            write_error(error, maxlen, "Panic during shutdown");
            false
        }
    }
}

// Metadata exports

#[no_mangle]
pub extern "C" fn rust_get_author() -> *const c_char {
    AUTHOR.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_name() -> *const c_char {
    NAME.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_description() -> *const c_char {
    DESCRIPTION.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_license() -> *const c_char {
    LICENSE.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_log_tag() -> *const c_char {
    LOG_TAG.as_ptr() as *const c_char
}

/// Called by the host once per rendered frame on the main thread
#[no_mangle]
pub extern "C" fn rust_on_frame() {
    hookwork_core::on_frame();
}

/// Called by the host's input thread for every key event
///
/// The press is handled on the next frame.
///
/// # Safety
/// - `key` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn rust_on_key_event(key: *const c_char, event: c_int) {
    if key.is_null() {
        return;
    }
    let Some(event) = InputEvent::from_raw(i64::from(event)) else {
        return;
    };
    let key = CStr::from_ptr(key).to_string_lossy();
    if let Err(e) = hookwork_core::keybinds().queue_key_press(&key, event) {
        tracing::warn!("Dropped key event {}: {}", key, e);
    }
}

/// Helper to write an error message to a C buffer
///
/// # Safety
/// - `error` must be a valid pointer or null
/// - `maxlen` must accurately reflect the buffer size
unsafe fn write_error(error: *mut c_char, maxlen: usize, msg: &str) {
    if !error.is_null() && maxlen > 0 {
        let bytes = msg.as_bytes();
        let len = bytes.len().min(maxlen - 1);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), error as *mut u8, len);
        *error.add(len) = 0;
    }
}
