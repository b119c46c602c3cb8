//! FFI Bridge Layer: plaza simulation <-> foreign renderer
//!
//! C-ABI functions for hosts that cannot link Rust directly (wasm/browser
//! shells, engine plugins). A simulation lives behind an opaque handle
//! returned by `plaza_sim_create` and released by `plaza_sim_destroy`.
//! Structured data crosses the boundary as JSON; every returned string is
//! heap-allocated and must be released with `free_string`.

use serde::Serialize;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::config::SimConfig;
use crate::engine::Simulation;
use crate::logging;

// ========================
// Helpers
// ========================

fn json_to_cstring<T: Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

fn parse_cstr(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_owned()) }
}

fn sim_ref<'a>(handle: *const Simulation) -> Option<&'a Simulation> {
    unsafe { handle.as_ref() }
}

fn sim_mut<'a>(handle: *mut Simulation) -> Option<&'a mut Simulation> {
    unsafe { handle.as_mut() }
}

// ========================
// C-ABI: Core
// ========================

/// Version string
#[no_mangle]
pub extern "C" fn plaza_version() -> *mut c_char {
    CString::new(env!("CARGO_PKG_VERSION"))
        .unwrap_or_default()
        .into_raw()
}

/// Free a string allocated by Rust.
/// ptr must come from a prior call into this bridge, or be null.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            drop(CString::from_raw(ptr));
        }
    }
}

/// Install the tracing subscriber with default filters (idempotent)
#[no_mangle]
pub extern "C" fn plaza_init_logging() {
    logging::init_tracing_default();
}

/// Default configuration as JSON, a starting point for overrides
#[no_mangle]
pub extern "C" fn plaza_default_config() -> *mut c_char {
    json_to_cstring(&SimConfig::default())
}

// ========================
// C-ABI: Simulation lifecycle
// ========================

/// Create a simulation. `config_json` may be null for defaults.
/// Returns null when the config is malformed or rejected.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn plaza_sim_create(config_json: *const c_char) -> *mut Simulation {
    let config = if config_json.is_null() {
        SimConfig::default()
    } else {
        let Some(json) = parse_cstr(config_json) else {
            return std::ptr::null_mut();
        };
        match SimConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(target: "plaza_core::bridge", error = %e, "invalid config json");
                return std::ptr::null_mut();
            }
        }
    };

    match Simulation::new(config) {
        Ok(sim) => Box::into_raw(Box::new(sim)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Release a simulation. Null is ignored; a handle must not be used afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn plaza_sim_destroy(handle: *mut Simulation) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

// ========================
// C-ABI: Per-frame
// ========================

/// Advance one frame. Returns the number of words swapped, or -1 for a null handle.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn plaza_sim_tick(handle: *mut Simulation, delta_seconds: f32) -> i32 {
    match sim_mut(handle) {
        Some(sim) => sim.tick(delta_seconds) as i32,
        None => -1,
    }
}

/// Damage of one letter in [0,1], or -1 when the handle or indices are invalid
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn plaza_sim_letter_damage(
    handle: *const Simulation,
    slot: u32,
    letter: u32,
) -> f32 {
    sim_ref(handle)
        .and_then(|sim| sim.letter_damage(slot as usize, letter as usize))
        .unwrap_or(-1.0)
}

/// Currently displayed word of a slot, or null
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn plaza_sim_active_word(handle: *const Simulation, slot: u32) -> *mut c_char {
    sim_ref(handle)
        .and_then(|sim| sim.active_word_text(slot as usize))
        .and_then(|word| CString::new(word).ok())
        .map_or(std::ptr::null_mut(), CString::into_raw)
}

/// Position and facing of one agent as JSON, or null
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn plaza_sim_agent_transform(
    handle: *const Simulation,
    agent_id: u32,
) -> *mut c_char {
    match sim_ref(handle).and_then(|sim| sim.agent_transform(agent_id as usize)) {
        Some(transform) => json_to_cstring(&transform),
        None => std::ptr::null_mut(),
    }
}

/// 1 while the swap flash is running, 0 otherwise (or for a null handle)
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn plaza_sim_is_flashing(handle: *const Simulation) -> i32 {
    sim_ref(handle).map_or(0, |sim| sim.is_flashing() as i32)
}

/// Full scene snapshot as JSON, or null
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn plaza_sim_snapshot(handle: *const Simulation) -> *mut c_char {
    match sim_ref(handle) {
        Some(sim) => json_to_cstring(&sim.snapshot()),
        None => std::ptr::null_mut(),
    }
}

/// Events since the last drain as a JSON array, or null
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn plaza_sim_drain_events(handle: *mut Simulation) -> *mut c_char {
    match sim_mut(handle) {
        Some(sim) => json_to_cstring(&sim.drain_events()),
        None => std::ptr::null_mut(),
    }
}
