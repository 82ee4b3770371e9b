//! Clock builtins for LZP
//!
//! Build with `cargo build -p lzp-time` and load with `(plugin "lzp_time")`
//! after pointing `--plugin-dir` at the build output.

use chrono::Utc;
use lzp::interp::{InterpResult, Registrar, ScopeRef, Value};

const TIME_SCRIPT: &str = include_str!("time.lzp");

/// `time`: seconds since the Unix epoch
fn builtin_time(_: &ScopeRef, _: Vec<Value>) -> InterpResult<Value> {
    Ok(Value::Int(Utc::now().timestamp()))
}

/// `time-milli`: milliseconds since the Unix epoch
fn builtin_time_milli(_: &ScopeRef, _: Vec<Value>) -> InterpResult<Value> {
    Ok(Value::Int(Utc::now().timestamp_millis()))
}

fn init(registrar: &mut impl Registrar) {
    registrar.register("time", builtin_time);
    registrar.register("time-milli", builtin_time_milli);
    registrar.eval_source("time.lzp", TIME_SCRIPT);
}

/// Plugin entry point
#[unsafe(no_mangle)]
#[allow(improper_ctypes_definitions)]
pub extern "C" fn lzp_plugin_init(scope: &mut ScopeRef) {
    init(scope);
}
