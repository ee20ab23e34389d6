//! RPC method handler for the qrkit JSON-RPC protocol.
//!
//! Shared by `qrkit-rpc` (stdio server) and `qrkit` (one-shot commands) so
//! both front ends run the same code path. `handle_method` dispatches a
//! method name and JSON params to the `App`.

use std::path::Path;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::history_store::HistoryStoreTrait;
use crate::services::content_classifier::classify;
use crate::services::qr_generator::{GeneratedQr, QrGeneratorTrait};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::history::SaveOutcome;
use crate::types::qr::{ErrorCorrectionLevel, RenderOptions, Rgb};

/// JSON shape returned for a freshly generated QR code.
pub fn generated_to_json(qr: &GeneratedQr) -> Value {
    json!({
        "type": qr.content_type.label(),
        "length": qr.text.chars().count(),
        "size": qr.options.size,
        "width": qr.image.width,
        "height": qr.image.height,
        "dataURL": qr.image.data_url(),
        "generated_at": qr.generated_at,
    })
}

/// Reads an id that may arrive as a JSON number or a string.
fn id_param(params: &Value) -> Result<String, String> {
    match params.get("id") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err("missing id".to_string()),
    }
}

/// Overlays any options present in `params` on top of `defaults`.
fn render_options(params: &Value, defaults: RenderOptions) -> Result<RenderOptions, String> {
    let mut options = defaults;
    if let Some(size) = params.get("size") {
        let size = size
            .as_u64()
            .or_else(|| size.as_str().and_then(|s| s.trim().parse().ok()))
            .filter(|s| *s > 0)
            .and_then(|s| u32::try_from(s).ok())
            .ok_or("invalid size")?;
        options.size = size;
    }
    if let Some(fg) = params.get("foreground").and_then(|v| v.as_str()) {
        options.foreground = Rgb::parse(fg).map_err(|e| e.to_string())?;
    }
    if let Some(bg) = params.get("background").and_then(|v| v.as_str()) {
        options.background = Rgb::parse(bg).map_err(|e| e.to_string())?;
    }
    if let Some(level) = params.get("error_correction").and_then(|v| v.as_str()) {
        options.error_correction = level.parse::<ErrorCorrectionLevel>()?;
    }
    if let Some(zone) = params.get("quiet_zone") {
        let zone = zone
            .as_u64()
            .and_then(|z| u32::try_from(z).ok())
            .ok_or("invalid quiet_zone")?;
        options.quiet_zone = zone;
    }
    options.validate().map_err(|e| e.to_string())?;
    Ok(options)
}

#[cfg(feature = "clipboard")]
fn copy_current(app: &App) -> Result<Value, String> {
    let mut clipboard = crate::services::exporter::SystemClipboard::new()?;
    let outcome = app.copy(&mut clipboard).map_err(|e| e.to_string())?;
    Ok(json!({"copied": outcome.as_str()}))
}

#[cfg(not(feature = "clipboard"))]
fn copy_current(_app: &App) -> Result<Value, String> {
    Err("clipboard support is not enabled in this build".to_string())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── QR ───
        "qr.classify" => {
            let text = params.get("text").and_then(|v| v.as_str()).ok_or("missing text")?;
            Ok(json!({"type": classify(text).label()}))
        }
        "qr.generate" => {
            let text = params.get("text").and_then(|v| v.as_str()).ok_or("missing text")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let defaults = a.default_render_options().map_err(|e| e.to_string())?;
            let options = render_options(params, defaults)?;
            let qr = a.generate(text, options).map_err(|e| e.to_string())?;
            Ok(generated_to_json(qr))
        }
        "qr.current" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(a.generator.current().map(generated_to_json).unwrap_or(Value::Null))
        }
        "qr.download" => {
            let dir = params.get("dir").and_then(|v| v.as_str()).map(Path::new);
            let a = app.lock().map_err(|e| e.to_string())?;
            let path = a.download(dir).map_err(|e| e.to_string())?;
            Ok(json!({"path": path.to_string_lossy()}))
        }
        "qr.copy" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            copy_current(&a)
        }
        "qr.clear" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.generator.clear_current();
            Ok(json!({"ok": true}))
        }

        // ─── History ───
        "history.save" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let (outcome, id) = a.save_to_history().map_err(|e| e.to_string())?;
            match outcome {
                SaveOutcome::Saved => Ok(json!({"saved": true, "id": id})),
                SaveOutcome::Duplicate => Ok(json!({"saved": false, "duplicate": true})),
            }
        }
        "history.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let records = a.history().load();
            serde_json::to_value(records).map_err(|e| e.to_string())
        }
        "history.get" => {
            let id = id_param(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let record = a.find_history(&id).map_err(|e| e.to_string())?;
            serde_json::to_value(record).map_err(|e| e.to_string())
        }
        "history.load" => {
            let id = id_param(params)?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let qr = a.load_from_history(&id)?;
            Ok(generated_to_json(qr))
        }
        "history.clear" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            a.history().clear();
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.reset().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
