//! qrkit one-shot command front end.
//!
//! Every command goes through the same `handle_method` dispatcher as the
//! JSON-RPC server. The generated QR lives only for one invocation, so
//! `generate` and `save` both render before acting.

use std::process::ExitCode;
use std::sync::Mutex;

use chrono::{Local, TimeZone};
use serde_json::{json, Value};

use qrkit::app::App;
use qrkit::logging;
use qrkit::rpc_handler::handle_method;
use qrkit::types::history::HistoryRecord;

const USAGE: &str = "\
usage: qrkit <command> [args]

commands:
  generate <text> [dir]     render <text> and write qr-code-<ms>.png into dir
  save <text>               render <text> and record it in history
  classify <text>           print the detected content type
  history                   list saved codes, newest first
  show <id>                 print one history record as JSON
  export <id> [dir]         regenerate a history entry and write its PNG
  clear                     remove all history
  call <method> [json]      invoke any RPC method with JSON params";

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

fn format_date(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%d %b %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn print_history(value: &Value) -> Result<(), String> {
    let records: Vec<HistoryRecord> =
        serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;
    if records.is_empty() {
        println!("No saved QR codes yet.");
        return Ok(());
    }
    for r in &records {
        let kind = r.content_type.map(|t| t.label()).unwrap_or("-");
        println!(
            "{:<15} {:<14} {:<6} {:>5}px  {}",
            r.id,
            format_date(r.timestamp),
            kind,
            r.size,
            truncate(&r.text, 20)
        );
    }
    Ok(())
}

fn run(app: &Mutex<App>, args: &[String]) -> Result<(), String> {
    let command = args.first().map(String::as_str).ok_or(USAGE)?;
    let arg = |i: usize| args.get(i).cloned().ok_or_else(|| USAGE.to_string());

    match command {
        "generate" => {
            let text = arg(1)?;
            let info = handle_method(app, "qr.generate", &json!({"text": text}))?;
            let mut params = json!({});
            if let Some(dir) = args.get(2) {
                params["dir"] = json!(dir);
            }
            let saved = handle_method(app, "qr.download", &params)?;
            println!(
                "{} ({}, {} chars)",
                saved["path"].as_str().unwrap_or(""),
                info["type"].as_str().unwrap_or(""),
                info["length"]
            );
        }
        "save" => {
            let text = arg(1)?;
            handle_method(app, "qr.generate", &json!({"text": text}))?;
            let result = handle_method(app, "history.save", &json!({}))?;
            if result["duplicate"] == json!(true) {
                println!("This QR code is already in recent history.");
            } else {
                println!("Saved to history (id {}).", result["id"]);
            }
        }
        "classify" => {
            let text = arg(1)?;
            let result = handle_method(app, "qr.classify", &json!({"text": text}))?;
            println!("{}", result["type"].as_str().unwrap_or(""));
        }
        "history" => {
            let list = handle_method(app, "history.list", &json!({}))?;
            print_history(&list)?;
        }
        "show" => {
            let record = handle_method(app, "history.get", &json!({"id": arg(1)?}))?;
            println!("{}", serde_json::to_string_pretty(&record).map_err(|e| e.to_string())?);
        }
        "export" => {
            handle_method(app, "history.load", &json!({"id": arg(1)?}))?;
            let mut params = json!({});
            if let Some(dir) = args.get(2) {
                params["dir"] = json!(dir);
            }
            let saved = handle_method(app, "qr.download", &params)?;
            println!("{}", saved["path"].as_str().unwrap_or(""));
        }
        "clear" => {
            handle_method(app, "history.clear", &json!({}))?;
            println!("History cleared.");
        }
        "call" => {
            let method = arg(1)?;
            let params: Value = match args.get(2) {
                Some(raw) => serde_json::from_str(raw).map_err(|e| format!("invalid params: {}", e))?,
                None => json!({}),
            };
            let result = handle_method(app, &method, &params)?;
            println!("{}", serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?);
        }
        "help" | "--help" | "-h" => println!("{}", USAGE),
        other => return Err(format!("unknown command: {}\n\n{}", other, USAGE)),
    }
    Ok(())
}

fn main() -> ExitCode {
    logging::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let app = match App::new(None, None) {
        Ok(app) => Mutex::new(app),
        Err(e) => {
            eprintln!("qrkit: failed to initialize: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&app, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("qrkit: {}", e);
            ExitCode::FAILURE
        }
    }
}
