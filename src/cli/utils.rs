use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::resources::Notification;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Successful notifications are printed; failed ones become the command error
pub fn output_notification(output_format: &OutputFormat, notification: &Notification) -> anyhow::Result<()> {
    if notification.is_success() {
        output_success(
            output_format,
            &format!("{}: {}", notification.title, notification.description),
            Some(json!({ "notification": notification })),
        )
    } else {
        Err(anyhow::anyhow!("{}: {}", notification.title, notification.description))
    }
}

/// One-line notification for the interactive browser
pub fn notification_line(notification: &Notification) -> String {
    let mark = if notification.is_success() { "✓" } else { "✗" };
    format!("{} {}: {}", mark, notification.title, notification.description)
}
