//! Terminal rendering of engine updates.

use beanline_sync::{ContentSink, Notice, NoticeLevel};
use chrono::Local;
use console::style;
use serde_json::{json, Value};

/// Prints content updates and notices as they arrive.
#[derive(Clone)]
pub struct ConsoleSink {
    json: bool,
}

impl ConsoleSink {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn update(&self, target: &str, payload: &Value) {
        let stamp = Local::now().format("%H:%M:%S");
        if self.json {
            let record = json!({
                "update": target,
                "at": stamp.to_string(),
                "items": item_count(payload),
            });
            println!("{}", record);
            return;
        }
        println!(
            "{} {} {}",
            style(stamp).dim(),
            style(target).cyan(),
            describe(payload)
        );
    }
}

impl ContentSink for ConsoleSink {
    fn update_product_display(&self, products: &Value) {
        self.update("product display", products);
    }

    fn update_calculator_options(&self, products: &Value) {
        self.update("calculator options", products);
    }

    fn update_testimonials(&self, testimonials: &Value) {
        self.update("testimonials", testimonials);
    }

    fn update_live_activity(&self, activities: &Value) {
        self.update("live activity", activities);
    }

    fn update_contact_info(&self, settings: &Value) {
        self.update("contact info", settings);
    }

    fn update_site_config(&self, settings: &Value) {
        self.update("site config", settings);
    }

    fn show_notice(&self, notice: Notice) {
        if self.json {
            let level = match notice.level {
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            };
            eprintln!("{}", json!({ "notice": level, "message": notice.message }));
            return;
        }
        match notice.level {
            NoticeLevel::Warning => eprintln!("{} {}", style("⚠").yellow(), notice.message),
            NoticeLevel::Error => eprintln!("{} {}", style("✗").red(), style(notice.message).red()),
        }
    }
}

fn item_count(payload: &Value) -> usize {
    match payload {
        Value::Array(items) => items.len(),
        Value::Object(fields) => fields.len(),
        _ => 0,
    }
}

fn describe(payload: &Value) -> String {
    match payload {
        Value::Array(items) => format!("{} item(s)", items.len()),
        Value::Object(fields) => format!("{} field(s)", fields.len()),
        other => other.to_string(),
    }
}
