//! Push notifications and their click actions.

use serde::Serialize;

use super::{Outcome, WorkerConfig};

pub const DEFAULT_BODY: &str = "New update available!";
pub const VIBRATE_PATTERN: [u32; 3] = [100, 50, 100];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    /// Milliseconds since the Unix epoch.
    pub date_of_arrival: i64,
    pub primary_key: u32,
}

/// A notification ready for the host to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: NotificationData,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    /// Build the update notification for a push, with an optional text body.
    pub fn for_push(config: &WorkerConfig, data: Option<&str>) -> Self {
        let icon = config.placeholder_image.clone();
        let action = |action: &str, title: &str| NotificationAction {
            action: action.to_string(),
            title: title.to_string(),
            icon: icon.clone(),
        };

        Self {
            title: config.notification_title.clone(),
            body: data.unwrap_or(DEFAULT_BODY).to_string(),
            icon: icon.clone(),
            badge: icon.clone(),
            vibrate: VIBRATE_PATTERN.to_vec(),
            data: NotificationData { date_of_arrival: chrono::Utc::now().timestamp_millis(), primary_key: 1 },
            actions: vec![action("explore", "View Portfolio"), action("close", "Close")],
        }
    }
}

/// The notification is always closed; `explore` also opens the site root.
pub fn notification_click(config: &WorkerConfig, action: Option<&str>) -> Outcome {
    match action {
        Some("explore") => Outcome::OpenWindow(config.origin.join("/").map_or_else(|_| "/".to_string(), String::from)),
        _ => Outcome::Dismissed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::AppConfig;

    fn config() -> WorkerConfig {
        WorkerConfig::from_app_config(&AppConfig::default()).unwrap()
    }

    #[test]
    fn test_push_defaults() {
        let n = Notification::for_push(&config(), None);
        assert_eq!(n.title, "Portfolio");
        assert_eq!(n.body, DEFAULT_BODY);
        assert_eq!(n.icon, "/favicon.svg");
        assert_eq!(n.badge, "/favicon.svg");
        assert_eq!(n.vibrate, vec![100, 50, 100]);
        assert_eq!(n.data.primary_key, 1);
        assert!(n.data.date_of_arrival > 0);
        let actions: Vec<&str> = n.actions.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(actions, vec!["explore", "close"]);
    }

    #[test]
    fn test_push_body_from_payload() {
        let n = Notification::for_push(&config(), Some("New project: ray tracer"));
        assert_eq!(n.body, "New project: ray tracer");
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let value = serde_json::to_value(Notification::for_push(&config(), None)).unwrap();
        assert!(value["data"]["dateOfArrival"].is_i64());
        assert_eq!(value["data"]["primaryKey"], 1);
        assert_eq!(value["actions"][0]["title"], "View Portfolio");
    }

    #[test]
    fn test_click_actions() {
        let config = config();
        assert!(matches!(notification_click(&config, Some("explore")), Outcome::OpenWindow(url) if url == "http://localhost:3000/"));
        assert!(matches!(notification_click(&config, Some("close")), Outcome::Dismissed));
        assert!(matches!(notification_click(&config, None), Outcome::Dismissed));
    }
}
