//! Feed loop against a channel source and a recording forwarder.

use parking_lot::Mutex;
use shared_types::{AlertCategory, AlertEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use ts_03_alert_feed::{
    event_channel, AlertFeed, AlertForwarder, ChainEvent, FeedError, UserAlertLog, ZoneAlertLog,
};

#[derive(Default)]
struct RecordingForwarder {
    alerts: Mutex<Vec<AlertEvent>>,
}

impl AlertForwarder for RecordingForwarder {
    fn forward(&self, alert: AlertEvent) {
        self.alerts.lock().push(alert);
    }
}

fn zone(message: &str) -> ChainEvent {
    ChainEvent::ZoneAlert(ZoneAlertLog {
        alert_message: message.to_string(),
        alert_type: "Curfew".to_string(),
        latitude: 23,
        longitude: 72,
        radius: 200,
        timestamp: 1_700_000_000,
    })
}

fn user() -> ChainEvent {
    ChainEvent::UserAlert(UserAlertLog {
        user_address: "0x4444444444444444444444444444444444444444".parse().unwrap(),
        name: "Ravi".to_string(),
        home_address: "secret".to_string(),
        phone_number: "secret".to_string(),
        aadhar: "secret".to_string(),
        passport: "secret".to_string(),
        alert_message: "Need help".to_string(),
        latitude: 1,
        longitude: 2,
        timestamp: 1_700_000_100,
    })
}

#[tokio::test]
async fn test_forwards_events_until_source_closes() {
    let forwarder = Arc::new(RecordingForwarder::default());
    let feed = AlertFeed::new(forwarder.clone());
    let (sender, source) = event_channel(8);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    sender.send(zone("Road closed")).await.unwrap();
    sender.send(user()).await.unwrap();
    drop(sender);

    let result = feed.run(source, shutdown_rx).await;
    assert!(matches!(result, Err(FeedError::SourceClosed)));

    let alerts = forwarder.alerts.lock();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].category, AlertCategory::Zone);
    assert_eq!(alerts[0].title, "Curfew");
    assert_eq!(alerts[1].title, "User Alert: Ravi");
    assert!(!serde_json::to_string(&alerts[1]).unwrap().contains("secret"));
}

#[tokio::test]
async fn test_stops_on_shutdown_signal() {
    let forwarder = Arc::new(RecordingForwarder::default());
    let feed = Arc::new(AlertFeed::new(forwarder.clone()));
    let (sender, source) = event_channel(8);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let runner = Arc::clone(&feed);
    let handle = tokio::spawn(async move { runner.run(source, shutdown_rx).await });

    sender.send(zone("first")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    shutdown_tx.send(true).unwrap();

    let handled = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(handled, 1);
    assert_eq!(forwarder.alerts.lock().len(), 1);
}

#[test]
fn test_handle_json_rejects_garbage() {
    let feed = AlertFeed::new(Arc::new(RecordingForwarder::default()));
    assert!(matches!(feed.handle_json("{not json"), Err(FeedError::Decode(_))));
}

#[test]
fn test_handle_json_maps_user_alert() {
    let forwarder = Arc::new(RecordingForwarder::default());
    let feed = AlertFeed::new(forwarder.clone());
    let raw = serde_json::to_string(&user()).unwrap();

    let alert = feed.handle_json(&raw).unwrap();
    assert_eq!(alert.category, AlertCategory::User);
    assert_eq!(forwarder.alerts.lock().len(), 1);
}
