//! Shared app-state fixture: `app` with `preferences`, `session` and `todos`.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tirea_state_reset::{NodeDecl, NodeId, Registry, ResetGateway, WarnSink};

pub struct AppNodes {
    pub admin: NodeId,
    pub app: NodeId,
    pub preferences: NodeId,
    pub session: NodeId,
    pub todos: NodeId,
}

/// Declares the fixture hierarchy. `admin` is a second top-level node.
pub fn app_registry() -> (Registry, AppNodes) {
    let admin = NodeDecl::new("admin").default_value(json!({"role": "admin"}));
    let preferences = NodeDecl::new("preferences")
        .default_value(json!({"darkmode": false, "language": "en"}));
    let session = NodeDecl::new("session");
    let todos = NodeDecl::new("todos").default_value(json!({"list": []}));
    let app = NodeDecl::new("app")
        .default_value(json!({"status": "ONLINE"}))
        .children_from([preferences.id(), session.id(), todos.id()]);

    let nodes = AppNodes {
        admin: admin.id(),
        app: app.id(),
        preferences: preferences.id(),
        session: session.id(),
        todos: todos.id(),
    };
    let registry = Registry::register([app, preferences, session, todos, admin])
        .expect("fixture hierarchy is valid");
    (registry, nodes)
}

#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl WarnSink for RecordingSink {
    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub struct TestModel {
    pub gateway: ResetGateway,
    pub nodes: AppNodes,
    pub warnings: Arc<RecordingSink>,
}

/// Gateway at default state with one todo already added.
pub async fn setup() -> TestModel {
    let (registry, nodes) = app_registry();
    let warnings = Arc::new(RecordingSink::default());
    let gateway = ResetGateway::new(Arc::new(registry)).with_warn_sink(warnings.clone());

    todo_add(&gateway, "Test").await;
    assert_eq!(
        gateway.select(nodes.todos).await.unwrap()["list"],
        json!([{"description": "Test", "done": false}])
    );

    TestModel {
        gateway,
        nodes,
        warnings,
    }
}

pub async fn todo_add(gateway: &ResetGateway, description: &str) {
    let item = json!({"description": description, "done": false});
    gateway
        .update(|state| {
            if let Some(list) = state["app"]["todos"]["list"].as_array_mut() {
                list.push(item);
            }
        })
        .await;
}

/// Flip dark mode and return the new preferences.
pub async fn ensure_dark_mode(model: &TestModel) -> Value {
    let before = model.gateway.select(model.nodes.preferences).await.unwrap();
    let darkmode = before["darkmode"].as_bool().unwrap_or(false);

    model
        .gateway
        .update(|state| state["app"]["preferences"]["darkmode"] = json!(!darkmode))
        .await;

    let preferences = model.gateway.select(model.nodes.preferences).await.unwrap();
    assert_eq!(preferences["darkmode"], json!(!darkmode));
    preferences
}

/// Record a last-seen timestamp on the session and return the session.
pub async fn ensure_last_seen(model: &TestModel) -> Value {
    let lastseen = 1_700_000_000_000u64;

    model
        .gateway
        .update(|state| state["app"]["session"]["lastseen"] = json!(lastseen))
        .await;

    let session = model.gateway.select(model.nodes.session).await.unwrap();
    assert_eq!(session, json!({"lastseen": lastseen}));
    session
}
