//! Cross-module scenarios: pipeline, dispatcher, store and the app shell
//! working together, plus the controller against a mock inventory service.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dockpeek::app::{App, PendingActionKind, handle_key};
use dockpeek::config::Config;
use dockpeek::dashboard_controller::{BackendEvent, DashboardMonitor};
use dockpeek::dispatcher::{ActionDispatcher, ContainerAction, DispatchOutcome, Confirmation, RowPhase};
use dockpeek::export;
use dockpeek::model::{
    Container, ContainerStatus, LogContent, LogViewState, PortMapping, RowId, Server, ServerStatus,
    Snapshot, SortColumn, ViewFilterState,
};
use dockpeek::notifications::Severity;
use dockpeek::pipeline;
use dockpeek::server_filter::build_toggles;
use dockpeek::store::InventoryStore;
use dockpeek::view::{ViewRow, build_view};

fn port(host: &str, container: &str) -> PortMapping {
    PortMapping {
        host_port: host.into(),
        container_port: container.into(),
        link: format!("http://h1:{}", host),
    }
}

fn container(name: &str, status: ContainerStatus, ports: Vec<PortMapping>) -> Container {
    Container {
        name: name.into(),
        server: "h1".into(),
        image: format!("{}:latest", name),
        status,
        compose_project: None,
        ports,
    }
}

fn server(name: &str, active: bool, order: i64) -> Server {
    Server {
        name: name.into(),
        status: if active { ServerStatus::Active } else { ServerStatus::Inactive },
        order,
    }
}

fn single_host(containers: Vec<Container>) -> Snapshot {
    Snapshot {
        servers: vec![server("h1", true, 0)],
        containers,
    }
}

#[test]
fn ports_sort_puts_portless_container_first() {
    let snap = single_host(vec![
        container("web", ContainerStatus::Running, vec![port("8080", "80/tcp")]),
        container("db", ContainerStatus::Running, vec![]),
    ]);
    let mut state = ViewFilterState {
        group_by_project: false,
        ..ViewFilterState::default()
    };
    state.sort_by(SortColumn::Ports);

    let display = pipeline::derive(&snap, &state);
    let names: Vec<&str> = display.containers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["db", "web"]);
}

#[test]
fn remove_locks_row_until_next_fetch_drops_it() {
    let mut store = InventoryStore::new();
    let seq = store.begin_fetch();
    store.apply_fetch(
        seq,
        Ok(single_host(vec![
            container("web", ContainerStatus::Running, vec![]),
            container("db", ContainerStatus::Exited, vec![]),
        ])),
    );
    let mut dispatcher = ActionDispatcher::new(Duration::from_millis(500));
    let fresh = store.take_fresh();
    dispatcher.sync_rows(&store.display().containers, fresh);

    let web = RowId::new("h1", "web");
    assert!(matches!(
        dispatcher.request(&web, ContainerAction::Remove),
        DispatchOutcome::Confirm(_)
    ));
    let cmd = dispatcher
        .resolve_confirmation(&web, Confirmation::Confirmed)
        .expect("confirmed remove dispatches");
    assert_eq!(cmd.action, ContainerAction::Remove);

    let now = Instant::now();
    dispatcher.complete(&web, ContainerAction::Remove, Ok("Container web removed".into()), now);
    dispatcher.advance(now + Duration::from_secs(1));
    dispatcher.advance(now + Duration::from_secs(1));

    let row = dispatcher.row(&web).unwrap();
    assert!(row.removed);
    assert!(row.locked());
    assert_eq!(row.phase, RowPhase::Idle);
    let rows = build_view(&store, &dispatcher);
    let removed = rows.iter().any(|r| matches!(r, ViewRow::Container(c) if c.id == web && c.removed));
    assert!(removed);

    let seq = store.begin_fetch();
    store.apply_fetch(seq, Ok(single_host(vec![container("db", ContainerStatus::Exited, vec![])])));
    let fresh = store.take_fresh();
    dispatcher.sync_rows(&store.display().containers, fresh);
    assert!(dispatcher.row(&web).is_none());
    let rows = build_view(&store, &dispatcher);
    assert!(!rows.iter().any(|r| matches!(r, ViewRow::Container(c) if c.id == web)));
}

#[test]
fn toggles_order_active_before_inactive() {
    let toggles = build_toggles(&[server("alpha", true, 1), server("beta", false, 0)]);
    let labels: Vec<&str> = toggles.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["All", "alpha", "beta"]);
    assert!(!toggles[2].enabled);
}

#[test]
fn export_strips_trailing_tcp() {
    let doc = export::build(
        &[container("web", ContainerStatus::Running, vec![port("8080", "80/tcp")])],
        chrono::Utc::now(),
    );
    assert_eq!(doc.containers[0].ports[0].container_port, "80");
    assert_eq!(doc.containers[0].ports[0].mapping, "8080:80/tcp");
}

fn runtime() -> Arc<tokio::runtime::Runtime> {
    Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()
            .unwrap(),
    )
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

#[test]
fn declined_prompt_leaves_row_idle() {
    let rt = runtime();
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::new("http://127.0.0.1:9");
    config.settings_path = Some(dir.path().join("settings.json"));
    let mut app = App::new(Arc::clone(&rt), config);

    let seq = app.monitor.store.begin_fetch();
    app.monitor.handle_event(
        BackendEvent::InventoryLoaded {
            seq,
            result: Ok(single_host(vec![container("web", ContainerStatus::Running, vec![])])),
        },
        Instant::now(),
    );
    app.rows = build_view(&app.monitor.store, &app.monitor.dispatcher);
    app.selected_index = app
        .rows
        .iter()
        .position(|r| matches!(r, ViewRow::Container(_)))
        .unwrap();

    handle_key(&mut app, key('T'));
    let pending = app.pending_action.as_ref().expect("stop needs confirmation");
    assert_eq!(pending.prompt.title, "Stop Container");
    assert_eq!(pending.kind, PendingActionKind::Container(RowId::new("h1", "web")));

    handle_key(&mut app, key('n'));
    assert!(app.pending_action.is_none());
    let row = app.monitor.dispatcher.row(&RowId::new("h1", "web")).unwrap();
    assert_eq!(row.phase, RowPhase::Idle);
    assert!(app.monitor.notifications.visible().is_empty());
}

/// Poll the monitor until `done` holds or a few seconds pass.
fn wait_for(monitor: &mut DashboardMonitor, done: impl Fn(&DashboardMonitor) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        monitor.poll_events(Instant::now());
        monitor.tick(Instant::now());
        if done(monitor) {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("timed out waiting for background work");
}

#[test]
fn restart_round_trip_against_mock_service() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "servers": [{"name": "h1", "status": "active", "order": 0}],
                "containers": [{
                    "name": "web", "server": "h1", "image": "nginx",
                    "status": "exited", "ports": []
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/container/h1/web/restart"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Container web restarted"
            })))
            .mount(&server)
            .await;
        server
    });

    let mut monitor = DashboardMonitor::new(Arc::clone(&rt), Config::new(server.uri()));
    monitor.fetch();
    wait_for(&mut monitor, |m| m.store.is_loaded());
    assert_eq!(monitor.store.display().len(), 1);

    let web = RowId::new("h1", "web");
    assert!(monitor.request_action(&web, ContainerAction::Restart).is_none());
    assert!(monitor.dispatcher.row(&web).unwrap().locked());

    wait_for(&mut monitor, |m| !m.notifications.visible().is_empty());
    let note = &monitor.notifications.visible()[0];
    assert_eq!(note.severity, Severity::Success);
    assert_eq!(note.message, "Container web restarted");
    assert_eq!(
        monitor.dispatcher.row(&web).unwrap().status,
        ContainerStatus::Running
    );

    // The delayed refetch lands and restores the service's view of the row.
    wait_for(&mut monitor, |m| {
        m.dispatcher.row(&web).is_some_and(|r| r.status == ContainerStatus::Exited)
    });
}

#[test]
fn failed_action_notifies_error_without_refetch() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "servers": [], "containers": []
            })))
            .expect(0)
            .mount(&server)
            .await;
        server
    });

    let mut config = Config::new(server.uri());
    config.refresh_after_action = Duration::from_millis(50);
    let mut monitor = DashboardMonitor::new(Arc::clone(&rt), config);
    let seq = monitor.store.begin_fetch();
    monitor.handle_event(
        BackendEvent::InventoryLoaded {
            seq,
            result: Ok(single_host(vec![container("db", ContainerStatus::Exited, vec![])])),
        },
        Instant::now(),
    );

    let db = RowId::new("h1", "db");
    assert!(matches!(
        monitor.dispatcher.request(&db, ContainerAction::Start),
        DispatchOutcome::Dispatch(_)
    ));
    monitor.handle_event(
        BackendEvent::ActionCompleted {
            row: db.clone(),
            action: ContainerAction::Start,
            result: Err("Server Error (500): Please try again later".into()),
        },
        Instant::now(),
    );

    let notes = monitor.notifications.visible();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Error);
    assert_eq!(notes[0].message, "Server Error (500): Please try again later");
    let row = monitor.dispatcher.row(&db).unwrap();
    assert_eq!(row.status, ContainerStatus::Exited);
    assert_eq!(row.phase, RowPhase::Idle);
    assert!(!row.locked());

    std::thread::sleep(Duration::from_millis(300));
    assert!(!monitor.poll_events(Instant::now()));
    assert!(!monitor.store.is_busy());
    rt.block_on(server.verify());
}

#[test]
fn log_response_for_closed_or_retargeted_viewer_is_dropped() {
    let rt = runtime();
    let mut monitor = DashboardMonitor::new(Arc::clone(&rt), Config::new("http://127.0.0.1:9"));
    let web = RowId::new("h1", "web");
    let db = RowId::new("h1", "db");

    let mut state = LogViewState::new(web.clone(), 200);
    let web_seq = state.begin_load();
    monitor.log_state = Some(state);
    monitor.close_logs();
    monitor.handle_event(
        BackendEvent::LogsLoaded {
            target: web.clone(),
            seq: web_seq,
            result: Ok("late line".into()),
        },
        Instant::now(),
    );
    assert!(monitor.log_state.is_none());

    let mut state = LogViewState::new(db.clone(), 200);
    let db_seq = state.begin_load();
    monitor.log_state = Some(state);
    monitor.handle_event(
        BackendEvent::LogsLoaded {
            target: web,
            seq: db_seq,
            result: Ok("from web".into()),
        },
        Instant::now(),
    );
    let state = monitor.log_state.as_ref().unwrap();
    assert_eq!(state.target, db);
    assert_eq!(state.content, LogContent::Loading);
    assert!(state.lines.is_empty());

    monitor.handle_event(
        BackendEvent::LogsLoaded {
            target: db.clone(),
            seq: db_seq,
            result: Ok("from db".into()),
        },
        Instant::now(),
    );
    let state = monitor.log_state.as_ref().unwrap();
    assert_eq!(state.content, LogContent::Loaded);
    assert_eq!(state.lines.iter().collect::<Vec<_>>(), vec!["from db"]);
}
