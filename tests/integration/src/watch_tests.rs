//! File watching through the `notify` bridge

#![cfg(unix)]

use lockstep_core::{NotifyWatcher, ProjectSession};
use lockstep_test_utils::TestProject;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(20);

/// Tracked project whose tool cannot snapshot.
const INERT_TOOL: &str = r#"
[tool]
available = ["sh", "-c", "echo TRUE"]
packified = ["sh", "-c", "echo TRUE"]
mode_on = ["sh", "-c", "echo TRUE"]
options = []
pending_actions = []
snapshot = []
bootstrap = []
"#;

fn open(project: &TestProject) -> (ProjectSession, Rc<Cell<usize>>) {
    let refreshes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&refreshes);
    let session = ProjectSession::open_with_notifier(
        project.root(),
        Box::new(move || counter.set(counter.get() + 1)),
    )
    .unwrap();
    (session, refreshes)
}

#[test]
fn watched_lockfile_edit_refreshes() {
    let project = TestProject::new();
    project.write_config(INERT_TOOL);
    project.write_lockfile("Packages: a\n");

    let (mut session, refreshes) = open(&project);
    let watcher = NotifyWatcher::new(project.root());
    assert!(session.start_monitoring(Box::new(watcher)).unwrap());

    // Give the backend a moment to register before mutating
    std::thread::sleep(Duration::from_millis(200));
    project.write_lockfile("Packages: a, b\n");

    let deadline = Instant::now() + TIMEOUT;
    while refreshes.get() == 0 {
        assert!(Instant::now() < deadline, "no refresh after lockfile edit");
        session.process_next(Duration::from_millis(100));
    }

    // Later echoes of the same edit are absorbed
    std::thread::sleep(Duration::from_millis(200));
    session.pump();
    assert_eq!(refreshes.get(), 1);
}

#[test]
fn watching_requires_tracking_mode() {
    let project = TestProject::new();
    let config = INERT_TOOL.replace(r#"mode_on = ["sh", "-c", "echo TRUE"]"#, "mode_on = []");
    project.write_config(&config);
    project.write_lockfile("Packages: a\n");

    let (mut session, _refreshes) = open(&project);
    let watcher = NotifyWatcher::new(project.root());
    assert!(!session.start_monitoring(Box::new(watcher)).unwrap());
}

#[test]
fn watching_requires_a_lockfile() {
    let project = TestProject::new();
    project.write_config(INERT_TOOL);

    let (mut session, _refreshes) = open(&project);
    let watcher = NotifyWatcher::new(project.root());
    assert!(!session.start_monitoring(Box::new(watcher)).unwrap());
}
