//! End-to-end reconciliation scenarios
//!
//! Each test opens a real session over a temporary project whose dependency
//! tool is scripted with `sh`, so snapshots run as real subprocesses.

#![cfg(unix)]

use lockstep_core::{
    ControlEvent, FileChange, HashState, ProjectSession, Reaction, RequestOutcome, TrackedEntity,
};
use lockstep_fs::compute_content_checksum;
use lockstep_test_utils::TestProject;
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(20);

/// Snapshot waits for a `go` file so tests control when it exits.
const GATED_TOOL: &str = r#"
[tool]
available = ["sh", "-c", "echo TRUE"]
packified = ["sh", "-c", "echo TRUE"]
mode_on = ["sh", "-c", "echo TRUE"]
options = ["sh", "-c", "echo '{}'"]
pending_actions = ["sh", "-c", "if [ -f pending-${ACTION} ]; then cat pending-${ACTION}; else echo '[]'; fi"]
snapshot = ["sh", "-c", "while [ ! -f go ]; do sleep 0.02; done; rm go; echo '# snapshot' >> packrat/packrat.lock"]
bootstrap = []
"#;

struct Fixture {
    project: TestProject,
    session: ProjectSession,
    refreshes: Rc<Cell<usize>>,
}

impl Fixture {
    fn new(setup: impl FnOnce(&TestProject)) -> Self {
        let project = TestProject::new();
        project.write_config(GATED_TOOL);
        setup(&project);

        let refreshes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&refreshes);
        let session = ProjectSession::open_with_notifier(
            project.root(),
            Box::new(move || counter.set(counter.get() + 1)),
        )
        .unwrap();

        Self {
            project,
            session,
            refreshes,
        }
    }

    fn changed(&mut self, path: PathBuf) {
        self.session
            .dispatch(ControlEvent::FilesChanged(vec![FileChange::new(path)]));
    }

    fn release_snapshot(&self) {
        std::fs::write(self.project.root().join("go"), "").unwrap();
    }

    fn hash(&self, entity: TrackedEntity, state: HashState) -> String {
        self.session.engine().hashes().get(entity, state)
    }

    /// Dispatch events until `done` holds.
    fn drive_until(&mut self, done: impl Fn(&ProjectSession) -> bool) {
        let deadline = Instant::now() + TIMEOUT;
        while !done(&self.session) {
            assert!(Instant::now() < deadline, "timed out driving the session");
            self.session.process_next(Duration::from_millis(100));
        }
    }
}

fn settled(project: &TestProject) {
    project.write_lockfile("Packages: a\n");
    project.install_package("a", "Package: a\nVersion: 1.0\n");
}

#[test]
fn missing_lockfile_reads_as_resolved() {
    let fixture = Fixture::new(|_| {});

    assert!(!fixture.session.is_monitoring());
    assert_eq!(fixture.hash(TrackedEntity::Lockfile, HashState::Computed), "");
    assert!(!fixture
        .session
        .engine()
        .hashes()
        .is_unresolved(TrackedEntity::Lockfile));
}

#[test]
fn first_lockfile_change_is_observed_once() {
    let mut fixture = Fixture::new(|p| p.write_lockfile("X"));
    let lockfile = fixture.project.lockfile_path();

    fixture.changed(lockfile.clone());
    assert_eq!(
        fixture.hash(TrackedEntity::Lockfile, HashState::Observed),
        compute_content_checksum(b"X")
    );
    assert_eq!(fixture.refreshes.get(), 1);

    fixture.changed(lockfile);
    assert_eq!(fixture.refreshes.get(), 1);
}

#[test]
fn library_change_snapshots_and_resolves_both_entities() {
    let mut fixture = Fixture::new(settled);

    let manifest = fixture.project.install_package("b", "Package: b\n");
    fixture.changed(manifest.clone());
    assert_eq!(fixture.session.engine().scheduler().current_run(), Some(1));

    // Same target while running never starts a second subprocess
    fixture.changed(manifest);
    assert_eq!(fixture.session.engine().scheduler().state().pending(), 0);

    fixture.release_snapshot();
    fixture.drive_until(|s| s.engine().scheduler().is_idle());

    for entity in TrackedEntity::ALL {
        assert_eq!(
            fixture.hash(entity, HashState::Resolved),
            fixture.hash(entity, HashState::Computed),
            "{entity} not resolved"
        );
    }
    let lockfile = std::fs::read_to_string(fixture.project.lockfile_path()).unwrap();
    assert!(lockfile.ends_with("# snapshot\n"));
}

#[test]
fn library_change_during_outstanding_restore_does_not_snapshot() {
    let mut fixture = Fixture::new(settled);
    fixture
        .session
        .engine_mut()
        .resolve_after(lockstep_core::ActionKind::Restore, TrackedEntity::Lockfile);

    // A pulled lockfile makes a restore outstanding
    fixture.project.write_lockfile("Packages: a, b\n");
    fixture.changed(fixture.project.lockfile_path());
    assert!(fixture
        .session
        .engine()
        .hashes()
        .is_unresolved(TrackedEntity::Lockfile));
    let before = fixture.refreshes.get();

    let manifest = fixture.project.install_package("c", "Package: c\n");
    fixture.changed(manifest);

    assert!(fixture.session.engine().scheduler().is_idle());
    assert_eq!(fixture.refreshes.get(), before + 1);
}

#[test]
fn queued_request_reruns_against_freshest_hash() {
    let mut fixture = Fixture::new(settled);

    let b = fixture.project.install_package("b", "Package: b\n");
    fixture.changed(b);
    let h1 = fixture.hash(TrackedEntity::Library, HashState::Computed);
    assert_eq!(
        fixture.session.engine().scheduler().state().target(),
        Some(h1.as_str())
    );

    fixture.project.install_package("c", "Package: c\n");
    let outcome = fixture.session.engine_mut().check_and_notify(TrackedEntity::Library);
    assert_eq!(outcome, Reaction::Snapshot(RequestOutcome::Queued(1)));
    assert_eq!(fixture.session.engine().scheduler().state().target(), Some(h1.as_str()));

    // Moves again before the first run exits; watcher event not yet delivered
    fixture.project.install_package("d", "Package: d\n");
    let fresh = fixture.hash(TrackedEntity::Library, HashState::Computed);

    fixture.release_snapshot();
    fixture.drive_until(|s| s.engine().scheduler().current_run() == Some(2));
    assert_eq!(
        fixture.session.engine().scheduler().state().target(),
        Some(fresh.as_str())
    );

    fixture.release_snapshot();
    fixture.drive_until(|s| s.engine().scheduler().is_idle());
    assert_eq!(
        fixture.hash(TrackedEntity::Library, HashState::Resolved),
        fresh
    );
}

#[test]
fn pending_actions_keep_state_unresolved() {
    let mut fixture = Fixture::new(settled);
    std::fs::write(
        fixture.project.root().join("pending-snapshot"),
        r#"[{"package": "b", "action": "add"}]"#,
    )
    .unwrap();

    let manifest = fixture.project.install_package("b", "Package: b\n");
    fixture.changed(manifest);
    fixture.release_snapshot();
    fixture.drive_until(|s| s.engine().scheduler().is_idle());

    assert_eq!(fixture.hash(TrackedEntity::Library, HashState::Resolved), "");

    let status = fixture.session.status();
    assert_eq!(
        status.snapshot_actions,
        vec![serde_json::json!({"package": "b", "action": "add"})]
    );
}

#[test]
fn failed_snapshot_is_not_resolved() {
    let mut fixture = Fixture::new(|p| {
        settled(p);
        p.write_config(&GATED_TOOL.replace("rm go; echo", "rm go; exit 3; echo"));
    });

    let manifest = fixture.project.install_package("b", "Package: b\n");
    fixture.changed(manifest);
    fixture.release_snapshot();
    fixture.drive_until(|s| s.engine().scheduler().is_idle());

    assert_eq!(fixture.hash(TrackedEntity::Library, HashState::Resolved), "");
    let lockfile = std::fs::read_to_string(fixture.project.lockfile_path()).unwrap();
    assert_eq!(lockfile, "Packages: a\n");
}

#[test]
fn lifecycle_events_arrive_from_other_threads() {
    let mut fixture = Fixture::new(settled);
    let sender = fixture.session.sender();
    let root = fixture.project.root().to_path_buf();

    let handle = std::thread::spawn(move || {
        for running in [true, false] {
            sender
                .send(ControlEvent::ActionLifecycle {
                    project: root.clone(),
                    action: "snapshot".into(),
                    running,
                })
                .unwrap();
        }
    });
    handle.join().unwrap();

    assert_eq!(fixture.session.pump(), 2);
    assert!(!fixture.session.engine().lifecycle().is_active());
    for entity in TrackedEntity::ALL {
        assert_eq!(
            fixture.hash(entity, HashState::Resolved),
            fixture.hash(entity, HashState::Computed)
        );
    }
}

#[test]
fn state_persists_across_sessions() {
    let mut fixture = Fixture::new(|p| p.write_lockfile("X"));
    fixture.changed(fixture.project.lockfile_path());
    let observed = fixture.hash(TrackedEntity::Lockfile, HashState::Observed);

    let reopened = ProjectSession::open(fixture.project.root()).unwrap();
    assert_eq!(
        reopened
            .engine()
            .hashes()
            .get(TrackedEntity::Lockfile, HashState::Observed),
        observed
    );
    fixture
        .project
        .assert_file_exists(".lockstep/state.json");
}
