//! Test doubles shared by the unit tests

use std::cell::{Cell, RefCell, RefMut};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc;

use lockstep_fs::{MemoryStore, ProjectLayout};
use lockstep_test_utils::TestProject;

use crate::action::ActionKind;
use crate::event::{EventSender, RunId};
use crate::hash::{HashComputer, HashStateStore};
use crate::process::{ProcessRunner, ToolCommand};
use crate::reconcile::ReconciliationEngine;
use crate::signal::ChangeNotifier;
use crate::status::ToolOptions;
use crate::tool::{DependencyTool, PendingActions};
use crate::{Error, Result};

#[derive(Debug, Default)]
pub struct FakeToolState {
    pub available: bool,
    pub build_tools: bool,
    pub packified: bool,
    pub mode_on: bool,
    pub options: ToolOptions,
    pub pending: HashMap<ActionKind, PendingActions>,
    pub pending_fails: bool,
    pub queries: Vec<ActionKind>,
    pub bootstraps: Vec<(PathBuf, bool, bool)>,
    pub installs: usize,
    pub install_fails: bool,
}

/// In-memory [`DependencyTool`]; clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeTool {
    state: Rc<RefCell<FakeToolState>>,
}

impl FakeTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tool reporting a tracked project with tracking mode on.
    pub fn tracking() -> Self {
        let tool = Self::new();
        {
            let mut state = tool.state();
            state.available = true;
            state.packified = true;
            state.mode_on = true;
        }
        tool
    }

    pub fn state(&self) -> RefMut<'_, FakeToolState> {
        self.state.borrow_mut()
    }

    pub fn set_pending(&self, action: ActionKind, actions: PendingActions) {
        self.state().pending.insert(action, actions);
    }

    pub fn queries(&self) -> Vec<ActionKind> {
        self.state().queries.clone()
    }
}

impl DependencyTool for FakeTool {
    fn is_available(&self) -> bool {
        self.state().available
    }

    fn has_build_tools(&self) -> bool {
        self.state().build_tools
    }

    fn install(&self) -> Result<()> {
        let mut state = self.state();
        state.installs += 1;
        if state.install_fails {
            return Err(Error::ToolFailed {
                command: "install".into(),
                code: 1,
                stderr: "no repository".into(),
            });
        }
        state.available = true;
        Ok(())
    }

    fn is_packified(&self, _project: &Path) -> Result<bool> {
        Ok(self.state().packified)
    }

    fn is_mode_on(&self, _project: &Path) -> Result<bool> {
        Ok(self.state().mode_on)
    }

    fn options(&self, _project: &Path) -> Result<ToolOptions> {
        Ok(self.state().options)
    }

    fn pending_actions(&self, action: ActionKind, _project: &Path) -> Result<PendingActions> {
        let mut state = self.state();
        state.queries.push(action);
        if state.pending_fails {
            return Err(Error::ToolFailed {
                command: "pending".into(),
                code: 1,
                stderr: "broken".into(),
            });
        }
        Ok(state.pending.get(&action).cloned().unwrap_or_default())
    }

    fn snapshot_command(&self, project: &Path) -> Result<ToolCommand> {
        Ok(ToolCommand::new("snapshot", Vec::new(), project))
    }

    fn bootstrap(&self, dir: &Path, enter: bool, restart: bool) -> Result<()> {
        self.state()
            .bootstraps
            .push((dir.to_path_buf(), enter, restart));
        Ok(())
    }
}

/// [`ProcessRunner`] that records launches without running anything.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    started: Rc<RefCell<Vec<(RunId, ToolCommand)>>>,
    fail: Rc<Cell<bool>>,
}

impl RecordingRunner {
    pub fn runs(&self) -> Vec<RunId> {
        self.started.borrow().iter().map(|(run, _)| *run).collect()
    }

    pub fn fail_starts(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl ProcessRunner for RecordingRunner {
    fn start(&mut self, run: RunId, command: ToolCommand, _events: EventSender) -> Result<()> {
        if self.fail.get() {
            return Err(Error::Io(std::io::Error::other("spawn failed")));
        }
        self.started.borrow_mut().push((run, command));
        Ok(())
    }
}

/// Counts "installed packages changed" signals.
#[derive(Debug, Clone, Default)]
pub struct CountingNotifier {
    count: Rc<Cell<usize>>,
}

impl CountingNotifier {
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl ChangeNotifier for CountingNotifier {
    fn installed_packages_changed(&self) {
        self.count.set(self.count.get() + 1);
    }
}

/// Handles onto the doubles wired into an engine.
pub struct Fixture {
    pub tool: FakeTool,
    pub runner: RecordingRunner,
    pub notifier: CountingNotifier,
}

/// An engine over `project` with in-memory state and fake collaborators.
pub fn engine_for(project: &TestProject) -> (ReconciliationEngine, Fixture) {
    let layout = ProjectLayout::new(project.root());
    let hashes = HashStateStore::new(Box::new(MemoryStore::new()), HashComputer::new(&layout));
    let (tx, _rx) = mpsc::channel();

    let fixture = Fixture {
        tool: FakeTool::new(),
        runner: RecordingRunner::default(),
        notifier: CountingNotifier::default(),
    };
    let engine = ReconciliationEngine::new(
        project.root(),
        hashes,
        Box::new(fixture.tool.clone()),
        Box::new(fixture.runner.clone()),
        Box::new(fixture.notifier.clone()),
        tx,
    );
    (engine, fixture)
}
