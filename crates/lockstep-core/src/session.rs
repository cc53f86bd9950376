//! Per-project reconciliation context and its control loop

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use lockstep_fs::{FileStore, PersistentStore, ProjectLayout};

use crate::Result;
use crate::config::LockstepConfig;
use crate::event::{ControlEvent, EventSender, OutputStream};
use crate::hash::{HashComputer, HashStateStore};
use crate::process::{ProcessRunner, SubprocessRunner};
use crate::reconcile::ReconciliationEngine;
use crate::signal::{ChangeNotifier, LogNotifier};
use crate::status::{BootstrapRequest, ProjectStatus, ToolContext, ToolOptions, ToolPrerequisites};
use crate::tool::{CommandTool, DependencyTool};
use crate::watcher::{ChangeClassifier, ChangeSource};

/// Reconciliation context for one open project.
///
/// Created when a project is opened and dropped when it closes, so several
/// projects can be tracked side by side. Other threads talk to it through
/// [`sender`](Self::sender); only the owning thread dispatches.
pub struct ProjectSession {
    layout: ProjectLayout,
    engine: ReconciliationEngine,
    classifier: ChangeClassifier,
    sender: EventSender,
    receiver: Receiver<ControlEvent>,
    monitoring: bool,
    shutdown: bool,
    sources: Vec<Box<dyn ChangeSource>>,
}

impl ProjectSession {
    /// Open the project at `root` with its configured tool commands.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file or the state file cannot be read.
    pub fn open(root: &Path) -> Result<Self> {
        Self::open_with_notifier(root, Box::new(LogNotifier))
    }

    /// Like [`open`](Self::open), delivering refresh signals to `notifier`.
    pub fn open_with_notifier(root: &Path, notifier: Box<dyn ChangeNotifier>) -> Result<Self> {
        let config = LockstepConfig::load(root)?;
        let layout = config.layout(root);
        let store = FileStore::open(layout.state_path())?;
        let tool = CommandTool::new(config.tool, root);

        Ok(Self::new(
            layout,
            Box::new(store),
            Box::new(tool),
            Box::new(SubprocessRunner::new()),
            notifier,
        ))
    }

    /// Assemble a session from its collaborators.
    ///
    /// File changes are reconciled only if tracking mode is on and the
    /// lockfile exists at this point.
    pub fn new(
        layout: ProjectLayout,
        store: Box<dyn PersistentStore>,
        tool: Box<dyn DependencyTool>,
        runner: Box<dyn ProcessRunner>,
        notifier: Box<dyn ChangeNotifier>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        let hashes = HashStateStore::new(store, HashComputer::new(&layout));
        let engine = ReconciliationEngine::new(
            layout.root(),
            hashes,
            tool,
            runner,
            notifier,
            sender.clone(),
        );

        let mode_on = tool_context(engine.tool(), layout.root()).mode_on;
        let has_lockfile = layout.lockfile_path().exists();
        let monitoring = mode_on && has_lockfile;
        if !monitoring {
            tracing::debug!(
                root = %layout.root().display(),
                mode_on,
                has_lockfile,
                "Monitoring disabled"
            );
        }

        Self {
            classifier: ChangeClassifier::new(&layout),
            layout,
            engine,
            sender,
            receiver,
            monitoring,
            shutdown: false,
            sources: Vec::new(),
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ReconciliationEngine {
        &mut self.engine
    }

    /// Whether file changes are being reconciled.
    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Subscribe `source` if monitoring is enabled. Returns whether it was.
    pub fn start_monitoring(&mut self, mut source: Box<dyn ChangeSource>) -> Result<bool> {
        if !self.monitoring {
            return Ok(false);
        }
        source.subscribe(self.sender())?;
        self.sources.push(source);
        Ok(true)
    }

    /// Apply one event. Returns `false` for [`ControlEvent::Shutdown`].
    pub fn dispatch(&mut self, event: ControlEvent) -> bool {
        match event {
            ControlEvent::FilesChanged(changes) => {
                if !self.monitoring {
                    return true;
                }
                for entity in self.classifier.classify_batch(&changes) {
                    tracing::debug!(%entity, "Detected change to {}", entity);
                    self.engine.check_and_notify(entity);
                }
            }
            ControlEvent::ActionLifecycle {
                project,
                action,
                running,
            } => {
                self.engine.on_action_event(&project, &action, running);
            }
            ControlEvent::ProcessOutput { run, stream, line } => match stream {
                OutputStream::Stdout => tracing::debug!(run, "(auto snapshot) {}", line),
                OutputStream::Stderr => tracing::debug!(run, "(auto snapshot) stderr: {}", line),
            },
            ControlEvent::ProcessExited { run, code } => {
                self.engine.on_process_exited(run, code);
            }
            ControlEvent::Shutdown => {
                self.shutdown = true;
                return false;
            }
        }
        true
    }

    /// Dispatch everything already queued. Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while !self.shutdown {
            match self.receiver.try_recv() {
                Ok(event) => {
                    handled += 1;
                    self.dispatch(event);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        handled
    }

    /// Wait up to `timeout` for one event and dispatch it.
    ///
    /// Returns `false` on timeout or once shut down.
    pub fn process_next(&mut self, timeout: Duration) -> bool {
        if self.shutdown {
            return false;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => self.dispatch(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Dispatch events until [`ControlEvent::Shutdown`] arrives.
    pub fn run(&mut self) {
        while !self.shutdown {
            match self.receiver.recv() {
                Ok(event) => {
                    self.dispatch(event);
                }
                Err(_) => break,
            }
        }
        tracing::debug!(root = %self.layout.root().display(), "Control loop stopped");
    }

    /// Dispatch events until no snapshot is running or `timeout` passes.
    ///
    /// Returns whether the scheduler went idle.
    pub fn wait_for_snapshot(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.engine.scheduler().is_idle() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.process_next(remaining) {
                return self.engine.scheduler().is_idle();
            }
        }
        true
    }

    /// Whether dependency tracking applies to this project right now.
    pub fn context(&self) -> ToolContext {
        tool_context(self.engine.tool(), self.layout.root())
    }

    /// Current status, with pending actions when the project is tracked.
    pub fn status(&mut self) -> ProjectStatus {
        let context = self.context();
        let mut status = ProjectStatus {
            context,
            ..Default::default()
        };

        if context.packified {
            status.options = match self.engine.tool().options(self.layout.root()) {
                Ok(options) => options,
                Err(e) => {
                    tracing::error!("Failed to read tool options: {}", e);
                    ToolOptions::default()
                }
            };
            self.engine.annotate(&mut status);
        }
        status
    }

    /// Put a directory under dependency tracking.
    ///
    /// Relative directories are resolved against the project root.
    pub fn bootstrap(&mut self, request: &BootstrapRequest) -> Result<()> {
        let dir = self.resolve_dir(&request.dir);
        tracing::info!(dir = %dir.display(), enter = request.enter, "Bootstrapping");

        self.engine
            .tool()
            .bootstrap(&dir, request.enter, false)
            .inspect_err(|e| tracing::error!(dir = %dir.display(), "Bootstrap failed: {}", e))
    }

    /// What installing the dependency tool needs.
    pub fn prerequisites(&self) -> ToolPrerequisites {
        let tool = self.engine.tool();
        ToolPrerequisites {
            build_tools_available: tool.has_build_tools(),
            package_available: tool.is_available(),
        }
    }

    /// Install the dependency tool.
    pub fn install_tool(&self) -> Result<()> {
        tracing::info!("Installing dependency tool");
        self.engine
            .tool()
            .install()
            .inspect_err(|e| tracing::error!("Tool install failed: {}", e))
    }

    fn resolve_dir(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.layout.root().join(dir)
        }
    }
}

fn tool_context(tool: &dyn DependencyTool, root: &Path) -> ToolContext {
    let available = tool.is_available();
    let applicable = available;
    let packified = applicable && probe("packified", tool.is_packified(root));
    let mode_on = packified && probe("mode_on", tool.is_mode_on(root));

    ToolContext {
        available,
        applicable,
        packified,
        mode_on,
    }
}

fn probe(name: &str, result: Result<bool>) -> bool {
    result.unwrap_or_else(|e| {
        tracing::error!("Tool probe '{}' failed: {}", name, e);
        false
    })
}
