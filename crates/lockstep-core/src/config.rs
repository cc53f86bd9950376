//! Project configuration parsed from `.lockstep/config.toml`
//!
//! Every section is optional; a missing file means the packrat defaults.

use lockstep_fs::ProjectLayout;
use lockstep_fs::constants::{ProjectPath, RESERVED_LIBRARY_DIRS};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

fn default_lockfile() -> String {
    ProjectPath::Lockfile.as_str().to_string()
}

fn default_library() -> String {
    ProjectPath::Library.as_str().to_string()
}

fn default_reserved() -> Vec<String> {
    RESERVED_LIBRARY_DIRS.iter().map(|s| s.to_string()).collect()
}

fn rscript(expr: &str) -> Vec<String> {
    vec!["Rscript".to_string(), "-e".to_string(), expr.to_string()]
}

/// Where the lockfile and library live, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSection {
    #[serde(default = "default_lockfile")]
    pub lockfile: String,
    #[serde(default = "default_library")]
    pub library: String,
    /// Library subdirectories ignored by change detection
    #[serde(default = "default_reserved")]
    pub reserved: Vec<String>,
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            lockfile: default_lockfile(),
            library: default_library(),
            reserved: default_reserved(),
        }
    }
}

/// Argv templates for each call into the dependency tool.
///
/// `${PROJECT}`, `${ACTION}`, `${DIR}`, `${ENTER}` and `${RESTART}` are
/// substituted in every argument. An empty template disables the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSection {
    pub available: Vec<String>,
    pub packified: Vec<String>,
    pub mode_on: Vec<String>,
    pub options: Vec<String>,
    pub pending_actions: Vec<String>,
    pub snapshot: Vec<String>,
    pub bootstrap: Vec<String>,
    /// Probe for a compiler toolchain able to build packages from source
    pub build_tools: Vec<String>,
    pub install: Vec<String>,
}

impl Default for ToolSection {
    fn default() -> Self {
        Self {
            available: rscript(
                "cat(requireNamespace('packrat', quietly = TRUE) && \
                 utils::packageVersion('packrat') >= '0.2.0.109')",
            ),
            packified: rscript("cat(packrat:::checkPackified(project = '${PROJECT}', silent = TRUE))"),
            mode_on: rscript(
                "cat(file.exists(file.path('${PROJECT}', 'packrat', 'init.R')) && \
                 any(grepl('packrat/init.R', readLines(file.path('${PROJECT}', '.Rprofile')), fixed = TRUE)))",
            ),
            options: rscript(
                "cat(jsonlite::toJSON(packrat::get_opts(simplify = FALSE, project = '${PROJECT}'), \
                 auto_unbox = TRUE))",
            ),
            pending_actions: rscript(
                "cat(jsonlite::toJSON(packrat:::pendingActions('${ACTION}', '${PROJECT}'), \
                 auto_unbox = TRUE))",
            ),
            snapshot: rscript(
                "packrat:::snapshotImpl(project = '${PROJECT}', auto.snapshot = TRUE, \
                 verbose = FALSE, prompt = FALSE)",
            ),
            bootstrap: rscript(
                "packrat:::bootstrap(project = '${DIR}', enter = ${ENTER}, restart = ${RESTART})",
            ),
            build_tools: rscript("cat(nzchar(Sys.which('make')))"),
            install: rscript(
                "utils::install.packages('packrat', repos = 'https://cloud.r-project.org')",
            ),
        }
    }
}

/// Parsed `.lockstep/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockstepConfig {
    #[serde(default)]
    pub layout: LayoutSection,
    #[serde(default)]
    pub tool: ToolSection,
}

impl LockstepConfig {
    /// Parse a configuration from TOML content.
    ///
    /// # Example
    ///
    /// ```
    /// use lockstep_core::LockstepConfig;
    ///
    /// let config = LockstepConfig::parse(r#"
    /// [layout]
    /// lockfile = "deps/deps.lock"
    /// "#).unwrap();
    ///
    /// assert_eq!(config.layout.lockfile, "deps/deps.lock");
    /// assert_eq!(config.layout.library, "packrat/lib");
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let config: LockstepConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration for the project at `root`.
    ///
    /// Returns defaults if the project has no configuration file.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(ProjectPath::ConfigFile);
        if !path.exists() {
            return Ok(Self::default());
        }
        tracing::debug!(?path, "Loading project config");
        let content = lockstep_fs::io::read_text(&path)?;
        Self::parse(&content)
    }

    /// Resolve the configured layout against `root`.
    pub fn layout(&self, root: &Path) -> ProjectLayout {
        ProjectLayout::with_paths(
            root,
            &self.layout.lockfile,
            &self.layout.library,
            self.layout.reserved.clone(),
        )
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("layout.lockfile", &self.layout.lockfile),
            ("layout.library", &self.layout.library),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config {
                    message: format!("{name} must not be empty"),
                });
            }
            if Path::new(value).is_absolute() {
                return Err(Error::Config {
                    message: format!("{name} must be relative to the project root, got {value}"),
                });
            }
        }
        Ok(())
    }
}
