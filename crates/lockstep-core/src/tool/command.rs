//! [`DependencyTool`] implemented by running configured commands

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{DependencyTool, PendingActions};
use crate::action::ActionKind;
use crate::config::ToolSection;
use crate::process::ToolCommand;
use crate::status::ToolOptions;
use crate::{Error, Result};

/// Runs the argv templates from a [`ToolSection`].
///
/// Commands run in the project directory. Probes print `true`/`false`;
/// option and pending-action queries print JSON.
#[derive(Debug, Clone)]
pub struct CommandTool {
    templates: ToolSection,
    project: PathBuf,
}

impl CommandTool {
    pub fn new(templates: ToolSection, project: impl Into<PathBuf>) -> Self {
        Self {
            templates,
            project: project.into(),
        }
    }

    fn render(
        &self,
        call: &str,
        template: &[String],
        vars: &HashMap<&str, String>,
    ) -> Result<ToolCommand> {
        let argv = template
            .iter()
            .map(|arg| substitute_vars(arg, vars))
            .collect();
        ToolCommand::from_argv(argv, &self.project).ok_or_else(|| Error::NotConfigured {
            call: call.to_string(),
        })
    }

    fn probe(&self, call: &str, template: &[String], project: &Path) -> Result<bool> {
        if template.is_empty() {
            return Ok(false);
        }
        let command = self.render(call, template, &project_vars(project))?;
        let stdout = command.output()?;
        Ok(stdout.trim().eq_ignore_ascii_case("true"))
    }
}

impl DependencyTool for CommandTool {
    fn is_available(&self) -> bool {
        match self.probe("available", &self.templates.available, &self.project) {
            Ok(available) => available,
            Err(e) => {
                tracing::debug!("Dependency tool unavailable: {}", e);
                false
            }
        }
    }

    fn has_build_tools(&self) -> bool {
        self.probe("build_tools", &self.templates.build_tools, &self.project)
            .unwrap_or_else(|e| {
                tracing::debug!("Build tools probe failed: {}", e);
                false
            })
    }

    fn install(&self) -> Result<()> {
        let vars = project_vars(&self.project);
        let command = self.render("install", &self.templates.install, &vars)?;
        command.output()?;
        Ok(())
    }

    fn is_packified(&self, project: &Path) -> Result<bool> {
        self.probe("packified", &self.templates.packified, project)
    }

    fn is_mode_on(&self, project: &Path) -> Result<bool> {
        self.probe("mode_on", &self.templates.mode_on, project)
    }

    fn options(&self, project: &Path) -> Result<ToolOptions> {
        if self.templates.options.is_empty() {
            return Ok(ToolOptions::default());
        }
        let command = self.render("options", &self.templates.options, &project_vars(project))?;
        let stdout = command.output()?;
        serde_json::from_str(stdout.trim()).map_err(|e| Error::ToolOutput {
            command: command.display(),
            message: e.to_string(),
        })
    }

    fn pending_actions(&self, action: ActionKind, project: &Path) -> Result<PendingActions> {
        if self.templates.pending_actions.is_empty() {
            return Ok(Vec::new());
        }
        let mut vars = project_vars(project);
        vars.insert("ACTION", action.as_str().to_string());
        let command = self.render("pending_actions", &self.templates.pending_actions, &vars)?;

        let stdout = command.output()?;
        parse_pending_actions(&stdout).map_err(|message| Error::ToolOutput {
            command: command.display(),
            message,
        })
    }

    fn snapshot_command(&self, project: &Path) -> Result<ToolCommand> {
        self.render("snapshot", &self.templates.snapshot, &project_vars(project))
    }

    fn bootstrap(&self, dir: &Path, enter: bool, restart: bool) -> Result<()> {
        let mut vars = project_vars(&self.project);
        vars.insert("DIR", dir.display().to_string());
        vars.insert("ENTER", r_bool(enter));
        vars.insert("RESTART", r_bool(restart));

        let command = self.render("bootstrap", &self.templates.bootstrap, &vars)?;
        command.output()?;
        Ok(())
    }
}

fn project_vars(project: &Path) -> HashMap<&'static str, String> {
    HashMap::from([("PROJECT", project.display().to_string())])
}

fn r_bool(value: bool) -> String {
    if value { "TRUE" } else { "FALSE" }.to_string()
}

/// Substitute `${VAR_NAME}` patterns in a string
fn substitute_vars(input: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = input.to_string();
    for (key, value) in vars {
        let pattern = format!("${{{}}}", key);
        result = result.replace(&pattern, value);
    }
    result
}

/// Blank output, `null` and `{}` mean nothing is pending; otherwise a JSON array.
///
/// `{}` is how `jsonlite` renders an R `NULL`.
fn parse_pending_actions(stdout: &str) -> std::result::Result<PendingActions, String> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(trimmed).map_err(|e| e.to_string())? {
        Value::Null => Ok(Vec::new()),
        Value::Object(fields) if fields.is_empty() => Ok(Vec::new()),
        Value::Array(items) => Ok(items),
        other => Err(format!("expected a JSON array, got {other}")),
    }
}
