//! Command bindings for the host's command palette.
//!
//! Each entry in `preferences.commands` becomes a [`CommandBinding`] once it is
//! matched against the live projects. Entries that point at a project or view
//! that no longer exists are skipped, not reported: the command simply stops
//! being offered until the user toggles it again.

use tracing::debug;

use crate::model::{Command, SettingsDocument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBinding {
    /// Stable identifier, derived from the project and view ids.
    pub id: String,
    /// Display name shown in the palette.
    pub name: String,
    pub command: Command,
}

pub fn command_bindings(doc: &SettingsDocument) -> Vec<CommandBinding> {
    doc.preferences
        .commands
        .iter()
        .filter_map(|command| bind(doc, command))
        .collect()
}

fn bind(doc: &SettingsDocument, command: &Command) -> Option<CommandBinding> {
    let Some(project) = doc.project(&command.project) else {
        debug!(project = %command.project, "skipping command for unknown project");
        return None;
    };

    match &command.view {
        None => Some(CommandBinding {
            id: format!("show:{}", project.id),
            name: format!("Show project: {}", project.name),
            command: command.clone(),
        }),
        Some(view_id) => {
            let Some(view) = project.view(view_id) else {
                debug!(project = %project.id, view = %view_id, "skipping command for unknown view");
                return None;
            };
            Some(CommandBinding {
                id: format!("show:{}:{}", project.id, view.id),
                name: format!("Show view: {} > {}", project.name, view.name),
                command: command.clone(),
            })
        }
    }
}
