//! # Editor Operations
//!
//! The settings editor is a thin UI over these functions. Each one takes the
//! current [`Preferences`] by reference and returns a new value. Nothing is
//! mutated in place, so whoever still holds the previous value keeps seeing a
//! consistent snapshot. The caller hands the result to
//! [`crate::store::SettingsStore::update_preferences`].
//!
//! Text inputs follow the editor's lenient parsing: a leading integer is read
//! from the text, and anything that yields no positive number falls back to
//! the field default.
//!
//! Command toggles are add-if-absent / remove-if-present, which is what keeps
//! `commands` free of duplicates.

use crate::model::{
    Command, Preferences, QuoteStrings, SettingsDocument, DEFAULT_PROJECT_SIZE_LIMIT,
    DEFAULT_PROJECT_VIEW_LIMIT,
};

pub fn set_project_view_limit(prefs: &Preferences, input: &str) -> Preferences {
    Preferences {
        project_view_limit: parse_limit(input).unwrap_or(DEFAULT_PROJECT_VIEW_LIMIT),
        ..prefs.clone()
    }
}

pub fn set_project_size_limit(prefs: &Preferences, input: &str) -> Preferences {
    Preferences {
        project_size_limit: parse_limit(input).unwrap_or(DEFAULT_PROJECT_SIZE_LIMIT),
        ..prefs.clone()
    }
}

/// Only the two known names are accepted; anything else leaves the
/// preferences as they were.
pub fn set_quote_strings(prefs: &Preferences, value: &str) -> Preferences {
    let mut next = prefs.clone();
    if let Some(quote_strings) = QuoteStrings::parse(value) {
        next.frontmatter.quote_strings = quote_strings;
    }
    next
}

pub fn has_command(prefs: &Preferences, command: &Command) -> bool {
    prefs.commands.contains(command)
}

/// Enable or disable a command.
pub fn toggle_command(prefs: &Preferences, command: &Command, enabled: bool) -> Preferences {
    let mut next = prefs.clone();
    if enabled {
        if !next.commands.contains(command) {
            next.commands.push(command.clone());
        }
    } else {
        next.commands.retain(|c| c != command);
    }
    next
}

pub fn toggle_project_command(prefs: &Preferences, project: &str, enabled: bool) -> Preferences {
    toggle_command(prefs, &Command::project(project), enabled)
}

pub fn toggle_view_command(
    prefs: &Preferences,
    project: &str,
    view: &str,
    enabled: bool,
) -> Preferences {
    toggle_command(prefs, &Command::view(project, view), enabled)
}

/// What a toggle row in the commands section refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleTarget {
    Project,
    View,
}

/// One row of the commands section: a project, then each of its views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandToggle {
    pub label: String,
    pub target: ToggleTarget,
    pub command: Command,
    pub enabled: bool,
}

/// Build the commands section for `doc`, in project order.
pub fn command_toggles(doc: &SettingsDocument) -> Vec<CommandToggle> {
    let prefs = &doc.preferences;
    let mut toggles = Vec::new();

    for project in &doc.projects {
        let command = Command::project(project.id.clone());
        toggles.push(CommandToggle {
            label: project.name.clone(),
            target: ToggleTarget::Project,
            enabled: has_command(prefs, &command),
            command,
        });

        for view in &project.views {
            let command = Command::view(project.id.clone(), view.id.clone());
            toggles.push(CommandToggle {
                label: format!("{}: {}", project.name, view.name),
                target: ToggleTarget::View,
                enabled: has_command(prefs, &command),
                command,
            });
        }
    }
    toggles
}

/// Leading-integer parse of a text field. Zero, negative and unparsable input
/// yield `None`.
fn parse_limit(input: &str) -> Option<u64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: u64 = digits[..end].parse().ok()?;
    if negative || value == 0 {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, View};

    fn doc() -> SettingsDocument {
        SettingsDocument {
            projects: vec![Project {
                id: "foo".to_string(),
                name: "Foo".to_string(),
                views: vec![View {
                    id: "board".to_string(),
                    name: "Board".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn limits_parse_leading_integers() {
        let prefs = Preferences::default();
        assert_eq!(set_project_view_limit(&prefs, "50").project_view_limit, 50);
        assert_eq!(set_project_view_limit(&prefs, " 12abc").project_view_limit, 12);
        assert_eq!(set_project_size_limit(&prefs, "2000").project_size_limit, 2000);
    }

    #[test]
    fn bad_limits_fall_back_to_defaults() {
        let prefs = Preferences {
            project_view_limit: 10,
            project_size_limit: 10,
            ..Default::default()
        };
        for input in ["", "abc", "0", "-5", "  "] {
            assert_eq!(set_project_view_limit(&prefs, input).project_view_limit, 300);
            assert_eq!(set_project_size_limit(&prefs, input).project_size_limit, 1000);
        }
    }

    #[test]
    fn edits_leave_the_original_untouched() {
        let prefs = Preferences::default();
        let next = set_quote_strings(&prefs, "QUOTE_DOUBLE");
        assert_eq!(next.frontmatter.quote_strings, QuoteStrings::QuoteDouble);
        assert_eq!(prefs.frontmatter.quote_strings, QuoteStrings::Plain);
    }

    #[test]
    fn unknown_quote_strings_is_ignored() {
        let prefs = set_quote_strings(&Preferences::default(), "QUOTE_DOUBLE");
        assert_eq!(set_quote_strings(&prefs, "SINGLE"), prefs);
    }

    #[test]
    fn toggling_on_twice_adds_once() {
        let prefs = Preferences::default();
        let once = toggle_project_command(&prefs, "foo", true);
        let twice = toggle_project_command(&once, "foo", true);
        assert_eq!(twice.commands, vec![Command::project("foo")]);
    }

    #[test]
    fn project_and_view_commands_are_distinct() {
        let prefs = toggle_project_command(&Preferences::default(), "foo", true);
        let prefs = toggle_view_command(&prefs, "foo", "board", true);
        assert_eq!(prefs.commands.len(), 2);

        let prefs = toggle_project_command(&prefs, "foo", false);
        assert_eq!(prefs.commands, vec![Command::view("foo", "board")]);
    }

    #[test]
    fn toggles_list_projects_then_views() {
        let mut doc = doc();
        doc.preferences = toggle_view_command(&doc.preferences, "foo", "board", true);

        let toggles = command_toggles(&doc);
        assert_eq!(toggles.len(), 2);
        assert_eq!(toggles[0].label, "Foo");
        assert_eq!(toggles[0].target, ToggleTarget::Project);
        assert!(!toggles[0].enabled);
        assert_eq!(toggles[1].label, "Foo: Board");
        assert_eq!(toggles[1].target, ToggleTarget::View);
        assert!(toggles[1].enabled);
    }
}
