use super::backend::StorageBackend;
use crate::error::{Result, SettingsError};
use crate::model::{Preferences, Project, SettingsDocument};
use crate::resolve::resolve;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info};

type Listener = Box<dyn Fn(&SettingsDocument)>;

/// Handle returned by [`SettingsStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owner of the live settings document for a session.
///
/// Built once at startup with [`SettingsStore::load`] and passed explicitly to
/// whatever needs settings. Readers get `Rc` snapshots from [`get`]; a later
/// [`set`] swaps in a new document without touching snapshots already handed
/// out.
///
/// Every write goes through the backend first. If persisting fails the live
/// document stays as it was and no subscriber is notified.
///
/// Listeners must not subscribe or unsubscribe from inside a notification.
///
/// [`get`]: SettingsStore::get
/// [`set`]: SettingsStore::set
pub struct SettingsStore<B: StorageBackend> {
    backend: B,
    current: RefCell<Rc<SettingsDocument>>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
}

impl<B: StorageBackend> SettingsStore<B> {
    /// Read, migrate and resolve whatever the backend holds.
    ///
    /// When resolution changed the persisted form (first run, migration,
    /// repaired fields) the resolved document is written back immediately.
    pub fn load(backend: B) -> Result<Self> {
        let raw = backend.load()?;
        let doc = resolve(raw.as_ref().unwrap_or(&Value::Null));
        let resolved = doc.to_raw()?;

        if raw.as_ref() != Some(&resolved) {
            info!(location = %backend.location().display(), "persisting resolved settings");
            backend.save(&resolved)?;
        }

        Ok(Self {
            backend,
            current: RefCell::new(Rc::new(doc)),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        })
    }

    /// Current snapshot.
    pub fn get(&self) -> Rc<SettingsDocument> {
        Rc::clone(&self.current.borrow())
    }

    /// Replace the whole document.
    ///
    /// The document is normalized through the resolver first, so invariants
    /// such as a single default project hold for whatever the caller built.
    pub fn set(&self, doc: SettingsDocument) -> Result<()> {
        let raw = doc.to_raw()?;
        let doc = resolve(&raw);
        self.backend.save(&doc.to_raw()?)?;

        let snapshot = Rc::new(doc);
        *self.current.borrow_mut() = Rc::clone(&snapshot);
        self.notify(&snapshot);
        Ok(())
    }

    /// Apply a copy-on-write edit to the current document.
    pub fn update<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&SettingsDocument) -> SettingsDocument,
    {
        let current = self.get();
        let next = edit(current.as_ref());
        self.set(next)
    }

    pub fn update_preferences(&self, preferences: Preferences) -> Result<()> {
        self.update(|doc| doc.with_preferences(preferences))
    }

    /// Add a project. Ids must be unique. A new default project takes the
    /// flag away from the previous one.
    pub fn add_project(&self, project: Project) -> Result<()> {
        let current = self.get();
        if current.project(&project.id).is_some() {
            return Err(SettingsError::DuplicateProject(project.id));
        }
        let mut next = (*current).clone();
        if project.is_default {
            clear_defaults(&mut next.projects);
        }
        next.projects.push(project);
        self.set(next)
    }

    /// Replace the project with the same id.
    pub fn update_project(&self, project: Project) -> Result<()> {
        let current = self.get();
        let Some(index) = current.projects.iter().position(|p| p.id == project.id) else {
            return Err(SettingsError::ProjectNotFound(project.id));
        };
        let mut next = (*current).clone();
        if project.is_default {
            clear_defaults(&mut next.projects);
        }
        next.projects[index] = project;
        self.set(next)
    }

    /// Remove a project along with the commands that pointed at it.
    pub fn remove_project(&self, id: &str) -> Result<()> {
        let current = self.get();
        if current.project(id).is_none() {
            return Err(SettingsError::ProjectNotFound(id.to_string()));
        }
        let mut next = (*current).clone();
        next.projects.retain(|p| p.id != id);
        next.preferences.commands.retain(|c| c.project != id);
        self.set(next)
    }

    /// Register a listener. It is called right away with the current
    /// document, then after every successful write.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SettingsDocument) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        listener(&self.get());
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    /// Persist the current document again. Called on teardown.
    pub fn flush(&self) -> Result<()> {
        self.backend.save(&self.get().to_raw()?)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn notify(&self, doc: &SettingsDocument) {
        let listeners = self.listeners.borrow();
        debug!(count = listeners.len(), "notifying settings subscribers");
        for (_, listener) in listeners.iter() {
            listener(doc);
        }
    }
}

fn clear_defaults(projects: &mut [Project]) {
    for project in projects {
        project.is_default = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Command;
    use crate::store::mem_backend::MemBackend;
    use serde_json::json;

    fn project(id: &str) -> Project {
        Project {
            id: id.to_string(),
            name: id.to_uppercase(),
            ..Default::default()
        }
    }

    #[test]
    fn load_empty_backend_persists_defaults() {
        let store = SettingsStore::load(MemBackend::new()).unwrap();
        assert_eq!(*store.get(), SettingsDocument::default());
        assert_eq!(store.backend().save_count(), 1);
    }

    #[test]
    fn load_current_document_does_not_rewrite() {
        let raw = SettingsDocument::default().to_raw().unwrap();
        let store = SettingsStore::load(MemBackend::with_raw(raw)).unwrap();
        assert_eq!(store.backend().save_count(), 0);
    }

    #[test]
    fn load_migrates_and_persists_legacy_data() {
        let backend = MemBackend::with_raw(json!({ "projectViewLimit": 5 }));
        let store = SettingsStore::load(backend).unwrap();
        assert_eq!(store.get().preferences.project_view_limit, 5);

        let saved = store.backend().saved().unwrap();
        assert_eq!(saved["version"], json!(2));
        assert_eq!(saved["preferences"]["projectViewLimit"], json!(5));
    }

    #[test]
    fn snapshots_survive_later_writes() {
        let store = SettingsStore::load(MemBackend::new()).unwrap();
        let before = store.get();

        store.add_project(project("a")).unwrap();

        assert!(before.projects.is_empty());
        assert_eq!(store.get().projects.len(), 1);
    }

    #[test]
    fn failed_write_leaves_state_unchanged() {
        let store = SettingsStore::load(MemBackend::new()).unwrap();
        store.backend().set_simulate_write_error(true);

        let prefs = Preferences {
            project_view_limit: 1,
            ..Default::default()
        };
        assert!(store.update_preferences(prefs).is_err());
        assert_eq!(store.get().preferences.project_view_limit, 300);
    }

    #[test]
    fn duplicate_and_missing_projects_are_rejected() {
        let store = SettingsStore::load(MemBackend::new()).unwrap();
        store.add_project(project("a")).unwrap();

        assert!(matches!(
            store.add_project(project("a")),
            Err(SettingsError::DuplicateProject(id)) if id == "a"
        ));
        assert!(matches!(
            store.update_project(project("b")),
            Err(SettingsError::ProjectNotFound(_))
        ));
        assert!(matches!(
            store.remove_project("b"),
            Err(SettingsError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn set_makes_repeated_project_ids_unique() {
        let store = SettingsStore::load(MemBackend::new()).unwrap();
        store
            .set(SettingsDocument {
                projects: vec![project("a"), project("a")],
                ..Default::default()
            })
            .unwrap();

        let ids: Vec<String> = store.get().projects.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec!["a", "a-2"]);
        assert_eq!(store.backend().saved().unwrap()["projects"][1]["id"], json!("a-2"));
        assert!(store.update_project(project("a")).is_ok());
    }

    #[test]
    fn new_default_project_takes_the_flag() {
        let store = SettingsStore::load(MemBackend::new()).unwrap();
        store
            .add_project(Project {
                is_default: true,
                ..project("a")
            })
            .unwrap();
        store
            .add_project(Project {
                is_default: true,
                ..project("b")
            })
            .unwrap();

        let doc = store.get();
        assert_eq!(doc.default_project().map(|p| p.id.as_str()), Some("b"));
        assert_eq!(doc.projects.iter().filter(|p| p.is_default).count(), 1);
    }

    #[test]
    fn removing_a_project_drops_its_commands() {
        let store = SettingsStore::load(MemBackend::new()).unwrap();
        store.add_project(project("a")).unwrap();
        store.add_project(project("b")).unwrap();
        store
            .update_preferences(Preferences {
                commands: vec![Command::project("a"), Command::view("b", "v")],
                ..Default::default()
            })
            .unwrap();

        store.remove_project("a").unwrap();

        let doc = store.get();
        assert_eq!(doc.projects.len(), 1);
        assert_eq!(doc.preferences.commands, vec![Command::view("b", "v")]);
    }

    #[test]
    fn subscribers_see_current_then_updates() {
        let store = SettingsStore::load(MemBackend::new()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |doc| sink.borrow_mut().push(doc.projects.len()));
        store.add_project(project("a")).unwrap();

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add_project(project("b")).unwrap();

        assert_eq!(*seen.borrow(), vec![0, 1]);
    }

    #[test]
    fn flush_writes_the_current_document() {
        let store = SettingsStore::load(MemBackend::new()).unwrap();
        let saves = store.backend().save_count();
        store.flush().unwrap();
        assert_eq!(store.backend().save_count(), saves + 1);
        assert_eq!(
            store.backend().saved().unwrap(),
            store.get().to_raw().unwrap()
        );
    }
}
