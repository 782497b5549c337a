//! In-memory backends for testing without touching real package managers.

use crate::backend::{Backend, NodeBackend};
use crate::error::{Error, Result};
use crate::types::{InstallScope, Package};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// A mutating call recorded by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `install` with the fully-qualified identifier
    Install(String),
    /// `update` with the bare name
    Update(String),
    /// `add_bucket`
    AddBucket(String),
}

#[derive(Debug, Default)]
struct MockState {
    installed: BTreeSet<String>,
    buckets: BTreeSet<String>,
    failing: BTreeSet<String>,
    actions: Vec<Action>,
}

/// Mock system package manager.
///
/// Installing a package marks it installed, so a second reconciliation pass
/// sees the converged state.
#[derive(Debug, Clone)]
pub struct MockBackend {
    available: bool,
    state: Arc<Mutex<MockState>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            available: true,
            state: Arc::default(),
        }
    }
}

impl MockBackend {
    /// Create an available mock with nothing installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose tool is missing.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// Mark packages as already installed.
    #[must_use]
    pub fn with_installed<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .unwrap()
            .installed
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Mark buckets as already known.
    #[must_use]
    pub fn with_buckets<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .unwrap()
            .buckets
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Make every operation on these names fail.
    #[must_use]
    pub fn with_failing<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .unwrap()
            .failing
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Every mutating call so far, in order.
    pub fn actions(&self) -> Vec<Action> {
        self.state.lock().unwrap().actions.clone()
    }

    fn check(&self, state: &MockState, name: &str) -> Result<()> {
        if !self.available {
            return Err(Error::ToolNotFound {
                tool: "mock".to_string(),
            });
        }
        if state.failing.contains(name) {
            return Err(Error::CommandFailed {
                message: format!("mock command failed for {name}"),
                stderr: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Backend for MockBackend {
    fn tool(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn is_installed(&self, name: &str) -> Result<bool> {
        let state = self.state.lock().unwrap();
        self.check(&state, name)?;
        Ok(state.installed.contains(name))
    }

    fn install(&self, package: &Package) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(Action::Install(package.qualified_name()));
        self.check(&state, &package.name)?;
        state.installed.insert(package.name.clone());
        Ok(())
    }

    fn update(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(Action::Update(name.to_string()));
        self.check(&state, name)
    }

    fn list_buckets(&self) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state.buckets.iter().cloned().collect())
    }

    fn add_bucket(&self, bucket: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(Action::AddBucket(bucket.to_string()));
        self.check(&state, bucket)?;
        state.buckets.insert(bucket.to_string());
        Ok(())
    }
}

/// A mutating call recorded by [`MockNodeBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    /// `install` in a scope
    Install(String, InstallScope),
    /// `update` in a scope
    Update(String, InstallScope),
}

#[derive(Debug, Default)]
struct NodeState {
    global: BTreeSet<String>,
    failing: BTreeSet<String>,
    actions: Vec<NodeAction>,
}

/// Mock npm.
#[derive(Debug, Clone)]
pub struct MockNodeBackend {
    available: bool,
    state: Arc<Mutex<NodeState>>,
}

impl Default for MockNodeBackend {
    fn default() -> Self {
        Self {
            available: true,
            state: Arc::default(),
        }
    }
}

impl MockNodeBackend {
    /// Create an available mock with nothing installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose npm is missing.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// Mark packages as globally installed.
    #[must_use]
    pub fn with_global<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .unwrap()
            .global
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Make install/update fail for these names.
    #[must_use]
    pub fn with_failing<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .unwrap()
            .failing
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Every mutating call so far, in order.
    pub fn actions(&self) -> Vec<NodeAction> {
        self.state.lock().unwrap().actions.clone()
    }
}

impl NodeBackend for MockNodeBackend {
    fn is_available(&self) -> bool {
        self.available
    }

    fn list_global(&self) -> Result<Vec<String>> {
        Ok(self.state.lock().unwrap().global.iter().cloned().collect())
    }

    fn install(&self, name: &str, scope: InstallScope) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .actions
            .push(NodeAction::Install(name.to_string(), scope));
        if state.failing.contains(name) {
            return Err(Error::CommandFailed {
                message: format!("mock npm install failed for {name}"),
                stderr: "simulated failure".to_string(),
            });
        }
        if scope == InstallScope::Global {
            state.global.insert(name.to_string());
        }
        Ok(())
    }

    fn update(&self, name: &str, scope: InstallScope) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(NodeAction::Update(name.to_string(), scope));
        if state.failing.contains(name) {
            return Err(Error::CommandFailed {
                message: format!("mock npm update failed for {name}"),
                stderr: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}
