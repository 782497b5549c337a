//! In-memory collaborators for reconciler tests

use anyhow::{Result, bail};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use super::{EnvStore, Prompter, UrlLauncher, Vcs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Clone { url: String, target: PathBuf },
    /// Working directory at the time of the pull
    Pull { cwd: PathBuf },
}

/// Records calls; a clone creates the target directory like git would.
#[derive(Debug, Default)]
pub struct FakeGit {
    pub calls: RefCell<Vec<GitCall>>,
    pub fail_pull: bool,
    pub fail_clone: BTreeSet<String>,
}

impl FakeGit {
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }
}

impl Vcs for FakeGit {
    fn is_available(&self) -> bool {
        true
    }

    fn clone_repo(&self, url: &str, target: &Path) -> Result<()> {
        self.calls.borrow_mut().push(GitCall::Clone {
            url: url.to_string(),
            target: target.to_path_buf(),
        });
        if self.fail_clone.contains(url) {
            bail!("simulated clone failure for {url}");
        }
        std::fs::create_dir_all(target.join(".git"))?;
        Ok(())
    }

    fn pull(&self) -> Result<()> {
        self.calls.borrow_mut().push(GitCall::Pull {
            cwd: std::env::current_dir()?,
        });
        if self.fail_pull {
            bail!("simulated pull failure");
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeEnv {
    pub values: RefCell<HashMap<String, String>>,
    pub fail: BTreeSet<String>,
}

impl FakeEnv {
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: RefCell::new(
                pairs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            ),
            fail: BTreeSet::new(),
        }
    }
}

impl EnvStore for FakeEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.values.borrow().get(name).cloned()
    }

    fn set_user(&self, name: &str, value: &str) -> Result<()> {
        if self.fail.contains(name) {
            bail!("simulated failure setting {name}");
        }
        self.values
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Answers prompts from a queue; confirmations return a fixed answer.
#[derive(Debug, Default)]
pub struct FakePrompter {
    pub answers: RefCell<VecDeque<String>>,
    pub confirm_answer: bool,
    pub asked: RefCell<Vec<String>>,
}

impl FakePrompter {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(ToString::to_string).collect()),
            ..Self::default()
        }
    }
}

impl Prompter for FakePrompter {
    fn ask(&self, prompt: &str) -> Result<String> {
        self.asked.borrow_mut().push(prompt.to_string());
        match self.answers.borrow_mut().pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("no scripted answer for '{prompt}'"),
        }
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(self.confirm_answer)
    }
}

#[derive(Debug, Default)]
pub struct FakeLauncher {
    pub opened: RefCell<Vec<String>>,
    pub fail: BTreeSet<String>,
}

impl UrlLauncher for FakeLauncher {
    fn open(&self, url: &str) -> Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        if self.fail.contains(url) {
            bail!("simulated failure opening {url}");
        }
        Ok(())
    }
}
