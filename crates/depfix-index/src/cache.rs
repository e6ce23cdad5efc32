//! Per-run metadata cache.
//!
//! A project participating in both resolution and a later graph export is
//! fetched once. The cache lives for a single invocation only; nothing is
//! persisted, so results always reflect the live index.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use depfix_util::errors::DepfixError;

use crate::client::PackageIndex;
use crate::metadata::ProjectMetadata;

/// Memoising wrapper around another [`PackageIndex`].
///
/// Successful lookups (including "not found") are remembered by name;
/// failures are not, so a later call may try again.
pub struct CachedIndex<I> {
    inner: I,
    projects: RefCell<HashMap<String, Option<Rc<ProjectMetadata>>>>,
}

impl<I: PackageIndex> CachedIndex<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            projects: RefCell::new(HashMap::new()),
        }
    }

    /// Number of distinct projects looked up so far.
    pub fn len(&self) -> usize {
        self.projects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<I: PackageIndex> PackageIndex for CachedIndex<I> {
    fn project(&self, name: &str) -> Result<Option<Rc<ProjectMetadata>>, DepfixError> {
        if let Some(hit) = self.projects.borrow().get(name) {
            tracing::trace!(package = name, "metadata cache hit");
            return Ok(hit.clone());
        }
        let fetched = self.inner.project(name)?;
        self.projects
            .borrow_mut()
            .insert(name.to_string(), fetched.clone());
        Ok(fetched)
    }
}
