//! Operation: reinstall the exact versions recorded in a lock file.

use std::path::Path;

use depfix_core::lockfile::Lockfile;

use crate::context::Context;

/// Install every pin of the lock file at `path` in one installer call.
///
/// Returns the number of pins installed; an empty lock file is a no-op.
pub fn restore(ctx: &Context, path: &Path) -> miette::Result<usize> {
    let lockfile = Lockfile::from_path(path)?;
    if lockfile.is_empty() {
        tracing::info!("Lock file is empty; nothing to install");
        return Ok(0);
    }
    tracing::info!("Restoring {} packages from lock...", lockfile.len());
    ctx.installer.install_pins(&lockfile.requirements())?;
    Ok(lockfile.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{self, FakeEnvironment, FakeIndex, FakeInstaller};

    #[test]
    fn installs_all_pins_at_once() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("requirements.lock.json");
        std::fs::write(&path, r#"{"urllib3": "1.26.18", "idna": "3.6"}"#).unwrap();

        let installer = FakeInstaller::default();
        let calls = installer.calls.clone();
        let ctx = fakes::context(FakeIndex::new(), FakeEnvironment::default(), installer);

        assert_eq!(restore(&ctx, &path).unwrap(), 2);
        assert_eq!(
            *calls.borrow(),
            vec!["install idna==3.6 urllib3==1.26.18"]
        );
    }

    #[test]
    fn empty_lock_is_noop() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("requirements.lock.json");
        std::fs::write(&path, "{}").unwrap();

        let installer = FakeInstaller::default();
        let calls = installer.calls.clone();
        let ctx = fakes::context(FakeIndex::new(), FakeEnvironment::default(), installer);

        assert_eq!(restore(&ctx, &path).unwrap(), 0);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn missing_lock_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = fakes::context(
            FakeIndex::new(),
            FakeEnvironment::default(),
            FakeInstaller::default(),
        );
        assert!(restore(&ctx, &tmp.path().join("nope.json")).is_err());
    }
}
