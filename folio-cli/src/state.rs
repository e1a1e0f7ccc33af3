//! Location of the `folio` state directory.
//!
//! `FOLIO_HOME` wins; otherwise `$HOME/.folio`.

use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

fn resolve_home(folio_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    match (folio_home.filter(|v| !v.is_empty()), home) {
        (Some(dir), _) => Ok(PathBuf::from(dir)),
        (None, Some(home)) => Ok(PathBuf::from(home).join(".folio")),
        (None, None) => bail!("neither FOLIO_HOME nor HOME is set"),
    }
}

pub fn folio_home() -> Result<PathBuf> {
    resolve_home(std::env::var_os("FOLIO_HOME"), std::env::var_os("HOME"))
}

/// [`folio_home`], created on first use.
pub fn ensure_folio_home() -> Result<PathBuf> {
    let dir = folio_home()?;
    if !dir.is_dir() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("create state dir {}", dir.display()))?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folio_home_override_wins() {
        let dir = resolve_home(Some("/srv/folio".into()), Some("/home/ana".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/folio"));
    }

    #[test]
    fn test_empty_override_falls_back_to_home() {
        let dir = resolve_home(Some(OsString::new()), Some("/home/ana".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/ana/.folio"));
    }

    #[test]
    fn test_no_home_is_an_error() {
        assert!(resolve_home(None, None).is_err());
    }
}
