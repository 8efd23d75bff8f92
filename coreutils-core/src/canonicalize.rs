//! Absolute path canonicalization, ported from gnulib's
//! `canonicalize.c`. Resolves `.`, `..`, duplicate separators and
//! symlinks into a single absolute path, with three existence modes.

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use crate::cycle_check::{CycleCheck, DevIno};
use crate::error::CoreError;

/// How strictly path components must exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalizeMode {
    /// Every component, including the last, must exist.
    Existing,
    /// Every component but the last must exist.
    AllButLast,
    /// Components may be missing; `lstat` failures are tolerated.
    Missing,
}

/// Canonicalize `name` to an absolute path with no `.`, `..`, duplicate
/// `/`, or symlinks remaining, per `mode`.
pub fn canonicalize(name: &str, mode: CanonicalizeMode) -> Result<PathBuf, CoreError> {
    if name.is_empty() {
        return Err(CoreError::Io(std::io::Error::from_raw_os_error(libc_enoent())));
    }

    let mut rname: String = if name.starts_with('/') {
        "/".to_string()
    } else {
        let cwd = std::env::current_dir().map_err(CoreError::NoCwd)?;
        let mut s = cwd.to_string_lossy().into_owned();
        if !s.ends_with('/') {
            s.push('/');
        }
        s
    };

    let mut cycle_state = CycleCheck::new();
    let mut remaining = name.to_string();
    let mut cursor = 0usize;

    loop {
        // Skip a run of separators.
        while cursor < remaining.len() && remaining.as_bytes()[cursor] == b'/' {
            cursor += 1;
        }
        let start = cursor;
        while cursor < remaining.len() && remaining.as_bytes()[cursor] != b'/' {
            cursor += 1;
        }
        if start == cursor {
            break;
        }
        let component = &remaining[start..cursor];
        let has_more = cursor < remaining.len();

        if component == "." {
            // Nothing.
        } else if component == ".." {
            pop_component(&mut rname);
        } else {
            if !rname.ends_with('/') {
                rname.push('/');
            }
            rname.push_str(component);

            let meta = fs::symlink_metadata(&rname);
            match meta {
                Err(_) => match mode {
                    CanonicalizeMode::Existing => return Err(io_not_found()),
                    CanonicalizeMode::AllButLast if has_more => return Err(io_not_found()),
                    _ => continue,
                },
                Ok(st) => {
                    if st.file_type().is_symlink() {
                        let dev_ino = DevIno {
                            dev: st.dev(),
                            ino: st.ino(),
                        };
                        if cycle_state.check(dev_ino) {
                            if mode == CanonicalizeMode::Missing {
                                continue;
                            }
                            return Err(CoreError::Loop);
                        }

                        let target = match fs::read_link(&rname) {
                            Ok(t) => t,
                            Err(_) if mode == CanonicalizeMode::Missing => continue,
                            Err(e) => return Err(CoreError::Io(e)),
                        };

                        let rest = remaining[cursor..].to_string();
                        let mut spliced = target.to_string_lossy().into_owned();
                        spliced.push_str(&rest);

                        if target.is_absolute() {
                            rname = "/".to_string();
                        } else {
                            pop_component(&mut rname);
                        }

                        remaining = spliced;
                        cursor = 0;
                        continue;
                    } else if !st.is_dir() && has_more && mode != CanonicalizeMode::Missing {
                        return Err(CoreError::Io(std::io::Error::new(
                            std::io::ErrorKind::Other,
                            "not a directory",
                        )));
                    }
                }
            }
        }
    }

    if rname.len() > 1 && rname.ends_with('/') {
        rname.pop();
    }
    Ok(PathBuf::from(rname))
}

fn pop_component(rname: &mut String) {
    if rname.len() > 1 {
        if let Some(slash) = rname[..rname.len() - 1].rfind('/') {
            rname.truncate(slash + 1);
        } else {
            rname.truncate(1);
        }
    }
}

fn io_not_found() -> CoreError {
    CoreError::Io(std::io::Error::from(std::io::ErrorKind::NotFound))
}

fn libc_enoent() -> i32 {
    2 // ENOENT, stable across the platforms this crate targets.
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::tempdir;

    #[test]
    fn resolves_dot_and_dotdot() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b");
        stdfs::create_dir_all(&nested).unwrap();
        let input = nested.join("../b/./c");
        stdfs::write(nested.join("c"), b"hi").unwrap();
        let got = canonicalize(input.to_str().unwrap(), CanonicalizeMode::Existing).unwrap();
        assert_eq!(got, nested.join("c"));
    }

    #[test]
    fn missing_last_component_ok_in_all_but_last_mode() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("does-not-exist");
        let got = canonicalize(input.to_str().unwrap(), CanonicalizeMode::AllButLast).unwrap();
        assert_eq!(got, input);
    }

    #[test]
    fn missing_middle_component_fails_in_existing_mode() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("missing/also-missing");
        let err = canonicalize(input.to_str().unwrap(), CanonicalizeMode::Existing);
        assert!(err.is_err());
    }

    #[test]
    fn result_has_no_trailing_slash_unless_root() {
        let got = canonicalize("/", CanonicalizeMode::Missing).unwrap();
        assert_eq!(got, PathBuf::from("/"));
    }
}
