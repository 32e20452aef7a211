// src/system/platform.rs

//! Platform tag plus the consumed path collaborators: file existence,
//! directory checks, and short-path aliases.

use std::path::Path;

/// Which execution model the host offers.
///
/// `WindowsLegacy` tags command-interpreter generations without a usable
/// pipe facility (original target: Windows 9x-era shells); those fall back
/// to the temp-file runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
    WindowsLegacy,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

/// Path questions the backend selector asks. Kept as a trait so the Windows
/// selector states can be exercised with a test double on any host.
pub trait ShortPaths {
    fn file_exists(&self, path: &str) -> bool;

    /// The fixed-length alternate alias for `path` on filesystems that have
    /// one; `None` when resolution fails.
    fn short_path(&self, path: &str) -> Option<String>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPaths;

impl ShortPaths for SystemPaths {
    fn file_exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn short_path(&self, path: &str) -> Option<String> {
        // Surrounding quotes are stripped before resolving.
        let bare = path
            .strip_prefix('"')
            .and_then(|p| p.strip_suffix('"'))
            .unwrap_or(path);
        short_path_impl(bare)
    }
}

pub fn is_directory(path: &Path) -> bool {
    path.is_dir()
}

/// Filesystems without short names map every path to itself.
#[cfg(not(windows))]
fn short_path_impl(path: &str) -> Option<String> {
    Some(path.to_string())
}

#[cfg(windows)]
#[allow(unsafe_code)]
fn short_path_impl(path: &str) -> Option<String> {
    use std::ffi::{OsStr, OsString};
    use std::os::windows::ffi::{OsStrExt, OsStringExt};
    use windows_sys::Win32::Storage::FileSystem::GetShortPathNameW;

    let wide: Vec<u16> = OsStr::new(path)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    let needed = unsafe { GetShortPathNameW(wide.as_ptr(), std::ptr::null_mut(), 0) };
    if needed == 0 {
        return None;
    }
    let mut buffer = vec![0u16; needed as usize];
    let written = unsafe { GetShortPathNameW(wide.as_ptr(), buffer.as_mut_ptr(), needed) };
    if written == 0 || written > needed {
        return None;
    }
    buffer.truncate(written as usize);
    Some(OsString::from_wide(&buffer).to_string_lossy().into_owned())
}
