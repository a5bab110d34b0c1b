//! Executable shell scripts for plugin tests

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write `#!/bin/sh` + `body` to `dir/name` and mark it executable
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    std::fs::create_dir_all(dir).expect("create plugin dir");
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = std::fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod script");
    path
}
