// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use path_clean::clean;
use std::path::{Path, PathBuf};

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = path.to_path_buf();

    loop {
        let file_path = current.join(filename);
        if file_path.exists() {
            return Some(file_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Where the configuration should be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed in explicitly, must exist
    Explicit(PathBuf),
    /// Found by searching or at the default location, may be absent
    Discovered(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Discovered(p) => p,
        }
    }
}

pub fn resolve_config_path(
    find_in_parent: FindInParent,
    cwd: &Path,
    default_config_dir: &Path,
    default_filename: &str,
    cli_file: Option<&Path>,
) -> ConfigSource {
    if let Some(cli_file) = cli_file {
        if cli_file.is_absolute() {
            return ConfigSource::Explicit(cli_file.to_path_buf());
        }
        return ConfigSource::Explicit(clean(cwd.join(cli_file)));
    }

    if let Some(found) = find_in_parent(cwd, default_filename) {
        return ConfigSource::Discovered(found);
    }

    ConfigSource::Discovered(clean(default_config_dir.join(default_filename)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found(_: &Path, _: &str) -> Option<PathBuf> {
        None
    }

    fn found(_: &Path, _: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/foo/incoswap.config.yaml"))
    }

    #[test]
    fn test_resolve_config_path() {
        let cwd = PathBuf::from("/foo/bar");
        let config_dir = PathBuf::from("/my/config");

        let source = resolve_config_path(not_found, &cwd, &config_dir, "incoswap.config.yaml", None);
        assert_eq!(
            source,
            ConfigSource::Discovered(PathBuf::from("/my/config/incoswap.config.yaml"))
        );

        // explicit path wins over a discovered one
        let source = resolve_config_path(
            found,
            &cwd,
            &config_dir,
            "incoswap.config.yaml",
            Some(Path::new("/my/absolute/conf.yaml")),
        );
        assert_eq!(
            source,
            ConfigSource::Explicit(PathBuf::from("/my/absolute/conf.yaml"))
        );

        let source = resolve_config_path(
            found,
            &cwd,
            &config_dir,
            "incoswap.config.yaml",
            Some(Path::new("../conf.yaml")),
        );
        assert_eq!(source, ConfigSource::Explicit(PathBuf::from("/foo/conf.yaml")));

        let source = resolve_config_path(found, &cwd, &config_dir, "incoswap.config.yaml", None);
        assert_eq!(
            source.path(),
            Path::new("/foo/incoswap.config.yaml")
        );
    }
}
