//! Maps the file references of a profile to paths on disk.
//!
//! Profiles usually name files by import path, e.g. `example.com/pkg/file.go`. The directory holding the package is
//! only known to the `go` tool, so all packages are resolved with a single `go list -e -json` invocation before any
//! file is read.

use error::*;
use profile::Profile;

use serde_json::Deserializer;

use std::collections::HashMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// One record of the `go list -json` output. Only the fields needed here are decoded.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Package {
    import_path: String,
    #[serde(default)]
    dir: String,
    error: Option<PackageError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PackageError {
    err: String,
}

/// Finds the path to `go`.
///
/// This is `$GOROOT/bin/go` when the `GOROOT` environment variable is set, which is the case when running as a
/// `go tool`. Otherwise `go` is looked up in `PATH`.
pub fn find_go() -> OsString {
    match env::var_os("GOROOT") {
        Some(ref root) if !root.is_empty() => {
            let mut path = PathBuf::from(root);
            path.push("bin");
            path.push("go");
            path.into_os_string()
        },
        _ => "go".into(),
    }
}

/// Whether the file reference is already a relative or absolute path, which needs no package lookup.
pub fn is_local(file: &str) -> bool {
    file.starts_with('.') || Path::new(file).is_absolute()
}

/// Splits a slash-separated file reference into the import path and the file name.
fn split_import_path(file: &str) -> (&str, &str) {
    match file.rfind('/') {
        Some(0) => ("/", &file[1..]),
        Some(i) => (&file[..i], &file[(i + 1)..]),
        None => (".", file),
    }
}

/// Result of resolving import paths with `go list`.
#[derive(Debug, Default)]
pub struct PackageMap {
    packages: HashMap<String, Package>,
}

impl PackageMap {
    /// Lists the distinct import paths referenced by `profiles`, in order of first appearance.
    pub fn import_paths(profiles: &[Profile]) -> Vec<&str> {
        let mut seen = Vec::new();
        for profile in profiles {
            if is_local(&profile.file_name) {
                continue;
            }
            let import_path = split_import_path(&profile.file_name).0;
            if !seen.contains(&import_path) {
                seen.push(import_path);
            }
        }
        seen
    }

    /// Resolves every package referenced by `profiles` by running `go list` once.
    ///
    /// The tool is not run at all when every profile refers to a local path.
    ///
    /// # Errors
    ///
    /// * Returns [`ToolInvocation`] if `go` cannot be started or exits with failure.
    /// * Returns [`Json`] if the output of `go list` cannot be decoded.
    ///
    /// [`ToolInvocation`]: ../error/enum.ErrorKind.html#variant.ToolInvocation
    /// [`Json`]: ../error/enum.ErrorKind.html#variant.Json
    pub fn query(go: &OsStr, profiles: &[Profile]) -> Result<PackageMap> {
        let import_paths = PackageMap::import_paths(profiles);
        if import_paths.is_empty() {
            return Ok(PackageMap::default());
        }

        let tool = go.to_string_lossy().into_owned();
        let mut cmd = Command::new(go);
        cmd.stdin(Stdio::null()).args(&["list", "-e", "-json"]).args(&import_paths);
        debug!("running {:?}", cmd);

        let output = cmd.output().map_err(|e| ErrorKind::ToolInvocation(tool.clone(), e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(ErrorKind::ToolInvocation(tool, format!("{}\n{}", output.status, stderr.trim_end())));
        }
        PackageMap::from_json(&output.stdout).chain_err(|| "cannot decode go list output")
    }

    /// Decodes the concatenated JSON objects printed by `go list -json`.
    pub fn from_json(json: &[u8]) -> Result<PackageMap> {
        let mut packages = HashMap::new();
        for package in Deserializer::from_slice(json).into_iter::<Package>() {
            let package = package?;
            trace!("package {} at {:?}", package.import_path, package.dir);
            packages.insert(package.import_path.clone(), package);
        }
        Ok(PackageMap { packages })
    }

    /// Finds the path of a file referenced by a profile.
    ///
    /// Relative and absolute paths are returned unchanged. Otherwise the file is looked up in the directory of its
    /// package.
    ///
    /// # Errors
    ///
    /// * Returns [`PackageResolution`] if `go list` reported an error for the package.
    /// * Returns [`PackageNotFound`] if the package is unknown.
    ///
    /// [`PackageResolution`]: ../error/enum.ErrorKind.html#variant.PackageResolution
    /// [`PackageNotFound`]: ../error/enum.ErrorKind.html#variant.PackageNotFound
    pub fn resolve(&self, file: &str) -> Result<PathBuf> {
        if is_local(file) {
            return Ok(PathBuf::from(file));
        }
        let (import_path, file_name) = split_import_path(file);
        if let Some(package) = self.packages.get(import_path) {
            if !package.dir.is_empty() {
                return Ok(Path::new(&package.dir).join(file_name));
            }
            if let Some(ref error) = package.error {
                bail!(ErrorKind::PackageResolution(file.to_owned(), error.err.clone()));
            }
        }
        bail!(ErrorKind::PackageNotFound(file.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile::Mode;

    const GO_LIST_OUTPUT: &[u8] = br#"{
	"Dir": "/home/gopher/src/shapes",
	"ImportPath": "example.com/shapes",
	"Name": "shapes",
	"GoFiles": [
		"area.go"
	]
}
{
	"ImportPath": "example.com/broken",
	"Match": [
		"example.com/broken"
	],
	"Incomplete": true,
	"Error": {
		"ImportStack": [],
		"Pos": "",
		"Err": "no required module provides package example.com/broken"
	}
}
"#;

    fn profile(file_name: &str) -> Profile {
        Profile {
            file_name: file_name.to_owned(),
            mode: Mode::Set,
            blocks: Vec::new(),
        }
    }

    #[test]
    fn test_import_paths() {
        let profiles = [
            profile("example.com/shapes/area.go"),
            profile("./local/main.go"),
            profile("example.com/shapes/perimeter.go"),
            profile("/abs/x.go"),
            profile("example.com/shapes/internal/id.go"),
            profile("top.go"),
        ];
        assert_eq!(PackageMap::import_paths(&profiles), vec!["example.com/shapes", "example.com/shapes/internal", "."]);
    }

    #[test]
    fn test_resolve() {
        let packages = PackageMap::from_json(GO_LIST_OUTPUT).unwrap();
        assert_eq!(packages.resolve("example.com/shapes/area.go").unwrap(), Path::new("/home/gopher/src/shapes/area.go"));
        assert_eq!(packages.resolve("./local/main.go").unwrap(), Path::new("./local/main.go"));
        assert_eq!(packages.resolve("../up/main.go").unwrap(), Path::new("../up/main.go"));
        assert_eq!(packages.resolve("/abs/x.go").unwrap(), Path::new("/abs/x.go"));
    }

    #[test]
    fn test_resolve_errors() {
        let packages = PackageMap::from_json(GO_LIST_OUTPUT).unwrap();
        match *packages.resolve("example.com/broken/b.go").unwrap_err().kind() {
            ErrorKind::PackageResolution(ref file, ref message) => {
                assert_eq!(file, "example.com/broken/b.go");
                assert_eq!(message, "no required module provides package example.com/broken");
            },
            ref e => panic!("unexpected error {:?}", e),
        }
        match *packages.resolve("example.com/unknown/u.go").unwrap_err().kind() {
            ErrorKind::PackageNotFound(ref file) => assert_eq!(file, "example.com/unknown/u.go"),
            ref e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn test_bad_json() {
        assert!(PackageMap::from_json(b"{\"ImportPath\": 1}").is_err());
        assert!(PackageMap::from_json(b"{\"ImportPath\": \"a\"").is_err());
    }

    #[test]
    fn test_no_query_for_local_files() {
        let profiles = [profile("./main.go")];
        let packages = PackageMap::query(OsStr::new("/nonexistent/go"), &profiles).unwrap();
        assert!(packages.packages.is_empty());
    }

    #[test]
    fn test_missing_tool() {
        let profiles = [profile("example.com/shapes/area.go")];
        match *PackageMap::query(OsStr::new("/nonexistent/gocover/go"), &profiles).unwrap_err().kind() {
            ErrorKind::ToolInvocation(ref tool, _) => assert_eq!(tool, "/nonexistent/gocover/go"),
            ref e => panic!("unexpected error {:?}", e),
        }
    }
}
