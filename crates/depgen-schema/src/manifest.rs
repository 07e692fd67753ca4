use crate::table::{DependencyEntry, ManifestTable};
use crate::types::{CheckoutPath, DepId, Pin};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("unsupported manifest_version: {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("deps[{index}]: id must not be empty")]
    EmptyId { index: usize },
    #[error("duplicate dependency id '{0}'")]
    DuplicateId(String),
    #[error("emit.{field}: {reason}")]
    InvalidEmitConfig {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ManifestV1 {
    pub manifest_version: u32,
    #[serde(default)]
    pub emit: EmitConfig,
    #[serde(default)]
    pub deps: Vec<DepDecl>,
}

/// A single `[[deps]]` entry as written in the manifest.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DepDecl {
    pub id: String,
    pub version: String,
    pub path: String,
}

/// Output settings carried in the manifest's optional `[emit]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EmitConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_package")]
    pub package: String,
    #[serde(default = "default_variable")]
    pub variable: String,
    #[serde(default = "default_import_path")]
    pub import_path: String,
    #[serde(default = "default_map_type")]
    pub map_type: String,
    /// Command named in the "Code generated by" header.
    #[serde(default = "default_generator")]
    pub generator: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            package: default_package(),
            variable: default_variable(),
            import_path: default_import_path(),
            map_type: default_map_type(),
            generator: default_generator(),
        }
    }
}

impl EmitConfig {
    /// Reject settings that would make the generated file malformed.
    ///
    /// `package` and `variable` must be Go identifiers, and `generator`,
    /// `map_type` and `import_path` must fit on one line.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let invalid = |field, reason| ManifestError::InvalidEmitConfig { field, reason };

        if let Some(reason) = identifier_problem(&self.package) {
            return Err(invalid("package", reason));
        }
        if let Some(reason) = identifier_problem(&self.variable) {
            return Err(invalid("variable", reason));
        }
        if self.map_type.trim().is_empty() {
            return Err(invalid("map_type", "must not be empty"));
        }
        for (field, value) in [
            ("generator", &self.generator),
            ("map_type", &self.map_type),
            ("import_path", &self.import_path),
        ] {
            if value.chars().any(char::is_control) {
                return Err(invalid(field, "must not contain control characters"));
            }
        }
        Ok(())
    }
}

const GO_KEYWORDS: [&str; 25] = [
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return",
    "select", "struct", "switch", "type", "var",
];

fn identifier_problem(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Some("must not be empty"),
        Some(c) if !(c == '_' || c.is_alphabetic()) => {
            return Some("must start with a letter or '_'");
        }
        Some(_) => {}
    }
    if !chars.all(|c| c == '_' || c.is_alphanumeric()) {
        return Some("must be a Go identifier");
    }
    if GO_KEYWORDS.contains(&name) {
        return Some("must not be a Go keyword");
    }
    None
}

fn default_package() -> String {
    "deps".to_owned()
}

fn default_variable() -> String {
    "deps".to_owned()
}

fn default_import_path() -> String {
    "go.skia.org/infra/go/depot_tools/deps_parser".to_owned()
}

fn default_map_type() -> String {
    "deps_parser.DepsEntries".to_owned()
}

fn default_generator() -> String {
    "go run generate.go".to_owned()
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Go,
    Json,
    Toml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Go, OutputFormat::Json, OutputFormat::Toml];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Go => "go",
            OutputFormat::Json => "json",
            OutputFormat::Toml => "toml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| format!("unknown output format '{s}' (expected: go, json, toml)"))
    }
}

impl ManifestV1 {
    /// Build the insertion-ordered table, rejecting empty and repeated ids
    /// and a malformed `[emit]` section.
    ///
    /// Ids are trimmed before comparison; versions and paths are carried
    /// verbatim and left to the resolver.
    pub fn to_table(&self) -> Result<ManifestTable, ManifestError> {
        if self.manifest_version != 1 {
            return Err(ManifestError::UnsupportedVersion(self.manifest_version));
        }
        self.emit.validate()?;

        let mut table = ManifestTable::new();
        for (index, decl) in self.deps.iter().enumerate() {
            let id = decl.id.trim();
            if id.is_empty() {
                return Err(ManifestError::EmptyId { index });
            }
            table.insert(DependencyEntry {
                id: DepId::new(id),
                version: Pin::new(decl.version.as_str()),
                path: CheckoutPath::new(decl.path.as_str()),
            })?;
        }
        Ok(table)
    }
}

pub fn parse_manifest_str(input: &str) -> Result<ManifestV1, ManifestError> {
    Ok(toml::from_str(input)?)
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<ManifestV1, ManifestError> {
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content)
}

pub fn load_table_str(input: &str) -> Result<ManifestTable, ManifestError> {
    parse_manifest_str(input)?.to_table()
}

pub fn load_table_file(path: impl AsRef<Path>) -> Result<ManifestTable, ManifestError> {
    parse_manifest_file(path)?.to_table()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_manifest() {
        let input = r#"
manifest_version = 1

[emit]
format = "json"
package = "pins"
generator = "depgen generate"

[[deps]]
id = "chromium.googlesource.com/chromium/src/buildtools"
version = "1760ff6d7267dd97ae1968c7bee9ce04a2a8489d"
path = "buildtools"

[[deps]]
id = "skia/tools/sk"
version = "git_revision:3c89288303c98247a04392c4eae2aef26569bdd7"
path = "bin"
"#;
        let manifest = parse_manifest_str(input).expect("should parse");
        assert_eq!(manifest.manifest_version, 1);
        assert_eq!(manifest.emit.format, OutputFormat::Json);
        assert_eq!(manifest.emit.package, "pins");
        assert_eq!(manifest.emit.variable, "deps");
        assert_eq!(manifest.deps.len(), 2);
        assert_eq!(manifest.deps[1].path, "bin");
    }

    #[test]
    fn parses_minimal_manifest() {
        let manifest = parse_manifest_str("manifest_version = 1\n").expect("should parse");
        assert!(manifest.deps.is_empty());
        assert_eq!(manifest.emit, EmitConfig::default());
        assert!(manifest.to_table().unwrap().is_empty());
    }

    #[test]
    fn table_keeps_manifest_order() {
        let table = load_table_str(
            r#"
manifest_version = 1
[[deps]]
id = "b"
version = "2"
path = "y"
[[deps]]
id = "a"
version = "1"
path = "x"
"#,
        )
        .unwrap();
        let ids: Vec<&str> = table.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(table.get("a").unwrap().path, "x");
    }

    #[test]
    fn rejects_missing_required_field() {
        let input = r#"
manifest_version = 1
[[deps]]
id = "a/b"
path = "p"
"#;
        let err = parse_manifest_str(input).unwrap_err();
        assert!(matches!(err, ManifestError::ParseToml(_)));
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn rejects_unterminated_entry() {
        let input = r#"
manifest_version = 1
[[deps]]
id = "a/b
version = "v1"
"#;
        assert!(matches!(
            parse_manifest_str(input),
            Err(ManifestError::ParseToml(_))
        ));
    }

    #[test]
    fn rejects_unknown_fields() {
        let input = r#"
manifest_version = 1
[[deps]]
id = "a/b"
version = "v1"
path = "p"
condition = "checkout_chromium"
"#;
        assert!(parse_manifest_str(input).is_err());
    }

    #[test]
    fn rejects_unsupported_version() {
        let manifest = parse_manifest_str("manifest_version = 2\n").unwrap();
        assert!(matches!(
            manifest.to_table(),
            Err(ManifestError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn rejects_duplicate_id() {
        let input = r#"
manifest_version = 1
[[deps]]
id = "a/b"
version = "v1"
path = "p"
[[deps]]
id = " a/b "
version = "v2"
path = "q"
"#;
        match load_table_str(input) {
            Err(ManifestError::DuplicateId(id)) => assert_eq!(id, "a/b"),
            other => panic!("expected DuplicateId, got {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_id() {
        let input = r#"
manifest_version = 1
[[deps]]
id = "   "
version = "v1"
path = "p"
"#;
        assert!(matches!(
            load_table_str(input),
            Err(ManifestError::EmptyId { index: 0 })
        ));
    }

    fn emit_error(section: &str) -> ManifestError {
        let input = format!("manifest_version = 1\n[emit]\n{section}\n");
        load_table_str(&input).unwrap_err()
    }

    #[test]
    fn default_emit_config_is_valid() {
        EmitConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_multiline_generator() {
        let err = emit_error("format = \"toml\"\ngenerator = \"x\\nmanifest_version = 9\"");
        assert!(matches!(
            err,
            ManifestError::InvalidEmitConfig {
                field: "generator",
                ..
            }
        ));
    }

    #[test]
    fn rejects_package_that_is_not_an_identifier() {
        for bad in ["my pkg", "", "9lives", "deps-gen", "package"] {
            let config = EmitConfig {
                package: bad.to_owned(),
                ..EmitConfig::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(ManifestError::InvalidEmitConfig {
                        field: "package",
                        ..
                    })
                ),
                "package {bad:?} should be rejected"
            );
        }
        let err = emit_error("package = \"my pkg\"");
        assert!(err.to_string().starts_with("emit.package:"));
    }

    #[test]
    fn rejects_empty_variable() {
        assert!(matches!(
            emit_error("variable = \"\""),
            ManifestError::InvalidEmitConfig {
                field: "variable",
                ..
            }
        ));
    }

    #[test]
    fn rejects_blank_map_type() {
        assert!(matches!(
            emit_error("map_type = \"  \""),
            ManifestError::InvalidEmitConfig {
                field: "map_type",
                ..
            }
        ));
    }

    #[test]
    fn accepts_custom_identifiers() {
        let config = EmitConfig {
            package: "_pins".to_owned(),
            variable: "Pinned2".to_owned(),
            map_type: "map[string]Entry".to_owned(),
            import_path: String::new(),
            ..EmitConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("GO".parse::<OutputFormat>().unwrap(), OutputFormat::Go);
        assert_eq!("toml".parse::<OutputFormat>().unwrap(), OutputFormat::Toml);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depgen.toml");
        fs::write(
            &path,
            "manifest_version = 1\n[[deps]]\nid = \"a/b\"\nversion = \"v1\"\npath = \"p\"\n",
        )
        .unwrap();
        let table = load_table_file(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert!(load_table_file(dir.path().join("missing.toml")).is_err());
    }
}
