use crate::core::io::stream::Compression;
use crate::core::topology::templates::{ConnectivityRegistry, TemplateLoadError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Cannot infer the trajectory format of '{0}'")]
    UnknownFormat(PathBuf),
    #[error("Failed to load connectivity templates: {0}")]
    Templates(#[from] TemplateLoadError),
}

/// How a trajectory file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Read,
    /// Truncates the file.
    Write,
    /// Keeps the existing frames and writes after them.
    Append,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Read => write!(f, "read"),
            Mode::Write => write!(f, "write"),
            Mode::Append => write!(f, "append"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Pdb,
    Xyz,
}

impl FormatKind {
    /// Infers the format from the file extension, looking through a
    /// trailing `.gz`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let mut path = path.to_path_buf();
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
        {
            path.set_extension("");
        }
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdb" | "ent" => Some(FormatKind::Pdb),
            "xyz" => Some(FormatKind::Xyz),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrajectoryConfig {
    pub path: PathBuf,
    pub mode: Mode,
    pub format: FormatKind,
    /// Always resolved, never [`Compression::Auto`].
    pub compression: Compression,
    pub templates: Arc<ConnectivityRegistry>,
    pub infer_bonds: bool,
    pub strict_lines: bool,
}

#[derive(Default)]
pub struct TrajectoryConfigBuilder {
    path: Option<PathBuf>,
    mode: Option<Mode>,
    format: Option<FormatKind>,
    compression: Option<Compression>,
    templates: Option<Arc<ConnectivityRegistry>>,
    templates_path: Option<PathBuf>,
    infer_bonds: Option<bool>,
    strict_lines: Option<bool>,
}

impl TrajectoryConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }
    pub fn format(mut self, format: FormatKind) -> Self {
        self.format = Some(format);
        self
    }
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }
    pub fn templates(mut self, templates: Arc<ConnectivityRegistry>) -> Self {
        self.templates = Some(templates);
        self
    }
    /// A TOML connectivity table merged over the base templates.
    pub fn templates_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.templates_path = Some(path.into());
        self
    }
    pub fn infer_bonds(mut self, infer_bonds: bool) -> Self {
        self.infer_bonds = Some(infer_bonds);
        self
    }
    pub fn strict_lines(mut self, strict: bool) -> Self {
        self.strict_lines = Some(strict);
        self
    }

    pub fn build(self) -> Result<TrajectoryConfig, ConfigError> {
        let path = self.path.ok_or(ConfigError::MissingParameter("path"))?;
        let format = match self.format {
            Some(format) => format,
            None => FormatKind::from_path(&path)
                .ok_or_else(|| ConfigError::UnknownFormat(path.clone()))?,
        };
        let compression = self.compression.unwrap_or_default().resolve(&path);

        let mut templates = self.templates.unwrap_or_else(ConnectivityRegistry::standard);
        if let Some(templates_path) = &self.templates_path {
            let extra = ConnectivityRegistry::load(templates_path)?;
            Arc::make_mut(&mut templates).merge(extra);
        }

        Ok(TrajectoryConfig {
            path,
            mode: self.mode.unwrap_or_default(),
            format,
            compression,
            templates,
            infer_bonds: self.infer_bonds.unwrap_or(true),
            strict_lines: self.strict_lines.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn formats_are_inferred_from_extensions() {
        assert_eq!(FormatKind::from_path(Path::new("a.pdb")), Some(FormatKind::Pdb));
        assert_eq!(FormatKind::from_path(Path::new("a.ENT")), Some(FormatKind::Pdb));
        assert_eq!(FormatKind::from_path(Path::new("dir/a.xyz.gz")), Some(FormatKind::Xyz));
        assert_eq!(FormatKind::from_path(Path::new("a.pdb.GZ")), Some(FormatKind::Pdb));
        assert_eq!(FormatKind::from_path(Path::new("a.gz")), None);
        assert_eq!(FormatKind::from_path(Path::new("a.dcd")), None);
        assert_eq!(FormatKind::from_path(Path::new("pdb")), None);
    }

    #[test]
    fn build_applies_defaults() {
        let config = TrajectoryConfigBuilder::new().path("traj.xyz.gz").build().unwrap();
        assert_eq!(config.mode, Mode::Read);
        assert_eq!(config.format, FormatKind::Xyz);
        assert_eq!(config.compression, Compression::Gzip);
        assert!(config.infer_bonds);
        assert!(!config.strict_lines);
        assert!(Arc::ptr_eq(&config.templates, &ConnectivityRegistry::standard()));
    }

    #[test]
    fn explicit_settings_override_inference() {
        let config = TrajectoryConfigBuilder::new()
            .path("frames.txt")
            .mode(Mode::Append)
            .format(FormatKind::Pdb)
            .compression(Compression::None)
            .infer_bonds(false)
            .strict_lines(true)
            .build()
            .unwrap();
        assert_eq!(config.mode, Mode::Append);
        assert_eq!(config.format, FormatKind::Pdb);
        assert_eq!(config.compression, Compression::None);
        assert!(!config.infer_bonds);
        assert!(config.strict_lines);
    }

    #[test]
    fn missing_path_and_unknown_format_are_errors() {
        assert!(matches!(
            TrajectoryConfigBuilder::new().build(),
            Err(ConfigError::MissingParameter("path"))
        ));
        assert!(matches!(
            TrajectoryConfigBuilder::new().path("frames.txt").build(),
            Err(ConfigError::UnknownFormat(_))
        ));
    }

    #[test]
    fn templates_file_is_merged_over_the_standard_table() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[LIG]\nbonds = [[\"C1\", \"O1\"]]").unwrap();
        let config = TrajectoryConfigBuilder::new()
            .path("ligand.pdb")
            .templates_path(file.path())
            .build()
            .unwrap();
        assert!(config.templates.get("LIG").is_some());
        assert!(config.templates.get("ALA").is_some());
        assert!(ConnectivityRegistry::standard().get("LIG").is_none());
    }

    #[test]
    fn unreadable_templates_file_is_a_config_error() {
        let result = TrajectoryConfigBuilder::new()
            .path("a.pdb")
            .templates_path("/nonexistent/templates.toml")
            .build();
        assert!(matches!(result, Err(ConfigError::Templates(_))));
    }

    #[test]
    fn modes_display_in_lowercase() {
        assert_eq!(Mode::Append.to_string(), "append");
    }
}
