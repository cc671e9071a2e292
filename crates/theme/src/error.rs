use std::fmt;
use thiserror::Error;
use vista_traits::ResourceError;

use crate::loader::{CURRENT_FORMAT_VERSION, MINIMUM_FORMAT_VERSION};

/// Failure to turn one source into a theme document.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error("File does not exist: {0}")]
    NotFound(String),

    #[error("XML parsing error: {0}")]
    Parse(String),

    #[error("Missing <theme> tag!")]
    MissingRootTag,

    #[error(
        "<formatVersion> tag missing! It's either out of date or you need to add <formatVersion>{}</formatVersion> inside your <theme> tag.",
        CURRENT_FORMAT_VERSION
    )]
    MissingVersion,

    #[error("Theme uses format version {found}. Minimum supported version is {}.", MINIMUM_FORMAT_VERSION)]
    VersionTooOld { found: f32 },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Failure of a whole resolution pass. Only the root document can fail a
/// pass; problems in included files are logged and skipped.
#[derive(Error, Debug, Clone)]
pub enum ThemeError {
    #[error("{}{source}", FileChain(.files))]
    Load { files: Vec<String>, source: LoadError },
}

impl ThemeError {
    pub fn load_error(&self) -> &LoadError {
        match self {
            ThemeError::Load { source, .. } => source,
        }
    }
}

struct FileChain<'a>(&'a [String]);

impl fmt::Display for FileChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((root, included)) = self.0.split_first() else {
            return Ok(());
        };
        writeln!(f, "from theme \"{}\"", root)?;
        for file in included {
            writeln!(f, "  (from included file \"{}\")", file)?;
        }
        write!(f, "    ")
    }
}
