//! Definition dialects.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// Tag that introduces the switch annotation in the DSS dialect
pub const DSS_TAG: &str = "schg:";

/// Match: a command opening with "new line.<name>", the name ending at
/// whitespace, '.' or ';'
static DSS_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*new\s+line\.([^\s.;]+)").expect("Invalid DSS name regex")
});

/// Text format of a definition source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// OpenDSS scripts annotated with `schg:` tags
    Dss,
    /// One `name type state [substation] peers...` line per switch
    Plain,
}

impl Dialect {
    /// `.dss` files use the DSS dialect, everything else the plain one
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("dss") => Dialect::Dss,
            _ => Dialect::Plain,
        }
    }

    /// Split a case-folded command into the switch name and its annotation
    /// tokens. Returns `None` for commands that do not define a switch.
    pub fn split(self, command: &str) -> Option<(String, Vec<String>)> {
        match self {
            Dialect::Dss => {
                let name = DSS_NAME.captures(command)?.get(1)?.as_str().to_string();
                let (_, annotation) = command.split_once(DSS_TAG)?;
                let tags = annotation.split_whitespace().map(str::to_string).collect();
                Some((name, tags))
            }
            Dialect::Plain => {
                let mut tokens = command.split_whitespace().map(str::to_string);
                let name = tokens.next()?;
                Some((name, tokens.collect()))
            }
        }
    }
}
