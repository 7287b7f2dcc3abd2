//! Comment stripping, continuation joining and redirect expansion.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use super::DefinitionError;

/// Read a definition file into a flat list of commands.
///
/// Comments and blank lines are dropped, `~` continuation lines are joined
/// onto the command before them, and every `redirect <file>` line is
/// replaced by the commands of that file, resolved relative to the file
/// that contains the redirect.
pub fn read_commands(path: &Path) -> Result<Vec<String>, DefinitionError> {
    let mut stack = Vec::new();
    expand(path, &mut stack)
}

fn expand(path: &Path, stack: &mut Vec<PathBuf>) -> Result<Vec<String>, DefinitionError> {
    let canonical = fs::canonicalize(path).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if stack.contains(&canonical) {
        return Err(DefinitionError::RedirectCycle {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    stack.push(canonical);
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut commands = Vec::new();

    for command in strip_comments(&content, path)? {
        match redirect_target(&command) {
            Some("") => {
                return Err(DefinitionError::MissingRedirectTarget {
                    path: path.to_path_buf(),
                })
            }
            Some(target) => {
                let included = base.join(target);
                debug!("Expanding redirect {:?} from {:?}", included, path);
                commands.extend(expand(&included, stack)?);
            }
            None => commands.push(command),
        }
    }

    stack.pop();
    Ok(commands)
}

/// The target of a `redirect` command, or `None` for any other command
fn redirect_target(command: &str) -> Option<&str> {
    let (keyword, rest) = command
        .split_once(char::is_whitespace)
        .unwrap_or((command, ""));

    if keyword.eq_ignore_ascii_case("redirect") {
        Some(rest.trim())
    } else {
        None
    }
}

/// Drop comments and blank lines and join continuation lines.
///
/// `path` is only used for error reporting.
pub fn strip_comments(content: &str, path: &Path) -> Result<Vec<String>, DefinitionError> {
    let mut commands: Vec<String> = Vec::new();
    let mut in_block = false;

    for (number, raw) in content.lines().enumerate() {
        let line = raw.trim();

        if in_block {
            if line.ends_with("*/") {
                in_block = false;
            }
            continue;
        }

        if line.starts_with("/*") {
            // A block opened and closed on the same line is complete.
            in_block = !(line.len() >= 4 && line.ends_with("*/"));
            continue;
        }

        if line.is_empty() || line.starts_with('!') || line.starts_with("//") {
            continue;
        }

        if let Some(continuation) = line.strip_prefix('~') {
            let previous = commands
                .last_mut()
                .ok_or_else(|| DefinitionError::DanglingContinuation {
                    path: path.to_path_buf(),
                    line: number + 1,
                })?;
            previous.push(' ');
            previous.push_str(continuation.trim());
        } else {
            commands.push(line.to_string());
        }
    }

    Ok(commands)
}
