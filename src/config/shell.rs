use figment::value::{Dict, Map, Value};
use figment::{Error, Metadata, Profile, Provider};
use std::path::{Path, PathBuf};

/// Figment provider for shell-style `KEY=value` config files.
///
/// ```sh
/// # .commit-shame-config
/// export MIN_LINES=5
/// MAX_LINES=400
/// INSULT_PACK="pirate"
/// PLUGINS="todo-count spellcheck"
/// ```
///
/// Keys are lowercased. Values are typed the way figment types environment
/// variables: integers and booleans become numbers and bools, the rest strings.
/// A missing file provides nothing.
pub struct ShellConfig {
    path: PathBuf,
}

impl ShellConfig {
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn parse(content: &str) -> Result<Dict, String> {
        let mut dict = Dict::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line).trim_start();

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| format!("line {}: expected KEY=value, got {:?}", index + 1, raw))?;

            let key = key.trim();
            if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(format!("line {}: invalid key {:?}", index + 1, key));
            }

            let value = unquote(value.trim())
                .ok_or_else(|| format!("line {}: unterminated quote", index + 1))?;
            dict.insert(key.to_ascii_lowercase(), typed(value));
        }

        Ok(dict)
    }
}

impl Provider for ShellConfig {
    fn metadata(&self) -> Metadata {
        Metadata::named(format!("shell config `{}`", self.path.display()))
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(Error::from(e.to_string())),
        };

        let dict = Self::parse(&content).map_err(Error::from)?;
        Ok(Profile::Default.collect(dict))
    }
}

/// Strip matching quotes, or a trailing ` # comment` from unquoted values.
fn unquote(value: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(quote) {
            let end = rest.find(quote)?;
            return Some(&rest[..end]);
        }
    }
    Some(match value.find(" #") {
        Some(pos) => value[..pos].trim_end(),
        None => value,
    })
}

fn typed(value: &str) -> Value {
    if let Ok(n) = value.parse::<u64>() {
        return Value::from(n);
    }
    if let Ok(n) = value.parse::<i64>() {
        return Value::from(n);
    }
    match value {
        "true" => Value::from(true),
        "false" => Value::from(false),
        _ => Value::from(value.to_string()),
    }
}
