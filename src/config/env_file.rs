// ABOUTME: Parser for the optional KEY=VALUE configuration file (default ./.env).
// ABOUTME: Unrecognized lines are skipped; a missing file is not an error.

use super::{ConfigError, KnownKey};
use std::collections::BTreeMap;
use std::path::Path;

/// Key/value pairs read from a configuration file. Later lines win.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    entries: BTreeMap<String, String>,
}

impl EnvFile {
    pub fn parse(content: &str) -> Self {
        // Editors on Windows may save a leading byte-order mark.
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let entries = content
            .lines()
            .filter_map(parse_line)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self { entries }
    }

    /// Read `path`, returning `None` when it does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let file = Self::parse(&content);
                tracing::debug!("loaded {} entries from {}", file.len(), path.display());
                Ok(Some(file))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no configuration file at {}", path.display());
                Ok(None)
            }
            Err(source) => Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn known(&self, key: KnownKey) -> Option<&str> {
        self.get(key.env_name())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Values may be credentials; list keys only.
impl std::fmt::Debug for EnvFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Parse `KEY = value` or `KEY="value"`.
///
/// The key must be an identifier (`[A-Za-z_][A-Za-z0-9_]*`), which also rules
/// out commented-out lines. The value is taken verbatim after trimming, minus
/// one pair of surrounding double quotes.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if !is_identifier(key) {
        return None;
    }

    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    Some((key, value))
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_quoted_values() {
        let file = EnvFile::parse("LLM_ROUTER_API_KEY=abc123\nJWT_SECRET_KEY=\"xyz 789\"\n");
        assert_eq!(file.known(KnownKey::ApiKey), Some("abc123"));
        assert_eq!(file.known(KnownKey::JwtSecret), Some("xyz 789"));
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let file = EnvFile::parse("\u{feff}LLM_ROUTER_API_KEY=abc123\nJWT_SECRET_KEY=xyz789\n");
        assert_eq!(file.known(KnownKey::ApiKey), Some("abc123"));
        assert_eq!(file.known(KnownKey::JwtSecret), Some("xyz789"));
        assert_eq!(file.len(), 2);
    }

    #[test]
    fn allows_spaces_around_equals() {
        let file = EnvFile::parse("OLLAMA_URL = http://gpu-box:11434");
        assert_eq!(file.known(KnownKey::ServiceUrl), Some("http://gpu-box:11434"));
    }

    #[test]
    fn skips_comments_blanks_and_garbage() {
        let file = EnvFile::parse(
            "# comment\n\n   \n#LLM_ROUTER_API_KEY=old\nnot a pair\n9KEY=x\nexport A=b\n=value\n",
        );
        assert!(file.is_empty(), "unexpected entries: {:?}", file);
    }

    #[test]
    fn hash_inside_value_is_kept() {
        let file = EnvFile::parse("JWT_SECRET_KEY=abc#def");
        assert_eq!(file.known(KnownKey::JwtSecret), Some("abc#def"));
    }

    #[test]
    fn later_lines_win() {
        let file = EnvFile::parse("A=1\nA=2\n");
        assert_eq!(file.get("A"), Some("2"));
        assert_eq!(file.len(), 1);
    }

    #[test]
    fn unknown_keys_are_kept() {
        let file = EnvFile::parse("OPENAI_API_KEY=sk-test\r\nLOG_LEVEL=DEBUG\r\n");
        assert_eq!(file.get("OPENAI_API_KEY"), Some("sk-test"));
        assert_eq!(file.get("LOG_LEVEL"), Some("DEBUG"));
    }

    #[test]
    fn lone_quote_is_not_stripped() {
        let file = EnvFile::parse("A=\"\nB=\"\"");
        assert_eq!(file.get("A"), Some("\""));
        assert_eq!(file.get("B"), Some(""));
    }

    #[test]
    fn debug_hides_values() {
        let file = EnvFile::parse("JWT_SECRET_KEY=xyz789");
        let shown = format!("{:?}", file);
        assert!(shown.contains("JWT_SECRET_KEY"));
        assert!(!shown.contains("xyz789"));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = EnvFile::load(&dir.path().join(".env")).unwrap();
        assert!(loaded.is_none());
    }
}
