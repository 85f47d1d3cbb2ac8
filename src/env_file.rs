//! Loader for dotenv-style `KEY=VALUE` files.

use std::path::Path;
use std::{env, fs};
use tracing::warn;

/// Load `KEY=VALUE` pairs from the given file into the process environment.
/// Blank lines and `#` comments are skipped; one surrounding quote is
/// stripped from each end of the value. A missing file is a warning, not an
/// error, so the binaries still run against a pre-populated environment.
pub fn load_env_file<P: AsRef<Path>>(path: P) {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => {
            warn!(path = %path.display(), "could not open env file");
            return;
        }
    };

    for line in contents.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value
            .strip_prefix('"')
            .or_else(|| value.strip_prefix('\''))
            .unwrap_or(value);
        let value = value
            .strip_suffix('"')
            .or_else(|| value.strip_suffix('\''))
            .unwrap_or(value);
        env::set_var(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        load_env_file(file.path());
        file
    }

    #[test]
    fn test_sets_plain_pair() {
        let _f = load("CLIE_TEST_PLAIN=value");
        assert_eq!(env::var("CLIE_TEST_PLAIN").unwrap(), "value");
    }

    #[test]
    fn test_strips_quotes() {
        let _f = load("CLIE_TEST_DQ=\"quoted\"\nCLIE_TEST_SQ='single'");
        assert_eq!(env::var("CLIE_TEST_DQ").unwrap(), "quoted");
        assert_eq!(env::var("CLIE_TEST_SQ").unwrap(), "single");
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let _f = load("# comment\n\nCLIE_TEST_AFTER=1");
        assert_eq!(env::var("CLIE_TEST_AFTER").unwrap(), "1");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let _f = load("CLIE_TEST_EQ=a=b");
        assert_eq!(env::var("CLIE_TEST_EQ").unwrap(), "a=b");
    }

    #[test]
    fn test_missing_file_is_a_noop() {
        load_env_file("/definitely/not/here/.env");
    }
}
