//! Command-line argument pairs.

/// One argument handed to a spawned executable: a key with an optional
/// value. A bare token is a pair with an empty value.
///
/// Anything printable converts into a pair component, so numeric
/// arguments take their decimal string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgvPair {
    key: String,
    value: String,
}

impl ArgvPair {
    /// A key/value argument.
    #[track_caller]
    pub fn new(key: impl ToString, value: impl ToString) -> ArgvPair {
        let key = key.to_string();
        if key.is_empty() {
            panic!("argv keys must be non-empty");
        }
        ArgvPair {
            key,
            value: value.to_string(),
        }
    }

    /// A bare token, stored as `(token, "")`.
    #[track_caller]
    pub fn bare(token: impl ToString) -> ArgvPair {
        ArgvPair::new(token, "")
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether this is a bare token.
    pub fn is_bare(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<&str> for ArgvPair {
    fn from(token: &str) -> ArgvPair {
        ArgvPair::bare(token)
    }
}

impl From<String> for ArgvPair {
    fn from(token: String) -> ArgvPair {
        ArgvPair::bare(token)
    }
}

impl<K: ToString, V: ToString> From<(K, V)> for ArgvPair {
    fn from((key, value): (K, V)) -> ArgvPair {
        ArgvPair::new(key, value)
    }
}

/// Flatten pairs into the runtime's array-of-strings form: key, then
/// value when one is present.
pub(crate) fn marshal(argv: &[ArgvPair]) -> Vec<String> {
    let mut tokens = Vec::with_capacity(argv.len() * 2);
    for pair in argv {
        tokens.push(pair.key.clone());
        if !pair.value.is_empty() {
            tokens.push(pair.value.clone());
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_tokens_have_empty_values() {
        let pair = ArgvPair::from("-verbose");
        assert_eq!(pair.key(), "-verbose");
        assert_eq!(pair.value(), "");
        assert!(pair.is_bare());
    }

    #[test]
    fn pairs_keep_their_value() {
        let pair = ArgvPair::from(("-n", 4));
        assert_eq!(pair.key(), "-n");
        assert_eq!(pair.value(), "4");
        assert!(!pair.is_bare());
    }

    #[test]
    fn marshal_flattens_in_order() {
        let argv = [
            ArgvPair::bare("-foo"),
            ArgvPair::new("-n", 4),
            ArgvPair::bare("--baz"),
        ];
        assert_eq!(marshal(&argv), ["-foo", "-n", "4", "--baz"]);
    }

    #[test]
    #[should_panic(expected = "argv keys must be non-empty")]
    fn empty_key_is_fatal() {
        let _ = ArgvPair::bare("");
    }
}
