//! Row and column selections for batch updates.

/// One key or a sequence of keys along a catalog axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keys {
    One(String),
    Many(Vec<String>),
}

impl Keys {
    /// Check whether this selection holds a sequence.
    pub fn is_many(&self) -> bool {
        matches!(self, Keys::Many(_))
    }

    /// The selected keys, in order.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Keys::One(key) => vec![key],
            Keys::Many(keys) => keys,
        }
    }
}

impl From<&str> for Keys {
    fn from(key: &str) -> Self {
        Keys::One(key.to_string())
    }
}

impl From<String> for Keys {
    fn from(key: String) -> Self {
        Keys::One(key)
    }
}

impl From<&String> for Keys {
    fn from(key: &String) -> Self {
        Keys::One(key.clone())
    }
}

impl From<Vec<String>> for Keys {
    fn from(keys: Vec<String>) -> Self {
        Keys::Many(keys)
    }
}

impl From<Vec<&str>> for Keys {
    fn from(keys: Vec<&str>) -> Self {
        Keys::Many(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Keys {
    fn from(keys: &[&str]) -> Self {
        Keys::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(keys: [&str; N]) -> Self {
        Keys::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}
