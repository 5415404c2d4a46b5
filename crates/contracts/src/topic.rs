//! Topic - Cheap-to-clone channel identifier
//!
//! Uses Arc<str> internally so handles and registry tables can share one
//! allocation per topic.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Separator between a topic's namespace and its label.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Channel topic with cheap cloning.
///
/// Conventionally `<namespace>::<label>`, where the namespace is the
/// emitting module's path. A topic without a label is the namespace alone.
///
/// # Examples
/// ```
/// use contracts::Topic;
///
/// let topic = Topic::scoped("app::db", Some("pool"));
/// assert_eq!(topic, "app::db::pool");
/// assert_eq!(Topic::scoped("app", None), "app");
/// ```
#[derive(Clone, Default)]
pub struct Topic(Arc<str>);

impl Topic {
    /// Create a new Topic from a string slice.
    #[inline]
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Build `namespace::label`, or just `namespace` when the label is
    /// absent or empty.
    pub fn scoped(namespace: &str, label: Option<&str>) -> Self {
        match label {
            Some(label) if !label.is_empty() => {
                Self::from(format!("{namespace}{NAMESPACE_SEPARATOR}{label}"))
            }
            _ => Self::new(namespace),
        }
    }

    /// Qualify a bare name with `namespace`; names already containing a
    /// separator are returned unchanged.
    pub fn qualify(namespace: &str, name: &str) -> Self {
        if name.contains(NAMESPACE_SEPARATOR) {
            Self::new(name)
        } else {
            Self::scoped(namespace, Some(name))
        }
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last separator, or the whole topic.
    pub fn namespace(&self) -> &str {
        match self.0.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Everything after the last separator, if any.
    pub fn label(&self) -> Option<&str> {
        self.0
            .rfind(NAMESPACE_SEPARATOR)
            .map(|idx| &self.0[idx + NAMESPACE_SEPARATOR.len()..])
    }
}

impl Deref for Topic {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Topic {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Topic {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Topic {
    #[inline]
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for Topic {
    #[inline]
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&String> for Topic {
    #[inline]
    fn from(s: &String) -> Self {
        Self(Arc::from(s.as_str()))
    }
}

impl From<&Topic> for Topic {
    #[inline]
    fn from(t: &Topic) -> Self {
        t.clone()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic({:?})", self.0)
    }
}

impl PartialEq for Topic {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Topic {}

impl PartialEq<str> for Topic {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for Topic {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl PartialEq<String> for Topic {
    #[inline]
    fn eq(&self, other: &String) -> bool {
        self.0.as_ref() == other
    }
}

// Must match str's hash so HashMap<Topic, _> can be queried with &str
impl Hash for Topic {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl Ord for Topic {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Topic {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Topic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}
