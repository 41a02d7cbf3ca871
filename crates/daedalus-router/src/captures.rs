//! Positional regex captures.
//!
//! Captures are stored in a small vector so that the common case of one to
//! four groups never touches the heap.

use smallvec::SmallVec;

/// Maximum number of captures stored inline.
const INLINE_CAPTURES: usize = 4;

/// One capturing group of a matched route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Group name for `(?P<name>...)` groups.
    pub name: Option<String>,
    /// Matched text; `None` when the group did not participate.
    pub value: Option<String>,
}

/// Captured groups from a regex route match, left to right.
///
/// Every capturing group of the pattern has an entry, so
/// [`Captures::len`] always equals the pattern's group count.
///
/// # Example
///
/// ```rust
/// use daedalus_router::Captures;
///
/// let mut captures = Captures::new();
/// captures.push(None, Some("42"));
/// captures.push(Some("slug"), Some("intro"));
///
/// assert_eq!(captures.get(0), Some("42"));
/// assert_eq!(captures.by_name("slug"), Some("intro"));
/// assert_eq!(captures.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Captures {
    inner: SmallVec<[Capture; INLINE_CAPTURES]>,
}

impl Captures {
    /// Creates an empty capture set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group.
    pub fn push(&mut self, name: Option<&str>, value: Option<&str>) {
        self.inner.push(Capture {
            name: name.map(str::to_string),
            value: value.map(str::to_string),
        });
    }

    /// Returns the value of the group at `index`, if it participated.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.inner.get(index).and_then(|c| c.value.as_deref())
    }

    /// Returns the value of a named group.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
            .and_then(|c| c.value.as_deref())
    }

    /// Returns true if the pattern had no capturing groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of capturing groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over the groups in order.
    pub fn iter(&self) -> impl Iterator<Item = &Capture> {
        self.inner.iter()
    }
}

impl FromIterator<Option<String>> for Captures {
    fn from_iter<I: IntoIterator<Item = Option<String>>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|value| Capture { name: None, value })
                .collect(),
        }
    }
}
