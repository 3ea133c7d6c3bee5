/// Tag names the editor toolbar knows about.
pub const BUILTIN_TAGS: &[&str] = &[
    "b", "i", "u", "s", "left", "center", "right", "quote", "code", "img", "highlight", "list",
    "color", "size", "indent", "url",
];

/// A known BBCode tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BbTag {
    pub name: String,
}

impl BbTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Catalog of known tags. Membership data only: the balancer and the
/// insertion engine work on any tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRegistry {
    tags: Vec<BbTag>,
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::from_names(BUILTIN_TAGS.iter().copied())
    }
}

impl TagRegistry {
    /// Build a registry from a list of names, skipping duplicates
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tags: Vec<BbTag> = Vec::new();
        for name in names {
            let name = name.into();
            if !tags.iter().any(|t| t.name == name) {
                tags.push(BbTag::new(name));
            }
        }
        Self { tags }
    }

    /// Look up a tag by exact name
    pub fn find(&self, name: &str) -> Option<&BbTag> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
