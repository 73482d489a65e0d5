use std::collections::BTreeSet;

/// Tokens that are always forbidden in a proposal.
pub const DEFAULT_BLOCKED_KEYWORDS: [&str; 8] = [
    "SELF_DESTRUCT",
    "DE-ORBIT",
    "DE_ORBIT",
    "DEORBIT",
    "DESTRUCT",
    "WEAPONIZE",
    "ATTACK",
    "DISABLE_SHIELD",
];

/// Case-insensitive substring deny-list.
///
/// Keywords are stored upper-cased; the built-in set is always present and
/// operator additions can only extend it.
#[derive(Debug, Clone)]
pub struct DenyList {
    keywords: BTreeSet<String>,
}

impl Default for DenyList {
    fn default() -> Self {
        Self::with_extra(std::iter::empty::<&str>())
    }
}

impl DenyList {
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: BTreeSet<String> = DEFAULT_BLOCKED_KEYWORDS
            .iter()
            .map(|kw| (*kw).to_string())
            .collect();
        keywords.extend(
            extra
                .into_iter()
                .map(|kw| kw.as_ref().trim().to_uppercase())
                .filter(|kw| !kw.is_empty()),
        );
        Self { keywords }
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Every keyword contained in `text`, sorted and deduplicated.
    pub fn matches(&self, text: &str) -> Vec<String> {
        let upper = text.to_uppercase();
        self.keywords
            .iter()
            .filter(|kw| upper.contains(kw.as_str()))
            .cloned()
            .collect()
    }
}
