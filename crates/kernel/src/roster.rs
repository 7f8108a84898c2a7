use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The canonical participant list for a session.
///
/// Names are trimmed, blank names dropped, exact duplicates merged, and the
/// result sorted by root-locale collation at base strength (case and accents
/// ignored, punctuation before digits before letters) with the exact string as
/// tie-break. This is the order a browser's
/// `localeCompare(b, undefined, { sensitivity: "base" })` produces. Two clients
/// that observe the same set of names in any order build the same roster,
/// which is what keeps player assignment identical across clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster(Vec<String>);

impl Roster {
    pub fn canonical<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_owned())
            .filter(|n| !n.is_empty())
            .collect();
        let mut names: Vec<String> = unique.into_iter().collect();
        match base_collator() {
            Ok(collator) => names.sort_by(|a, b| collator.compare(a, b).then_with(|| a.cmp(b))),
            Err(err) => {
                tracing::error!(%err, "collation data unavailable, sorting by lowercase");
                names.sort_by_cached_key(|n| (n.to_lowercase(), n.clone()));
            }
        }
        Self(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn base_collator() -> Result<Collator, icu_collator::CollatorError> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Primary);
    Collator::try_new(&Default::default(), options)
}
