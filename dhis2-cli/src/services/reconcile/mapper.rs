//! Lookup indexes over the server snapshot
//!
//! `IdCodeMapper` resolves stable identifiers by business code,
//! `NameMapper` resolves reference objects by display name.

use std::collections::HashMap;

use chrono::Utc;

use crate::api::metadata::{D2Object, NamedRef, Ref};
use crate::api::uid::uid_from_seed;

/// Seed used to derive a fresh uid for a code with no server match
pub trait SeedSource {
    fn seed(&self, code: &str) -> String;
}

/// `<code>-<epoch millis>-<random>`, unique per call in practice
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeRandomSeed;

impl SeedSource for TimeRandomSeed {
    fn seed(&self, code: &str) -> String {
        format!(
            "{}-{}-{}",
            code,
            Utc::now().timestamp_millis(),
            rand::random::<f64>()
        )
    }
}

const UID_PREFIX: &str = "dataElement";

/// Index of server objects by code
pub struct IdCodeMapper<'a, S: SeedSource = TimeRandomSeed> {
    by_code: HashMap<&'a str, &'a D2Object>,
    seeds: S,
}

impl<'a, S: SeedSource> IdCodeMapper<'a, S> {
    pub fn with_seed_source(objects: &'a [D2Object], seeds: S) -> Self {
        // Later objects win on duplicate codes
        let by_code = objects
            .iter()
            .filter_map(|obj| obj.code.as_deref().map(|code| (code, obj)))
            .collect();

        Self { by_code, seeds }
    }

    /// Existing server object with this code
    pub fn get(&self, code: &str) -> Option<&'a D2Object> {
        self.by_code.get(code).copied()
    }

    /// The row's own id, else the id of the server object with the same code,
    /// else a freshly derived uid
    pub fn existing_or_random_id(&self, id: Option<&str>, code: &str) -> String {
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            return id.to_string();
        }

        if let Some(existing) = self.get(code) {
            return existing.id.clone();
        }

        uid_from_seed(UID_PREFIX, &self.seeds.seed(code))
    }
}

/// Index of reference objects by display name
pub struct NameMapper<'a> {
    by_name: HashMap<&'a str, &'a NamedRef>,
}

impl<'a> NameMapper<'a> {
    pub fn new(objects: &'a [NamedRef]) -> Self {
        Self {
            by_name: objects.iter().map(|obj| (obj.name.as_str(), obj)).collect(),
        }
    }

    /// Reference to the object with this name; unmatched names yield `None`
    pub fn get_ref(&self, name: Option<&str>) -> Option<Ref> {
        name.and_then(|name| self.by_name.get(name))
            .map(|obj| Ref::new(obj.id.clone()))
    }
}
