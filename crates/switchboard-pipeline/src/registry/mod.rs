//! Capability registry: the catalog of executable action families.
//!
//! Each family registers exactly once, declaring its verbs, verb aliases,
//! required parameters, and whether its effects are irreversible.
//! Resolution runs exact match, then alias lookup, then fuzzy similarity
//! against the registered verbs, so that near-miss verbs produced by
//! sloppy upstream text still dispatch.

pub mod builtin;
pub mod similarity;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{ExecutionError, RegistryError};
use crate::types::ExecutionContext;
use switchboard_extract::CandidateInvocation;

/// An executable capability implementation.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    /// Execute one invocation. The verb has already been resolved to a
    /// registered verb by the time this is called.
    async fn invoke(
        &self,
        invocation: &CandidateInvocation,
        ctx: &ExecutionContext,
    ) -> Result<Value, ExecutionError>;
}

/// Metadata and handler for one capability family.
pub struct CapabilityRegistration {
    pub family: String,
    pub verbs: BTreeSet<String>,
    /// Alias -> canonical verb.
    pub aliases: BTreeMap<String, String>,
    /// Parameters every invocation of this family must carry.
    pub required_parameters: Vec<String>,
    /// Irreversible capabilities get a single dispatch attempt.
    pub irreversible: bool,
    pub handler: Arc<dyn CapabilityHandler>,
}

impl CapabilityRegistration {
    pub fn new(family: impl Into<String>, handler: Arc<dyn CapabilityHandler>) -> Self {
        Self {
            family: family.into(),
            verbs: BTreeSet::new(),
            aliases: BTreeMap::new(),
            required_parameters: Vec::new(),
            irreversible: false,
            handler,
        }
    }

    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.verbs.insert(verb.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, verb: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), verb.into());
        self
    }

    pub fn with_required_parameter(mut self, name: impl Into<String>) -> Self {
        self.required_parameters.push(name.into());
        self
    }

    pub fn irreversible(mut self) -> Self {
        self.irreversible = true;
        self
    }
}

impl std::fmt::Debug for CapabilityRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistration")
            .field("family", &self.family)
            .field("verbs", &self.verbs)
            .field("aliases", &self.aliases)
            .field("required_parameters", &self.required_parameters)
            .field("irreversible", &self.irreversible)
            .finish_non_exhaustive()
    }
}

/// A successful verb resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub registration: Arc<CapabilityRegistration>,
    /// The canonical verb to dispatch with.
    pub verb: String,
    /// True when the verb was matched by similarity rather than exactly
    /// or through an alias.
    pub fuzzy: bool,
}

/// Thread-safe catalog of capability registrations.
pub struct CapabilityRegistry {
    registrations: RwLock<HashMap<String, Arc<CapabilityRegistration>>>,
    similarity_threshold: f64,
}

impl CapabilityRegistry {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            registrations: RwLock::new(HashMap::new()),
            similarity_threshold,
        }
    }

    /// Register a capability family. Families are unique; a second
    /// registration under the same name is rejected.
    pub fn register(&self, registration: CapabilityRegistration) -> Result<(), RegistryError> {
        let mut map = self
            .registrations
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let family = registration.family.clone();
        if map.contains_key(&family) {
            return Err(RegistryError::DuplicateFamily(family));
        }
        debug!(family = %family, verbs = ?registration.verbs, "Capability registered");
        map.insert(family, Arc::new(registration));
        Ok(())
    }

    /// Resolve a family/verb pair to a registration and canonical verb.
    ///
    /// Verb resolution order: exact match, alias lookup, then the best
    /// fuzzy match at or above the similarity threshold. Ties on fuzzy
    /// score go to the lexicographically first verb, which keeps
    /// resolution deterministic.
    pub fn resolve(&self, family: &str, verb: &str) -> Result<Resolution, RegistryError> {
        let map = self
            .registrations
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let registration = map.get(family).cloned().ok_or_else(|| {
            let mut known: Vec<String> = map.keys().cloned().collect();
            known.sort();
            RegistryError::UnknownFamily {
                family: family.to_string(),
                known,
            }
        })?;
        drop(map);

        if registration.verbs.contains(verb) {
            return Ok(Resolution {
                registration,
                verb: verb.to_string(),
                fuzzy: false,
            });
        }

        if let Some(canonical) = registration.aliases.get(verb) {
            let canonical = canonical.clone();
            return Ok(Resolution {
                registration,
                verb: canonical,
                fuzzy: false,
            });
        }

        let mut best: Option<(&String, f64)> = None;
        for candidate in &registration.verbs {
            let score = similarity::verb_similarity(verb, candidate);
            if score >= self.similarity_threshold
                && best.map(|(_, s)| score > s).unwrap_or(true)
            {
                best = Some((candidate, score));
            }
        }

        if let Some((canonical, score)) = best {
            debug!(
                family = %family,
                requested = %verb,
                resolved = %canonical,
                score,
                "Fuzzy verb resolution"
            );
            let canonical = canonical.clone();
            return Ok(Resolution {
                registration,
                verb: canonical,
                fuzzy: true,
            });
        }

        Err(RegistryError::UnknownVerb {
            family: family.to_string(),
            verb: verb.to_string(),
            valid: registration.verbs.iter().cloned().collect(),
        })
    }

    /// All registered families, sorted by name.
    pub fn list(&self) -> Vec<Arc<CapabilityRegistration>> {
        let map = self
            .registrations
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut all: Vec<_> = map.values().cloned().collect();
        all.sort_by(|a, b| a.family.cmp(&b.family));
        all
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;

    pub struct NoopHandler;

    #[async_trait]
    impl CapabilityHandler for NoopHandler {
        async fn invoke(
            &self,
            _invocation: &CandidateInvocation,
            _ctx: &ExecutionContext,
        ) -> Result<Value, ExecutionError> {
            Ok(Value::Null)
        }
    }

    /// Registration with an inert handler, for tests that only exercise
    /// resolution metadata.
    pub fn noop_registration(family: &str) -> CapabilityRegistration {
        CapabilityRegistration::new(family, Arc::new(NoopHandler))
    }
}
