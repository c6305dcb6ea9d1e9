//! In-memory hive client
//!
//! Stores objects per namespace, records every call it receives and can be
//! told to fail a given verb. Intended for tests and local development.

use async_trait::async_trait;
use chrono::Utc;
use hive_common::apis::hive::v1::{self, SyncSetInstance, SyncSetInstanceList};
use hive_common::meta::v1::{DeleteOptions, GetOptions, ListOptions};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ListMeta, Time};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{HiveV1Interface, SyncSetInstanceInterface};
use crate::error::{GroupResource, RegistryResult, StatusError, StatusReason};

/// Client operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub verb: Verb,
    pub namespace: String,
    /// Object name; empty for list
    pub name: String,
    /// Object sent with create and update
    pub object: Option<SyncSetInstance>,
}

#[derive(Default)]
struct FakeState {
    objects: BTreeMap<(String, String), SyncSetInstance>,
    actions: Vec<Action>,
    failures: HashMap<Verb, StatusError>,
    resource_version: u64,
}

impl FakeState {
    fn next_resource_version(&mut self) -> String {
        self.resource_version += 1;
        self.resource_version.to_string()
    }
}

/// Fake clientset
#[derive(Clone, Default)]
pub struct FakeHiveClient {
    state: Arc<RwLock<FakeState>>,
}

impl FakeHiveClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client pre-populated with objects; their namespace comes from metadata
    pub fn with_objects(objects: impl IntoIterator<Item = SyncSetInstance>) -> Self {
        let mut state = FakeState::default();
        for mut obj in objects {
            let namespace = obj.metadata.namespace.clone().unwrap_or_default();
            let name = obj.metadata.name.clone().unwrap_or_default();
            if obj.metadata.resource_version.is_none() {
                obj.metadata.resource_version = Some(state.next_resource_version());
            }
            state.objects.insert((namespace, name), obj);
        }

        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Make every later call with `verb` fail with `err`
    pub async fn fail_on(&self, verb: Verb, err: StatusError) {
        self.state.write().await.failures.insert(verb, err);
    }

    /// Calls received so far, in order
    pub async fn actions(&self) -> Vec<Action> {
        self.state.read().await.actions.clone()
    }

    pub async fn clear_actions(&self) {
        self.state.write().await.actions.clear();
    }

    /// Read an object bypassing action recording
    pub async fn stored(&self, namespace: &str, name: &str) -> Option<SyncSetInstance> {
        self.state
            .read()
            .await
            .objects
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }
}

impl std::fmt::Debug for FakeHiveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeHiveClient").finish_non_exhaustive()
    }
}

impl HiveV1Interface for FakeHiveClient {
    fn sync_set_instances(&self, namespace: &str) -> Box<dyn SyncSetInstanceInterface> {
        Box::new(FakeSyncSetInstances {
            state: self.state.clone(),
            namespace: namespace.to_string(),
        })
    }
}

struct FakeSyncSetInstances {
    state: Arc<RwLock<FakeState>>,
    namespace: String,
}

fn resource() -> GroupResource {
    GroupResource::new(v1::GROUP, v1::RESOURCE)
}

impl FakeSyncSetInstances {
    /// Record the call and return the injected failure, if any
    fn record(
        &self,
        state: &mut FakeState,
        verb: Verb,
        name: &str,
        object: Option<&SyncSetInstance>,
    ) -> RegistryResult<()> {
        state.actions.push(Action {
            verb,
            namespace: self.namespace.clone(),
            name: name.to_string(),
            object: object.cloned(),
        });

        match state.failures.get(&verb) {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }

    fn key(&self, name: &str) -> (String, String) {
        (self.namespace.clone(), name.to_string())
    }
}

#[async_trait]
impl SyncSetInstanceInterface for FakeSyncSetInstances {
    async fn list(&self, options: &ListOptions) -> RegistryResult<SyncSetInstanceList> {
        let mut state = self.state.write().await;
        self.record(&mut state, Verb::List, "", None)?;

        let selector = parse_label_selector(&options.label_selector)?;
        let items = state
            .objects
            .iter()
            .filter(|((namespace, _), _)| {
                self.namespace.is_empty() || *namespace == self.namespace
            })
            .filter(|(_, obj)| selector.iter().all(|term| term.matches(obj)))
            .map(|(_, obj)| obj.clone())
            .collect();

        Ok(SyncSetInstanceList {
            metadata: ListMeta {
                resource_version: Some(state.resource_version.to_string()),
                ..Default::default()
            },
            items,
        })
    }

    async fn get(&self, name: &str, _options: &GetOptions) -> RegistryResult<SyncSetInstance> {
        let mut state = self.state.write().await;
        self.record(&mut state, Verb::Get, name, None)?;

        state
            .objects
            .get(&self.key(name))
            .cloned()
            .ok_or_else(|| StatusError::not_found(&resource(), name).into())
    }

    async fn create(&self, obj: &SyncSetInstance) -> RegistryResult<SyncSetInstance> {
        let mut state = self.state.write().await;
        let name = obj.metadata.name.clone().unwrap_or_default();
        self.record(&mut state, Verb::Create, &name, Some(obj))?;

        if name.is_empty() {
            return Err(StatusError::new(
                StatusReason::Invalid,
                "SyncSetInstance is invalid: metadata.name: Required value",
            )
            .into());
        }
        if state.objects.contains_key(&self.key(&name)) {
            return Err(StatusError::already_exists(&resource(), &name).into());
        }

        let mut created = obj.clone();
        created.metadata.namespace = Some(self.namespace.clone());
        created.metadata.resource_version = Some(state.next_resource_version());
        if created.metadata.creation_timestamp.is_none() {
            created.metadata.creation_timestamp = Some(Time(Utc::now()));
        }
        state.objects.insert(self.key(&name), created.clone());

        Ok(created)
    }

    async fn update(&self, obj: &SyncSetInstance) -> RegistryResult<SyncSetInstance> {
        let mut state = self.state.write().await;
        let name = obj.metadata.name.clone().unwrap_or_default();
        self.record(&mut state, Verb::Update, &name, Some(obj))?;

        let current = state
            .objects
            .get(&self.key(&name))
            .ok_or_else(|| StatusError::not_found(&resource(), &name))?;

        if let Some(expected) = &obj.metadata.resource_version {
            if current.metadata.resource_version.as_ref() != Some(expected) {
                return Err(StatusError::conflict(
                    &resource(),
                    &name,
                    "the object has been modified; please apply your changes to the latest version and try again",
                )
                .into());
            }
        }

        let mut updated = obj.clone();
        updated.metadata.namespace = Some(self.namespace.clone());
        updated.metadata.resource_version = Some(state.next_resource_version());
        state.objects.insert(self.key(&name), updated.clone());

        Ok(updated)
    }

    async fn delete(&self, name: &str, options: &DeleteOptions) -> RegistryResult<()> {
        let mut state = self.state.write().await;
        self.record(&mut state, Verb::Delete, name, None)?;

        let key = self.key(name);
        if !state.objects.contains_key(&key) {
            return Err(StatusError::not_found(&resource(), name).into());
        }
        if !options.is_dry_run() {
            state.objects.remove(&key);
        }

        Ok(())
    }
}

/// One clause of a rendered label selector
#[derive(Debug, PartialEq)]
enum LabelTerm {
    Equals(String, String),
    NotEquals(String, String),
    In(String, Vec<String>),
    NotIn(String, Vec<String>),
    Exists(String),
    DoesNotExist(String),
}

impl LabelTerm {
    fn matches(&self, obj: &SyncSetInstance) -> bool {
        let label = |key: &str| {
            obj.metadata
                .labels
                .as_ref()
                .and_then(|labels| labels.get(key))
                .map(String::as_str)
        };

        match self {
            LabelTerm::Equals(key, value) => label(key) == Some(value.as_str()),
            LabelTerm::NotEquals(key, value) => label(key) != Some(value.as_str()),
            LabelTerm::In(key, values) => label(key).is_some_and(|l| values.iter().any(|v| v == l)),
            LabelTerm::NotIn(key, values) => {
                label(key).map_or(true, |l| values.iter().all(|v| v != l))
            }
            LabelTerm::Exists(key) => label(key).is_some(),
            LabelTerm::DoesNotExist(key) => label(key).is_none(),
        }
    }
}

/// Parse the selector syntax produced by `LabelSelector::to_query_string`
fn parse_label_selector(selector: &str) -> RegistryResult<Vec<LabelTerm>> {
    let mut clauses = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in selector.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                clauses.push(&selector[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    clauses.push(&selector[start..]);

    clauses
        .into_iter()
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(parse_label_term)
        .collect()
}

fn parse_label_term(clause: &str) -> RegistryResult<LabelTerm> {
    let set = |rest: &str| -> Option<Vec<String>> {
        let inner = rest.trim().strip_prefix('(')?.strip_suffix(')')?;
        Some(inner.split(',').map(|v| v.trim().to_string()).collect())
    };
    let invalid = || StatusError::bad_request(format!("unable to parse requirement: {:?}", clause));

    if let Some((key, rest)) = clause.split_once(" notin ") {
        let values = set(rest).ok_or_else(invalid)?;
        return Ok(LabelTerm::NotIn(key.trim().to_string(), values));
    }
    if let Some((key, rest)) = clause.split_once(" in ") {
        let values = set(rest).ok_or_else(invalid)?;
        return Ok(LabelTerm::In(key.trim().to_string(), values));
    }
    if let Some((key, value)) = clause.split_once("!=") {
        return Ok(LabelTerm::NotEquals(key.trim().to_string(), value.trim().to_string()));
    }
    if let Some((key, value)) = clause.split_once("==").or_else(|| clause.split_once('=')) {
        return Ok(LabelTerm::Equals(key.trim().to_string(), value.trim().to_string()));
    }
    if let Some(key) = clause.strip_prefix('!') {
        return Ok(LabelTerm::DoesNotExist(key.trim().to_string()));
    }
    if clause.contains(char::is_whitespace) {
        return Err(invalid().into());
    }
    Ok(LabelTerm::Exists(clause.to_string()))
}
