//! HasOneThrough relationship - one related model reached through an
//! intermediate model, e.g. `Mechanic -> Car -> Owner`.
//!
//! A definition is created once per owner model and shared by every query
//! built for it. Keys are resolved lazily on first boot and cached together
//! with the dereferenced model descriptors.

mod client;
mod composer;
mod query;


use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::debug;

use crate::client::QueryClient;
use crate::config::RelationConfig;
use crate::error::{RelationError, RelationResult};
use crate::model::{ModelDescriptor, ModelRef, ModelRow, RelatedHolder};
use crate::naming::{ConventionalNamingStrategy, NamingStrategy};

use super::keys::KeyResolver;
use super::metadata::{RelationshipType, ThroughKeys, ThroughRelationOptions};

pub use client::HasOneThroughClient;
pub use composer::{OneOrMany, QueryComposer};
pub use query::{HasOneThroughQuery, HasOneThroughSubQuery, QueryHook, QueryKind};

/// State captured by a successful boot
#[derive(Debug)]
pub(crate) struct BootedRelation {
    pub(crate) keys: ThroughKeys,
    pub(crate) owner: Arc<ModelDescriptor>,
    pub(crate) through: Arc<ModelDescriptor>,
    pub(crate) related: Arc<ModelDescriptor>,
}

/// Has-one-through relationship definition
pub struct HasOneThrough {
    relation_name: String,
    owner: ModelRef,
    related: ModelRef,
    options: ThroughRelationOptions,
    serialize_as: String,
    naming: Arc<dyn NamingStrategy>,
    config: RelationConfig,
    state: OnceCell<BootedRelation>,
    boot_lock: Mutex<Option<RelationError>>,
    failed_boots: AtomicUsize,
}

impl HasOneThrough {
    pub fn new(
        relation_name: &str,
        related: impl Into<ModelRef>,
        options: ThroughRelationOptions,
        owner: impl Into<ModelRef>,
    ) -> Self {
        let serialize_as = options
            .serialize_as
            .clone()
            .unwrap_or_else(|| relation_name.to_string());

        Self {
            relation_name: relation_name.to_string(),
            owner: owner.into(),
            related: related.into(),
            options,
            serialize_as,
            naming: Arc::new(ConventionalNamingStrategy::default()),
            config: RelationConfig::default(),
            state: OnceCell::new(),
            boot_lock: Mutex::new(None),
            failed_boots: AtomicUsize::new(0),
        }
    }

    /// Use a custom naming strategy for default keys
    pub fn with_naming_strategy(mut self, naming: Arc<dyn NamingStrategy>) -> Self {
        self.naming = naming;
        self
    }

    /// Apply configuration. Also resets the naming strategy to the
    /// conventional one for the configured foreign key convention.
    pub fn with_config(mut self, config: RelationConfig) -> Self {
        self.naming = Arc::new(ConventionalNamingStrategy::from(&config));
        self.config = config;
        self
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn relationship_type(&self) -> RelationshipType {
        RelationshipType::HasOneThrough
    }

    /// Alias related data is attached under
    pub fn serialize_as(&self) -> &str {
        &self.serialize_as
    }

    pub fn options(&self) -> &ThroughRelationOptions {
        &self.options
    }

    pub fn config(&self) -> &RelationConfig {
        &self.config
    }

    pub fn on_query(&self) -> Option<&QueryHook> {
        self.options.on_query.as_ref()
    }

    /// Resolve keys. A no-op once booted; a failed boot leaves the
    /// relationship unbooted.
    pub fn boot(&self) -> RelationResult<()> {
        self.boot_once().map(|_| ())
    }

    pub fn is_booted(&self) -> bool {
        self.state.get().is_some()
    }

    /// Drop any resolved state and resolve keys again
    pub fn reboot(&mut self) -> RelationResult<()> {
        debug!(relation = %self.relation_name, "rebooting has-one-through relationship");
        self.state.take();
        self.boot()
    }

    /// Resolved keys, booting first when auto boot is enabled
    pub fn keys(&self) -> RelationResult<&ThroughKeys> {
        Ok(&self.booted()?.keys)
    }

    /// Alias under which a through-table column is selected by preload queries
    pub fn through_alias(&self, key: &str) -> String {
        format!("through_{}", key)
    }

    pub(crate) fn booted(&self) -> RelationResult<&BootedRelation> {
        if let Some(booted) = self.state.get() {
            return Ok(booted);
        }

        if self.config.auto_boot {
            self.boot_once()
        } else {
            Err(RelationError::UnbootedRelationAccess {
                relation: self.relation_name.clone(),
            })
        }
    }

    /// Run at most one resolution at a time. Callers that were already
    /// waiting when an attempt failed receive that attempt's error instead of
    /// resolving again; calls made after the failure retry.
    fn boot_once(&self) -> RelationResult<&BootedRelation> {
        if let Some(booted) = self.state.get() {
            return Ok(booted);
        }

        let observed_failures = self.failed_boots.load(Ordering::Acquire);
        let mut last_error = self
            .boot_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(booted) = self.state.get() {
            return Ok(booted);
        }
        if self.failed_boots.load(Ordering::Acquire) != observed_failures {
            if let Some(err) = last_error.as_ref() {
                return Err(err.clone());
            }
        }

        match self.resolve() {
            Ok(booted) => {
                *last_error = None;
                Ok(self.state.get_or_init(|| booted))
            }
            Err(err) => {
                *last_error = Some(err.clone());
                self.failed_boots.fetch_add(1, Ordering::AcqRel);
                Err(err)
            }
        }
    }

    fn resolve(&self) -> RelationResult<BootedRelation> {
        let owner = self.owner.resolve();
        let through = self.options.through.resolve();
        let related = self.related.resolve();

        let keys = KeyResolver {
            relation: RelationshipType::HasOneThrough,
            relation_name: &self.relation_name,
            owner: &owner,
            through: &through,
            related: &related,
            naming: self.naming.as_ref(),
        }
        .resolve(&self.options.keys)?;

        debug!(
            relation = %format!("{}.{}", owner.name(), self.relation_name),
            local_key = %keys.local_key.attribute,
            foreign_key = %keys.foreign_key.attribute,
            through_local_key = %keys.through_local_key.attribute,
            through_foreign_key = %keys.through_foreign_key.attribute,
            "booted has-one-through relationship"
        );

        Ok(BootedRelation {
            keys,
            owner,
            through,
            related,
        })
    }

    /// Attach at most one related row to an owner. `None` records "no match".
    pub fn set_related<O, R>(&self, owner: &mut O, related: Option<R>) -> RelationResult<()>
    where
        O: RelatedHolder<R>,
    {
        self.booted()?;
        owner.set_related(&self.serialize_as, related);
        Ok(())
    }

    /// Attach a related row, replacing any previously attached one
    pub fn push_related<O, R>(&self, owner: &mut O, related: R) -> RelationResult<()>
    where
        O: RelatedHolder<R>,
    {
        self.set_related(owner, Some(related))
    }

    /// Pair related rows with their owners by key value.
    ///
    /// A related row's key is read from the preload alias selected by eager
    /// queries, falling back to the foreign key attribute. When several
    /// related rows carry the same key, the first one wins. Owners without a
    /// local key value never match.
    pub fn set_related_for_many<O, R>(&self, owners: &mut [O], related: &[R]) -> RelationResult<()>
    where
        O: RelatedHolder<R>,
        R: ModelRow + Clone,
    {
        let keys = &self.booted()?.keys;
        let alias = self.through_alias(&keys.foreign_key.column);

        let mut index: HashMap<String, &R> = HashMap::with_capacity(related.len());
        for row in related {
            let value = row
                .get_attribute(&alias)
                .or_else(|| row.get_attribute(&keys.foreign_key.attribute));
            if let Some(key) = value.and_then(comparable_key) {
                index.entry(key).or_insert(row);
            }
        }

        for owner in owners.iter_mut() {
            let matched = owner
                .get_attribute(&keys.local_key.attribute)
                .and_then(comparable_key)
                .and_then(|key| index.get(&key))
                .map(|row| (*row).clone());
            owner.set_related(&self.serialize_as, matched);
        }

        Ok(())
    }

    /// Bind the relationship to one owner row
    pub fn client<'a, O, C>(
        &'a self,
        owner: &'a O,
        client: &'a C,
    ) -> RelationResult<HasOneThroughClient<'a, O, C>>
    where
        O: ModelRow,
        C: QueryClient + ?Sized,
    {
        self.booted()?;
        Ok(HasOneThroughClient::new(self, owner, client))
    }

    /// Query for the related row(s) of the given owner(s)
    pub fn query<C, R>(&self, client: &C, owners: OneOrMany<'_, R>) -> RelationResult<HasOneThroughQuery>
    where
        C: QueryClient + ?Sized,
        R: ModelRow,
    {
        QueryComposer::query(client, self, owners)
    }

    /// Preload query for many owners
    pub fn eager_query<C, R>(&self, client: &C, owners: OneOrMany<'_, R>) -> RelationResult<HasOneThroughQuery>
    where
        C: QueryClient + ?Sized,
        R: ModelRow,
    {
        QueryComposer::eager_query(client, self, owners)
    }

    /// Query without owner constraint, for embedding in another query
    pub fn sub_query<C>(&self, client: &C) -> RelationResult<HasOneThroughSubQuery>
    where
        C: QueryClient + ?Sized,
    {
        QueryComposer::sub_query(client, self)
    }

    /// Copy the definition onto another owner model. The copy is unbooted.
    pub fn clone_for(&self, owner: impl Into<ModelRef>) -> Self {
        Self {
            relation_name: self.relation_name.clone(),
            owner: owner.into(),
            related: self.related.clone(),
            options: self.options.clone(),
            serialize_as: self.serialize_as.clone(),
            naming: Arc::clone(&self.naming),
            config: self.config.clone(),
            state: OnceCell::new(),
            boot_lock: Mutex::new(None),
            failed_boots: AtomicUsize::new(0),
        }
    }
}

impl fmt::Debug for HasOneThrough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HasOneThrough")
            .field("relation_name", &self.relation_name)
            .field("serialize_as", &self.serialize_as)
            .field("options", &self.options)
            .field("config", &self.config)
            .field("keys", &self.state.get().map(|booted| &booted.keys))
            .finish()
    }
}

/// Comparable form of a key value; `None` for null, which never matches.
///
/// Numbers compare by numeric value, so `1` and `1.0` are the same key.
pub(crate) fn comparable_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(format!("s:{}", s)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(format!("n:{}", i))
            } else if let Some(u) = n.as_u64() {
                Some(format!("n:{}", u))
            } else {
                let f = n.as_f64()?;
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Some(format!("n:{}", f as i64))
                } else {
                    Some(format!("n:{}", f))
                }
            }
        }
        other => Some(other.to_string()),
    }
}
