//! Query composition for has-one-through relationships

use std::collections::HashSet;

use serde_json::Value;
use tracing::trace;

use crate::client::QueryClient;
use crate::error::{RelationError, RelationResult};
use crate::model::ModelRow;

use super::query::{HasOneThroughQuery, QueryKind};
use super::{comparable_key, BootedRelation, HasOneThrough};

/// One owner row or a batch of owner rows
#[derive(Debug)]
pub enum OneOrMany<'a, R> {
    One(&'a R),
    Many(&'a [R]),
}

impl<'a, R> Clone for OneOrMany<'a, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, R> Copy for OneOrMany<'a, R> {}

/// Builds the related, preload and sub query shapes for a relationship.
///
/// Every shape selects from the related table joined to the through table on
/// `through.through_local_key = related.through_foreign_key`.
pub struct QueryComposer;

impl QueryComposer {
    /// Query constrained to the given owner(s)
    pub fn query<C, R>(
        client: &C,
        relation: &HasOneThrough,
        owners: OneOrMany<'_, R>,
    ) -> RelationResult<HasOneThroughQuery>
    where
        C: QueryClient + ?Sized,
        R: ModelRow,
    {
        Self::compose(client, relation, Some(owners), QueryKind::Related)
    }

    /// Same as [`QueryComposer::query`], flagged for preloading
    pub fn eager_query<C, R>(
        client: &C,
        relation: &HasOneThrough,
        owners: OneOrMany<'_, R>,
    ) -> RelationResult<HasOneThroughQuery>
    where
        C: QueryClient + ?Sized,
        R: ModelRow,
    {
        Self::compose(client, relation, Some(owners), QueryKind::Preload)
    }

    /// Join without any owner constraint
    pub fn sub_query<C>(client: &C, relation: &HasOneThrough) -> RelationResult<HasOneThroughQuery>
    where
        C: QueryClient + ?Sized,
    {
        Self::compose::<C, Value>(client, relation, None, QueryKind::Sub)
    }

    fn compose<C, R>(
        client: &C,
        relation: &HasOneThrough,
        owners: Option<OneOrMany<'_, R>>,
        kind: QueryKind,
    ) -> RelationResult<HasOneThroughQuery>
    where
        C: QueryClient + ?Sized,
        R: ModelRow,
    {
        let booted = relation.booted()?;
        let keys = &booted.keys;
        let related_table = booted.related.table();
        let through_table = booted.through.table();

        let through_foreign_column = format!("{}.{}", through_table, keys.foreign_key.column);

        let mut builder = client.query_builder().from(related_table).join(
            through_table,
            &format!("{}.{}", through_table, keys.through_local_key.column),
            &format!("{}.{}", related_table, keys.through_foreign_key.column),
        );

        match owners {
            Some(OneOrMany::One(owner)) => {
                let value = owner_key_value(relation, booted, owner)?;
                builder = builder.where_eq(&through_foreign_column, value);
            }
            Some(OneOrMany::Many(owners)) => {
                let mut seen = HashSet::new();
                let mut values = Vec::with_capacity(owners.len());
                for owner in owners {
                    let value = owner_key_value(relation, booted, owner)?;
                    if comparable_key(&value).map_or(false, |key| seen.insert(key)) {
                        values.push(value);
                    }
                }
                builder = builder.where_in(&through_foreign_column, values);
            }
            None => {}
        }

        if kind == QueryKind::Preload {
            builder.set_preload(true);
        }

        let mut query = HasOneThroughQuery::new(
            builder,
            kind,
            related_table,
            &through_foreign_column,
            &relation.through_alias(&keys.foreign_key.column),
            &keys.local_key.column,
        );

        if let Some(hook) = relation.on_query() {
            hook(&mut query)?;
        }

        trace!(
            relation = %relation.relation_name(),
            kind = ?kind,
            backend = client.backend_name(),
            "composed has-one-through query"
        );

        Ok(query)
    }
}

/// Local key value of an owner. Missing and null values are rejected.
fn owner_key_value<R: ModelRow>(
    relation: &HasOneThrough,
    booted: &BootedRelation,
    owner: &R,
) -> RelationResult<Value> {
    match owner.get_attribute(&booted.keys.local_key.attribute) {
        Some(value) if !value.is_null() => Ok(value.clone()),
        _ => Err(RelationError::MissingLocalKeyValue {
            relation: format!("{}.{}", booted.owner.name(), relation.relation_name()),
            model: booted.owner.name().to_string(),
            key: booted.keys.local_key.attribute.clone(),
        }),
    }
}
