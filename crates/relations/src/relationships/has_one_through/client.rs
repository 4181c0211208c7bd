//! Per-owner facade over a has-one-through relationship

use crate::client::QueryClient;
use crate::error::RelationResult;
use crate::model::ModelRow;

use super::composer::{OneOrMany, QueryComposer};
use super::query::HasOneThroughQuery;
use super::HasOneThrough;

/// Binds a relationship to one owner row and a query client.
///
/// Holds nothing but the three borrowed parts, so it is cheap to build per
/// request and drop afterwards.
pub struct HasOneThroughClient<'a, O, C: ?Sized> {
    relation: &'a HasOneThrough,
    owner: &'a O,
    client: &'a C,
}

impl<'a, O, C> HasOneThroughClient<'a, O, C>
where
    O: ModelRow,
    C: QueryClient + ?Sized,
{
    /// Bind without booting. Booting happens when a query is requested.
    pub fn new(relation: &'a HasOneThrough, owner: &'a O, client: &'a C) -> Self {
        Self {
            relation,
            owner,
            client,
        }
    }

    pub fn relation(&self) -> &'a HasOneThrough {
        self.relation
    }

    pub fn owner(&self) -> &'a O {
        self.owner
    }

    /// Query for the related row of the bound owner
    pub fn query(&self) -> RelationResult<HasOneThroughQuery> {
        QueryComposer::query(self.client, self.relation, OneOrMany::One(self.owner))
    }
}
