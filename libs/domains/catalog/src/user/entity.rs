use sea_orm::entity::prelude::*;
use std::collections::BTreeSet;

use super::models::User;
use crate::category::Category;

/// Sea-ORM entity for the `users` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub registered_at: DateTimeUtc,
    pub avatar_url: String,
    pub balance: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_user(self, categories: BTreeSet<Category>) -> User {
        User {
            id: Some(self.id),
            name: self.name,
            bio: self.bio,
            registered_at: self.registered_at,
            avatar_url: self.avatar_url,
            balance: self.balance,
            categories,
        }
    }
}
