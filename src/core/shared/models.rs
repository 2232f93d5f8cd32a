use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::schema;
pub use super::schema::images;

/// Headcount stored for one uploaded photo.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = images)]
pub struct ImageRecord {
    pub id: i32,
    pub file_name: String,
    pub number_of_people: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = images)]
pub struct NewImageRecord<'a> {
    pub file_name: &'a str,
    pub number_of_people: i32,
}
