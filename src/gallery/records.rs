//! Headcount rows in the `images` table. Diesel is blocking, so every call
//! runs on the blocking pool.

use super::error::GalleryError;
use crate::core::shared::models::{images, ImageRecord, NewImageRecord};
use crate::core::shared::DbPool;
use diesel::prelude::*;
use std::collections::HashMap;

async fn with_conn<T, F>(pool: &DbPool, f: F) -> Result<T, GalleryError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> Result<T, GalleryError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| GalleryError::Internal(format!("Database task failed: {}", e)))?
}

/// Headcounts for the given names. Names without a row are simply absent.
pub async fn find_headcounts(
    pool: &DbPool,
    file_names: Vec<String>,
) -> Result<HashMap<String, i32>, GalleryError> {
    if file_names.is_empty() {
        return Ok(HashMap::new());
    }

    with_conn(pool, move |conn| {
        let rows = images::table
            .filter(images::file_name.eq_any(file_names))
            .select(ImageRecord::as_select())
            .load::<ImageRecord>(conn)?;
        Ok(rows
            .into_iter()
            .map(|record| (record.file_name, record.number_of_people))
            .collect())
    })
    .await
}

pub async fn record_exists(pool: &DbPool, file_name: &str) -> Result<bool, GalleryError> {
    let file_name = file_name.to_string();
    with_conn(pool, move |conn| {
        let exists: bool = diesel::select(diesel::dsl::exists(
            images::table.filter(images::file_name.eq(&file_name)),
        ))
        .get_result(conn)?;
        Ok(exists)
    })
    .await
}

/// Inserts the headcount for a new photo. A row that already exists for the
/// name is left untouched.
pub async fn insert_record(
    pool: &DbPool,
    file_name: &str,
    number_of_people: i32,
) -> Result<(), GalleryError> {
    let file_name = file_name.to_string();
    with_conn(pool, move |conn| {
        diesel::insert_into(images::table)
            .values(&NewImageRecord {
                file_name: &file_name,
                number_of_people,
            })
            .on_conflict(images::file_name)
            .do_nothing()
            .execute(conn)?;
        Ok(())
    })
    .await
}

pub async fn delete_all(pool: &DbPool) -> Result<usize, GalleryError> {
    with_conn(pool, |conn| Ok(diesel::delete(images::table).execute(conn)?)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::{create_conn, run_migrations};

    fn test_pool() -> Option<DbPool> {
        // Skip test if no database is configured
        let database_url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                println!("Skipping test - TEST_DATABASE_URL not set");
                return None;
            }
        };
        let pool = create_conn(&database_url).ok()?;
        if let Err(e) = run_migrations(&pool) {
            println!("Skipping test - Cannot migrate database: {}", e);
            return None;
        }
        Some(pool)
    }

    #[tokio::test]
    async fn test_find_headcounts_loads_stored_rows() {
        let Some(pool) = test_pool() else { return };
        let names = ["records-a.jpg", "records-b.jpg"];

        insert_record(&pool, names[0], 3).await.unwrap();
        insert_record(&pool, names[1], 0).await.unwrap();
        // Existing rows keep their first headcount.
        insert_record(&pool, names[0], 7).await.unwrap();
        assert!(record_exists(&pool, names[0]).await.unwrap());

        let headcounts = find_headcounts(
            &pool,
            vec![
                names[0].to_string(),
                names[1].to_string(),
                "records-missing.jpg".to_string(),
            ],
        )
        .await
        .unwrap();

        assert_eq!(headcounts.len(), 2);
        assert_eq!(headcounts[names[0]], 3);
        assert_eq!(headcounts[names[1]], 0);

        let mut conn = pool.get().unwrap();
        diesel::delete(images::table.filter(images::file_name.eq_any(names)))
            .execute(&mut conn)
            .unwrap();
    }
}
