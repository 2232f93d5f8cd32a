use super::crop::{render_face_thumbnail, NormalizedBox};
use super::error::GalleryError;
use super::grouping::{group_by_face, group_by_headcount};
use super::html_renderers::render_index;
use super::records;
use super::types::{GalleryView, StoredFile};
use super::upload::PhotoUpload;
use super::PHOTOS_DIR;
use crate::botmodels::ensure_collection;
use crate::core::shared::state::AppState;
use crate::core::urls::ApiUrls;
use crate::drive::ImageStore;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use log::{debug, info};
use std::sync::Arc;

const UPLOAD_FIELDS: [&str; 2] = ["files", "files[]"];

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, GalleryError> {
    let view = build_gallery_view(&state).await?;
    Ok(Html(render_index(&view)))
}

pub async fn gallery_json(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GalleryView>, GalleryError> {
    Ok(Json(build_gallery_view(&state).await?))
}

pub async fn build_gallery_view(state: &AppState) -> Result<GalleryView, GalleryError> {
    let collection_id = state.collection_id();
    ensure_collection(state.recognizer.as_ref(), collection_id).await?;

    let files = list_stored_files(state.store.as_ref()).await?;
    let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
    let headcounts = records::find_headcounts(&state.conn, names).await?;

    let images_by_number_of_people = group_by_headcount(&files, &headcounts);
    let images_by_face = group_by_face(
        &files,
        state.recognizer.as_ref(),
        collection_id,
        state.store.as_ref(),
    )
    .await?;

    Ok(GalleryView {
        images_by_number_of_people,
        images_by_face,
    })
}

pub async fn list_stored_files(store: &dyn ImageStore) -> Result<Vec<StoredFile>, GalleryError> {
    let paths = store.files(PHOTOS_DIR).await?;
    Ok(paths
        .into_iter()
        .map(|path| StoredFile {
            name: path.rsplit('/').next().unwrap_or(&path).to_string(),
            url: store.url(&path),
        })
        .collect())
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Redirect, GalleryError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GalleryError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if !UPLOAD_FIELDS.contains(&name.as_str()) {
            debug!("Ignoring multipart field '{}'", name);
            continue;
        }

        let original_name = field.file_name().map(|s| s.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| GalleryError::Validation(e.body_text()))?;
        if bytes.is_empty() {
            continue;
        }

        uploads.push(PhotoUpload::from_bytes(
            original_name.as_deref(),
            bytes.to_vec(),
        )?);
    }

    if uploads.is_empty() {
        return Err(GalleryError::Validation(
            "At least one image file is required".to_string(),
        ));
    }

    ensure_collection(state.recognizer.as_ref(), state.collection_id()).await?;

    for photo in uploads {
        store_photo(&state, photo).await?;
    }

    Ok(Redirect::to(ApiUrls::INDEX))
}

/// Stores, indexes and records one photo. Returns false when the same bytes
/// were uploaded before.
async fn store_photo(state: &AppState, photo: PhotoUpload) -> Result<bool, GalleryError> {
    let file_name = photo.file_name();
    if records::record_exists(&state.conn, &file_name).await? {
        info!("Photo {} already uploaded, skipping", file_name);
        return Ok(false);
    }

    let path = format!("{}/{}", PHOTOS_DIR, file_name);
    state
        .store
        .put(&path, photo.bytes.clone(), photo.content_type())
        .await?;

    let response = state
        .recognizer
        .index_faces(state.collection_id(), photo.bytes, &file_name)
        .await?;
    let headcount = i32::try_from(response.headcount())
        .map_err(|_| GalleryError::Internal(format!("Headcount overflow for {}", file_name)))?;

    records::insert_record(&state.conn, &file_name, headcount).await?;
    info!("Uploaded {} with {} people", file_name, headcount);
    Ok(true)
}

pub async fn reset(State(state): State<Arc<AppState>>) -> Result<Redirect, GalleryError> {
    state
        .recognizer
        .delete_collection(state.collection_id())
        .await?;
    state.store.delete_directory(PHOTOS_DIR).await?;
    let deleted = records::delete_all(&state.conn).await?;

    info!("Gallery reset, removed {} image records", deleted);
    Ok(Redirect::to(ApiUrls::INDEX))
}

pub async fn show_face(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    Query(norm): Query<NormalizedBox>,
) -> Result<Response, GalleryError> {
    norm.validate()?;

    let bytes = state
        .store
        .get(&format!("{}/{}", PHOTOS_DIR, filename))
        .await?;

    let thumbnail = tokio::task::spawn_blocking(move || render_face_thumbnail(&bytes, &norm))
        .await
        .map_err(|e| GalleryError::Internal(format!("Thumbnail task failed: {}", e)))??;

    Ok(([(header::CONTENT_TYPE, thumbnail.content_type)], thumbnail.bytes).into_response())
}
