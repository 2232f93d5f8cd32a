//! HTML rendering for the gallery page
use super::types::{FaceCluster, GalleryView, HeadcountKey, StoredFile};
use crate::core::urls::ApiUrls;

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_index(view: &GalleryView) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Photo gallery</title>
<style>
body { font-family: sans-serif; margin: 2rem; }
.photos { display: flex; flex-wrap: wrap; gap: .5rem; }
.photos img { height: 120px; }
.face img.thumbnail { width: 96px; height: 96px; object-fit: cover; border-radius: 50%; }
</style>
</head>
<body>
"#,
    );

    html.push_str(&build_forms_html());

    html.push_str("<section id=\"by-headcount\">\n<h2>Photos by number of people</h2>\n");
    if view.images_by_number_of_people.is_empty() {
        html.push_str("<p class=\"empty\">No photos yet.</p>\n");
    }
    for (key, files) in &view.images_by_number_of_people {
        html.push_str(&format!(
            "<h3>{}</h3>\n{}",
            headcount_label(*key),
            build_photos_html(files)
        ));
    }
    html.push_str("</section>\n");

    html.push_str("<section id=\"by-face\">\n<h2>Photos by face</h2>\n");
    for cluster in &view.images_by_face {
        html.push_str(&build_face_html(cluster));
    }
    html.push_str("</section>\n</body>\n</html>\n");

    html
}

fn build_forms_html() -> String {
    format!(
        r#"<form method="post" action="{upload}" enctype="multipart/form-data">
<input type="file" name="files[]" accept="image/*" multiple required>
<button type="submit">Upload</button>
</form>
<form method="post" action="{reset}">
<button type="submit">Reset</button>
</form>
"#,
        upload = ApiUrls::UPLOAD,
        reset = ApiUrls::RESET
    )
}

fn headcount_label(key: HeadcountKey) -> String {
    match key {
        HeadcountKey::People(1) => "1 person".to_string(),
        HeadcountKey::People(count) => format!("{} people", count),
        HeadcountKey::Unknown => "Unknown".to_string(),
    }
}

fn build_photos_html(files: &[StoredFile]) -> String {
    let mut html = String::from("<div class=\"photos\">\n");
    for file in files {
        html.push_str(&format!(
            "<a href=\"{url}\"><img src=\"{url}\" alt=\"{name}\"></a>\n",
            url = escape_html(&file.url),
            name = escape_html(&file.name)
        ));
    }
    html.push_str("</div>\n");
    html
}

fn build_face_html(cluster: &FaceCluster) -> String {
    let mut html = format!(
        "<div class=\"face\" data-face-id=\"{}\">\n<img class=\"thumbnail\" src=\"{}\" alt=\"face\">\n<div class=\"photos\">\n",
        escape_html(&cluster.face_id),
        escape_html(&cluster.thumbnail_url())
    );
    for file in &cluster.files {
        html.push_str(&format!(
            "<a href=\"{url}\"><img src=\"{url}\" alt=\"{name}\"></a>\n",
            url = escape_html(&file.url),
            name = escape_html(&file.name)
        ));
    }
    html.push_str("</div>\n</div>\n");
    html
}
