#[derive(Debug)]
pub struct ApiUrls;

impl ApiUrls {
    // Gallery pages
    pub const INDEX: &'static str = "/";
    pub const UPLOAD: &'static str = "/upload";
    pub const RESET: &'static str = "/reset";
    pub const FACE: &'static str = "/face/:filename";

    // JSON APIs
    pub const GALLERY: &'static str = "/api/gallery";
    pub const HEALTH: &'static str = "/api/health";

    // Public files of the local image store
    pub const STORAGE: &'static str = "/storage";
}
