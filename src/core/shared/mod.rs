pub mod models;
pub mod schema;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod utils;

pub use models::{ImageRecord, NewImageRecord};
pub use state::AppState;
pub use utils::{create_conn, run_migrations, DbPool};
