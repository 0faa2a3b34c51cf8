pub mod db;
pub mod export;

pub use db::PgAdminStore;
pub use export::{ExportError, ExportedFile, JsonExporter};
