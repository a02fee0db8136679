// handlers/protected/favs - favorites list CRUD under /api/favs
//
// Routes addressing one list (`/api/favs/:id`) run behind `load_favs`, which
// resolves the id once and hands the document to read/update/delete.

pub mod create;
pub mod delete;
pub mod list;
pub mod load;
pub mod read;
pub mod update;

pub use create::favs_create;
pub use delete::favs_delete;
pub use list::favs_list;
pub use load::{load_favs, LoadedFavs};
pub use read::favs_read;
pub use update::favs_update;
