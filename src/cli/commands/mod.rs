mod magasin;
mod user;

pub use magasin::{cmd_magasin_add, cmd_magasin_list};
pub use user::{UserArgs, cmd_user_add};
