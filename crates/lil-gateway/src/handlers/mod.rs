mod health;
mod link;
mod redirect;

pub use health::{health_handler, welcome_handler};
pub use link::{create_link_handler, delete_link_handler, get_link_handler, search_links_handler};
pub use redirect::resolve_handler;
