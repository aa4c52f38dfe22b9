pub mod collection;
pub mod item;

// Re-export handler functions for use in routing
pub use collection::get as records_get;
pub use collection::post as records_post;

pub use item::delete as record_delete;
pub use item::get as record_get;
pub use item::patch as record_patch;
pub use item::put as record_put;
