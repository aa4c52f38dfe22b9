pub mod collection;
pub mod item;

// Re-export handler functions for use in routing
pub use collection::get as habits_get;
pub use collection::post as habits_post;

pub use item::delete as habit_delete;
pub use item::get as habit_get;
pub use item::patch as habit_patch;
pub use item::put as habit_put;
