pub mod format;
pub mod input;

pub use format::{DailyRecordView, HabitView};
pub use input::{DailyRecordPatch, HabitPatch, NewDailyRecord, NewHabit, ValidationErrors};
