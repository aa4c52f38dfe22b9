pub mod daily_record;
pub mod habit;
pub mod user;

pub use daily_record::{DailyRecord, DailyRecordDetail, RecordSummary};
pub use habit::{Habit, HabitWithStats};
pub use user::User;
