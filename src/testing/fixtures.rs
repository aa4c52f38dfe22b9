use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::database::models::{DailyRecord, DailyRecordDetail, Habit, HabitWithStats, RecordSummary};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture date")
}

pub fn habit(user_id: Uuid, target: i32) -> Habit {
    Habit {
        id: Uuid::new_v4(),
        user_id,
        name: "Test Habit".to_string(),
        description: "A test habit".to_string(),
        target,
        unit: "times".to_string(),
        success: false,
        created_at: Utc::now(),
    }
}

pub fn habit_with_stats(habit: Habit, username: &str) -> HabitWithStats {
    HabitWithStats {
        habit,
        username: username.to_string(),
        total: None,
        average: None,
        best: None,
        records: Vec::new(),
    }
}

pub fn record(habit: &Habit, day: &str, amount: i32) -> DailyRecord {
    DailyRecord {
        id: Uuid::new_v4(),
        habit_id: habit.id,
        date: date(day),
        amount_achieved: amount,
    }
}

pub fn record_detail(habit: &Habit, day: &str, amount: i32) -> DailyRecordDetail {
    DailyRecordDetail {
        record: record(habit, day, amount),
        target: habit.target,
        unit: habit.unit.clone(),
        owner_id: habit.user_id,
    }
}

pub fn summary(habit_id: Uuid, day: &str, amount: i32) -> RecordSummary {
    RecordSummary {
        id: Uuid::new_v4(),
        habit_id,
        date: date(day),
        amount_achieved: amount,
    }
}
