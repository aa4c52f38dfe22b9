//! Ownership checks shared by habits and daily records.
//!
//! A habit is owned directly through its `user_id`; a daily record is owned
//! through the habit it belongs to. Both expose the same capability so the
//! handlers never need to know which shape they hold.

use uuid::Uuid;

use crate::database::models::{DailyRecordDetail, Habit};
use crate::services::ServiceError;

pub trait OwnedEntity {
    /// The user that ultimately owns this entity, if it has an owner at all
    fn owner_user_id(&self) -> Option<Uuid>;
}

impl OwnedEntity for Habit {
    fn owner_user_id(&self) -> Option<Uuid> {
        Some(self.user_id)
    }
}

impl OwnedEntity for DailyRecordDetail {
    fn owner_user_id(&self) -> Option<Uuid> {
        Some(self.owner_id)
    }
}

pub fn is_owner<E: OwnedEntity + ?Sized>(requester: Uuid, entity: &E) -> bool {
    entity.owner_user_id() == Some(requester)
}

pub fn ensure_owner<E: OwnedEntity + ?Sized>(
    requester: Uuid,
    entity: &E,
    message: &str,
) -> Result<(), ServiceError> {
    if is_owner(requester, entity) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(message.to_string()))
    }
}
