//! Conversion logic between DTOs and domain value objects.

use crate::domain::{MessageContent, UserId, ValueObjectError};
use crate::infrastructure::dto::http as dto;

// ========================================
// DTO → Domain
// ========================================

impl dto::ChatRequest {
    /// Validate a chat request.
    ///
    /// The message must be non-blank. A missing or blank `user_id` falls
    /// back to the default web user.
    pub fn into_domain(self) -> Result<(MessageContent, UserId), ValueObjectError> {
        let content = MessageContent::new(self.message.unwrap_or_default())?;
        let user_id = optional_user_id(self.user_id).unwrap_or_else(UserId::web_user);
        Ok((content, user_id))
    }
}

impl TryFrom<dto::UserRequest> for UserId {
    type Error = ValueObjectError;

    fn try_from(request: dto::UserRequest) -> Result<Self, Self::Error> {
        UserId::new(request.user_id.unwrap_or_default())
    }
}

/// Blank identifiers count as absent
pub fn optional_user_id(value: Option<String>) -> Option<UserId> {
    value.and_then(|v| UserId::new(v).ok())
}
