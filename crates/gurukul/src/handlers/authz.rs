//! Role gates for API handlers.
//!
//! Creation, listing, deletion, and grading routes are restricted to
//! teachers and admins; read-by-id and export routes only require
//! authentication.

use gurukul_core::classroom::User;

use super::AppError;

/// Requires the teacher or admin role.
pub fn require_staff(user: &User) -> Result<(), AppError> {
    if user.role.is_staff() {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, role = ?user.role, "Authorization denied");
        Err(AppError::forbidden("Requires teacher or admin role"))
    }
}
