use crate::entity::user::ADMIN_ROLE;

pub const RATING_RECALCULATE: &str = "rating:recalculate";

/// Permissions granted by a role. Unknown roles grant nothing.
pub fn permissions_for_role(role: &str) -> Vec<String> {
    match role {
        ADMIN_ROLE => vec![RATING_RECALCULATE.to_string()],
        _ => Vec::new(),
    }
}
