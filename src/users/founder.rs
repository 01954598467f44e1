use sqlx::{Pool, Postgres};
use tracing::{info, warn};

use super::{roles::Role, User};
use crate::omni_error::OmniError;

/// Makes sure the configured account holds the top rank.
/// This is the only way the first Fondateur comes to be, since
/// nobody else can grant that rank.
pub async fn guarantee_founder(username: &str, pool: &Pool<Postgres>) -> Result<(), OmniError> {
    let user = match User::get_by_username(username, pool).await {
        Ok(user) => user,
        Err(OmniError::ResourceNotFoundError) => {
            warn!("Founder account \"{username}\" does not exist yet, skipping promotion.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if user.role == Role::TOP {
        return Ok(());
    }

    let previous = user.role;
    let user = user.update_role(Role::TOP, pool).await?;
    info!(
        "Promoted {} from {} to {}.",
        user.username,
        previous.name(),
        user.role.name()
    );
    Ok(())
}
