use diesel::prelude::*;

use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};
use crate::models::user::{NewUser as DbNewUser, User as DbUser};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_username(
        &self,
        store_id: i32,
        username: &str,
    ) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        // The username column is COLLATE NOCASE; lookups ignore case.
        let user = users::table
            .filter(users::store_id.eq(store_id))
            .filter(users::username.eq(username.trim()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(DomainUser::from))
    }

    fn list_users(&self, store_id: i32) -> RepositoryResult<Vec<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let rows = users::table
            .filter(users::store_id.eq(store_id))
            .order(users::username.asc())
            .load::<DbUser>(&mut conn)?;

        Ok(rows.into_iter().map(DomainUser::from).collect())
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let existing = users::table
            .filter(users::store_id.eq(new_user.store_id))
            .filter(users::username.eq(new_user.username.trim()))
            .first::<DbUser>(&mut conn)
            .optional()?;
        if existing.is_some() {
            return Err(RepositoryError::Conflict(format!(
                "username `{}` already exists",
                new_user.username
            )));
        }

        let created: DbUser = diesel::insert_into(users::table)
            .values(&DbNewUser::from(new_user))
            .get_result(&mut conn)?;

        Ok(DomainUser::from(created))
    }
}
