use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, CustomerListQuery, NewCustomer as DomainNewCustomer,
};
use crate::models::customer::{Customer as DbCustomer, NewCustomer as DbNewCustomer};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CustomerReader, CustomerWriter, DieselRepository};

impl CustomerReader for DieselRepository {
    fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCustomer>)> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let CustomerListQuery {
            store_id,
            search,
            pagination,
        } = query;

        let search_pattern = search.as_ref().map(|term| format!("%{term}%"));

        let mut count_query = customers::table
            .filter(customers::store_id.eq(store_id))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(
                customers::name
                    .like(pattern.clone())
                    .or(customers::phone.like(pattern.clone())),
            );
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = customers::table
            .filter(customers::store_id.eq(store_id))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            items = items.filter(
                customers::name
                    .like(pattern.clone())
                    .or(customers::phone.like(pattern.clone())),
            );
        }
        items = items.order(customers::id.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let rows = items.load::<DbCustomer>(&mut conn)?;

        Ok((total, rows.into_iter().map(DomainCustomer::from).collect()))
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(
        &self,
        new_customer: &DomainNewCustomer,
    ) -> RepositoryResult<DomainCustomer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let created: DbCustomer = diesel::insert_into(customers::table)
            .values(&DbNewCustomer::from(new_customer))
            .get_result(&mut conn)?;

        Ok(DomainCustomer::from(created))
    }

    fn delete_customer(&self, customer_id: i32, store_id: i32) -> RepositoryResult<()> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            customers::table
                .filter(customers::id.eq(customer_id))
                .filter(customers::store_id.eq(store_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
