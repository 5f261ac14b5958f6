use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
};
use crate::models::product::{NewProduct as DbNewProduct, Product as DbProduct};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProductReader, ProductWriter};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .filter(products::store_id.eq(store_id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(DomainProduct::from))
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let ProductListQuery {
            store_id,
            search,
            pagination,
        } = query;

        let search_pattern = search.as_ref().map(|term| format!("%{term}%"));

        let mut count_query = products::table
            .filter(products::store_id.eq(store_id))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(
                products::name
                    .like(pattern.clone())
                    .or(products::sku.like(pattern.clone())),
            );
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = products::table
            .filter(products::store_id.eq(store_id))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(ref pattern) = search_pattern {
            items = items.filter(
                products::name
                    .like(pattern.clone())
                    .or(products::sku.like(pattern.clone())),
            );
        }
        items = items.order(products::id.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let rows = items.load::<DbProduct>(&mut conn)?;

        Ok((total, rows.into_iter().map(DomainProduct::from).collect()))
    }

    fn count_low_stock(&self, store_id: i32, threshold: i32) -> RepositoryResult<i64> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let count = products::table
            .filter(products::store_id.eq(store_id))
            .filter(products::stock.le(threshold))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let created: DbProduct = diesel::insert_into(products::table)
            .values(&DbNewProduct::from(new_product))
            .get_result(&mut conn)?;

        Ok(DomainProduct::from(created))
    }

    fn delete_product(&self, product_id: i32, store_id: i32) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            products::table
                .filter(products::id.eq(product_id))
                .filter(products::store_id.eq(store_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
