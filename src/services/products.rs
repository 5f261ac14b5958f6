use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::feature::Feature;
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::AddProductForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{FeatureReader, ProductReader, ProductWriter, StoreReader};
use crate::services::{ServiceError, ServiceResult, authorize};

/// Query parameters accepted by the products index page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the products index template.
pub struct ProductsPageData {
    pub products: Paginated<Product>,
    pub search: Option<String>,
}

/// Loads the catalog page.
pub fn load_products_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<ProductsPageData>
where
    R: StoreReader + FeatureReader + ProductReader + ?Sized,
{
    let store = authorize(repo, user, Feature::Products)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = ProductListQuery::new(store.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = query.search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, products) = repo.list_products(list_query)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    Ok(ProductsPageData {
        products: Paginated::new(products, page, total_pages),
        search: query.search,
    })
}

/// Creates a product in the authenticated user's catalog.
pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddProductForm,
) -> ServiceResult<Product>
where
    R: StoreReader + FeatureReader + ProductWriter + ?Sized,
{
    let store = authorize(repo, user, Feature::Products)?;

    let payload = form
        .into_new_product(store.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_product(&payload)?)
}

/// Removes a product from the catalog.
pub fn remove_product<R>(repo: &R, user: &AuthenticatedUser, product_id: i32) -> ServiceResult<()>
where
    R: StoreReader + FeatureReader + ProductWriter + ?Sized,
{
    let store = authorize(repo, user, Feature::Products)?;
    Ok(repo.delete_product(product_id, store.id)?)
}
