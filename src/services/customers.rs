use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::customer::{Customer, CustomerListQuery};
use crate::domain::feature::Feature;
use crate::forms::customers::AddCustomerForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CustomerReader, CustomerWriter, FeatureReader, StoreReader};
use crate::services::{ServiceResult, authorize};

/// Query parameters accepted by the customers index page.
#[derive(Debug, Default, Deserialize)]
pub struct CustomersQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the customers index template.
pub struct CustomersPageData {
    pub customers: Paginated<Customer>,
    pub search: Option<String>,
}

/// Loads the customers page.
pub fn load_customers_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CustomersQuery,
) -> ServiceResult<CustomersPageData>
where
    R: StoreReader + FeatureReader + CustomerReader + ?Sized,
{
    let store = authorize(repo, user, Feature::Customers)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = CustomerListQuery::new(store.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = query.search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, customers) = repo.list_customers(list_query)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    Ok(CustomersPageData {
        customers: Paginated::new(customers, page, total_pages),
        search: query.search,
    })
}

/// Registers a customer for the authenticated user's store.
pub fn create_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCustomerForm,
) -> ServiceResult<Customer>
where
    R: StoreReader + FeatureReader + CustomerWriter + ?Sized,
{
    let store = authorize(repo, user, Feature::Customers)?;
    let payload = form.into_new_customer(store.id)?;
    Ok(repo.create_customer(&payload)?)
}

/// Removes a customer record.
pub fn remove_customer<R>(repo: &R, user: &AuthenticatedUser, customer_id: i32) -> ServiceResult<()>
where
    R: StoreReader + FeatureReader + CustomerWriter + ?Sized,
{
    let store = authorize(repo, user, Feature::Customers)?;
    Ok(repo.delete_customer(customer_id, store.id)?)
}
