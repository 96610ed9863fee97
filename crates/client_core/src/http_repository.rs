//! [`RecordsRepository`] over a SharePoint-style list REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use shared::{
    domain::{Customer, CustomerId},
    error::ServiceError,
    protocol::{ListItem, ListItemWrite, ListItemsEnvelope},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{error::RepositoryError, HostContext, RecordsRepository, Session};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const ACCEPT_NOMETADATA: &str = "application/json;odata=nometadata";
// Upper bound the list service accepts for a single unpaged read.
const LIST_ITEM_LIMIT: usize = 5000;

pub struct HttpListRepository {
    http: Client,
    items_url: Url,
    list_name: String,
    session: Session,
}

impl HttpListRepository {
    pub fn new(
        site_url: &str,
        list_name: &str,
        context: &HostContext,
    ) -> Result<Self, RepositoryError> {
        Self::with_timeout(site_url, list_name, context, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        site_url: &str,
        list_name: &str,
        context: &HostContext,
        timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            items_url: items_url(site_url, list_name)?,
            list_name: list_name.to_string(),
            session: context.session.clone(),
        })
    }

    fn item_url(&self, id: CustomerId) -> Url {
        let mut url = self.items_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop().push(&format!("items({})", id.0));
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(header::ACCEPT, ACCEPT_NOMETADATA);
        match &self.session.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl RecordsRepository for HttpListRepository {
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let response = self
            .request(Method::GET, self.items_url.clone())
            .query(&[("$top", LIST_ITEM_LIMIT)])
            .send()
            .await?;
        let envelope: ListItemsEnvelope = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RepositoryError::InvalidResponse(e.to_string()))?;

        debug!(
            list = %self.list_name,
            count = envelope.value.len(),
            "repository: listed items"
        );
        if is_full_page(envelope.value.len()) {
            warn!(
                list = %self.list_name,
                limit = LIST_ITEM_LIMIT,
                "repository: listing hit the item limit; later items are not loaded"
            );
        }
        Ok(envelope.value.into_iter().map(Customer::from).collect())
    }

    async fn add(&self, customer: &Customer) -> Result<Customer, RepositoryError> {
        let response = self
            .request(Method::POST, self.items_url.clone())
            .json(&ListItemWrite::from(customer))
            .send()
            .await?;
        let created: ListItem = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RepositoryError::InvalidResponse(e.to_string()))?;

        info!(list = %self.list_name, item_id = created.id, "repository: item added");
        Ok(Customer::from(created))
    }

    async fn update(&self, id: CustomerId, customer: &Customer) -> Result<(), RepositoryError> {
        let response = self
            .request(Method::POST, self.item_url(id))
            .header("X-HTTP-Method", "MERGE")
            .header(header::IF_MATCH, "*")
            .json(&ListItemWrite::from(customer))
            .send()
            .await?;
        check_status(response).await?;

        info!(list = %self.list_name, item_id = id.0, "repository: item updated");
        Ok(())
    }
}

fn items_url(site_url: &str, list_name: &str) -> Result<Url, RepositoryError> {
    let site_url = site_url.trim();
    let mut url = Url::parse(site_url)
        .map_err(|e| RepositoryError::InvalidUrl(format!("'{site_url}': {e}")))?;
    let list_segment = format!("getbytitle('{}')", list_name.replace('\'', "''"));

    url.path_segments_mut()
        .map_err(|()| RepositoryError::InvalidUrl(format!("'{site_url}' cannot be a base url")))?
        .pop_if_empty()
        .extend(["_api", "web", "lists", list_segment.as_str(), "items"]);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

async fn check_status(response: Response) -> Result<Response, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = ServiceError::from_body(&body)
        .map(|err| err.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED => RepositoryError::Unauthorized,
        StatusCode::FORBIDDEN => RepositoryError::Forbidden(message),
        StatusCode::NOT_FOUND => RepositoryError::NotFound(message),
        _ => RepositoryError::Status {
            status: status.as_u16(),
            message,
        },
    })
}

fn is_full_page(count: usize) -> bool {
    count >= LIST_ITEM_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_items_url_below_site_path() {
        let url = items_url("https://contoso.example/sites/ops/", "Customers").expect("url");
        assert_eq!(
            url.as_str(),
            "https://contoso.example/sites/ops/_api/web/lists/getbytitle('Customers')/items"
        );
    }

    #[test]
    fn escapes_quotes_and_spaces_in_list_title() {
        let url = items_url("https://contoso.example", "Rig Owner's List").expect("url");
        assert_eq!(
            url.as_str(),
            "https://contoso.example/_api/web/lists/getbytitle('Rig%20Owner''s%20List')/items"
        );
    }

    #[test]
    fn rejects_unparseable_site_url() {
        let err = items_url("not a url", "Customers").expect_err("must fail");
        assert!(matches!(err, RepositoryError::InvalidUrl(_)));
    }

    #[test]
    fn item_url_addresses_single_item() {
        let repository =
            HttpListRepository::new("https://contoso.example/sites/ops", "Customers", &HostContext::default())
                .expect("repository");
        assert_eq!(
            repository.item_url(CustomerId(7)).as_str(),
            "https://contoso.example/sites/ops/_api/web/lists/getbytitle('Customers')/items(7)"
        );
    }

    #[test]
    fn listing_at_the_item_limit_counts_as_truncated() {
        assert!(!is_full_page(0));
        assert!(!is_full_page(LIST_ITEM_LIMIT - 1));
        assert!(is_full_page(LIST_ITEM_LIMIT));
    }
}
