use crate::{transport_error, BackendClient};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::AppError;

/// Sort direction for `order` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

impl OrderDirection {
    fn suffix(self) -> &'static str {
        match self {
            OrderDirection::Ascending => "asc",
            OrderDirection::Descending => "desc",
        }
    }
}

/// A row query against one table, in the backend's PostgREST dialect.
/// Built up by value and consumed by one of the terminal operations.
pub struct QueryBuilder {
    client: BackendClient,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
}

impl QueryBuilder {
    pub(crate) fn new(client: BackendClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            select: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Column list to return, e.g. `"auth_id,email,role"`.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    /// Equality filter on a column.
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Order by a column; repeated calls append further sort keys.
    pub fn order(mut self, column: &str, direction: OrderDirection) -> Self {
        self.order.push(format!("{}.{}", column, direction.suffix()));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Run the query and deserialize the matching rows.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>, AppError> {
        let url = self.build_url()?;
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_rest_response(status, &body));
        }
        response.json::<Vec<T>>().await.map_err(transport_error)
    }

    /// Exact row count without fetching rows: a HEAD request asking the
    /// backend to report the total in the `Content-Range` header. Doubles as
    /// a cheap probe that the table is reachable at all.
    pub async fn count(self) -> Result<u64, AppError> {
        let url = self.build_url()?;
        let response = self
            .client
            .request(reqwest::Method::HEAD, url)
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_rest_response(status, &body));
        }

        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| AppError::internal("count response missing Content-Range total"))
    }

    /// Insert a single row. The response body is not requested.
    pub async fn insert<T: Serialize>(self, row: &T) -> Result<(), AppError> {
        let url = self.build_url()?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_rest_response(status, &body));
        }
        Ok(())
    }

    fn build_url(&self) -> Result<reqwest::Url, AppError> {
        let raw = format!("{}/rest/v1/{}", self.client.config().url, self.table);
        let mut url = reqwest::Url::parse(&raw)
            .map_err(|e| AppError::internal(format!("invalid query URL {}: {}", raw, e)))?;
        let has_params = self.select.is_some()
            || !self.filters.is_empty()
            || !self.order.is_empty()
            || self.limit.is_some();
        if has_params {
            let mut pairs = url.query_pairs_mut();
            if let Some(select) = &self.select {
                pairs.append_pair("select", select);
            }
            for (column, predicate) in &self.filters {
                pairs.append_pair(column, predicate);
            }
            if !self.order.is_empty() {
                pairs.append_pair("order", &self.order.join(","));
            }
            if let Some(limit) = self.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        Ok(url)
    }
}

/// Total from a `Content-Range` value like `0-24/3573` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BackendConfig;
    use pretty_assertions::assert_eq;

    fn client() -> BackendClient {
        BackendClient::new(BackendConfig::new("http://localhost:54321", "anon-key")).unwrap()
    }

    #[test]
    fn url_carries_select_filter_order_and_limit() {
        let url = client()
            .from("centers")
            .select("id,name,type,district")
            .eq("is_active", "true")
            .order("district", OrderDirection::Ascending)
            .order("name", OrderDirection::Ascending)
            .limit(1)
            .build_url()
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:54321/rest/v1/centers?select=id%2Cname%2Ctype%2Cdistrict&is_active=eq.true&order=district.asc%2Cname.asc&limit=1"
        );
    }

    #[test]
    fn eq_filter_uses_postgrest_predicate_syntax() {
        let url = client()
            .from("users")
            .eq("auth_id", "4f9cd2d3-32ac-47b9-a9b1-6cd17e4d73a2")
            .build_url()
            .unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("auth_id=eq.4f9cd2d3-32ac-47b9-a9b1-6cd17e4d73a2"));
    }

    #[test]
    fn bare_table_url_has_no_query_string() {
        let url = client().from("users").build_url().unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(url.as_str(), "http://localhost:54321/rest/v1/users");
    }

    #[test]
    fn content_range_total_is_parsed() {
        assert_eq!(parse_content_range("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("*/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn descending_order_uses_desc_suffix() {
        let url = client()
            .from("centers")
            .order("name", OrderDirection::Descending)
            .build_url()
            .unwrap();
        assert!(url.query().unwrap().contains("order=name.desc"));
    }
}
