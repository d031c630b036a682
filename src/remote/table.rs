use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// All table reads and writes go through the hosted service's REST surface;
/// no local persistence exists. Every call is authenticated with the
/// service role key and bounded by a fixed timeout.
#[derive(Clone)]
pub struct TableClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

impl TableClient {
    pub fn new(base_url: &str, service_key: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build table api client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Start a filtered read from `table`.
    pub fn from(&self, table: &'static str) -> TableQuery {
        TableQuery {
            client: self.clone(),
            table,
            select: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Insert one row. The service is asked not to echo it back.
    pub async fn insert<T: Serialize + ?Sized>(&self, table: &str, row: &T) -> anyhow::Result<()> {
        let resp = self
            .http
            .post(self.table_url(table))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .with_context(|| format!("insert into {table}"))?;
        check_status(resp, table).await
    }

    /// Patch every row matching the equality predicates.
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        patch: &T,
    ) -> anyhow::Result<()> {
        let query: Vec<(String, String)> = filters
            .iter()
            .map(|(column, value)| (column.to_string(), format!("eq.{value}")))
            .collect();
        let resp = self
            .http
            .patch(self.table_url(table))
            .query(&query)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await
            .with_context(|| format!("update {table}"))?;
        check_status(resp, table).await
    }
}

async fn check_status(resp: reqwest::Response, table: &str) -> anyhow::Result<()> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    anyhow::bail!("table {table}: upstream responded {status}: {body}")
}

/// One read, built up the way screens ask for data: equality predicates,
/// optional ordering and limit, embedded resources through `select`.
pub struct TableQuery {
    client: TableClient,
    table: &'static str,
    select: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<u32>,
}

impl TableQuery {
    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.asc"));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.desc"));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.select.clone())];
        pairs.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    pub async fn fetch<T: DeserializeOwned>(self) -> anyhow::Result<Vec<T>> {
        let url = self.client.table_url(self.table);
        let resp = self
            .client
            .http
            .get(url)
            .query(&self.query_pairs())
            .bearer_auth(&self.client.service_key)
            .header("apikey", &self.client.service_key)
            .send()
            .await
            .with_context(|| format!("select from {}", self.table))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("table {}: upstream responded {status}: {body}", self.table);
        }
        resp.json::<Vec<T>>()
            .await
            .with_context(|| format!("decode rows from {}", self.table))
    }

    /// First matching row, if any.
    pub async fn fetch_one<T: DeserializeOwned>(self) -> anyhow::Result<Option<T>> {
        let rows = self.limit(1).fetch::<T>().await?;
        Ok(rows.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TableClient {
        TableClient::new("http://localhost:54321/", "test-key").unwrap()
    }

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let c = client();
        assert_eq!(c.table_url("courses"), "http://localhost:54321/rest/v1/courses");
    }

    #[test]
    fn default_query_selects_everything() {
        let q = client().from("categories");
        assert_eq!(q.query_pairs(), vec![("select".to_string(), "*".to_string())]);
    }

    #[test]
    fn filters_order_and_limit_are_encoded() {
        let q = client()
            .from("courses")
            .select("*,instructors(id,name)")
            .eq("is_published", true)
            .order_desc("students_count")
            .limit(6);
        assert_eq!(
            q.query_pairs(),
            vec![
                ("select".to_string(), "*,instructors(id,name)".to_string()),
                ("is_published".to_string(), "eq.true".to_string()),
                ("order".to_string(), "students_count.desc".to_string()),
                ("limit".to_string(), "6".to_string()),
            ]
        );
    }

    #[test]
    fn ascending_order_is_encoded() {
        let q = client().from("lessons").eq("course_id", "abc").order_asc("order_index");
        let pairs = q.query_pairs();
        assert!(pairs.contains(&("order".to_string(), "order_index.asc".to_string())));
        assert!(pairs.contains(&("course_id".to_string(), "eq.abc".to_string())));
    }
}
