//! Typed wrapper over the HTTP API, for the front end and scripts.

use std::env;

use derive_more::Display;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::attendance::AttendanceReport;
use crate::api::health::HealthResponse;
use crate::error::ErrorBody;
use crate::model::attendance::{Attendance, DateRange, NewAttendance};
use crate::model::employee::{Employee, NewEmployee};
use crate::model::stats::DashboardStats;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Display)]
pub enum ClientError {
    #[display(fmt = "request failed: {}", _0)]
    Transport(reqwest::Error),

    #[display(fmt = "invalid url: {}", _0)]
    InvalidUrl(String),

    /// Non-2xx answer, with the `error` field of the body when there was one.
    #[display(fmt = "{}: {}", status, message)]
    Api { status: StatusCode, message: String },
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e)
    }
}

#[derive(Clone)]
pub struct HrmsClient {
    http: Client,
    base_url: String,
}

impl HrmsClient {
    /// `base_url` points at the API prefix, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Uses `HRMS_API_URL`, falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        Self::new(env::var("HRMS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>, ClientError> {
        let res = self.http.get(self.url("/employees")).send().await?;
        decode(res).await
    }

    pub async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee, ClientError> {
        let res = self
            .http
            .post(self.url("/employees"))
            .json(employee)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn delete_employee(&self, id: i32) -> Result<(), ClientError> {
        let res = self
            .http
            .delete(self.url(&format!("/employees/{id}")))
            .send()
            .await?;
        check(res).await.map(|_| ())
    }

    pub async fn attendance_for_employee(
        &self,
        employee_id: &str,
        range: Option<DateRange>,
    ) -> Result<AttendanceReport, ClientError> {
        let mut url = reqwest::Url::parse(&self.url("/attendance"))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .push(employee_id);

        if let Some(range) = range {
            url.query_pairs_mut()
                .append_pair("startDate", &range.start.to_string())
                .append_pair("endDate", &range.end.to_string());
        }

        let res = self.http.get(url).send().await?;
        decode(res).await
    }

    pub async fn mark_attendance(&self, mark: &NewAttendance) -> Result<Attendance, ClientError> {
        let res = self
            .http
            .post(self.url("/attendance"))
            .json(mark)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, ClientError> {
        let res = self.http.get(self.url("/stats/dashboard")).send().await?;
        decode(res).await
    }

    /// `/health` sits at the host root, whatever the API prefix is.
    fn health_url(&self) -> Result<reqwest::Url, ClientError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.set_path("/health");
        url.set_query(None);
        Ok(url)
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let res = self.http.get(self.health_url()?).send().await?;
        decode(res).await
    }
}

async fn check(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let message = match res.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unexpected response").to_string(),
    };
    Err(ClientError::Api { status, message })
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    Ok(check(res).await?.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;
    use crate::repository::HrmsRepository;
    use crate::routes;
    use crate::test_support::MemoryRepository;
    use actix_web::{App, HttpServer, web};
    use chrono::NaiveDate;
    use rstest::rstest;
    use std::sync::Arc;

    async fn spawn_server() -> (HrmsClient, actix_web::dev::ServerHandle) {
        let repo: Arc<dyn HrmsRepository> = MemoryRepository::shared();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::from(repo.clone()))
                .configure(|cfg| routes::configure(cfg, "/api"))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        (HrmsClient::new(format!("http://{addr}/api")), handle)
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HrmsClient::new("http://localhost:5000/api/");
        assert_eq!(client.url("/employees"), "http://localhost:5000/api/employees");
    }

    #[rstest]
    #[case("http://localhost:5000/api", "http://localhost:5000/health")]
    #[case("http://localhost:5000", "http://localhost:5000/health")]
    #[case("http://localhost:5000/", "http://localhost:5000/health")]
    #[case("https://hr.example.com/v1/hrms/api", "https://hr.example.com/health")]
    fn health_lives_at_the_host_root(#[case] base: &str, #[case] expected: &str) {
        let client = HrmsClient::new(base);
        assert_eq!(client.health_url().unwrap().as_str(), expected);
    }

    #[test]
    fn unparseable_base_url_is_reported() {
        let client = HrmsClient::new("not a url");
        assert!(matches!(client.health_url(), Err(ClientError::InvalidUrl(_))));
    }

    #[actix_web::test]
    async fn round_trip_through_the_live_api() {
        let (client, handle) = spawn_server().await;

        let created = client
            .create_employee(&NewEmployee {
                employee_id: "EMP-1".into(),
                full_name: "A B".into(),
                email: "a@x.com".into(),
                department: "Eng".into(),
            })
            .await
            .expect("create");
        assert_eq!(created.employee_id, "EMP-1");

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        client
            .mark_attendance(&NewAttendance {
                employee_id: "EMP-1".into(),
                date,
                status: AttendanceStatus::Present,
            })
            .await
            .expect("mark");

        let report = client
            .attendance_for_employee("EMP-1", Some(DateRange { start: date, end: date }))
            .await
            .expect("report");
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.summary.present, 1);

        let health = client.health().await.expect("health");
        assert_eq!(health.status, "ok");

        client.delete_employee(created.id).await.expect("delete");
        assert!(client.list_employees().await.expect("list").is_empty());

        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn api_errors_carry_the_server_message() {
        let (client, handle) = spawn_server().await;

        let employee = NewEmployee {
            employee_id: "EMP-1".into(),
            full_name: "A B".into(),
            email: "a@x.com".into(),
            department: "Eng".into(),
        };
        client.create_employee(&employee).await.expect("first");

        match client.create_employee(&employee).await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Employee ID or Email already exists");
            }
            other => panic!("expected an API error, got {other:?}"),
        }

        handle.stop(true).await;
    }
}
