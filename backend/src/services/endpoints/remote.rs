//! Concurrent queries against the configured endpoints.

use common::model::endpoint::EndpointDescriptor;
use common::model::remote::{RemoteResponses, RemoteResult};
use futures_util::future::join_all;
use reqwest::{Client, Method};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// HTTP client shared by every fetch. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct RemoteDataClient {
    http: Client,
    timeout: Duration,
}

impl RemoteDataClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mailforge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, timeout })
    }

    /// Checks every request body before anything is sent.
    pub fn validate_bodies(endpoints: &[EndpointDescriptor]) -> Result<(), Vec<String>> {
        let errors: Vec<String> = endpoints
            .iter()
            .filter_map(|e| e.json_body().err())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Queries all endpoints at once and waits for every one to settle.
    ///
    /// A failing endpoint only affects its own entry. Bodies are validated
    /// first; if any is invalid no request is made.
    pub async fn fetch_all(
        &self,
        endpoints: &[EndpointDescriptor],
    ) -> Result<RemoteResponses, Vec<String>> {
        Self::validate_bodies(endpoints)?;

        let results = join_all(endpoints.iter().map(|endpoint| async move {
            (endpoint.name.clone(), self.fetch(endpoint).await)
        }))
        .await;

        let failed = results.iter().filter(|(_, r)| !r.is_success()).count();
        log::info!(
            "Fetched {} endpoint(s): {} succeeded, {} failed",
            results.len(),
            results.len() - failed,
            failed
        );
        Ok(results.into_iter().collect())
    }

    /// Issues one request. Never fails: transport problems become a `Failure`.
    pub async fn fetch(&self, endpoint: &EndpointDescriptor) -> RemoteResult {
        let body = match endpoint.json_body() {
            Ok(body) => body,
            Err(message) => return RemoteResult::failure(message),
        };
        let method = match Method::from_bytes(endpoint.method.as_str().as_bytes()) {
            Ok(method) => method,
            Err(e) => return RemoteResult::failure(e.to_string()),
        };

        let mut request = self.http.request(method, &endpoint.url);
        if let Some(headers) = &endpoint.headers {
            for (name, value) in headers {
                request = request.header(name.as_str(), value.as_str());
            }
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                log::warn!("Endpoint {} timed out", endpoint.name);
                return RemoteResult::failure(format!(
                    "Request timed out after {} ms",
                    self.timeout.as_millis()
                ));
            }
            Err(e) => {
                log::warn!("Endpoint {} failed: {}", endpoint.name, e);
                return RemoteResult::failure(format!("Request failed: {}", e));
            }
        };

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let data = match response.text().await {
            Ok(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
            Err(e) => {
                return RemoteResult::Failure {
                    message: format!("Could not read the response: {}", e),
                    status: Some(status.as_u16()),
                    status_text: Some(status_text),
                    data: None,
                };
            }
        };

        if status.is_success() {
            RemoteResult::Success {
                data,
                status: status.as_u16(),
                status_text,
                headers,
            }
        } else {
            RemoteResult::Failure {
                message: format!("HTTP {} {}", status.as_u16(), status_text)
                    .trim_end()
                    .to_string(),
                status: Some(status.as_u16()),
                status_text: Some(status_text),
                data: Some(data),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use common::model::endpoint::HttpMethod;
    use std::net::TcpListener;

    fn endpoint(name: &str, url: String, method: HttpMethod, body: Option<&str>) -> EndpointDescriptor {
        EndpointDescriptor {
            id: name.to_lowercase(),
            name: name.to_string(),
            url,
            method,
            headers: None,
            body: body.map(str::to_string),
        }
    }

    /// Starts a local server with a fast JSON route, an echo route and a route
    /// slower than the client timeout.
    fn spawn_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = HttpServer::new(|| {
            App::new()
                .route(
                    "/user",
                    web::get().to(|| async { HttpResponse::Ok().json(serde_json::json!({ "name": "Ada" })) }),
                )
                .route(
                    "/echo",
                    web::post().to(|body: web::Json<Value>| async move { HttpResponse::Created().json(body.into_inner()) }),
                )
                .route(
                    "/slow",
                    web::get().to(|| async {
                        tokio::time::sleep(Duration::from_secs(3)).await;
                        HttpResponse::Ok().finish()
                    }),
                )
                .route(
                    "/missing",
                    web::get().to(|| async { HttpResponse::NotFound().json(serde_json::json!({ "error": "nope" })) }),
                )
        })
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();
        actix_web::rt::spawn(server);
        format!("http://{}", addr)
    }

    #[actix_web::test]
    async fn one_slow_endpoint_does_not_affect_the_others() {
        let base = spawn_server();
        let client = RemoteDataClient::new(Duration::from_millis(500)).unwrap();
        let endpoints = vec![
            endpoint("user", format!("{}/user", base), HttpMethod::Get, None),
            endpoint("echo", format!("{}/echo", base), HttpMethod::Post, Some("{\"n\": 1}")),
            endpoint("slow", format!("{}/slow", base), HttpMethod::Get, None),
        ];

        let responses = client.fetch_all(&endpoints).await.unwrap();
        assert_eq!(responses.len(), 3);
        match &responses["user"] {
            RemoteResult::Success { data, status, .. } => {
                assert_eq!(*status, 200);
                assert_eq!(data["name"], "Ada");
            }
            other => panic!("unexpected {:?}", other),
        }
        match &responses["echo"] {
            RemoteResult::Success { data, status, .. } => {
                assert_eq!(*status, 201);
                assert_eq!(data["n"], 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        match &responses["slow"] {
            RemoteResult::Failure { message, .. } => assert!(message.contains("timed out"), "{}", message),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[actix_web::test]
    async fn refused_connections_and_error_statuses_are_failures() {
        let base = spawn_server();
        let client = RemoteDataClient::new(Duration::from_millis(500)).unwrap();
        let endpoints = vec![
            endpoint("down", "http://127.0.0.1:1/".to_string(), HttpMethod::Get, None),
            endpoint("missing", format!("{}/missing", base), HttpMethod::Get, None),
        ];
        let responses = client.fetch_all(&endpoints).await.unwrap();
        assert!(!responses["down"].is_success());
        match &responses["missing"] {
            RemoteResult::Failure { status, data, .. } => {
                assert_eq!(*status, Some(404));
                assert_eq!(data.as_ref().unwrap()["error"], "nope");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[actix_web::test]
    async fn invalid_bodies_stop_the_whole_fetch() {
        let client = RemoteDataClient::new(Duration::from_millis(500)).unwrap();
        let endpoints = vec![
            endpoint("ok", "http://127.0.0.1:1/".to_string(), HttpMethod::Get, None),
            endpoint("bad", "http://127.0.0.1:1/".to_string(), HttpMethod::Post, Some("{invalid")),
        ];
        let errors = client.fetch_all(&endpoints).await.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("\"bad\""));
    }
}
