#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use rental_admin::api::ApiClient;
use rental_admin::session::{Credential, Session};

pub const TOKEN: &str = "tok-123";
/// `admin:secret`
const BASIC_ADMIN: &str = "Basic YWRtaW46c2VjcmV0";

/// What the mock backend saw and holds
#[derive(Default)]
pub struct Backend {
    pub cars: Vec<Value>,
    pub customers: Vec<Value>,
    pub brands: Vec<Value>,
    pub images: Vec<Value>,
    /// `METHOD path?query` per request, in arrival order
    pub requests: Vec<String>,
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<Mutex<Backend>>,
}

impl MockBackend {
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().map(|s| s.requests.clone()).unwrap_or_default()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.requests().iter().filter(|r| r.starts_with(prefix)).count()
    }

    /// Client with no stored credential
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url, "/api", Session::in_memory()).expect("client")
    }

    /// Client already signed in with the backend's token
    pub fn signed_in_client(&self) -> ApiClient {
        let session = Session::in_memory();
        session.sign_in(&Credential::new(TOKEN, "admin")).expect("sign in");
        ApiClient::new(&self.base_url, "/api", session).expect("client")
    }
}

pub fn car(i: usize) -> Value {
    let brand = ["Skoda", "Toyota", "Fiat"][i % 3];
    let name = ["Octavia", "Corolla", "Panda"][i % 3];
    json!({
        "id": format!("car-{}", i),
        "model": {
            "id": format!("model-{}", i % 3),
            "brandName": brand,
            "name": name,
            "productionYear": 2020,
            "fuelType": "PETROL",
            "fuelCapacity": 50.0,
            "seatCount": 5,
            "doorCount": 5,
            "dailyRate": "149.00"
        },
        "location": {
            "id": "loc-1",
            "fullAddress": "Prosta 1, Warszawa, Polska",
            "latitude": 52.23,
            "longitude": 21.01
        }
    })
}

pub fn customer(i: usize) -> Value {
    let parity = if i % 2 == 0 { "even" } else { "odd" };
    json!({
        "id": format!("user-{}", i),
        "username": format!("user{}", i),
        "email": format!("user{}@{}.pl", i, parity),
    })
}

/// Start a mock backend with `cars` cars and `customers` customers on a free port
pub async fn spawn_backend(cars: usize, customers: usize) -> Result<MockBackend> {
    let state = Arc::new(Mutex::new(Backend {
        cars: (0..cars).map(car).collect(),
        customers: (0..customers).map(customer).collect(),
        brands: vec![json!({ "id": 1, "name": "Skoda", "shortName": "SK" })],
        images: Vec::new(),
        requests: Vec::new(),
    }));

    let app = Router::new()
        .route("/session", put(login))
        .route("/api/cars/", get(list_cars).post(create_car))
        .route("/api/cars/:id", get(get_car).put(update_car).delete(delete_car))
        .route("/api/customers/", get(list_customers).post(create_customer))
        .route("/api/customers/:id", get(get_customer).delete(delete_customer))
        .route("/api/brands/", get(list_brands).post(create_brand))
        .route("/api/fuel-types/", get(list_fuel_types))
        .route("/api/images/", get(list_images).post(upload_image))
        .with_state(state.clone());

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let backend = MockBackend {
        base_url: format!("http://127.0.0.1:{}", port),
        state,
    };
    wait_ready(&backend, Duration::from_secs(5)).await?;
    Ok(backend)
}

async fn wait_ready(backend: &MockBackend, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if tokio::net::TcpStream::connect(backend.base_url.trim_start_matches("http://")).await.is_ok() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("mock backend did not become ready on {} within {:?}", backend.base_url, timeout)
}

type Shared = State<Arc<Mutex<Backend>>>;

fn record(state: &Arc<Mutex<Backend>>, line: String) {
    if let Ok(mut s) = state.lock() {
        s.requests.push(line);
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn query_line(params: &HashMap<String, String>) -> String {
    let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    pairs.sort();
    pairs.join("&")
}

fn page_of(rows: &[Value], params: &HashMap<String, String>, filter_field: &str) -> Value {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let size: usize = params.get("size").and_then(|p| p.parse().ok()).unwrap_or(10);
    let matching: Vec<&Value> = rows
        .iter()
        .filter(|row| match params.get(filter_field) {
            Some(text) => row[filter_field].as_str().map(|v| v.contains(text.as_str())).unwrap_or(false),
            None => true,
        })
        .collect();
    let total_pages = matching.len().div_ceil(size);
    let content: Vec<&Value> = matching.iter().skip(page * size).take(size).copied().collect();
    json!({
        "content": content,
        "page": {
            "size": size,
            "number": page,
            "totalElements": matching.len(),
            "totalPages": total_pages,
        }
    })
}

async fn login(State(state): Shared, headers: HeaderMap) -> Response {
    record(&state, "PUT /session".to_string());
    let basic = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
    if basic != Some(BASIC_ADMIN) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (
        StatusCode::OK,
        [(header::SET_COOKIE, format!("administrator-token={}; Path=/; HttpOnly", TOKEN))],
        Json(json!({ "username": "admin" })),
    )
        .into_response()
}

async fn list_cars(State(state): Shared, headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    record(&state, format!("GET /api/cars/?{}", query_line(&params)));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Ok(s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    Json(page_of(&s.cars, &params, "id")).into_response()
}

async fn create_car(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record(&state, "POST /api/cars/".to_string());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Ok(mut s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let mut created = car(s.cars.len());
    created["id"] = json!(format!("car-new-{}", s.cars.len()));
    created["model"]["id"] = body["modelId"].clone();
    s.cars.push(created);
    StatusCode::CREATED.into_response()
}

async fn get_car(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    record(&state, format!("GET /api/cars/{}", id));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Ok(s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    match s.cars.iter().find(|c| c["id"] == id) {
        Some(c) => Json(c.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn update_car(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    record(&state, format!("PUT /api/cars/{}", id));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

/// `car-rented` is always out on a rental
async fn delete_car(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    record(&state, format!("DELETE /api/cars/{}", id));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id == "car-rented" {
        return StatusCode::CONFLICT.into_response();
    }
    let Ok(mut s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let before = s.cars.len();
    s.cars.retain(|c| c["id"] != id);
    if s.cars.len() == before {
        StatusCode::NOT_FOUND.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn list_customers(
    State(state): Shared,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record(&state, format!("GET /api/customers/?{}", query_line(&params)));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Ok(s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    Json(page_of(&s.customers, &params, "email")).into_response()
}

async fn create_customer(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record(&state, "POST /api/customers/".to_string());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Ok(mut s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    if s.customers.iter().any(|c| c["email"] == body["email"]) {
        return StatusCode::CONFLICT.into_response();
    }
    let id = format!("user-new-{}", s.customers.len());
    s.customers.push(json!({ "id": id, "username": "", "email": body["email"].clone() }));
    StatusCode::CREATED.into_response()
}

async fn get_customer(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    record(&state, format!("GET /api/customers/{}", id));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Ok(s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    match s.customers.iter().find(|c| c["id"] == id) {
        Some(c) => Json(c.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_customer(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    record(&state, format!("DELETE /api/customers/{}", id));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Ok(mut s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    s.customers.retain(|c| c["id"] != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_brands(State(state): Shared, headers: HeaderMap) -> Response {
    record(&state, "GET /api/brands/".to_string());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Ok(s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    Json(Value::Array(s.brands.clone())).into_response()
}

async fn create_brand(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record(&state, "POST /api/brands/".to_string());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Ok(mut s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let id = s.brands.len() + 1;
    s.brands.push(json!({ "id": id, "name": body["name"].clone(), "shortName": body["shortName"].clone() }));
    StatusCode::CREATED.into_response()
}

async fn list_fuel_types(State(state): Shared, headers: HeaderMap) -> Response {
    record(&state, "GET /api/fuel-types/".to_string());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!([{ "id": 1, "name": "PETROL" }, { "id": 2, "name": "DIESEL" }])).into_response()
}

async fn list_images(State(state): Shared, headers: HeaderMap) -> Response {
    record(&state, "GET /api/images/".to_string());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Ok(s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    Json(Value::Array(s.images.clone())).into_response()
}

/// Stores the `file` part's name, type and size; answers with `{ id, url }`
async fn upload_image(State(state): Shared, headers: HeaderMap, mut multipart: Multipart) -> Response {
    record(&state, "POST /api/images/".to_string());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut upload = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let Ok(bytes) = field.bytes().await else {
            return StatusCode::BAD_REQUEST.into_response();
        };
        upload = Some((file_name, content_type, bytes.len()));
    }
    let Some((file_name, content_type, size)) = upload else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let Ok(mut s) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let id = format!("00000000-0000-4000-8000-{:012}", s.images.len() + 1);
    let image = json!({
        "id": id,
        "url": format!("https://img.example/{}", file_name),
        "contentType": content_type,
        "size": size,
    });
    s.images.push(image.clone());
    (StatusCode::CREATED, Json(image)).into_response()
}
