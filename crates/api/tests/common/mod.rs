//! Shared harness for HTTP tests: in-memory database, fake sheet, session cookie.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;
use trantrac_api::{AppState, create_router, middleware::auth::SESSION_COOKIE};
use trantrac_core::auth::hash_password;
use trantrac_core::import::ImportNormalizer;
use trantrac_core::sheets::{SheetClient, SheetError};
use trantrac_db::{
    AccountRepository, CategoryRepository, CreateUserInput, UserRepository, entities::users,
    migration::Migrator,
};
use trantrac_shared::{JwtConfig, JwtService, SiteConfig};

pub const PASSWORD: &str = "password123";

/// Records appends and serves a fixed categories sheet.
#[derive(Debug, Default)]
pub struct FakeSheets {
    appends: Mutex<Vec<(String, Vec<Vec<String>>)>>,
    failing: Vec<&'static str>,
    rows: Option<Vec<Vec<String>>>,
}

impl FakeSheets {
    pub fn new() -> Self {
        Self {
            rows: Some(vec![]),
            ..Self::default()
        }
    }

    /// Appends to `sheet` fail.
    pub fn failing(mut self, sheet: &'static str) -> Self {
        self.failing.push(sheet);
        self
    }

    /// Reads return `rows`; `None` makes every read fail.
    pub fn with_rows(mut self, rows: Option<Vec<Vec<String>>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn appends(&self) -> Vec<(String, Vec<Vec<String>>)> {
        self.appends.lock().unwrap().clone()
    }

    /// Rows sent to one sheet, across all calls.
    pub fn rows_for(&self, sheet: &str) -> Vec<Vec<String>> {
        self.appends()
            .into_iter()
            .filter(|(name, _)| name == sheet)
            .flat_map(|(_, rows)| rows)
            .collect()
    }
}

#[async_trait]
impl SheetClient for FakeSheets {
    async fn append(&self, sheet: &str, rows: &[Vec<String>]) -> Result<(), SheetError> {
        if self.failing.iter().any(|failing| *failing == sheet) {
            return Err(SheetError::IncompleteAppend {
                expected: rows.len(),
                updated: 0,
            });
        }
        self.appends
            .lock()
            .unwrap()
            .push((sheet.to_string(), rows.to_vec()));
        Ok(())
    }

    async fn read(&self, _sheet: &str, _range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        self.rows.clone().ok_or_else(|| SheetError::Api {
            status: 403,
            body: "PERMISSION_DENIED".to_string(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub db: DatabaseConnection,
    pub sheets: Arc<FakeSheets>,
    pub jwt: Arc<JwtService>,
    pub user: users::Model,
}

impl TestApp {
    pub async fn spawn(sheets: FakeSheets) -> Self {
        let db = trantrac_db::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let user = UserRepository::new(db.clone())
            .create(CreateUserInput {
                email: "mario@example.com".to_string(),
                password_hash: hash_password(PASSWORD).unwrap(),
                display_name: "Mario".to_string(),
                ..CreateUserInput::default()
            })
            .await
            .unwrap();

        let sheets = Arc::new(sheets);
        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            session_expires_secs: 3600,
        }));
        let state = AppState {
            db: Arc::new(db.clone()),
            jwt_service: jwt.clone(),
            sheets: sheets.clone(),
            normalizer: Arc::new(ImportNormalizer::default()),
            site: Arc::new(SiteConfig::default()),
        };

        Self {
            router: create_router(state.clone()),
            state,
            db,
            sheets,
            jwt,
            user,
        }
    }

    /// Categories `Food > Groceries`, `Casa > Bollette`, accounts `Conto Comune`, `Mario`.
    pub async fn seed(&self) {
        let categories = CategoryRepository::new(self.db.clone());
        let food = categories.create("Food").await.unwrap();
        categories.create_subcategory(food.id, "Groceries", true).await.unwrap();
        let casa = categories.create("Casa").await.unwrap();
        categories.create_subcategory(casa.id, "Bollette", true).await.unwrap();

        let accounts = AccountRepository::new(self.db.clone());
        accounts.create("Conto Comune").await.unwrap();
        accounts.create("Mario").await.unwrap();
    }

    pub fn session_cookie(&self) -> String {
        let token = self
            .jwt
            .generate_session_token(self.user.id, &self.user.email)
            .unwrap();
        format!("{SESSION_COOKIE}={token}")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::get(uri)
                .header(header::COOKIE, self.session_cookie())
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn get_htmx(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::get(uri)
                .header(header::COOKIE, self.session_cookie())
                .header("HX-Request", "true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response<Body> {
        self.send(
            Request::post(uri)
                .header(header::COOKIE, self.session_cookie())
                .header("HX-Request", "true")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn upload(&self, file_name: &str, content: &str) -> Response<Body> {
        let boundary = "----trantrac-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"csv_file\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        );
        self.send(
            Request::post("/upload_csv/")
                .header(header::COOKIE, self.session_cookie())
                .header("HX-Request", "true")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
