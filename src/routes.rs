use crate::{
    auth::{auth_dto, auth_handlers},
    feedback::{feedback_dto, feedback_handlers, feedback_models},
    history::{history_handlers, history_models},
    location::{location_handlers, location_models},
    middleware::auth_middleware,
    missed::{missed_dto, missed_handlers, missed_models},
    notification::{notification_dto, notification_handlers},
    reminder::{reminder_dto, reminder_handlers, reminder_models},
    schedule::{schedule_dto, schedule_handlers, schedule_models},
    state::AppState,
    tip::{tip_dto, tip_handlers, tip_models},
    user::{user_dto, user_handlers, user_models},
};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::request_password_reset,
        user_handlers::get_all_users,
        user_handlers::create_user,
        user_handlers::get_user_by_id,
        user_handlers::update_user,
        user_handlers::delete_user,
        user_handlers::get_user_profile,
        user_handlers::update_user_profile,
        user_handlers::get_user_email,
        user_handlers::update_user_email,
        user_handlers::get_notification_settings,
        user_handlers::update_notification_settings,
        user_handlers::update_fcm_token,
        user_handlers::update_timezone,
        schedule_handlers::get_schedules,
        schedule_handlers::get_user_schedules,
        schedule_handlers::get_schedule,
        schedule_handlers::create_schedule,
        schedule_handlers::update_schedule,
        schedule_handlers::delete_schedule,
        reminder_handlers::get_reminders,
        reminder_handlers::get_user_reminders,
        reminder_handlers::get_reminder,
        reminder_handlers::create_reminder,
        reminder_handlers::update_reminder,
        reminder_handlers::delete_reminder,
        missed_handlers::get_missed_pickups,
        missed_handlers::get_missed_pickup,
        missed_handlers::get_missed_by_schedule,
        missed_handlers::get_missed_by_user,
        missed_handlers::create_missed_pickup,
        missed_handlers::update_missed_pickup,
        missed_handlers::delete_missed_pickup,
        feedback_handlers::get_all_feedback,
        feedback_handlers::get_feedback,
        feedback_handlers::create_feedback,
        feedback_handlers::update_feedback,
        feedback_handlers::delete_feedback,
        tip_handlers::get_tips,
        tip_handlers::get_tip,
        tip_handlers::create_tip,
        tip_handlers::update_tip,
        tip_handlers::delete_tip,
        history_handlers::get_history,
        history_handlers::create_history,
        location_handlers::get_locations,
        location_handlers::get_location,
        location_handlers::create_location,
        location_handlers::update_location,
        location_handlers::delete_location,
        notification_handlers::send_notification,
        notification_handlers::send_multicast_notification,
    ),
    components(
        schemas(
            auth_dto::RegisterRequest,
            auth_dto::LoginRequest,
            auth_dto::PasswordResetRequest,
            auth_dto::AuthResponse,
            auth_dto::MessageResponse,
            user_dto::UserRequest,
            user_dto::ProfileRequest,
            user_dto::EmailRequest,
            user_dto::NotificationSettings,
            user_dto::UpdateFcmTokenRequest,
            user_dto::UpdateTimezoneRequest,
            user_models::UserResponse,
            schedule_dto::ScheduleRequest,
            schedule_models::Schedule,
            reminder_dto::ReminderRequest,
            reminder_models::Reminder,
            missed_dto::MissedPickupRequest,
            missed_models::MissedPickup,
            feedback_dto::FeedbackRequest,
            feedback_models::FeedbackResponse,
            tip_dto::TipRequest,
            tip_models::TipResponse,
            history_models::History,
            history_models::HistoryRequest,
            location_models::PickupLocation,
            location_models::PickupLocationRequest,
            notification_dto::NotificationRequest,
            notification_dto::MulticastRequest,
            notification_dto::SendResponse,
            notification_dto::MulticastResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "User accounts and profile settings"),
        (name = "schedules", description = "Pickup schedules"),
        (name = "reminders", description = "Pickup reminders"),
        (name = "missed", description = "Missed pickup reports"),
        (name = "feedback", description = "User feedback"),
        (name = "tips", description = "Waste management tips"),
        (name = "history", description = "Collection history"),
        (name = "pickup-locations", description = "Pickup locations"),
        (name = "notifications", description = "Push notifications")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route(
            "/request-password-reset",
            post(auth_handlers::request_password_reset),
        );

    let user_routes = Router::new()
        .route(
            "/",
            get(user_handlers::get_all_users).post(user_handlers::create_user),
        )
        .route(
            "/:id",
            get(user_handlers::get_user_by_id)
                .put(user_handlers::update_user)
                .delete(user_handlers::delete_user),
        )
        .route(
            "/:id/profile",
            get(user_handlers::get_user_profile).put(user_handlers::update_user_profile),
        )
        .route(
            "/:id/profile/email",
            get(user_handlers::get_user_email).put(user_handlers::update_user_email),
        )
        .route(
            "/:id/profile/notifications",
            get(user_handlers::get_notification_settings)
                .put(user_handlers::update_notification_settings),
        )
        .route("/:id/fcm-token", put(user_handlers::update_fcm_token))
        .route("/:id/timezone", put(user_handlers::update_timezone));

    let schedule_routes = Router::new()
        .route(
            "/",
            get(schedule_handlers::get_schedules).post(schedule_handlers::create_schedule),
        )
        .route("/user", get(schedule_handlers::get_user_schedules))
        .route(
            "/:id",
            get(schedule_handlers::get_schedule)
                .put(schedule_handlers::update_schedule)
                .delete(schedule_handlers::delete_schedule),
        );

    let reminder_routes = Router::new()
        .route(
            "/",
            get(reminder_handlers::get_reminders).post(reminder_handlers::create_reminder),
        )
        .route("/user", get(reminder_handlers::get_user_reminders))
        .route(
            "/:id",
            get(reminder_handlers::get_reminder)
                .put(reminder_handlers::update_reminder)
                .delete(reminder_handlers::delete_reminder),
        );

    let missed_routes = Router::new()
        .route(
            "/",
            get(missed_handlers::get_missed_pickups).post(missed_handlers::create_missed_pickup),
        )
        .route(
            "/schedule/:schedule_id",
            get(missed_handlers::get_missed_by_schedule),
        )
        .route("/user/:user_id", get(missed_handlers::get_missed_by_user))
        .route(
            "/:id",
            get(missed_handlers::get_missed_pickup)
                .put(missed_handlers::update_missed_pickup)
                .delete(missed_handlers::delete_missed_pickup),
        );

    let feedback_routes = Router::new()
        .route(
            "/",
            get(feedback_handlers::get_all_feedback).post(feedback_handlers::create_feedback),
        )
        .route(
            "/:id",
            get(feedback_handlers::get_feedback)
                .put(feedback_handlers::update_feedback)
                .delete(feedback_handlers::delete_feedback),
        );

    let tip_routes = Router::new()
        .route("/", get(tip_handlers::get_tips).post(tip_handlers::create_tip))
        .route(
            "/:id",
            get(tip_handlers::get_tip)
                .put(tip_handlers::update_tip)
                .delete(tip_handlers::delete_tip),
        );

    let history_routes = Router::new().route(
        "/",
        get(history_handlers::get_history).post(history_handlers::create_history),
    );

    let location_routes = Router::new()
        .route(
            "/",
            get(location_handlers::get_locations).post(location_handlers::create_location),
        )
        .route(
            "/:id",
            get(location_handlers::get_location)
                .put(location_handlers::update_location)
                .delete(location_handlers::delete_location),
        );

    let notification_routes = Router::new()
        .route("/send", post(notification_handlers::send_notification))
        .route(
            "/send-multicast",
            post(notification_handlers::send_multicast_notification),
        );

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/schedule", schedule_routes)
        .nest("/reminder", reminder_routes)
        .nest("/missed", missed_routes)
        .nest("/feedback", feedback_routes)
        .nest("/tip", tip_routes)
        .nest("/history", history_routes)
        .nest("/pickup-locations", location_routes)
        .nest("/notifications", notification_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::LogSender;
    use crate::state::Config;
    use crate::store::{MemoryStore, Record, RecordStore, StoreResult};
    use crate::user::user_models::DEFAULT_ROLE;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        app_with(Arc::new(MemoryStore::new()))
    }

    fn app_with(store: Arc<dyn RecordStore>) -> Router {
        let state = AppState::new(Arc::new(Config::default()), store, Arc::new(LogSender));
        create_router(state)
    }

    /// Memory store where every delete loses a race: the record is still
    /// readable but the delete finds nothing to remove.
    #[derive(Default)]
    struct LostDeleteStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl RecordStore for LostDeleteStore {
        async fn list(&self, collection: &str) -> StoreResult<Vec<Record>> {
            self.inner.list(collection).await
        }

        async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Record>> {
            self.inner.get(collection, id).await
        }

        async fn get_by_field(
            &self,
            collection: &str,
            field: &str,
            value: &Value,
        ) -> StoreResult<Vec<Record>> {
            self.inner.get_by_field(collection, field, value).await
        }

        async fn create(&self, collection: &str, data: Value) -> StoreResult<Record> {
            self.inner.create(collection, data).await
        }

        async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<Record> {
            self.inner.update(collection, id, data).await
        }

        async fn delete(&self, _collection: &str, _id: &str) -> StoreResult<bool> {
            Ok(false)
        }
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// Registers a user and returns `(user_id, token)`.
    async fn register(app: &Router, email: &str) -> (String, String) {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": email,
                "password": "secret-password",
                "firstName": "Ama",
                "lastName": "Mensah",
                "username": email.split('@').next().unwrap(),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        (
            body["userId"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    fn reminder_body(date: &str) -> Value {
        json!({
            "title": "Bins out",
            "reminderMessage": "General waste goes out tonight",
            "reminderDate": date,
        })
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = app();

        let (status, _) = call(&app, Method::GET, "/api/reminder", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(&app, Method::GET, "/api/schedule", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_after_register() {
        let app = app();
        register(&app, "ama@example.com").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "ama@example.com", "password": "secret-password"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().is_some());

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "ama@example.com", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let app = app();
        register(&app, "ama@example.com").await;

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": "ama@example.com",
                "password": "another-password",
                "firstName": "Ama",
                "lastName": "Mensah",
                "username": "ama2",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_reminder_ownership() {
        let app = app();
        let (owner_id, owner) = register(&app, "owner@example.com").await;
        let (_, intruder) = register(&app, "intruder@example.com").await;

        let (status, created) = call(
            &app,
            Method::POST,
            "/api/reminder",
            Some(&owner),
            Some(reminder_body("2024-06-01T07:00:00")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["userId"], owner_id.as_str());
        let uri = format!("/api/reminder/{}", created["reminderId"].as_str().unwrap());

        let (status, _) = call(
            &app,
            Method::PUT,
            &uri,
            Some(&intruder),
            Some(reminder_body("2024-06-02T07:00:00")),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(&app, Method::DELETE, &uri, Some(&intruder), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, mine) = call(&app, Method::GET, "/api/reminder/user", Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine.as_array().unwrap().len(), 1);

        let (status, _) = call(&app, Method::DELETE, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, Method::GET, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reminder_with_bad_date_is_rejected() {
        let app = app();
        let (_, token) = register(&app, "ama@example.com").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/reminder",
            Some(&token),
            Some(reminder_body("tomorrow morning")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("tomorrow morning"));
    }

    #[tokio::test]
    async fn test_location_coordinates_validated() {
        let app = app();
        let (_, token) = register(&app, "ama@example.com").await;

        let location = |lat: f64| {
            json!({
                "siteName": "Kaneshie Depot",
                "wasteType": "Plastic",
                "address": "Kaneshie, Accra",
                "latitude": lat,
                "longitude": -0.23,
            })
        };

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/pickup-locations",
            Some(&token),
            Some(location(91.0)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, created) = call(
            &app,
            Method::POST,
            "/api/pickup-locations",
            Some(&token),
            Some(location(5.57)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(!created["id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timezone_update_validates_zone_name() {
        let app = app();
        let (user_id, token) = register(&app, "ama@example.com").await;
        let uri = format!("/api/users/{}/timezone", user_id);

        let (status, _) = call(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"timezone": "Atlantis/Capital"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"timezone": "Africa/Accra"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timezone"], "Africa/Accra");
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn test_feedback_carries_author_email() {
        let app = app();
        let (_, token) = register(&app, "ama@example.com").await;

        let (status, created) = call(
            &app,
            Method::POST,
            "/api/feedback",
            Some(&token),
            Some(json!({"title": "Late truck", "description": "Came two hours late"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "PENDING");

        let (status, all) = call(&app, Method::GET, "/api/feedback", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all[0]["userEmail"], "ama@example.com");
    }

    #[tokio::test]
    async fn test_direct_and_multicast_sends() {
        let app = app();
        let (_, token) = register(&app, "ama@example.com").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/notifications/send",
            Some(&token),
            Some(json!({"token": "device-1", "title": "Hello", "body": "World"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/notifications/send-multicast",
            Some(&token),
            Some(json!({"tokens": ["a", "b", "c"], "title": "Hello", "body": "World"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["successCount"], 3);
        assert_eq!(body["total"], 3);
    }

    #[tokio::test]
    async fn test_missed_reports_filter_by_schedule() {
        let app = app();
        let (_, token) = register(&app, "ama@example.com").await;

        let (status, schedule) = call(
            &app,
            Method::POST,
            "/api/schedule",
            Some(&token),
            Some(json!({
                "title": "Recycling",
                "pickupDate": "2024-06-03",
                "pickupTime": "08:00",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let schedule_id = schedule["scheduleId"].as_str().unwrap();

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/missed",
            Some(&token),
            Some(json!({
                "title": "Not collected",
                "description": "Bins still full",
                "scheduleId": schedule_id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, reports) = call(
            &app,
            Method::GET,
            &format!("/api/missed/schedule/{}", schedule_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reports.as_array().unwrap().len(), 1);
        assert!(reports[0]["reportDateTime"].is_string());
    }

    #[tokio::test]
    async fn test_missed_report_delete_that_finds_nothing_is_not_found() {
        let app = app_with(Arc::new(LostDeleteStore::default()));
        let (_, token) = register(&app, "ama@example.com").await;

        let (status, report) = call(
            &app,
            Method::POST,
            "/api/missed",
            Some(&token),
            Some(json!({"title": "Not collected", "description": "Bins still full"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/missed/{}", report["missedId"].as_str().unwrap());

        let (status, body) = call(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Missed pickup report not found");
    }

    #[tokio::test]
    async fn test_missed_report_second_delete_is_not_found() {
        let app = app();
        let (_, token) = register(&app, "ama@example.com").await;

        let (_, report) = call(
            &app,
            Method::POST,
            "/api/missed",
            Some(&token),
            Some(json!({"title": "Not collected", "description": "Bins still full"})),
        )
        .await;
        let uri = format!("/api/missed/{}", report["missedId"].as_str().unwrap());

        let (status, _) = call(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_and_email_endpoints() {
        let app = app();
        let (user_id, token) = register(&app, "ama@example.com").await;
        register(&app, "kofi@example.com").await;
        let profile = format!("/api/users/{}/profile", user_id);
        let email = format!("/api/users/{}/profile/email", user_id);

        let (status, body) = call(
            &app,
            Method::PUT,
            &profile,
            Some(&token),
            Some(json!({"firstName": "Ama", "lastName": "Owusu", "phoneNumber": "+233200000000"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lastName"], "Owusu");

        let (status, body) = call(&app, Method::GET, &profile, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phoneNumber"], "+233200000000");

        let (status, _) = call(
            &app,
            Method::PUT,
            &email,
            Some(&token),
            Some(json!({"email": "kofi@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = call(
            &app,
            Method::PUT,
            &email,
            Some(&token),
            Some(json!({"email": "ama.owusu@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "ama.owusu@example.com");

        let (status, body) = call(&app, Method::GET, &email, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "ama.owusu@example.com");
    }

    #[test]
    fn test_openapi_documents_profile_routes() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = &doc["paths"];

        let profile = &paths["/api/users/{user_id}/profile"];
        assert!(profile["get"].is_object());
        assert!(profile["put"].is_object());
        let email = &paths["/api/users/{user_id}/profile/email"];
        assert!(email["get"].is_object());
        assert!(email["put"]["responses"]["409"].is_object());
    }

    #[tokio::test]
    async fn test_owner_cannot_promote_themselves() {
        let app = app();
        let (user_id, token) = register(&app, "ama@example.com").await;

        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/api/users/{}", user_id),
            Some(&token),
            Some(json!({
                "username": "ama",
                "email": "ama@example.com",
                "role": "ADMIN",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], DEFAULT_ROLE);

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/users",
            Some(&token),
            Some(json!({
                "username": "helper",
                "email": "helper@example.com",
                "password": "secret-password",
                "role": "ADMIN",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["role"], DEFAULT_ROLE);
    }
}
