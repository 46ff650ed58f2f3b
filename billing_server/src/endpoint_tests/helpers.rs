use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use billing_engine::db_types::{BillingCycle, OrderId, Payment, PaymentStatus, Plan, PlanId};
use bpg_common::{Money, Secret};
use chrono::{Duration, Utc};
use log::debug;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    config::{AuthConfig, ServerOptions},
};

pub const TEST_CALLBACK_SECRET: &str = "endpoint-test-callback-secret";

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("endpoint-test-jwt-secret-0123456789abcdef".to_string()) }
}

pub fn issue_token(sub: &str, company_id: &str) -> String {
    let claims = JwtClaims {
        sub: sub.to_string(),
        company_id: company_id.to_string(),
        role: "user".to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };
    TokenIssuer::new(&get_auth_config()).issue_token(&claims).expect("Failed to sign token")
}

pub async fn get_request(auth_header: &str, path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let mut req = TestRequest::get().uri(path);
    if !auth_header.is_empty() {
        req = req.insert_header(("Authorization", format!("Bearer {auth_header}")));
    }
    let app = App::new()
        .app_data(web::Data::new(get_auth_config()))
        .app_data(web::Data::new(ServerOptions { currency: "INR".to_string() }))
        .configure(configure);
    let service = test::init_service(app).await;
    debug!("Making GET request to {path}");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

pub async fn post_request(
    auth_header: &str,
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    let mut req = TestRequest::post().uri(path).set_json(&body);
    if !auth_header.is_empty() {
        req = req.insert_header(("Authorization", format!("Bearer {auth_header}")));
    }
    let app = App::new()
        .app_data(web::Data::new(get_auth_config()))
        .app_data(web::Data::new(ServerOptions { currency: "INR".to_string() }))
        .configure(configure);
    let service = test::init_service(app).await;
    debug!("Making POST request to {path}");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

pub fn sample_plan() -> Plan {
    Plan { id: PlanId::from("pro"), name: "Pro".to_string(), monthly_price: Money::from(999), created_at: Utc::now() }
}

/// A ledger entry as `insert_pending_payment` would return it.
pub fn payment_for(order_id: &str, company_id: &str, amount: i64, cycle: BillingCycle) -> Payment {
    let now = Utc::now();
    Payment {
        id: 1,
        user_id: "u_100".to_string(),
        company_id: company_id.to_string(),
        plan_id: PlanId::from("pro"),
        amount: Money::from(amount),
        currency: "INR".to_string(),
        billing_cycle: cycle,
        gateway_order_id: OrderId::from(order_id),
        gateway_payment_id: None,
        gateway_signature: None,
        status: PaymentStatus::Pending,
        invoice_number: None,
        created_at: now,
        updated_at: now,
    }
}
