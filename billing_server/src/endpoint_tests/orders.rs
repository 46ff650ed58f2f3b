use actix_web::{http::StatusCode, web, web::ServiceConfig};
use billing_engine::{
    db_types::{ActivationResult, BillingCycle, PaymentStatus, PlanId, Subscription, SubscriptionStatus},
    helpers::CallbackVerifier,
    PaymentFlowApi,
};
use bpg_common::Secret;
use chrono::Utc;
use gateway_client::{GatewayApiError, GatewayOrder};
use serde_json::json;

use super::{
    helpers::{issue_token, payment_for, post_request, sample_plan, TEST_CALLBACK_SECRET},
    mocks::{MockBillingDb, MockGateway},
};
use crate::routes::{CreateOrderRoute, VerifyPaymentRoute};

fn verifier() -> CallbackVerifier {
    CallbackVerifier::new(Secret::new(TEST_CALLBACK_SECRET.to_string()))
}

fn activation(order_id: &str, payment_id: &str) -> ActivationResult {
    let now = Utc::now();
    let mut payment = payment_for(order_id, "acme", 9590, BillingCycle::Yearly);
    payment.status = PaymentStatus::Success;
    payment.gateway_payment_id = Some(payment_id.to_string());
    let subscription = Subscription {
        company_id: "acme".to_string(),
        plan_id: PlanId::from("pro"),
        status: SubscriptionStatus::Active,
        current_period_start: now,
        current_period_end: BillingCycle::Yearly.period_end(now),
        updated_at: now,
    };
    ActivationResult { payment, subscription, newly_activated: true }
}

#[actix_web::test]
async fn create_order_requires_authentication() {
    let configure = |cfg: &mut ServiceConfig| {
        let api = PaymentFlowApi::new(MockBillingDb::new(), verifier());
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(MockGateway::new()))
            .service(CreateOrderRoute::<MockBillingDb, MockGateway>::new());
    };
    let body = json!({"plan_id": "pro", "billing_cycle": "yearly", "company_id": "acme"});
    let (status, body) = post_request("", "/orders", body, configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("error"), "got {body}");
}

#[actix_web::test]
async fn create_order_for_unknown_plan_is_a_bad_request() {
    let configure = |cfg: &mut ServiceConfig| {
        let mut db = MockBillingDb::new();
        db.expect_fetch_plan().returning(|_| Ok(None));
        let api = PaymentFlowApi::new(db, verifier());
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(MockGateway::new()))
            .service(CreateOrderRoute::<MockBillingDb, MockGateway>::new());
    };
    let token = issue_token("u_100", "acme");
    let body = json!({"plan_id": "enterprise", "billing_cycle": "monthly", "company_id": "acme"});
    let (status, body) = post_request(&token, "/orders", body, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("enterprise"), "got {body}");
}

#[actix_web::test]
async fn create_order_happy_path() {
    let configure = |cfg: &mut ServiceConfig| {
        let mut db = MockBillingDb::new();
        db.expect_fetch_plan().returning(|_| Ok(Some(sample_plan())));
        db.expect_insert_pending_payment().returning(|np| {
            let mut payment = payment_for(np.gateway_order_id.as_str(), &np.company_id, 0, np.billing_cycle);
            payment.amount = np.amount;
            payment.user_id = np.user_id;
            Ok(payment)
        });
        let mut gateway = MockGateway::new();
        // 9590 whole units becomes 959000 sub-units on the wire
        gateway.expect_create_order().withf(|o| o.amount == 959_000 && o.currency == "INR").returning(|o| {
            Ok(GatewayOrder {
                id: "order_test_1".to_string(),
                amount: o.amount,
                currency: o.currency,
                receipt: Some(o.receipt),
                status: "created".to_string(),
                created_at: None,
            })
        });
        gateway.expect_key_id().returning(|| "rzp_test_1DP5mmOlF5G5ag".to_string());
        let api = PaymentFlowApi::new(db, verifier());
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(gateway))
            .service(CreateOrderRoute::<MockBillingDb, MockGateway>::new());
    };
    let token = issue_token("u_100", "acme");
    let body = json!({"plan_id": "pro", "billing_cycle": "yearly", "company_id": "acme"});
    let (status, body) = post_request(&token, "/orders", body, configure).await;
    assert_eq!(status, StatusCode::OK, "got {body}");
    let result: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["order_id"], "order_test_1");
    assert_eq!(result["amount"], 9590);
    assert_eq!(result["currency"], "INR");
    assert_eq!(result["key_id"], "rzp_test_1DP5mmOlF5G5ag");
}

#[actix_web::test]
async fn gateway_failures_map_to_bad_gateway() {
    let configure = |cfg: &mut ServiceConfig| {
        let mut db = MockBillingDb::new();
        db.expect_fetch_plan().returning(|_| Ok(Some(sample_plan())));
        db.expect_insert_pending_payment().never();
        let mut gateway = MockGateway::new();
        gateway.expect_create_order().returning(|_| {
            Err(GatewayApiError::QueryError { status: 503, message: "gateway is on fire".to_string() })
        });
        let api = PaymentFlowApi::new(db, verifier());
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(gateway))
            .service(CreateOrderRoute::<MockBillingDb, MockGateway>::new());
    };
    let token = issue_token("u_100", "acme");
    let body = json!({"plan_id": "pro", "billing_cycle": "monthly", "company_id": "acme"});
    let (status, _) = post_request(&token, "/orders", body, configure).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn verify_payment_requires_authentication() {
    let configure = |cfg: &mut ServiceConfig| {
        let api = PaymentFlowApi::new(MockBillingDb::new(), verifier());
        cfg.app_data(web::Data::new(api)).service(VerifyPaymentRoute::<MockBillingDb>::new());
    };
    let body = json!({"order_id": "order_test_1", "payment_id": "pay_1", "signature": "00"});
    let (status, _) = post_request("", "/payments/verify", body, configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn verify_payment_happy_path() {
    let configure = |cfg: &mut ServiceConfig| {
        let mut db = MockBillingDb::new();
        db.expect_fetch_payment_by_order_id()
            .returning(|oid| Ok(Some(payment_for(oid.as_str(), "acme", 9590, BillingCycle::Yearly))));
        db.expect_confirm_payment().times(1).returning(|c, _| Ok(activation(c.order_id.as_str(), &c.payment_id)));
        let api = PaymentFlowApi::new(db, verifier());
        cfg.app_data(web::Data::new(api)).service(VerifyPaymentRoute::<MockBillingDb>::new());
    };
    let token = issue_token("u_100", "acme");
    let signature = verifier().sign("order_test_1", "pay_test_1").unwrap();
    let body = json!({"order_id": "order_test_1", "payment_id": "pay_test_1", "signature": signature});
    let (status, body) = post_request(&token, "/payments/verify", body, configure).await;
    assert_eq!(status, StatusCode::OK, "got {body}");
    let result: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["success"], true);
    assert_eq!(result["order_id"], "order_test_1");
    assert_eq!(result["newly_activated"], true);
}

#[actix_web::test]
async fn verify_payment_with_a_tampered_signature_is_a_conflict() {
    let configure = |cfg: &mut ServiceConfig| {
        let mut db = MockBillingDb::new();
        db.expect_fetch_payment_by_order_id()
            .returning(|oid| Ok(Some(payment_for(oid.as_str(), "acme", 9590, BillingCycle::Yearly))));
        // A bad signature must never reach the settlement step.
        db.expect_confirm_payment().never();
        let api = PaymentFlowApi::new(db, verifier());
        cfg.app_data(web::Data::new(api)).service(VerifyPaymentRoute::<MockBillingDb>::new());
    };
    let token = issue_token("u_100", "acme");
    let mut signature = verifier().sign("order_test_1", "pay_test_1").unwrap();
    signature.replace_range(0..2, "zz");
    let body = json!({"order_id": "order_test_1", "payment_id": "pay_test_1", "signature": signature});
    let (status, body) = post_request(&token, "/payments/verify", body, configure).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("signature"), "got {body}");
}

#[actix_web::test]
async fn verify_payment_for_an_unknown_order_is_not_found() {
    let configure = |cfg: &mut ServiceConfig| {
        let mut db = MockBillingDb::new();
        db.expect_fetch_payment_by_order_id().returning(|_| Ok(None));
        let api = PaymentFlowApi::new(db, verifier());
        cfg.app_data(web::Data::new(api)).service(VerifyPaymentRoute::<MockBillingDb>::new());
    };
    let token = issue_token("u_100", "acme");
    let signature = verifier().sign("order_ghost", "pay_ghost").unwrap();
    let body = json!({"order_id": "order_ghost", "payment_id": "pay_ghost", "signature": signature});
    let (status, _) = post_request(&token, "/payments/verify", body, configure).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
