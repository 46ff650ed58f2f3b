use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use billing_engine::{
    db_types::{BillingCycle, Company, PaymentStatus},
    InvoiceApi,
};
use chrono::Utc;

use super::{
    helpers::{get_auth_config, get_request, issue_token, payment_for, sample_plan},
    mocks::MockInvoiceDb,
};
use crate::routes::DownloadInvoiceRoute;

fn sample_company() -> Company {
    Company {
        id: "acme".to_string(),
        name: "Acme Pty Ltd".to_string(),
        billing_address: Some("1 Main Road, Bengaluru".to_string()),
        tax_id: Some("29ABCDE1234F1Z5".to_string()),
        created_at: Utc::now(),
    }
}

fn settled_payment(invoice_number: Option<&str>) -> billing_engine::db_types::Payment {
    let mut payment = payment_for("order_inv_1", "acme", 9590, BillingCycle::Yearly);
    payment.status = PaymentStatus::Success;
    payment.gateway_payment_id = Some("pay_inv_1".to_string());
    payment.invoice_number = invoice_number.map(String::from);
    payment
}

#[actix_web::test]
async fn invoice_download_requires_authentication() {
    let configure = |cfg: &mut ServiceConfig| {
        let api = InvoiceApi::new(MockInvoiceDb::new());
        cfg.app_data(web::Data::new(api)).service(DownloadInvoiceRoute::<MockInvoiceDb>::new());
    };
    let (status, _) = get_request("", "/invoice?payment_id=1", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn invoices_of_other_companies_are_forbidden() {
    let configure = |cfg: &mut ServiceConfig| {
        let mut db = MockInvoiceDb::new();
        db.expect_fetch_payment().returning(|_| Ok(Some(settled_payment(Some("INV-000007")))));
        // A denied request must not consume an invoice number.
        db.expect_assign_invoice_number().never();
        let api = InvoiceApi::new(db);
        cfg.app_data(web::Data::new(api)).service(DownloadInvoiceRoute::<MockInvoiceDb>::new());
    };
    let token = issue_token("u_900", "globex");
    let (status, body) = get_request(&token, "/invoice?payment_id=1", configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("error"), "got {body}");
}

#[actix_web::test]
async fn unknown_payments_are_not_found() {
    let configure = |cfg: &mut ServiceConfig| {
        let mut db = MockInvoiceDb::new();
        db.expect_fetch_payment().returning(|_| Ok(None));
        let api = InvoiceApi::new(db);
        cfg.app_data(web::Data::new(api)).service(DownloadInvoiceRoute::<MockInvoiceDb>::new());
    };
    let token = issue_token("u_100", "acme");
    let (status, _) = get_request(&token, "/invoice?payment_id=404", configure).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn first_download_assigns_the_invoice_number() {
    let configure = |cfg: &mut ServiceConfig| {
        let mut db = MockInvoiceDb::new();
        db.expect_fetch_payment().returning(|_| Ok(Some(settled_payment(None))));
        db.expect_assign_invoice_number().times(1).returning(|_| Ok("INV-000001".to_string()));
        db.expect_fetch_plan_for_invoice().returning(|_| Ok(Some(sample_plan())));
        db.expect_fetch_company().returning(|_| Ok(Some(sample_company())));
        let api = InvoiceApi::new(db);
        cfg.app_data(web::Data::new(api)).service(DownloadInvoiceRoute::<MockInvoiceDb>::new());
    };
    let token = issue_token("u_100", "acme");
    let (status, body) = get_request(&token, "/invoice?payment_id=1", configure).await;
    assert_eq!(status, StatusCode::OK, "got {body}");
    assert!(body.contains("Invoice number : INV-000001"), "got {body}");
}

/// The happy path is tested without the shared harness, so that response headers can be inspected.
#[actix_web::test]
async fn invoice_download_happy_path() {
    let configure = |cfg: &mut ServiceConfig| {
        let mut db = MockInvoiceDb::new();
        db.expect_fetch_payment().returning(|_| Ok(Some(settled_payment(Some("INV-000007")))));
        // The number is already assigned, so it must not be assigned again.
        db.expect_assign_invoice_number().never();
        db.expect_fetch_plan_for_invoice().returning(|_| Ok(Some(sample_plan())));
        db.expect_fetch_company().returning(|_| Ok(Some(sample_company())));
        let api = InvoiceApi::new(db);
        cfg.app_data(web::Data::new(api)).service(DownloadInvoiceRoute::<MockInvoiceDb>::new());
    };
    let token = issue_token("u_100", "acme");
    let req = TestRequest::get()
        .uri("/invoice?payment_id=1")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let app = App::new().app_data(web::Data::new(get_auth_config())).configure(configure);
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let disposition = res.headers().get("Content-Disposition").unwrap().to_str().unwrap().to_string();
    assert_eq!(disposition, "attachment; filename=\"INV-000007.txt\"");
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    assert!(body.contains("Invoice number : INV-000007"));
    assert!(body.contains("Acme Pty Ltd"));
    assert!(body.contains("Pro (yearly)"));
    assert!(body.contains("9590.00 INR"));
}
