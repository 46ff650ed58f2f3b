use std::time::Duration;

use actix_cors::Cors;
use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use billing_engine::{helpers::CallbackVerifier, InvoiceApi, PaymentFlowApi, SqliteDatabase};
use gateway_client::GatewayApi;

use crate::{
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    routes::{health, CreateOrderRoute, DownloadInvoiceRoute, VerifyPaymentRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = GatewayApi::new(config.gateway.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db, gateway)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: GatewayApi,
) -> Result<Server, ServerError> {
    let options = ServerOptions::from_config(&config);
    let auth_config = config.auth.clone();
    // The gateway key secret doubles as the key for the payment completion signatures.
    let callback_secret = config.gateway.key_secret.clone();
    let srv = HttpServer::new(move || {
        let verifier = CallbackVerifier::new(callback_secret.clone());
        let payments_api = PaymentFlowApi::new(db.clone(), verifier);
        let invoice_api = InvoiceApi::new(db.clone());
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec!["authorization", "x-client-info", "apikey", "content-type"])
            .max_age(3600);
        let api_scope = web::scope("/api")
            .service(CreateOrderRoute::<SqliteDatabase, GatewayApi>::new())
            .service(VerifyPaymentRoute::<SqliteDatabase>::new())
            .service(DownloadInvoiceRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bpg::access_log"))
            .wrap(cors)
            .app_data(web::Data::new(payments_api))
            .app_data(web::Data::new(invoice_api))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(auth_config.clone()))
            .app_data(web::Data::new(options.clone()))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
