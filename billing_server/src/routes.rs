//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
use actix_web::{get, http::header, web, HttpResponse, Responder};
use billing_engine::{
    db_types::{NewPayment, OrderId, PaymentConfirmation, PlanId},
    traits::{BillingDatabase, InvoiceManagement},
    InvoiceApi,
    PaymentFlowApi,
};
use gateway_client::{GatewayOrders, NewGatewayOrder};
use log::*;

use crate::{
    auth::JwtClaims,
    config::ServerOptions,
    data_objects::{CreateOrderRequest, CreateOrderResult, InvoiceQuery, VerifyPaymentRequest, VerifyPaymentResult},
    errors::ServerError,
    helpers::new_receipt,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//--------------------------------------------   Create order  ------------------------------------------------
route!(create_order => Post "/orders" impl BillingDatabase, GatewayOrders);
/// Route handler for opening a new payment order.
///
/// Looks the plan up, derives the amount due for the requested billing cycle, opens an order with
/// the payment gateway and records a pending ledger entry for it. The response carries the gateway
/// order id, the persisted amount and the gateway key id, which together are what the client needs
/// to launch the checkout.
pub async fn create_order<B, G>(
    claims: JwtClaims,
    body: web::Json<CreateOrderRequest>,
    api: web::Data<PaymentFlowApi<B>>,
    gateway: web::Data<G>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    B: BillingDatabase + 'static,
    G: GatewayOrders + 'static,
{
    let req = body.into_inner();
    debug!("💻️ POST order for plan {} ({}) from user {}", req.plan_id, req.billing_cycle, claims.sub);
    let plan_id = PlanId::from(req.plan_id);
    let (plan, amount) = api.amount_due(&plan_id, req.billing_cycle).await?;
    let receipt = new_receipt(&req.company_id);
    let gateway_order = gateway
        .create_order(NewGatewayOrder { amount: amount.to_subunits(), currency: options.currency.clone(), receipt })
        .await?;
    let payment = api
        .open_order(NewPayment {
            user_id: claims.sub,
            company_id: req.company_id,
            plan_id: plan.id,
            amount,
            currency: options.currency.clone(),
            billing_cycle: req.billing_cycle,
            gateway_order_id: OrderId::from(gateway_order.id.clone()),
        })
        .await
        .map_err(|e| {
            error!(
                "💻️ Gateway order {} was opened but could not be recorded in the ledger, so it will never settle. \
                 {e}",
                gateway_order.id
            );
            e
        })?;
    Ok(HttpResponse::Ok().json(CreateOrderResult {
        order_id: payment.gateway_order_id.to_string(),
        amount: payment.amount,
        currency: payment.currency,
        key_id: gateway.key_id(),
    }))
}

//-------------------------------------------   Verify payment  -----------------------------------------------
route!(verify_payment => Post "/payments/verify" impl BillingDatabase);
/// Route handler for the payment confirmation relayed by the client after checkout.
///
/// The signature is verified against the gateway key secret before any state changes. A valid
/// confirmation settles the ledger entry and activates the subscription; replays succeed without
/// side effects.
pub async fn verify_payment<B>(
    claims: JwtClaims,
    body: web::Json<VerifyPaymentRequest>,
    api: web::Data<PaymentFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: BillingDatabase + 'static,
{
    let req = body.into_inner();
    trace!("💻️ POST payment verification for order {} from user {}", req.order_id, claims.sub);
    let confirmation = PaymentConfirmation {
        order_id: OrderId::from(req.order_id),
        payment_id: req.payment_id,
        signature: req.signature,
    };
    let result = api.reconcile(confirmation).await?;
    debug!(
        "💻️ Order {} verified. Company {} is on plan {} until {}",
        result.payment.gateway_order_id,
        result.subscription.company_id,
        result.subscription.plan_id,
        result.subscription.current_period_end
    );
    Ok(HttpResponse::Ok().json(VerifyPaymentResult {
        success: true,
        order_id: result.payment.gateway_order_id.to_string(),
        newly_activated: result.newly_activated,
    }))
}

//------------------------------------------   Download invoice  ----------------------------------------------
route!(download_invoice => Get "/invoice" impl InvoiceManagement);
/// Route handler for downloading the invoice of a settled payment.
///
/// The company in the access token must be the company the payment was billed to. The first
/// download assigns the invoice number; later downloads return the identical document.
pub async fn download_invoice<B>(
    claims: JwtClaims,
    query: web::Query<InvoiceQuery>,
    api: web::Data<InvoiceApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: InvoiceManagement + 'static,
{
    let payment_id = query.payment_id;
    debug!("💻️ GET invoice for payment #{payment_id} from company {}", claims.company_id);
    let document = api.generate_invoice(&claims.company_id, payment_id).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", document.filename)))
        .body(document.bytes))
}
