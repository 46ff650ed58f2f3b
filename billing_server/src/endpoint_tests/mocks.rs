use billing_engine::{
    db_types::{
        ActivationResult,
        Company,
        NewPayment,
        OrderId,
        Payment,
        PaymentConfirmation,
        Plan,
        PlanId,
        Subscription,
    },
    traits::{BillingDatabase, InvoiceApiError, InvoiceManagement, PaymentFlowError},
};
use chrono::{DateTime, Utc};
use gateway_client::{GatewayApiError, GatewayOrder, GatewayOrders, NewGatewayOrder};
use mockall::mock;

mock! {
    pub BillingDb {}
    impl Clone for BillingDb {
        fn clone(&self) -> Self;
    }
    impl BillingDatabase for BillingDb {
        fn url(&self) -> &str;
        async fn fetch_plan(&self, plan_id: &PlanId) -> Result<Option<Plan>, PaymentFlowError>;
        async fn insert_pending_payment(&self, payment: NewPayment) -> Result<Payment, PaymentFlowError>;
        async fn fetch_payment_by_order_id(&self, order_id: &OrderId) -> Result<Option<Payment>, PaymentFlowError>;
        async fn confirm_payment(&self, confirmation: &PaymentConfirmation, activated_at: DateTime<Utc>) -> Result<ActivationResult, PaymentFlowError>;
        async fn fail_payment(&self, order_id: &OrderId) -> Result<Payment, PaymentFlowError>;
        async fn fetch_subscription(&self, company_id: &str) -> Result<Option<Subscription>, PaymentFlowError>;
        async fn close(&mut self) -> Result<(), PaymentFlowError>;
    }
}

mock! {
    pub InvoiceDb {}
    impl Clone for InvoiceDb {
        fn clone(&self) -> Self;
    }
    impl InvoiceManagement for InvoiceDb {
        async fn fetch_payment(&self, payment_id: i64) -> Result<Option<Payment>, InvoiceApiError>;
        async fn fetch_plan_for_invoice(&self, plan_id: &PlanId) -> Result<Option<Plan>, InvoiceApiError>;
        async fn fetch_company(&self, company_id: &str) -> Result<Option<Company>, InvoiceApiError>;
        async fn assign_invoice_number(&self, payment_id: i64) -> Result<String, InvoiceApiError>;
    }
}

mock! {
    pub Gateway {}
    impl Clone for Gateway {
        fn clone(&self) -> Self;
    }
    impl GatewayOrders for Gateway {
        async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayApiError>;
        fn key_id(&self) -> String;
    }
}
