use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::database::models::payment::{Payment, PurchaseDetails};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::payment_service::CheckoutConfirmation;
use crate::services::PaymentService;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub material_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub payment_id: Uuid,
    pub amount_inr: i64,
    pub currency: String,
    pub receipt: String,
    /// Public key the client hands to the checkout widget.
    pub key_id: String,
}

/// POST /api/payments/orders - Open a pending payment for a paid material
///
/// The amount is taken from the material row, never from the client.
/// 409 when the material is free or already purchased by the caller.
pub async fn create_order(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateOrderRequest>,
) -> ApiResult<CreateOrderResponse> {
    let service = PaymentService::new().await?;
    let payment = service
        .create_order(auth_user.user_id, payload.material_id)
        .await?;

    tracing::info!(
        user_id = %auth_user.user_id,
        payment_id = %payment.id,
        amount_inr = payment.amount_inr,
        "payment order opened"
    );

    Ok(ApiResponse::created(CreateOrderResponse {
        payment_id: payment.id,
        amount_inr: payment.amount_inr,
        currency: payment.currency,
        receipt: payment.receipt,
        key_id: config::config().payments.key_id.clone(),
    }))
}

/// POST /api/payments/verify - Confirm a checkout
///
/// Expected input:
/// ```json
/// {
///   "payment_id": "uuid",
///   "order_id": "order_...",
///   "payment_ref": "pay_...",
///   "signature": "<hex hmac-sha256>"
/// }
/// ```
///
/// Verifies the gateway signature over `order_id|payment_ref`, marks the
/// payment completed and records the purchase. 400 on a bad signature.
pub async fn verify(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CheckoutConfirmation>,
) -> ApiResult<Payment> {
    let service = PaymentService::new().await?;
    let payment = service.confirm(auth_user.user_id, payload).await?;
    Ok(ApiResponse::success(payment))
}

/// GET /api/payments/my-purchases - Caller's completed purchases
pub async fn my_purchases(
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<PurchaseDetails>> {
    let service = PaymentService::new().await?;
    let purchases = service.my_purchases(auth_user.user_id).await?;
    Ok(ApiResponse::success(purchases))
}
