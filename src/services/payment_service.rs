use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::material::Material;
use crate::database::models::payment::{Payment, PurchaseDetails};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
    #[error("Material not found")]
    MaterialNotFound,
    #[error("Payment not found")]
    PaymentNotFound,
    #[error("Material already purchased")]
    AlreadyPurchased,
    #[error("Material is free")]
    FreeMaterial,
    #[error("Invalid checkout signature")]
    InvalidSignature,
    #[error("Payment gateway key secret not configured")]
    NotConfigured,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfirmation {
    pub payment_id: Uuid,
    /// Gateway order id the checkout widget reported.
    pub order_id: String,
    /// Gateway payment id the checkout widget reported.
    pub payment_ref: String,
    /// Hex HMAC-SHA256 signature over "order_id|payment_ref".
    pub signature: String,
}

/// Hex HMAC-SHA256 over `"{order_id}|{payment_ref}"`, the gateway's checkout
/// signature scheme.
pub fn checkout_signature(order_id: &str, payment_ref: &str, key_secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(format!("{}|{}", order_id, payment_ref).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time verification of a checkout signature.
pub fn verify_checkout_signature(
    order_id: &str,
    payment_ref: &str,
    signature_hex: &str,
    key_secret: &str,
) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(key_secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("{}|{}", order_id, payment_ref).as_bytes());
    mac.verify_slice(&signature).is_ok()
}

pub struct PaymentService {
    pool: PgPool,
}

impl PaymentService {
    pub async fn new() -> Result<Self, PaymentError> {
        let pool = DatabaseManager::app_pool().await?;
        Ok(Self { pool })
    }

    /// Open a pending payment for a paid material. The amount always comes
    /// from the material row, never from the client.
    pub async fn create_order(
        &self,
        user_id: Uuid,
        material_id: Uuid,
    ) -> Result<Payment, PaymentError> {
        let material = sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = $1")
            .bind(material_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PaymentError::MaterialNotFound)?;

        if material.is_free {
            return Err(PaymentError::FreeMaterial);
        }

        if self.has_completed_purchase(user_id, material_id).await? {
            return Err(PaymentError::AlreadyPurchased);
        }

        let receipt = format!("receipt_{}", Uuid::new_v4().simple());

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (user_id, material_id, amount_inr, receipt)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(material_id)
        .bind(material.price_inr)
        .bind(&receipt)
        .fetch_one(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Confirm a checkout: verify the gateway signature, mark the payment
    /// completed and record the purchase. Re-confirming a completed payment
    /// is a no-op returning the existing record.
    pub async fn confirm(
        &self,
        user_id: Uuid,
        confirmation: CheckoutConfirmation,
    ) -> Result<Payment, PaymentError> {
        let key_secret = &config::config().payments.key_secret;
        if key_secret.is_empty() {
            return Err(PaymentError::NotConfigured);
        }

        let payment = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE id = $1 AND user_id = $2",
        )
        .bind(confirmation.payment_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(PaymentError::PaymentNotFound)?;

        if payment.status == "completed" {
            return Ok(payment);
        }

        if !verify_checkout_signature(
            &confirmation.order_id,
            &confirmation.payment_ref,
            &confirmation.signature,
            key_secret,
        ) {
            sqlx::query("UPDATE payments SET status = 'failed', updated_at = NOW() WHERE id = $1")
                .bind(payment.id)
                .execute(&self.pool)
                .await?;
            tracing::warn!(
                payment_id = %payment.id,
                "checkout signature verification failed"
            );
            return Err(PaymentError::InvalidSignature);
        }

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET status = 'completed', order_id = $2, payment_ref = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(payment.id)
        .bind(&confirmation.order_id)
        .bind(&confirmation.payment_ref)
        .fetch_one(&self.pool)
        .await?;

        // One purchase row per (user, material); a retried confirmation just
        // repoints it at the latest payment.
        sqlx::query(
            r#"
            INSERT INTO purchases (user_id, material_id, payment_id, amount_inr)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, material_id)
            DO UPDATE SET payment_id = EXCLUDED.payment_id, amount_inr = EXCLUDED.amount_inr
            "#,
        )
        .bind(payment.user_id)
        .bind(payment.material_id)
        .bind(payment.id)
        .bind(payment.amount_inr)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            payment_id = %payment.id,
            material_id = %payment.material_id,
            "payment completed, purchase recorded"
        );

        Ok(payment)
    }

    /// Completed purchases with material, payment, and last-download details.
    pub async fn my_purchases(&self, user_id: Uuid) -> Result<Vec<PurchaseDetails>, PaymentError> {
        let purchases = sqlx::query_as::<_, PurchaseDetails>(
            r#"
            SELECT
                p.id, p.material_id, p.amount_inr, p.status, p.created_at,
                m.title, m.description, m.class_level, m.pdf_url, m.thumbnail_url, m.price_inr,
                pay.receipt, pay.order_id, pay.payment_ref, pay.gateway, pay.updated_at AS paid_at,
                (
                    SELECT MAX(d.downloaded_at)
                    FROM material_downloads d
                    WHERE d.user_id = p.user_id AND d.material_id = p.material_id
                ) AS last_downloaded
            FROM purchases p
            JOIN materials m ON m.id = p.material_id
            JOIN payments pay ON pay.id = p.payment_id
            WHERE p.user_id = $1 AND p.status = 'completed'
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    async fn has_completed_purchase(
        &self,
        user_id: Uuid,
        material_id: Uuid,
    ) -> Result<bool, PaymentError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM purchases
            WHERE user_id = $1 AND material_id = $2 AND status = 'completed'
            "#,
        )
        .bind(user_id)
        .bind(material_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_SECRET: &str = "test_key_secret";

    #[test]
    fn signature_round_trips() {
        let sig = checkout_signature("order_abc", "pay_xyz", KEY_SECRET);
        assert!(verify_checkout_signature("order_abc", "pay_xyz", &sig, KEY_SECRET));
    }

    #[test]
    fn tampered_fields_fail_verification() {
        let sig = checkout_signature("order_abc", "pay_xyz", KEY_SECRET);
        assert!(!verify_checkout_signature("order_def", "pay_xyz", &sig, KEY_SECRET));
        assert!(!verify_checkout_signature("order_abc", "pay_other", &sig, KEY_SECRET));
        assert!(!verify_checkout_signature("order_abc", "pay_xyz", &sig, "wrong_secret"));
    }

    #[test]
    fn malformed_signature_hex_fails_quietly() {
        assert!(!verify_checkout_signature(
            "order_abc",
            "pay_xyz",
            "not hex at all",
            KEY_SECRET
        ));
    }

    #[test]
    fn signature_is_hex_encoded_sha256() {
        let sig = checkout_signature("o", "p", KEY_SECRET);
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
