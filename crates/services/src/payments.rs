use aireach_config::StripeSettings;
use aireach_db::models::{SaleStatus, Webinar};
use bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::dao::base::DaoError;
use crate::dao::SaleDao;

// ---- Response / DTO types ------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
    pub session_id: String,
}

// ---- Stripe webhook event (minimal deserialization) ----------------------

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

// ---- Error type ----------------------------------------------------------

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Webinar not found")]
    WebinarNotFound,
    #[error("Stripe API error: {0}")]
    ApiError(String),
    #[error("Invalid webhook signature")]
    InvalidSignature,
    #[error("Storage error: {0}")]
    Storage(#[from] DaoError),
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

// ---- Service -------------------------------------------------------------

/// One-off Stripe Checkout for paid webinar access, plus the webhook that
/// turns confirmed sessions into Sale records.
pub struct PaymentService {
    settings: StripeSettings,
    client: reqwest::Client,
}

impl PaymentService {
    pub fn new(settings: &StripeSettings) -> Self {
        Self {
            settings: settings.clone(),
            client: reqwest::Client::new(),
        }
    }

    // ---- Checkout --------------------------------------------------------

    pub async fn create_checkout_session(
        &self,
        db: &mongodb::Database,
        webinar_id: &ObjectId,
        user_id: Option<&ObjectId>,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutResponse, PaymentError> {
        let collection = db.collection::<Webinar>(Webinar::COLLECTION);
        let webinar = collection
            .find_one(doc! { "_id": webinar_id })
            .await?
            .ok_or(PaymentError::WebinarNotFound)?;

        let price_cents = webinar
            .price_cents
            .unwrap_or(self.settings.default_price_cents)
            .to_string();
        let user_ref = user_id.map(|u| u.to_hex()).unwrap_or_else(|| "anonymous".to_string());
        let webinar_hex = webinar_id.to_hex();

        let params = [
            ("mode", "payment"),
            ("payment_method_types[0]", "card"),
            ("line_items[0][price_data][currency]", self.settings.currency.as_str()),
            ("line_items[0][price_data][product_data][name]", webinar.title.as_str()),
            (
                "line_items[0][price_data][product_data][description]",
                "Full access to webinar recordings and materials",
            ),
            ("line_items[0][price_data][unit_amount]", price_cents.as_str()),
            ("line_items[0][quantity]", "1"),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("metadata[webinar_id]", webinar_hex.as_str()),
            ("metadata[user_id]", user_ref.as_str()),
        ];

        let resp: serde_json::Value = self
            .client
            .post("https://api.stripe.com/v1/checkout/sessions")
            .basic_auth(&self.settings.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::ApiError(e.to_string()))?
            .json()
            .await
            .map_err(|e| PaymentError::ApiError(e.to_string()))?;

        if let Some(err) = resp.get("error") {
            return Err(PaymentError::ApiError(
                err["message"]
                    .as_str()
                    .unwrap_or("Unknown Stripe error")
                    .to_string(),
            ));
        }

        let url = resp["url"]
            .as_str()
            .ok_or_else(|| PaymentError::ApiError("No checkout URL in response".to_string()))?
            .to_string();
        let session_id = resp["id"]
            .as_str()
            .ok_or_else(|| PaymentError::ApiError("No session ID in response".to_string()))?
            .to_string();

        info!(webinar_id = %webinar_hex, "Created checkout session");
        Ok(CheckoutResponse { url, session_id })
    }

    // ---- Webhook processing ----------------------------------------------

    /// Verify the Stripe webhook signature using HMAC-SHA256.
    pub fn verify_signature(
        webhook_secret: &str,
        payload: &[u8],
        sig_header: &str,
    ) -> Result<(), PaymentError> {
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        // Parse the Stripe-Signature header: t=...,v1=...,v0=...
        let mut timestamp = None;
        let mut signatures: Vec<String> = Vec::new();

        for part in sig_header.split(',') {
            let part = part.trim();
            if let Some(t) = part.strip_prefix("t=") {
                timestamp = Some(t.to_string());
            } else if let Some(v1) = part.strip_prefix("v1=") {
                signatures.push(v1.to_string());
            }
        }

        let timestamp = timestamp.ok_or(PaymentError::InvalidSignature)?;
        if signatures.is_empty() {
            return Err(PaymentError::InvalidSignature);
        }

        let signed_payload = format!("{timestamp}.{}", String::from_utf8_lossy(payload));

        let mut mac = Hmac::<Sha256>::new_from_slice(webhook_secret.as_bytes())
            .map_err(|_| PaymentError::InvalidSignature)?;
        mac.update(signed_payload.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        if signatures.iter().any(|s| s == &expected) {
            Ok(())
        } else {
            Err(PaymentError::InvalidSignature)
        }
    }

    /// Handle a verified webhook event. Only `checkout.session.completed`
    /// writes anything: a completed Sale keyed by the session id, so webhook
    /// redelivery is absorbed by the unique index.
    pub async fn handle_webhook_event(
        &self,
        sales: &SaleDao,
        event: &StripeEvent,
    ) -> Result<(), PaymentError> {
        let obj = &event.data.object;

        match event.event_type.as_str() {
            "checkout.session.completed" => {
                let session_id = obj["id"].as_str().unwrap_or_default();
                let webinar_hex = obj["metadata"]["webinar_id"].as_str().unwrap_or_default();
                let user_hex = obj["metadata"]["user_id"].as_str().unwrap_or_default();
                let amount = obj["amount_total"].as_i64().unwrap_or(0);
                let currency = obj["currency"]
                    .as_str()
                    .unwrap_or(&self.settings.currency)
                    .to_string();

                if webinar_hex.is_empty() || session_id.is_empty() {
                    warn!("checkout.session.completed missing webinar_id metadata");
                    return Ok(());
                }

                let webinar_id = ObjectId::parse_str(webinar_hex)
                    .map_err(|_| PaymentError::ApiError("Invalid webinar_id in metadata".into()))?;
                let user_id = ObjectId::parse_str(user_hex).ok();

                match sales
                    .record(
                        webinar_id,
                        user_id,
                        amount,
                        currency,
                        SaleStatus::Completed,
                        session_id.to_string(),
                    )
                    .await
                {
                    Ok(sale) => {
                        info!(
                            webinar_id = %webinar_hex,
                            session_id = %session_id,
                            sale_id = ?sale.id,
                            "Sale recorded from checkout"
                        );
                    }
                    Err(DaoError::DuplicateKey(_)) => {
                        info!(session_id = %session_id, "Duplicate webhook delivery ignored");
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            other => {
                info!(event_type = %other, "Unhandled Stripe webhook event");
            }
        }

        Ok(())
    }
}
