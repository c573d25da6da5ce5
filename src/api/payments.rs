use reqwest::Method;
use serde_json::Value;

use super::{routes, ApiClient};
use crate::domain::{Payment, PaymentRequest};
use crate::error::{ApiError, ApiResult};
use crate::session::UserProfile;

impl ApiClient {
    /// Starts a payment on behalf of the signed-in user.
    ///
    /// Contact details come from the cached profile, or a generic student
    /// profile when none is cached.
    pub async fn create_payment(&self, amount: f64, description: &str) -> ApiResult<Payment> {
        let user = self
            .session()
            .user()
            .await
            .unwrap_or_else(UserProfile::fallback_student);

        let body = PaymentRequest {
            name: user.full_name,
            email: user.email,
            phone_number: user.phone_number.unwrap_or_default(),
            amount,
            description: description.to_string(),
        };

        let request = self
            .http
            .request(Method::POST, &self.routes.payment(routes::PAYMENT_CREATE))
            .await
            .json(&body);
        let payment: Payment = self.http.send_json(request).await?;
        tracing::info!(amount, payment_id = ?payment.id_text(), "Payment created");
        Ok(payment)
    }

    pub async fn list_payments(&self) -> ApiResult<Vec<Payment>> {
        let request = self
            .http
            .request(Method::GET, &self.routes.payment(routes::PAYMENTS_ALL))
            .await;
        self.http.send_json(request).await
    }

    pub async fn check_payment_status(&self, payment_id: &str) -> ApiResult<Value> {
        let request = self
            .http
            .request(
                Method::POST,
                &self.routes.payment_item(routes::PAYMENTS_CHECK, payment_id),
            )
            .await;
        self.http.send(request).await
    }

    /// PNG bytes of the KHQR code for `qr`
    pub async fn fetch_qr_image(&self, qr: &str) -> ApiResult<Vec<u8>> {
        if qr.is_empty() {
            return Err(ApiError::InvalidInput("empty QR payload".to_string()));
        }
        let request = self
            .http
            .request(Method::GET, &self.routes.qr_image(qr))
            .await;
        self.http.send_bytes(request).await
    }

    /// Tuition statement of the signed-in user
    pub async fn my_tuition(&self) -> ApiResult<Value> {
        let email = match self.session().user().await {
            Some(user) if !user.email.is_empty() => user.email,
            _ => return Err(ApiError::NotSignedIn),
        };
        let request = self
            .http
            .request(Method::GET, &self.routes.payment(routes::PAYMENTS_TUITION))
            .await
            .query(&[("email", email)]);
        self.http.send(request).await
    }
}
