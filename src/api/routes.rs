use crate::config::ApiConfig;
use crate::domain::Id;

pub const COURSES_ALL: &str = "/courses/getAll";
pub const COURSES_SAVE: &str = "/courses/save";
pub const STUDENTS: &str = "/students";
pub const ATTENDANCE_ALL: &str = "/attendance/all";
pub const ATTENDANCE_BULK: &str = "/attendance/bulk";
pub const ATTENDANCE_MONTHLY: &str = "/attendance/monthly-overview";
pub const ASSIGNMENTS: &str = "/v1/assignments";
pub const STUDENT_GRADES: &str = "/v1/student-grades";
pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_REGISTER: &str = "/auth/register";

// Resolved against the payment service base
pub const PAYMENT_CREATE: &str = "/user-payment/create-payment";
pub const PAYMENTS_ALL: &str = "/payments/all";
pub const PAYMENTS_CHECK: &str = "/payments/check";
pub const PAYMENTS_TUITION: &str = "/payments/my-tuition";
pub const KHQR_IMAGE: &str = "/khqr/generate/image";

/// Joins route suffixes onto the two configured bases
#[derive(Debug, Clone)]
pub struct Routes {
    api_base: String,
    payment_base: String,
}

impl Routes {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            api_base: config.base_url.clone(),
            payment_base: config.payment_url.clone(),
        }
    }

    pub fn api(&self, suffix: &str) -> String {
        format!("{}{}", self.api_base, suffix)
    }

    pub fn api_item(&self, suffix: &str, id: Id) -> String {
        format!("{}{}/{}", self.api_base, suffix, id)
    }

    pub fn payment(&self, suffix: &str) -> String {
        format!("{}{}", self.payment_base, suffix)
    }

    pub fn payment_item(&self, suffix: &str, id: &str) -> String {
        format!(
            "{}{}/{}",
            self.payment_base,
            suffix,
            urlencoding::encode(id)
        )
    }

    /// QR image URL; the payload is percent-encoded into the query
    pub fn qr_image(&self, qr: &str) -> String {
        format!(
            "{}{}?qr={}&format=png",
            self.payment_base,
            KHQR_IMAGE,
            urlencoding::encode(qr)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> Routes {
        Routes::new(&ApiConfig::new("http://host/api/", "http://host"))
    }

    #[test]
    fn test_api_routes() {
        let routes = routes();
        assert_eq!(routes.api(COURSES_ALL), "http://host/api/courses/getAll");
        assert_eq!(
            routes.api_item(STUDENT_GRADES, 42),
            "http://host/api/v1/student-grades/42"
        );
    }

    #[test]
    fn test_payment_routes() {
        let routes = routes();
        assert_eq!(routes.payment(PAYMENTS_ALL), "http://host/payments/all");
        assert_eq!(
            routes.payment_item(PAYMENTS_CHECK, "PAY-9"),
            "http://host/payments/check/PAY-9"
        );
    }

    #[test]
    fn test_qr_payload_is_encoded() {
        let url = routes().qr_image("000201&x=1 2");
        assert_eq!(
            url,
            "http://host/khqr/generate/image?qr=000201%26x%3D1%202&format=png"
        );
    }
}
