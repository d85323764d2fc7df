use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: String,
    pub discount_percent: u8,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub times_used: u32,
    pub active: bool,
}

/// Body for coupon create requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCoupon {
    pub code: String,
    pub discount_percent: u8,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_uses: Option<u32>,
}

impl Coupon {
    /// Redeemable right now: active, not expired, not exhausted.
    pub fn is_redeemable(&self) -> bool {
        if !self.active {
            return false;
        }
        if matches!(self.valid_until, Some(until) if Utc::now() > until) {
            return false;
        }
        !matches!(self.max_uses, Some(max) if self.times_used >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon() -> Coupon {
        Coupon {
            code: "FESTIVAL10".into(),
            discount_percent: 10,
            valid_until: Some(Utc::now() + Duration::days(30)),
            max_uses: Some(100),
            times_used: 40,
            active: true,
        }
    }

    #[test]
    fn active_in_window_is_redeemable() {
        assert!(coupon().is_redeemable());
    }

    #[test]
    fn expired_coupon_is_not_redeemable() {
        let mut c = coupon();
        c.valid_until = Some(Utc::now() - Duration::days(1));
        assert!(!c.is_redeemable());
    }

    #[test]
    fn exhausted_coupon_is_not_redeemable() {
        let mut c = coupon();
        c.times_used = 100;
        assert!(!c.is_redeemable());
    }

    #[test]
    fn inactive_coupon_is_not_redeemable() {
        let mut c = coupon();
        c.active = false;
        assert!(!c.is_redeemable());
    }
}
