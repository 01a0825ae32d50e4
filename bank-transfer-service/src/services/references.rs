//! Identifiers handed to payers and operators.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Short reference the payer puts on the transfer: `SB` + six digits.
pub fn generate_pay_ref() -> String {
    let n: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    format!("SB{}", n)
}

/// Fallback transaction id for manual reconciliation.
pub fn bank_txn_id(now: DateTime<Utc>) -> String {
    format!("BANK_TXN_{}", now.timestamp_millis())
}

/// Name an upload is stored under: `<epoch-ms>_<original-name>`.
pub fn stored_filename(original: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}", now.timestamp_millis(), sanitize_filename(original))
}

/// Reduce a client-supplied file name to its final path component.
fn sanitize_filename(original: &str) -> String {
    let name = original.rsplit(['/', '\\']).next().unwrap_or("").trim();
    let cleaned: String = name.chars().filter(|c| !c.is_control()).collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn pay_ref_shape() {
        for _ in 0..100 {
            let pay_ref = generate_pay_ref();
            assert_eq!(pay_ref.len(), 8);
            assert!(pay_ref.starts_with("SB"));
            let digits: u32 = pay_ref[2..].parse().unwrap();
            assert!((100_000..=999_999).contains(&digits));
        }
    }

    #[test]
    fn stored_filename_is_timestamp_prefixed() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(stored_filename("receipt.png", now), "1700000000123_receipt.png");
        assert_eq!(bank_txn_id(now), "BANK_TXN_1700000000123");
    }

    #[test]
    fn stored_filename_strips_directories() {
        let now = Utc.timestamp_millis_opt(5).unwrap();
        assert_eq!(stored_filename("../../etc/passwd", now), "5_passwd");
        assert_eq!(stored_filename("C:\\Users\\me\\slip.jpg", now), "5_slip.jpg");
        assert_eq!(stored_filename("..", now), "5_upload");
        assert_eq!(stored_filename("", now), "5_upload");
    }
}
