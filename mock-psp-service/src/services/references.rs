use rand::Rng;

/// Provider transaction id for a simulated successful payment.
pub fn mock_txn_id() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..100_000);
    format!("MOCK_TXN_{}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_txn_id_shape() {
        for _ in 0..100 {
            let txn = mock_txn_id();
            let n: u32 = txn.strip_prefix("MOCK_TXN_").unwrap().parse().unwrap();
            assert!(n < 100_000);
        }
    }
}
