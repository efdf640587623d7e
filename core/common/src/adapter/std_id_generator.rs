//! CorrelationToken を生成する IdGenerator の標準実装（Clock + 乱数サフィックス）

use crate::domain::CorrelationToken;
use crate::ports::outbound::{Clock, IdGenerator};
use rand::Rng;
use std::sync::Arc;

const SUFFIX_LEN: usize = 13;

/// 0-9, a-z（base36）
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `<unix_ms>_<base36 13 文字>` を返す標準実装
pub struct StdIdGenerator {
    clock: Arc<dyn Clock>,
}

impl StdIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl IdGenerator for StdIdGenerator {
    fn next_id(&self) -> CorrelationToken {
        let ms = self.clock.now_ms();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        CorrelationToken::new(format!("{}_{}", ms, suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now_ms(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_token_format() {
        let gen = StdIdGenerator::new(Arc::new(FixedClock(1_700_000_000_000)));
        let token = gen.next_id();
        let (ms, suffix) = token.split_once('_').unwrap();
        assert_eq!(ms, "1700000000000");
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_tokens_differ_within_same_millisecond() {
        let gen = StdIdGenerator::new(Arc::new(FixedClock(42)));
        let a = gen.next_id();
        let b = gen.next_id();
        assert_ne!(a, b);
    }
}
