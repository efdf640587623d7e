//! 壁時計による Clock 実装
//!
//! 相関トークンの先頭（`<unix_ms>`）に使う。epoch より前に時計が戻っている環境では 0 を返す。

use crate::ports::outbound::Clock;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, Default)]
pub struct StdClock;

impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_after_2020_and_non_decreasing() {
        let clock = StdClock;
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a > 1_577_836_800_000);
        assert!(b >= a);
    }
}
