//! 相関トークン生成 Outbound ポート
//!
//! usecase は IdGenerator を注入し、テストでは固定・連番のトークンを返す実装を渡せる。
//! より強い生成器へ差し替える場合もこの trait の実装を替えるだけでよい。

use crate::domain::CorrelationToken;

/// CorrelationToken を生成する抽象（Outbound ポート）
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> CorrelationToken;
}
