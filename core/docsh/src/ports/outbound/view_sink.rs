//! 表示 Outbound ポート
//!
//! View Controller は画面を直接触らず、ViewEvent をこの trait へ流す。

use crate::domain::ViewEvent;
use common::error::Error;

pub trait ViewSink: Send + Sync {
    fn emit(&self, event: &ViewEvent) -> Result<(), Error>;
}
