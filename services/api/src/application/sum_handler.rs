// sumハンドラー
//
// JSONイベント `{a, b}` を受け取り、`{sum}` を返す。

use tracing::info;

use crate::domain::{SumEvent, SumResult};

/// 2つの数値の和を計算するハンドラー
#[derive(Debug, Clone, Copy, Default)]
pub struct SumHandler;

impl SumHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SumEvent) -> SumResult {
        info!(a = event.a, b = event.b, "イベント受信");

        let result = event.sum();

        info!(sum = result.sum, "計算完了");
        result
    }
}
