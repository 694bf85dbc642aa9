/// 設定変数のスナップショット
///
/// プロセス起動時に環境変数を一度だけ読み込み、以降はこの構造体を
/// 明示的に受け渡す。深い階層のヘルパーから`std::env`を直接読まない。
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigVariables {
    values: BTreeMap<String, String>,
}

impl ConfigVariables {
    /// 現在のプロセス環境変数から作成
    ///
    /// UTF-8として解釈できない変数は無視する。
    pub fn from_env() -> Self {
        let values = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self { values }
    }

    /// 明示的な値で作成（テスト用）
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { values }
    }

    /// 変数の値を取得（未設定または空白のみの場合はNone）
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// 値を追加・上書きした新しいスナップショットを返す
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// 変数を取り除いた新しいスナップショットを返す
    pub fn without(mut self, name: &str) -> Self {
        self.values.remove(name);
        self
    }
}
