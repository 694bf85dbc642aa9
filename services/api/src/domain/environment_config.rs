/// 環境ごとのデプロイ先（AWSアカウントとリージョン）
///
/// 設定変数から一度だけ解決され、以降は変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    /// AWSアカウントID
    account: String,
    /// AWSリージョン
    region: String,
}

impl EnvironmentConfig {
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// 空のフィールド名を返す（全フィールドが設定済みならNone）
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.account.trim().is_empty() {
            Some("account")
        } else if self.region.trim().is_empty() {
            Some("region")
        } else {
            None
        }
    }
}
