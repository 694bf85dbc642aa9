/// 計算Lambdaの入出力
///
/// - sum: JSONイベント `{a, b}` → `{sum}`
/// - product: クエリ文字列 `a`, `b` → `{product}`
///
/// 整数値の結果はJSONの整数としてシリアライズする（`12.0`ではなく`12`）。
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// f64で誤差なく表せる整数の上限（2^53）
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// 整数値なら整数として、それ以外は浮動小数点数としてシリアライズする
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// sum関数の入力イベント
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SumEvent {
    pub a: f64,
    pub b: f64,
}

/// sum関数の出力
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SumResult {
    #[serde(serialize_with = "serialize_number")]
    pub sum: f64,
}

impl SumEvent {
    pub fn sum(&self) -> SumResult {
        SumResult {
            sum: self.a + self.b,
        }
    }
}

/// productのクエリパラメータのエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// 必須パラメータがない
    #[error("Missing required query parameter '{0}'")]
    Missing(&'static str),

    /// 数値として解釈できない（NaN/Infinityも含む）
    #[error("Query parameter '{name}' is not a finite number: '{value}'")]
    NotANumber { name: &'static str, value: String },

    /// 計算結果が有限の数値に収まらない
    #[error("The product of {a} and {b} is out of range")]
    OutOfRange { a: String, b: String },
}

/// product関数の入力（検証済み）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductParameters {
    pub a: f64,
    pub b: f64,
}

/// product関数の出力
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductResult {
    #[serde(serialize_with = "serialize_number")]
    pub product: f64,
}

/// 1つのクエリパラメータを有限のf64として解釈
fn parse_finite(name: &'static str, value: Option<&str>) -> Result<f64, ParameterError> {
    let raw = value.ok_or(ParameterError::Missing(name))?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParameterError::NotANumber {
            name,
            value: raw.to_string(),
        })
}

impl ProductParameters {
    /// クエリ文字列の値から入力を作成
    pub fn from_query(a: Option<&str>, b: Option<&str>) -> Result<Self, ParameterError> {
        Ok(Self {
            a: parse_finite("a", a)?,
            b: parse_finite("b", b)?,
        })
    }

    pub fn product(&self) -> Result<ProductResult, ParameterError> {
        let product = self.a * self.b;
        if !product.is_finite() {
            return Err(ParameterError::OutOfRange {
                a: self.a.to_string(),
                b: self.b.to_string(),
            });
        }
        Ok(ProductResult { product })
    }
}
