/// 構成要素のパス
///
/// デプロイ定義のツリー上の位置を表す（例: `Dev/Api/ProductApi/Function`）。
/// ディスカバリーキーとテンプレートの論理IDはこのパスから導出する。
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstructPath {
    segments: Vec<String>,
}

impl ConstructPath {
    /// ルート要素のパスを作成
    pub fn root(id: impl Into<String>) -> Self {
        Self {
            segments: vec![id.into()],
        }
    }

    /// 子要素のパスを作成
    pub fn child(&self, id: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(id.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// 末尾のID
    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// `ancestor`がこのパスの祖先（または自身）かどうか
    pub fn starts_with(&self, ancestor: &ConstructPath) -> bool {
        self.segments.starts_with(&ancestor.segments)
    }

    /// スタック内で一意な論理IDを生成
    ///
    /// `stack`より下のセグメントを連結し、英数字以外を取り除く。
    /// `stack`の子孫でない場合は全セグメントを使う。
    pub fn logical_id_within(&self, stack: &ConstructPath) -> String {
        let relative = if self.starts_with(stack) {
            &self.segments[stack.segments.len()..]
        } else {
            &self.segments[..]
        };

        relative
            .iter()
            .flat_map(|segment| segment.chars())
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }
}

impl fmt::Display for ConstructPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_appends_segment() {
        let path = ConstructPath::root("Dev").child("Api").child("SumFunction");
        assert_eq!(path.segments(), ["Dev", "Api", "SumFunction"]);
        assert_eq!(path.to_string(), "Dev/Api/SumFunction");
        assert_eq!(path.id(), "SumFunction");
    }

    #[test]
    fn test_child_does_not_modify_parent() {
        let parent = ConstructPath::root("Dev");
        let _child = parent.child("Api");
        assert_eq!(parent.to_string(), "Dev");
    }

    #[test]
    fn test_starts_with() {
        let stack = ConstructPath::root("Dev").child("Api");
        let function = stack.child("ProductApi").child("Function");
        assert!(function.starts_with(&stack));
        assert!(stack.starts_with(&stack));
        assert!(!stack.starts_with(&function));
        assert!(!function.starts_with(&ConstructPath::root("Prod")));
    }

    #[test]
    fn test_logical_id_within_stack() {
        let stack = ConstructPath::root("Dev").child("Api");
        let function = stack.child("ProductApi").child("Function");
        assert_eq!(function.logical_id_within(&stack), "ProductApiFunction");
    }

    #[test]
    fn test_logical_id_drops_non_alphanumerics() {
        let stack = ConstructPath::root("Dev").child("Api");
        let path = stack.child("Product-Api").child("url_param");
        assert_eq!(path.logical_id_within(&stack), "ProductApiurlparam");
    }

    #[test]
    fn test_logical_id_outside_stack_uses_all_segments() {
        let stack = ConstructPath::root("Dev").child("Api");
        let other = ConstructPath::root("Prod").child("Api").child("Fn");
        assert_eq!(other.logical_id_within(&stack), "ProdApiFn");
    }
}
