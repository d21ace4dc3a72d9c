use validator::Validate;

/// ユーザーアカウントエンティティ
///
/// パスワードは平文のまま保存・照合される（既知の欠陥、DESIGN.md 参照）。
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i32,
    pub name: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub ssn: String,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("ssn", &"<redacted>")
            .finish()
    }
}

/// 保存前のアカウント（ユーザー名は生成済み、ID は未採番）
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub ssn: String,
}

impl NewAccount {
    /// ストレージが採番した ID を付与してエンティティにする
    pub fn into_account(self, id: i32) -> Account {
        Account {
            id,
            name: self.name,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            ssn: self.ssn,
        }
    }
}

/// アカウント作成リクエスト（コンソール入力）
#[derive(Clone, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: String,

    #[validate(regex(
        path = *SSN_REGEX,
        message = "ssn must be 10 digits or in format YYMMDD-XXXX"
    ))]
    pub ssn: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

lazy_static::lazy_static! {
    static ref SSN_REGEX: regex::Regex =
        regex::Regex::new(r"^([0-9]{10}|[0-9]{6}-[0-9]{4})$").unwrap();
}

/// 姓名の先頭 3 文字ずつを連結したユーザー名の基底部分
pub fn base_username(first_name: &str, last_name: &str) -> String {
    first_name
        .chars()
        .take(3)
        .chain(last_name.chars().take(3))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid_ssn(ssn: &str) -> bool {
        request(ssn).validate().is_ok()
    }

    fn request(ssn: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            first_name: "Neil".to_string(),
            last_name: "Armstrong".to_string(),
            ssn: ssn.to_string(),
            password: "apollo11".to_string(),
        }
    }

    #[test]
    fn test_ssn_formats() {
        assert!(is_valid_ssn("1234567890"));
        assert!(is_valid_ssn("123456-7890"));
        assert!(!is_valid_ssn("12345"));
        assert!(!is_valid_ssn("abcdef1234"));
        assert!(!is_valid_ssn("12345678901"));
        assert!(!is_valid_ssn("1234567-890"));
        // ASCII の数字のみ
        assert!(!is_valid_ssn("١٢٣٤٥٦٧٨٩٠"));
        assert!(!is_valid_ssn("１２３４５６-７８９０"));
    }

    #[test]
    fn test_base_username() {
        assert_eq!(base_username("Neil", "Armstrong"), "NeiArm");
        assert_eq!(base_username("Al", "Bo"), "AlBo");
        assert_eq!(base_username("Åsa", "Öberg"), "ÅsaÖbe");
    }

    #[test]
    fn test_create_request_validation() {
        assert!(request("1234567890").validate().is_ok());
        assert!(request("123456-7890").validate().is_ok());
        assert!(request("12345").validate().is_err());

        let mut empty_name = request("1234567890");
        empty_name.first_name.clear();
        assert!(empty_name.validate().is_err());

        let mut empty_password = request("1234567890");
        empty_password.password.clear();
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let account = NewAccount {
            name: "NeiArm".to_string(),
            password: "apollo11".to_string(),
            first_name: "Neil".to_string(),
            last_name: "Armstrong".to_string(),
            ssn: "1234567890".to_string(),
        }
        .into_account(7);

        let rendered = format!("{:?}", account);
        assert!(rendered.contains("NeiArm"));
        assert!(!rendered.contains("apollo11"));
        assert!(!rendered.contains("1234567890"));
    }
}
