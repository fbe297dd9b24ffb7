use serde::Serialize;
use utoipa::ToSchema;

pub const MIN_PASSWORD_LEN: usize = 8;
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Each rule is always reported, pass or fail, so clients can render a checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRequirements {
    pub min_length: bool,
    pub has_upper_case: bool,
    pub has_lower_case: bool,
    pub has_number: bool,
    pub has_special_char: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordStrength {
    pub is_valid: bool,
    pub requirements: PasswordRequirements,
}

pub fn check_strength(password: &str) -> PasswordStrength {
    let requirements = PasswordRequirements {
        min_length: password.chars().count() >= MIN_PASSWORD_LEN,
        has_upper_case: password.chars().any(|c| c.is_ascii_uppercase()),
        has_lower_case: password.chars().any(|c| c.is_ascii_lowercase()),
        has_number: password.chars().any(|c| c.is_ascii_digit()),
        has_special_char: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
    };

    PasswordStrength {
        is_valid: requirements.min_length
            && requirements.has_upper_case
            && requirements.has_lower_case
            && requirements.has_number
            && requirements.has_special_char,
        requirements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes_every_rule() {
        let strength = check_strength("Abcdef1!");
        assert!(strength.is_valid);
        assert_eq!(
            strength.requirements,
            PasswordRequirements {
                min_length: true,
                has_upper_case: true,
                has_lower_case: true,
                has_number: true,
                has_special_char: true,
            }
        );
    }

    #[test]
    fn reference_vectors() {
        assert!(check_strength("Abc12345!").is_valid);

        let strength = check_strength("abc");
        assert!(!strength.is_valid);
        assert_eq!(
            strength.requirements,
            PasswordRequirements {
                min_length: false,
                has_upper_case: false,
                has_lower_case: true,
                has_number: false,
                has_special_char: false,
            }
        );
    }

    #[test]
    fn short_password_fails_only_on_length() {
        let strength = check_strength("Ab1!");
        assert!(!strength.is_valid);
        assert!(!strength.requirements.min_length);
        assert!(strength.requirements.has_upper_case);
        assert!(strength.requirements.has_lower_case);
        assert!(strength.requirements.has_number);
        assert!(strength.requirements.has_special_char);
    }

    #[test]
    fn missing_classes_are_reported() {
        let strength = check_strength("alllowercase");
        assert!(!strength.is_valid);
        assert!(strength.requirements.min_length);
        assert!(!strength.requirements.has_upper_case);
        assert!(!strength.requirements.has_number);
        assert!(!strength.requirements.has_special_char);
    }

    #[test]
    fn underscore_is_not_a_special_char() {
        assert!(!check_strength("Abcdef1_").requirements.has_special_char);
        assert!(check_strength("Abcdef1\"").requirements.has_special_char);
    }

    #[test]
    fn serializes_with_client_field_names() {
        let json = serde_json::to_value(check_strength("x")).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["requirements"]["minLength"], false);
        assert_eq!(json["requirements"]["hasSpecialChar"], false);
    }
}
