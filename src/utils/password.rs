use bcrypt::{hash, verify, DEFAULT_COST};
use crate::error::{AppError, AppResult};

/// 验证密码强度
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < 8 || password.len() > 128 {
        return Err(AppError::ValidationError(
            "Password must be between 8 and 128 characters".to_string()
        ));
    }

    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_lowercase || !has_uppercase || !has_digit {
        return Err(AppError::ValidationError(
            "Password must contain uppercase, lowercase letters and digits".to_string()
        ));
    }

    Ok(())
}

/// 对密码进行哈希
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))
}

/// 验证密码
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    verify(password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Admin12345").is_ok());
        assert!(validate_password("admin12345").is_err()); // 缺少大写
        assert!(validate_password("ADMIN12345").is_err()); // 缺少小写
        assert!(validate_password("AdminAdmin").is_err()); // 缺少数字
        assert!(validate_password("Ad123").is_err()); // 太短
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hashed = hash_password("Admin12345").unwrap();

        assert!(verify_password("Admin12345", &hashed).unwrap());
        assert!(!verify_password("Admin12346", &hashed).unwrap());
    }
}
