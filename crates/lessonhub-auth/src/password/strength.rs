//! Password strength gating at registration.

use lessonhub_core::error::AppError;

/// Reject passwords below the configured zxcvbn score (0-4).
///
/// The user's email is fed in as context so passwords derived from it
/// score lower.
pub fn check_strength(password: &str, email: &str, min_score: u8) -> Result<(), AppError> {
    let estimate = zxcvbn::zxcvbn(password, &[email]);
    let score = match estimate.score() {
        zxcvbn::Score::Zero => 0u8,
        zxcvbn::Score::One => 1,
        zxcvbn::Score::Two => 2,
        zxcvbn::Score::Three => 3,
        _ => 4,
    };
    if score < min_score {
        return Err(AppError::validation(format!(
            "Password is too weak (score {score}, minimum {min_score})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_password_rejected() {
        assert!(check_strength("password", "a@b.com", 3).is_err());
        assert!(check_strength("12345678", "a@b.com", 3).is_err());
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(check_strength("tr0ub4dor&3-horse-battery", "a@b.com", 3).is_ok());
    }
}
