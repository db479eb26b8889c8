//! Password reset state machine
//!
//! A strict linear flow:
//!
//! ```text
//! AwaitingEmail -> AwaitingCode -> AwaitingNewPassword -> Done
//! ```
//!
//! Network calls are made by the caller; this type only decides what input
//! is acceptable in each step and which step comes next.

use std::fmt;
use std::time::Duration;

use crate::{Error, Result, ValidationError};

/// Length of the one-time reset code
pub const OTP_LENGTH: usize = 6;
/// Minimum accepted length for a new password
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Delay before a finished reset returns to the login entry point
pub const RETURN_TO_LOGIN_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    AwaitingEmail,
    AwaitingCode,
    AwaitingNewPassword,
    Done,
}

impl ResetStep {
    pub fn title(&self) -> &'static str {
        match self {
            ResetStep::AwaitingEmail => "Forgot Password",
            ResetStep::AwaitingCode => "Enter Reset Code",
            ResetStep::AwaitingNewPassword => "New Password",
            ResetStep::Done => "Success!",
        }
    }
}

impl fmt::Display for ResetStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResetStep::AwaitingEmail => "awaiting-email",
            ResetStep::AwaitingCode => "awaiting-code",
            ResetStep::AwaitingNewPassword => "awaiting-new-password",
            ResetStep::Done => "done",
        };
        f.write_str(name)
    }
}

/// Strip non-digits and keep at most [`OTP_LENGTH`] digits
pub fn normalize_code(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(OTP_LENGTH)
        .collect()
}

/// Check a new password and its confirmation.
///
/// Length is checked before equality.
pub fn validate_new_password(
    new_password: &str,
    confirm_password: &str,
) -> std::result::Result<(), ValidationError> {
    if new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new(
            "new_password",
            "Error",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    if new_password != confirm_password {
        return Err(ValidationError::new(
            "confirm_password",
            "Error",
            "Passwords do not match",
        ));
    }
    Ok(())
}

/// State of one password reset attempt
#[derive(Debug, Clone)]
pub struct PasswordReset {
    step: ResetStep,
    email: String,
    code: String,
    echoed_code: Option<String>,
}

impl Default for PasswordReset {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordReset {
    pub fn new() -> Self {
        Self {
            step: ResetStep::AwaitingEmail,
            email: String::new(),
            code: String::new(),
            echoed_code: None,
        }
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// The normalized code entered so far
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Code echoed back by a non-production server, if it sent one
    pub fn echoed_code(&self) -> Option<&str> {
        self.echoed_code.as_deref()
    }

    /// Accept the email typed in the first step
    pub fn set_email(&mut self, email: &str) -> Result<()> {
        self.require(&[ResetStep::AwaitingEmail])?;
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::new(
                "email",
                "Error",
                "Please enter your email address",
            )
            .into());
        }
        self.email = email.to_string();
        Ok(())
    }

    /// The server accepted the request for a code.
    ///
    /// From `AwaitingEmail` this moves to `AwaitingCode`. From `AwaitingCode`
    /// it is a resend and the step does not change.
    pub fn code_requested(&mut self, echoed_code: Option<String>) -> Result<()> {
        self.require(&[ResetStep::AwaitingEmail, ResetStep::AwaitingCode])?;
        if echoed_code.is_some() {
            self.echoed_code = echoed_code;
        }
        self.step = ResetStep::AwaitingCode;
        Ok(())
    }

    /// Update the code field; returns the normalized value
    pub fn input_code(&mut self, input: &str) -> &str {
        self.code = normalize_code(input);
        &self.code
    }

    /// The code ready for submission, or a rejection if it is not six digits
    pub fn submittable_code(&self) -> Result<&str> {
        self.require(&[ResetStep::AwaitingCode])?;
        if self.code.len() != OTP_LENGTH {
            return Err(ValidationError::new(
                "reset_code",
                "Error",
                format!("Please enter the {}-digit code", OTP_LENGTH),
            )
            .into());
        }
        Ok(&self.code)
    }

    pub fn code_verified(&mut self) -> Result<()> {
        self.require(&[ResetStep::AwaitingCode])?;
        self.step = ResetStep::AwaitingNewPassword;
        Ok(())
    }

    /// Validate the new password pair before it is sent
    pub fn check_new_password(&self, new_password: &str, confirm_password: &str) -> Result<()> {
        self.require(&[ResetStep::AwaitingNewPassword])?;
        validate_new_password(new_password, confirm_password)?;
        Ok(())
    }

    pub fn password_reset(&mut self) -> Result<()> {
        self.require(&[ResetStep::AwaitingNewPassword])?;
        self.step = ResetStep::Done;
        Ok(())
    }

    /// Go back one step. Not available from the first or the last step.
    pub fn back(&mut self) -> Result<()> {
        self.step = match self.step {
            ResetStep::AwaitingCode => ResetStep::AwaitingEmail,
            ResetStep::AwaitingNewPassword => ResetStep::AwaitingCode,
            step => return Err(Error::InvalidResetStep(step)),
        };
        Ok(())
    }

    fn require(&self, allowed: &[ResetStep]) -> Result<()> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(Error::InvalidResetStep(self.step))
        }
    }
}
